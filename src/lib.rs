//! # CertForge - A Pure Rust X.509 Certificate Generation Engine
//!
//! CertForge assembles and signs X.509 certificates entirely with
//! rustcrypto libraries, without dependencies on ring or openssl. At its
//! center sits [`generator::X509CertificateGenerator`]: given a subject
//! name, a subject public key, and certificate parameters, it
//! deterministically assembles the To-Be-Signed certificate body
//! (random 128-bit serial number, resolved issuer, whole-day validity
//! window, optional extensions) and hands it to a signing abstraction to
//! produce a certified public key.
//!
//! ## Key Features
//!
//! - **Self-signed or CA-issued**: a [`signer::SignerBinding`] fixes at
//!   construction whether the generator signs with the subject's own key
//!   or on behalf of a certifying authority.
//! - **Certificate-version profiles**: a
//!   [`generator::CertificateProfile`] strategy stamps version-specific
//!   extension fields without duplicating the assembly logic; version 1
//!   and version 3 profiles ship with the crate.
//! - **Builder-based TBS assembly**: mandatory fields are checked at
//!   finalization, and the built
//!   [`tbs_certificate::TbsCertificate`] is immutable.
//! - **RSA, ECDSA P-256, and Ed25519** keys and signatures.
//!
//! ## Quick Start
//!
//! ### Generating a Self-Signed Certificate
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use certforge::{
//!     cert::params::{
//!         CertificateParameters, DistinguishedName, X509CertificateGenerationParameters,
//!         X509CertificateParameters,
//!     },
//!     generator::{X509CertificateGenerator, X509v3Profile},
//!     key::KeyPair,
//!     signer::{KeyPairSigner, KeyPairSignerFactory, SignerBinding},
//! };
//!
//! # fn main() -> Result<(), certforge::error::CertForgeError> {
//! let key = KeyPair::generate_ecdsa_p256();
//! let public_key = key.public_key();
//!
//! let subject = DistinguishedName::builder()
//!     .common_name("example.com".to_string())
//!     .organization("Example Corp".to_string())
//!     .build();
//!
//! let mut generator = X509CertificateGenerator::new(
//!     SignerBinding::self_signed(KeyPairSigner::new(key)),
//!     X509CertificateGenerationParameters::builder().validity(365).build(),
//!     Arc::new(KeyPairSignerFactory),
//!     rand_core::OsRng,
//!     Box::new(X509v3Profile),
//! );
//!
//! let parameters = CertificateParameters::X509(X509CertificateParameters::builder().build());
//! let certified = generator.generate(&subject, &public_key, &parameters)?;
//!
//! println!("Certificate:\n{}", certified.to_pem()?);
//! # Ok(())
//! # }
//! ```
//!
//! ### Issuing From a Certificate Authority
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use certforge::{
//!     cert::params::{
//!         CertificateParameters, DistinguishedName, X509CertificateGenerationParameters,
//!         X509CertificateParameters,
//!     },
//!     generator::{X509CertificateGenerator, X509v3Profile},
//!     key::KeyPair,
//!     signer::{KeyPairSigner, KeyPairSignerFactory, SignerBinding},
//! };
//!
//! # fn main() -> Result<(), certforge::error::CertForgeError> {
//! let signer_factory = Arc::new(KeyPairSignerFactory);
//!
//! // Self-sign the CA's own certificate first.
//! let ca_key = KeyPair::generate_ecdsa_p256();
//! let ca_public_key = ca_key.public_key();
//! let ca_subject = DistinguishedName::builder()
//!     .common_name("Example CA".to_string())
//!     .build();
//!
//! let mut ca_generator = X509CertificateGenerator::new(
//!     SignerBinding::self_signed(KeyPairSigner::new(ca_key.clone())),
//!     X509CertificateGenerationParameters::builder().validity(3650).build(),
//!     signer_factory.clone(),
//!     rand_core::OsRng,
//!     Box::new(X509v3Profile),
//! );
//! let ca_parameters =
//!     CertificateParameters::X509(X509CertificateParameters::builder().is_ca(true).build());
//! let ca_certified = ca_generator.generate(&ca_subject, &ca_public_key, &ca_parameters)?;
//!
//! // Then bind the CA key and certificate into a certifying generator.
//! let mut generator = X509CertificateGenerator::new(
//!     SignerBinding::certifying(KeyPairSigner::new(ca_key), ca_certified),
//!     X509CertificateGenerationParameters::builder().validity(365).build(),
//!     signer_factory,
//!     rand_core::OsRng,
//!     Box::new(X509v3Profile),
//! );
//!
//! let server_key = KeyPair::generate_ecdsa_p256();
//! let server_subject = DistinguishedName::builder()
//!     .common_name("server.example.com".to_string())
//!     .build();
//! let parameters = CertificateParameters::X509(X509CertificateParameters::builder().build());
//! let server_certified =
//!     generator.generate(&server_subject, &server_key.public_key(), &parameters)?;
//!
//! println!("Server certificate issued successfully!");
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`generator`]: The certificate generation engine and its
//!   certificate-version profiles
//! - [`tbs_certificate`]: TBS certificate assembly and finalization
//! - [`cert`]: Certificates, certified public keys, parameters, and
//!   extensions
//! - [`signer`]: Signing, verification, and signer-factory abstractions
//! - [`key`]: Key generation and cryptographic operations
//! - [`error`]: Error types

pub mod cert;
pub mod error;
pub mod generator;
pub mod key;
pub mod signer;
pub mod tbs_certificate;
