pub mod extensions;
pub mod params;

use std::sync::Arc;

use der::{Decode, Encode, EncodePem};
use x509_cert::certificate::CertificateInner;

use crate::error::CertForgeError;
use crate::key::PublicKey;
use crate::signer::SignerFactory;
use params::DistinguishedName;

pub type Result<T> = std::result::Result<T, CertForgeError>;

/// Signature algorithms this crate can stamp into certificates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    /// SHA-256 with RSA encryption.
    Sha256WithRSA,
    /// SHA-256 with ECDSA on P-256.
    Sha256WithECDSA,
    /// Ed25519.
    Ed25519,
}

impl From<SignatureAlgorithm> for x509_cert::spki::AlgorithmIdentifierOwned {
    fn from(value: SignatureAlgorithm) -> Self {
        match value {
            SignatureAlgorithm::Sha256WithRSA => x509_cert::spki::AlgorithmIdentifierOwned {
                oid: const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION,
                parameters: None,
            },
            SignatureAlgorithm::Sha256WithECDSA => x509_cert::spki::AlgorithmIdentifierOwned {
                oid: const_oid::db::rfc5912::ECDSA_WITH_SHA_256,
                parameters: None,
            },
            SignatureAlgorithm::Ed25519 => x509_cert::spki::AlgorithmIdentifierOwned {
                oid: const_oid::db::rfc8410::ID_ED_25519,
                parameters: None,
            },
        }
    }
}

/// A signed X.509 certificate.
#[derive(Debug, Clone)]
pub struct Certificate {
    /// The inner representation of the certificate.
    pub inner: CertificateInner,
}

impl Certificate {
    /// Encodes the certificate into DER format.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        self.inner
            .to_der()
            .map_err(|e| CertForgeError::EncodingError(e.to_string()))
    }

    /// Encodes the certificate into PEM format.
    pub fn to_pem(&self) -> Result<String> {
        self.inner
            .to_pem(pkcs8::LineEnding::LF)
            .map_err(|e| CertForgeError::EncodingError(e.to_string()))
    }

    /// Decodes a certificate from DER format.
    pub fn from_der(der_bytes: &[u8]) -> Result<Self> {
        let inner = CertificateInner::from_der(der_bytes)?;
        Ok(Self { inner })
    }
}

/// A public key wrapped in a signed certificate attesting to its
/// ownership.
///
/// The value carries the signer factory it was generated with so it can
/// verify its own signature later, either against itself (self-signed)
/// or against the issuing authority's certified key. Read-only once
/// produced; a certified key held by a CA doubles as the issuer
/// reference for chained signing.
#[derive(Clone)]
pub struct CertifiedPublicKey {
    certificate: Certificate,
    signer_factory: Arc<dyn SignerFactory>,
}

impl CertifiedPublicKey {
    /// Wraps a signed certificate together with the factory used to
    /// build verifiers for it.
    pub fn new(certificate: Certificate, signer_factory: Arc<dyn SignerFactory>) -> Self {
        Self {
            certificate,
            signer_factory,
        }
    }

    /// The wrapped certificate.
    pub fn certificate(&self) -> &Certificate {
        &self.certificate
    }

    /// The certified subject name.
    pub fn subject(&self) -> DistinguishedName {
        DistinguishedName::from_x509_name(&self.certificate.inner.tbs_certificate.subject)
    }

    /// The issuer name recorded in the certificate.
    pub fn issuer(&self) -> DistinguishedName {
        DistinguishedName::from_x509_name(&self.certificate.inner.tbs_certificate.issuer)
    }

    /// The certified public key.
    pub fn subject_public_key(&self) -> Result<PublicKey> {
        PublicKey::from_x509spki(&self.certificate.inner.tbs_certificate.subject_public_key_info)
    }

    /// The certificate serial number, as big-endian integer bytes.
    pub fn serial_number(&self) -> Vec<u8> {
        self.certificate
            .inner
            .tbs_certificate
            .serial_number
            .as_bytes()
            .to_vec()
    }

    /// Encodes the certificate into DER format.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        self.certificate.to_der()
    }

    /// Encodes the certificate into PEM format.
    pub fn to_pem(&self) -> Result<String> {
        self.certificate.to_pem()
    }

    /// Checks this certificate's signature against the given issuer's
    /// certified key.
    pub fn verify_signed_by(&self, issuer: &CertifiedPublicKey) -> Result<bool> {
        let verifier = self.signer_factory.verifier(issuer)?;
        let message = self
            .certificate
            .inner
            .tbs_certificate
            .to_der()
            .map_err(|e| CertForgeError::EncodingError(e.to_string()))?;
        let signature = self
            .certificate
            .inner
            .signature
            .as_bytes()
            .ok_or_else(|| {
                CertForgeError::DecodingError("non-octet-aligned signature".to_string())
            })?;
        verifier.verify(&message, signature)
    }

    /// Checks this certificate's signature against its own key.
    pub fn verify_self_signed(&self) -> Result<bool> {
        self.verify_signed_by(self)
    }
}

impl std::fmt::Debug for CertifiedPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CertifiedPublicKey")
            .field("subject", &self.subject())
            .field("issuer", &self.issuer())
            .field("serial_number", &self.serial_number())
            .finish_non_exhaustive()
    }
}
