//! The signing seam between certificate assembly and key material.
//!
//! A [`Signer`] produces a detached signature over the canonical DER
//! encoding of a TBS certificate; a [`SignerFactory`] builds the
//! matching [`Verifier`] for a certified key, consumed by
//! [`CertifiedPublicKey`] rather than by the generator itself. The
//! generator holds a [`SignerBinding`], which fixes at construction time
//! whether certificates come out self-signed or CA-issued.

use crate::cert::{CertifiedPublicKey, SignatureAlgorithm};
use crate::error::CertForgeError;
use crate::key::{KeyPair, PublicKey};

/// Produces detached signatures over canonical encodings.
pub trait Signer: Send + Sync {
    /// The algorithm stamped into certificates signed by this signer.
    fn signature_algorithm(&self) -> SignatureAlgorithm;

    /// Signs `message`, returning the detached signature bytes.
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CertForgeError>;
}

/// Verifies detached signatures produced by a [`Signer`].
pub trait Verifier: Send + Sync {
    /// Returns whether `signature` is a valid signature over `message`.
    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<bool, CertForgeError>;
}

/// Builds verifiers for certified keys.
pub trait SignerFactory: Send + Sync {
    /// Constructs a verifier checking signatures made by the holder of
    /// `certified`.
    fn verifier(&self, certified: &CertifiedPublicKey) -> Result<Box<dyn Verifier>, CertForgeError>;
}

/// A signer backed by a local [`KeyPair`].
pub struct KeyPairSigner {
    key: KeyPair,
}

impl KeyPairSigner {
    pub fn new(key: KeyPair) -> Self {
        Self { key }
    }
}

impl Signer for KeyPairSigner {
    fn signature_algorithm(&self) -> SignatureAlgorithm {
        match &self.key {
            KeyPair::Rsa { .. } => SignatureAlgorithm::Sha256WithRSA,
            KeyPair::EcdsaP256 { .. } => SignatureAlgorithm::Sha256WithECDSA,
            KeyPair::Ed25519 { .. } => SignatureAlgorithm::Ed25519,
        }
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CertForgeError> {
        self.key.sign_data(message)
    }
}

/// A verifier backed by a [`PublicKey`].
pub struct PublicKeyVerifier {
    key: PublicKey,
}

impl Verifier for PublicKeyVerifier {
    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<bool, CertForgeError> {
        self.key.verify_data(message, signature)
    }
}

/// Builds [`PublicKeyVerifier`]s out of the key certified by a
/// certificate.
pub struct KeyPairSignerFactory;

impl SignerFactory for KeyPairSignerFactory {
    fn verifier(
        &self,
        certified: &CertifiedPublicKey,
    ) -> Result<Box<dyn Verifier>, CertForgeError> {
        let key = certified.subject_public_key()?;
        Ok(Box::new(PublicKeyVerifier { key }))
    }
}

/// How a generator's signer relates to the certificates it signs.
///
/// Decided once, at generator construction: a `SelfSigned` binding signs
/// with the subject's own key and names the subject as issuer, while a
/// `Certifying` binding carries the issuing authority's certified key
/// and names that authority as issuer.
pub enum SignerBinding {
    /// The subject signs its own certificate.
    SelfSigned(Box<dyn Signer>),
    /// A certificate authority signs on behalf of the subject.
    Certifying {
        signer: Box<dyn Signer>,
        issuer: CertifiedPublicKey,
    },
}

impl SignerBinding {
    /// Binds a signer holding the subject's private key.
    pub fn self_signed(signer: impl Signer + 'static) -> Self {
        SignerBinding::SelfSigned(Box::new(signer))
    }

    /// Binds a signer holding the private key behind `issuer`.
    pub fn certifying(signer: impl Signer + 'static, issuer: CertifiedPublicKey) -> Self {
        SignerBinding::Certifying {
            signer: Box::new(signer),
            issuer,
        }
    }

    /// The signer itself, whichever way it is bound.
    pub fn signer(&self) -> &dyn Signer {
        match self {
            SignerBinding::SelfSigned(signer) => signer.as_ref(),
            SignerBinding::Certifying { signer, .. } => signer.as_ref(),
        }
    }

    /// The issuing authority's certified key, if this binding certifies
    /// on behalf of one.
    pub fn issuer(&self) -> Option<&CertifiedPublicKey> {
        match self {
            SignerBinding::SelfSigned(_) => None,
            SignerBinding::Certifying { issuer, .. } => Some(issuer),
        }
    }
}
