use ed25519_dalek::{SigningKey as Ed25519SigningKey, VerifyingKey as Ed25519VerifyingKey};
use p256::ecdsa::{SigningKey as P256SigningKey, VerifyingKey as P256VerifyingKey};
use rsa::signature::{SignatureEncoding, Signer as _, Verifier as _};
use rsa::{
    RsaPrivateKey, RsaPublicKey,
    pkcs1::DecodeRsaPublicKey,
    pkcs1v15::{SigningKey as RsaSigningKey, VerifyingKey as RsaVerifyingKey},
};
use sha2::Sha256;
use x509_cert::spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};

use crate::error::CertForgeError;

/// Supported key pairs for certificate operations.
#[derive(Clone)]
pub enum KeyPair {
    Rsa {
        private: Box<RsaPrivateKey>,
        public: RsaPublicKey,
    },
    EcdsaP256 {
        signing_key: P256SigningKey,
        verifying_key: P256VerifyingKey,
    },
    Ed25519 {
        signing_key: Ed25519SigningKey,
    },
}

impl KeyPair {
    /// Generate an RSA key pair with the specified number of bits.
    pub fn generate_rsa(bits: usize) -> Result<Self, CertForgeError> {
        let mut rng = rand_core::OsRng;
        let private = RsaPrivateKey::new(&mut rng, bits)?;
        let public = RsaPublicKey::from(&private);
        Ok(KeyPair::Rsa {
            private: Box::new(private),
            public,
        })
    }

    /// Generate an ECDSA P-256 key pair.
    pub fn generate_ecdsa_p256() -> Self {
        let mut rng = rand_core::OsRng;
        let signing_key = P256SigningKey::random(&mut rng);
        let verifying_key = signing_key.verifying_key().to_owned();
        KeyPair::EcdsaP256 {
            signing_key,
            verifying_key,
        }
    }

    /// Generate an Ed25519 key pair.
    pub fn generate_ed25519() -> Self {
        let mut rng = rand_core::OsRng;
        let signing_key = Ed25519SigningKey::generate(&mut rng);
        KeyPair::Ed25519 { signing_key }
    }

    /// Returns the public half of this key pair.
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_key_pair(self)
    }

    /// Produces a detached signature over `message`.
    ///
    /// ECDSA signatures are DER-encoded as required for X.509 signature
    /// bit strings; RSA uses PKCS#1 v1.5 with SHA-256.
    pub fn sign_data(&self, message: &[u8]) -> Result<Vec<u8>, CertForgeError> {
        match self {
            KeyPair::Rsa { private, .. } => {
                let signing_key: RsaSigningKey<Sha256> = RsaSigningKey::new(*private.clone());
                let signature = signing_key
                    .try_sign(message)
                    .map_err(|e| CertForgeError::SignatureError(e.to_string()))?;
                Ok(signature.to_vec())
            }
            KeyPair::EcdsaP256 { signing_key, .. } => {
                let signature: p256::ecdsa::Signature = signing_key
                    .try_sign(message)
                    .map_err(|e| CertForgeError::SignatureError(e.to_string()))?;
                Ok(signature.to_der().to_vec())
            }
            KeyPair::Ed25519 { signing_key } => {
                let signature = signing_key
                    .try_sign(message)
                    .map_err(|e| CertForgeError::SignatureError(e.to_string()))?;
                Ok(signature.to_bytes().to_vec())
            }
        }
    }
}

/// Public key material carried into a certificate subject.
#[derive(Clone, Debug)]
pub enum PublicKey {
    Rsa(RsaPublicKey),
    EcdsaP256(P256VerifyingKey),
    Ed25519(Ed25519VerifyingKey),
}

impl PublicKey {
    /// Extracts the public key from a key pair.
    pub fn from_key_pair(key_pair: &KeyPair) -> Self {
        match key_pair {
            KeyPair::Rsa { public, .. } => PublicKey::Rsa(public.clone()),
            KeyPair::EcdsaP256 { verifying_key, .. } => PublicKey::EcdsaP256(*verifying_key),
            KeyPair::Ed25519 { signing_key } => PublicKey::Ed25519(signing_key.verifying_key()),
        }
    }

    /// Converts the key into SubjectPublicKeyInfo form.
    pub fn as_spki(&self) -> Result<SubjectPublicKeyInfoOwned, CertForgeError> {
        match self {
            PublicKey::Rsa(public) => SubjectPublicKeyInfoOwned::from_key(public.clone())
                .map_err(|e| CertForgeError::EncodingError(e.to_string())),
            PublicKey::EcdsaP256(verifying_key) => {
                SubjectPublicKeyInfoOwned::from_key(*verifying_key)
                    .map_err(|e| CertForgeError::EncodingError(e.to_string()))
            }
            PublicKey::Ed25519(verifying_key) => {
                let pk_bytes = verifying_key.to_bytes();
                Ok(SubjectPublicKeyInfoOwned {
                    algorithm: AlgorithmIdentifierOwned {
                        oid: const_oid::db::rfc8410::ID_ED_25519,
                        parameters: None,
                    },
                    subject_public_key: der::asn1::BitString::from_bytes(&pk_bytes)
                        .map_err(|e| CertForgeError::EncodingError(e.to_string()))?,
                })
            }
        }
    }

    /// Reads a key back out of SubjectPublicKeyInfo form.
    pub fn from_x509spki(spki: &SubjectPublicKeyInfoOwned) -> Result<Self, CertForgeError> {
        let raw = spki
            .subject_public_key
            .as_bytes()
            .ok_or_else(|| CertForgeError::DecodingError("non-octet-aligned key".to_string()))?;

        match spki.algorithm.oid {
            const_oid::db::rfc5912::RSA_ENCRYPTION => {
                Ok(PublicKey::Rsa(RsaPublicKey::from_pkcs1_der(raw)?))
            }
            const_oid::db::rfc5912::ID_EC_PUBLIC_KEY => Ok(PublicKey::EcdsaP256(
                P256VerifyingKey::from_sec1_bytes(raw)
                    .map_err(|e| CertForgeError::DecodingError(e.to_string()))?,
            )),
            const_oid::db::rfc8410::ID_ED_25519 => {
                let bytes: [u8; 32] = raw.try_into().map_err(|_| {
                    CertForgeError::DecodingError("malformed Ed25519 public key".to_string())
                })?;
                Ok(PublicKey::Ed25519(
                    Ed25519VerifyingKey::from_bytes(&bytes)
                        .map_err(|e| CertForgeError::DecodingError(e.to_string()))?,
                ))
            }
            oid => Err(CertForgeError::DecodingError(format!(
                "unsupported public key algorithm: {oid}"
            ))),
        }
    }

    /// Verifies a detached signature over `message`.
    ///
    /// Returns `Ok(false)` for a well-formed but non-matching or malformed
    /// signature; `Err` is reserved for key material problems.
    pub fn verify_data(&self, message: &[u8], signature: &[u8]) -> Result<bool, CertForgeError> {
        match self {
            PublicKey::Rsa(public) => {
                let verifying_key: RsaVerifyingKey<Sha256> = RsaVerifyingKey::new(public.clone());
                let Ok(signature) = rsa::pkcs1v15::Signature::try_from(signature) else {
                    return Ok(false);
                };
                Ok(verifying_key.verify(message, &signature).is_ok())
            }
            PublicKey::EcdsaP256(verifying_key) => {
                let Ok(signature) = p256::ecdsa::Signature::from_der(signature) else {
                    return Ok(false);
                };
                Ok(verifying_key.verify(message, &signature).is_ok())
            }
            PublicKey::Ed25519(verifying_key) => {
                let Ok(signature) = ed25519_dalek::Signature::from_slice(signature) else {
                    return Ok(false);
                };
                Ok(verifying_key.verify(message, &signature).is_ok())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_verify_round_trip() {
        let key = KeyPair::generate_ecdsa_p256();
        let message = b"to be signed";
        let signature = key.sign_data(message).unwrap();
        assert!(key.public_key().verify_data(message, &signature).unwrap());
        assert!(!key.public_key().verify_data(b"tampered", &signature).unwrap());
    }

    #[test]
    fn spki_round_trip_preserves_key() {
        let key = KeyPair::generate_ed25519();
        let public = key.public_key();
        let spki = public.as_spki().unwrap();
        let decoded = PublicKey::from_x509spki(&spki).unwrap();
        let signature = key.sign_data(b"message").unwrap();
        assert!(decoded.verify_data(b"message", &signature).unwrap());
    }

    #[test]
    fn rsa_sign_verify_and_spki_round_trip() {
        let key = KeyPair::generate_rsa(2048).unwrap();
        let message = b"to be signed";
        let signature = key.sign_data(message).unwrap();

        let public = key.public_key();
        assert!(public.verify_data(message, &signature).unwrap());
        assert!(!public.verify_data(b"tampered", &signature).unwrap());

        let decoded = PublicKey::from_x509spki(&public.as_spki().unwrap()).unwrap();
        assert!(decoded.verify_data(message, &signature).unwrap());
    }
}
