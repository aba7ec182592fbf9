use thiserror::Error;

/// Errors surfaced by certificate assembly, signing, and key handling.
///
/// Every failure is reported synchronously to the caller; nothing is
/// retried or suppressed internally. Callers that retry a failed
/// generation get a fresh serial number and validity window.
#[derive(Debug, Error, Clone)]
pub enum CertForgeError {
    /// Error while encoding a certificate field or structure.
    #[error("Failed to encode data: {0}")]
    EncodingError(String),

    /// Error while decoding DER data.
    #[error("Failed to decode data: {0}")]
    DecodingError(String),

    /// Error due to invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error from the underlying signature operation.
    #[error("Signature error: {0}")]
    SignatureError(String),

    /// Error from RSA operations.
    #[error("RSA error: {0}")]
    RsaError(String),

    /// Error from RSA PKCS1 operations.
    #[error("RSA PKCS1 error: {0}")]
    RsaPkcs1Error(String),
}

impl From<der::Error> for CertForgeError {
    fn from(err: der::Error) -> Self {
        CertForgeError::DecodingError(err.to_string())
    }
}

impl From<rsa::Error> for CertForgeError {
    fn from(err: rsa::Error) -> Self {
        CertForgeError::RsaError(err.to_string())
    }
}

impl From<rsa::pkcs1::Error> for CertForgeError {
    fn from(err: rsa::pkcs1::Error) -> Self {
        CertForgeError::RsaPkcs1Error(err.to_string())
    }
}
