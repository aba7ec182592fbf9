use der::Encode;
use der::asn1::OctetString;
use x509_cert::Version;
use x509_cert::certificate::TbsCertificateInner;
use x509_cert::serial_number::SerialNumber;

use crate::cert::SignatureAlgorithm;
use crate::cert::params::{DistinguishedName, ExtensionParam};
use crate::error::CertForgeError;
use crate::key::PublicKey;

/// X.509 certificate versions this crate emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CertificateVersion {
    /// Version 1: no extensions.
    V1,
    /// Version 3: extensions allowed.
    #[default]
    V3,
}

impl From<CertificateVersion> for Version {
    fn from(value: CertificateVersion) -> Self {
        match value {
            CertificateVersion::V1 => Version::V1,
            CertificateVersion::V3 => Version::V3,
        }
    }
}

/// The "To Be Signed" (TBS) portion of an X.509 certificate: every
/// certificate field except the final signature.
///
/// Values are produced by [`TbsCertificateBuilder`] and never mutated
/// afterwards.
#[derive(Debug, Clone)]
pub struct TbsCertificate {
    version: CertificateVersion,
    serial_number: Vec<u8>,
    signature_algorithm: SignatureAlgorithm,
    issuer: DistinguishedName,
    not_before: time::OffsetDateTime,
    not_after: time::OffsetDateTime,
    subject: DistinguishedName,
    subject_public_key: PublicKey,
    extensions: Vec<ExtensionParam>,
}

impl TbsCertificate {
    pub fn version(&self) -> CertificateVersion {
        self.version
    }

    /// Big-endian bytes of the serial number.
    pub fn serial_number(&self) -> &[u8] {
        &self.serial_number
    }

    pub fn signature_algorithm(&self) -> &SignatureAlgorithm {
        &self.signature_algorithm
    }

    pub fn issuer(&self) -> &DistinguishedName {
        &self.issuer
    }

    pub fn not_before(&self) -> time::OffsetDateTime {
        self.not_before
    }

    pub fn not_after(&self) -> time::OffsetDateTime {
        self.not_after
    }

    pub fn subject(&self) -> &DistinguishedName {
        &self.subject
    }

    pub fn subject_public_key(&self) -> &PublicKey {
        &self.subject_public_key
    }

    pub fn extensions(&self) -> &[ExtensionParam] {
        &self.extensions
    }

    /// Converts into the `x509_cert` representation for DER encoding.
    pub fn to_tbs_certificate_inner(&self) -> Result<TbsCertificateInner, CertForgeError> {
        let algorithm_id: x509_cert::spki::AlgorithmIdentifierOwned =
            self.signature_algorithm.clone().into();

        // V1 certificates carry no extension list; an empty V3 list is
        // omitted rather than encoded as an empty SEQUENCE.
        let extensions = match self.version {
            CertificateVersion::V1 => None,
            CertificateVersion::V3 if self.extensions.is_empty() => None,
            CertificateVersion::V3 => Some(
                self.extensions
                    .iter()
                    .map(|ext| {
                        Ok(x509_cert::ext::Extension {
                            extn_id: ext.oid,
                            critical: ext.critical,
                            extn_value: OctetString::new(ext.value.clone())?,
                        })
                    })
                    .collect::<Result<Vec<_>, der::Error>>()
                    .map_err(|e| CertForgeError::EncodingError(e.to_string()))?,
            ),
        };

        let not_before = x509_cert::time::Time::UtcTime(
            der::asn1::UtcTime::from_system_time(self.not_before.into())
                .map_err(|e| CertForgeError::EncodingError(e.to_string()))?,
        );
        let not_after = x509_cert::time::Time::UtcTime(
            der::asn1::UtcTime::from_system_time(self.not_after.into())
                .map_err(|e| CertForgeError::EncodingError(e.to_string()))?,
        );

        let validity = x509_cert::time::Validity {
            not_before,
            not_after,
        };

        let serial_number = SerialNumber::new(self.serial_number.as_slice())
            .map_err(|e| CertForgeError::EncodingError(e.to_string()))?;

        Ok(TbsCertificateInner {
            version: self.version.into(),
            serial_number,
            signature: algorithm_id,
            issuer: self.issuer.as_x509_name()?,
            validity,
            subject: self.subject.as_x509_name()?,
            subject_public_key_info: self.subject_public_key.as_spki()?,
            issuer_unique_id: None,
            subject_unique_id: None,
            extensions,
        })
    }

    /// Encodes the TBS certificate into DER format, the byte string a
    /// signer signs.
    pub fn to_der(&self) -> Result<Vec<u8>, CertForgeError> {
        self.to_tbs_certificate_inner()?
            .to_der()
            .map_err(|e| CertForgeError::EncodingError(e.to_string()))
    }
}

/// Accumulates TBS certificate fields in any order.
///
/// Setters may be chained; [`build`](Self::build) fails if a mandatory
/// field was never set. Extensions are the only optional field.
#[derive(Debug, Clone, Default)]
pub struct TbsCertificateBuilder {
    version: CertificateVersion,
    serial_number: Option<Vec<u8>>,
    signature_algorithm: Option<SignatureAlgorithm>,
    issuer: Option<DistinguishedName>,
    not_before: Option<time::OffsetDateTime>,
    not_after: Option<time::OffsetDateTime>,
    subject: Option<DistinguishedName>,
    subject_public_key: Option<PublicKey>,
    extensions: Vec<ExtensionParam>,
}

impl TbsCertificateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(&mut self, version: CertificateVersion) -> &mut Self {
        self.version = version;
        self
    }

    pub fn serial_number(&mut self, serial: Vec<u8>) -> &mut Self {
        self.serial_number = Some(serial);
        self
    }

    pub fn issuer(&mut self, issuer: DistinguishedName) -> &mut Self {
        self.issuer = Some(issuer);
        self
    }

    pub fn not_before(&mut self, not_before: time::OffsetDateTime) -> &mut Self {
        self.not_before = Some(not_before);
        self
    }

    pub fn not_after(&mut self, not_after: time::OffsetDateTime) -> &mut Self {
        self.not_after = Some(not_after);
        self
    }

    pub fn subject(&mut self, subject: DistinguishedName) -> &mut Self {
        self.subject = Some(subject);
        self
    }

    pub fn subject_public_key(&mut self, key: PublicKey) -> &mut Self {
        self.subject_public_key = Some(key);
        self
    }

    pub fn signature_algorithm(&mut self, algorithm: SignatureAlgorithm) -> &mut Self {
        self.signature_algorithm = Some(algorithm);
        self
    }

    pub fn add_extension(&mut self, extension: ExtensionParam) -> &mut Self {
        self.extensions.push(extension);
        self
    }

    /// Finalizes the accumulated fields into an immutable
    /// [`TbsCertificate`].
    pub fn build(self) -> Result<TbsCertificate, CertForgeError> {
        Ok(TbsCertificate {
            version: self.version,
            serial_number: self.serial_number.ok_or_else(|| missing("serial number"))?,
            signature_algorithm: self
                .signature_algorithm
                .ok_or_else(|| missing("signature algorithm"))?,
            issuer: self.issuer.ok_or_else(|| missing("issuer"))?,
            not_before: self.not_before.ok_or_else(|| missing("start date"))?,
            not_after: self.not_after.ok_or_else(|| missing("end date"))?,
            subject: self.subject.ok_or_else(|| missing("subject"))?,
            subject_public_key: self
                .subject_public_key
                .ok_or_else(|| missing("subject public key"))?,
            extensions: self.extensions,
        })
    }
}

fn missing(field: &str) -> CertForgeError {
    CertForgeError::EncodingError(format!("TBS certificate is missing field: {field}"))
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;
    use crate::key::KeyPair;

    fn populated_builder() -> TbsCertificateBuilder {
        let name = DistinguishedName::builder()
            .common_name("builder.test".to_string())
            .build();
        let key = KeyPair::generate_ed25519();
        let mut builder = TbsCertificateBuilder::new();
        builder
            .serial_number(vec![0x01, 0x02])
            .issuer(name.clone())
            .not_before(datetime!(2026-01-01 0:00 UTC))
            .not_after(datetime!(2027-01-01 0:00 UTC))
            .subject(name)
            .subject_public_key(key.public_key())
            .signature_algorithm(SignatureAlgorithm::Ed25519);
        builder
    }

    #[test]
    fn build_with_all_mandatory_fields() {
        let tbs = populated_builder().build().unwrap();
        assert_eq!(tbs.serial_number(), &[0x01, 0x02]);
        assert_eq!(tbs.version(), CertificateVersion::V3);
        assert!(tbs.extensions().is_empty());
        tbs.to_der().unwrap();
    }

    #[test]
    fn build_fails_without_serial_number() {
        let name = DistinguishedName::builder()
            .common_name("builder.test".to_string())
            .build();
        let key = KeyPair::generate_ed25519();
        let mut builder = TbsCertificateBuilder::new();
        builder
            .issuer(name.clone())
            .not_before(datetime!(2026-01-01 0:00 UTC))
            .not_after(datetime!(2027-01-01 0:00 UTC))
            .subject(name)
            .subject_public_key(key.public_key())
            .signature_algorithm(SignatureAlgorithm::Ed25519);
        let err = builder.build().unwrap_err();
        assert!(err.to_string().contains("serial number"));
    }

    #[test]
    fn build_fails_without_subject() {
        let mut builder = populated_builder();
        builder.subject = None;
        let err = builder.build().unwrap_err();
        assert!(err.to_string().contains("subject"));
    }

    #[test]
    fn v1_certificate_encodes_no_extension_list() {
        let mut builder = populated_builder();
        builder.version(CertificateVersion::V1);
        let tbs = builder.build().unwrap();
        let inner = tbs.to_tbs_certificate_inner().unwrap();
        assert_eq!(inner.version, Version::V1);
        assert!(inner.extensions.is_none());
    }
}
