use core::str::FromStr;

use bon::Builder;
use const_oid::ObjectIdentifier;
use x509_cert::name::RdnSequence;

use super::extensions::ToAndFromX509Extension;
pub use crate::cert::extensions::ExtendedKeyUsageOption;
use crate::error::CertForgeError;

/// The family of certificate parameter kinds accepted by a generator.
///
/// A generator is bound to one certificate profile and rejects every
/// other kind up front, before drawing a serial number or touching the
/// signer.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum CertificateParameters {
    /// Parameters for a public key certificate (RFC 5280).
    X509(X509CertificateParameters),
    /// Parameters for an attribute certificate (RFC 5755). No generator
    /// in this crate issues attribute certificates.
    Attribute(AttributeCertificateParameters),
}

impl CertificateParameters {
    /// Human-readable kind tag, used in invalid-input errors.
    pub fn kind(&self) -> &'static str {
        match self {
            CertificateParameters::X509(_) => "X.509 public key certificate",
            CertificateParameters::Attribute(_) => "X.509 attribute certificate",
        }
    }
}

/// Per-subject parameters for an X.509 public key certificate.
///
/// The subject name and key are passed to the generator separately; this
/// bag only carries what varies between certificate requests.
#[derive(Clone, Debug, Builder, Default)]
pub struct X509CertificateParameters {
    /// Whether the subject may itself act as a certificate authority.
    #[builder(default)]
    pub is_ca: bool,
    /// Maximum chain depth below the subject, when `is_ca` is set.
    pub max_path_length: Option<u32>,
    /// Extended key usages to stamp into the certificate.
    #[builder(default)]
    pub usages: Vec<ExtendedKeyUsageOption>,
    /// Additional raw extensions, appended after the profile's own.
    #[builder(default)]
    pub extensions: Vec<ExtensionParam>,
}

/// Per-subject parameters for an attribute certificate.
#[derive(Clone, Debug, Default)]
pub struct AttributeCertificateParameters {
    /// DER-encoded attributes of the holder.
    pub attributes: Vec<ExtensionParam>,
}

/// Parameters shared by every certificate a generator issues.
#[derive(Clone, Copy, Debug, Builder)]
pub struct X509CertificateGenerationParameters {
    /// Number of days an issued certificate stays valid from its start
    /// date.
    pub validity: u32,
}

/// Distinguished name of a certificate subject or issuer.
///
/// Names are compared only for equality; the generator never decomposes
/// them.
#[derive(Clone, Debug, Builder, Default, PartialEq, Eq)]
pub struct DistinguishedName {
    pub common_name: String,
    pub country: Option<String>,
    pub state: Option<String>,
    pub locality: Option<String>,
    pub organization: Option<String>,
    pub organization_unit: Option<String>,
}

impl DistinguishedName {
    /// Converts the distinguished name to an X.509 RDN sequence.
    ///
    /// Absent components are omitted rather than encoded empty.
    pub fn as_x509_name(&self) -> Result<x509_cert::name::DistinguishedName, CertForgeError> {
        let mut parts = vec![format!("CN={}", self.common_name)];
        if let Some(ou) = &self.organization_unit {
            parts.push(format!("OU={ou}"));
        }
        if let Some(o) = &self.organization {
            parts.push(format!("O={o}"));
        }
        if let Some(l) = &self.locality {
            parts.push(format!("L={l}"));
        }
        if let Some(st) = &self.state {
            parts.push(format!("ST={st}"));
        }
        if let Some(c) = &self.country {
            parts.push(format!("C={c}"));
        }
        RdnSequence::from_str(&parts.join(","))
            .map_err(|e| CertForgeError::EncodingError(e.to_string()))
    }

    /// Extracts a `DistinguishedName` from an X.509 RDN sequence.
    ///
    /// Attributes with types or string encodings this crate does not
    /// handle are skipped.
    pub fn from_x509_name(x509dn: &x509_cert::name::DistinguishedName) -> Self {
        let mut name = DistinguishedName::default();

        for rdn in x509dn.0.iter() {
            for attr in rdn.0.iter() {
                let Some(value) = decode_attribute_value(&attr.value) else {
                    continue;
                };
                match attr.oid {
                    const_oid::db::rfc4519::CN => name.common_name = value,
                    const_oid::db::rfc4519::OU => name.organization_unit = Some(value),
                    const_oid::db::rfc4519::O => name.organization = Some(value),
                    const_oid::db::rfc4519::L => name.locality = Some(value),
                    const_oid::db::rfc4519::ST => name.state = Some(value),
                    const_oid::db::rfc4519::C => name.country = Some(value),
                    _ => {}
                }
            }
        }

        name
    }
}

fn decode_attribute_value(value: &der::Any) -> Option<String> {
    value
        .decode_as::<String>()
        .ok()
        .or_else(|| {
            value
                .decode_as::<der::asn1::PrintableString>()
                .ok()
                .map(|s| s.to_string())
        })
}

/// An X.509 extension in raw, DER-encoded form.
#[derive(Clone, Debug)]
pub struct ExtensionParam {
    pub oid: ObjectIdentifier,
    pub critical: bool,
    /// DER-encoded extension value
    pub value: Vec<u8>,
}

impl ExtensionParam {
    /// Encodes a typed extension into raw form.
    pub fn from_extension<E: ToAndFromX509Extension>(
        extension: E,
        critical: bool,
    ) -> Result<Self, CertForgeError> {
        Ok(Self {
            oid: E::OID,
            critical,
            value: extension.to_x509_extension_value()?,
        })
    }

    /// Decodes the raw value back into a typed extension.
    pub fn to_extension<E: ToAndFromX509Extension>(&self) -> Result<E, CertForgeError> {
        E::from_x509_extension_value(&self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinguished_name_round_trip() {
        let name = DistinguishedName::builder()
            .common_name("example.com".to_string())
            .organization("Example Corp".to_string())
            .country("US".to_string())
            .build();
        let encoded = name.as_x509_name().unwrap();
        let decoded = DistinguishedName::from_x509_name(&encoded);
        assert_eq!(name, decoded);
    }

    #[test]
    fn absent_components_stay_absent() {
        let name = DistinguishedName::builder()
            .common_name("bare".to_string())
            .build();
        let decoded = DistinguishedName::from_x509_name(&name.as_x509_name().unwrap());
        assert_eq!(decoded.common_name, "bare");
        assert_eq!(decoded.organization, None);
        assert_eq!(decoded.country, None);
    }
}
