//! The certificate generation engine.
//!
//! [`X509CertificateGenerator`] turns a subject name, a subject public
//! key, and per-request parameters into a signed
//! [`CertifiedPublicKey`]. The signer binding, validity policy, signer
//! factory, random source, and certificate profile are fixed at
//! construction; every call draws a fresh serial number and validity
//! window, so one generator serves any number of subjects.

use std::sync::Arc;

use rand_core::CryptoRngCore;
use sha1::{Digest, Sha1};
use time::{Duration, OffsetDateTime, Time};
use x509_cert::certificate::CertificateInner;

use crate::cert::extensions::{
    AuthorityKeyIdentifier, BasicConstraints, ExtendedKeyUsage, ExtendedKeyUsageOption, FlagSet,
    KeyUsage, KeyUsages, SubjectKeyIdentifier,
};
use crate::cert::params::{
    CertificateParameters, DistinguishedName, ExtensionParam, X509CertificateGenerationParameters,
    X509CertificateParameters,
};
use crate::cert::{Certificate, CertifiedPublicKey};
use crate::error::CertForgeError;
use crate::key::PublicKey;
use crate::signer::{SignerBinding, SignerFactory};
use crate::tbs_certificate::{CertificateVersion, TbsCertificate, TbsCertificateBuilder};

/// A certificate-version policy.
///
/// Profiles share the generator's orchestration and diverge only in the
/// builder they start from and the extra fields they stamp into the TBS
/// body. Supplied to the generator at construction.
pub trait CertificateProfile {
    /// Produces the empty builder a generation starts from.
    fn tbs_builder(&self) -> TbsCertificateBuilder {
        TbsCertificateBuilder::new()
    }

    /// Stamps version-specific fields into the TBS body. Called once per
    /// generation, after serial, issuer, and validity are set. `issuer`
    /// is the certifying authority's key, or `None` for a self-signed
    /// certificate.
    fn extend_tbs(
        &self,
        _builder: &mut TbsCertificateBuilder,
        _issuer: Option<&CertifiedPublicKey>,
        _subject: &DistinguishedName,
        _subject_key: &PublicKey,
        _parameters: &X509CertificateParameters,
    ) -> Result<(), CertForgeError> {
        Ok(())
    }
}

/// Version 1 certificates: no extensions at all.
pub struct X509v1Profile;

impl CertificateProfile for X509v1Profile {
    fn tbs_builder(&self) -> TbsCertificateBuilder {
        let mut builder = TbsCertificateBuilder::new();
        builder.version(CertificateVersion::V1);
        builder
    }
}

/// Version 3 certificates with the standard extension set.
///
/// Stamps a subject key identifier, an authority key identifier (keyed
/// to the issuer in CA mode, to the subject itself when self-signed),
/// basic constraints, key usage flags derived from the requested
/// extended usages, the extended usages themselves, and finally the
/// caller's raw extensions.
pub struct X509v3Profile;

impl CertificateProfile for X509v3Profile {
    fn extend_tbs(
        &self,
        builder: &mut TbsCertificateBuilder,
        issuer: Option<&CertifiedPublicKey>,
        _subject: &DistinguishedName,
        subject_key: &PublicKey,
        parameters: &X509CertificateParameters,
    ) -> Result<(), CertForgeError> {
        let subject_key_id = key_identifier(subject_key)?;
        builder.add_extension(ExtensionParam::from_extension(
            SubjectKeyIdentifier {
                key_identifier: subject_key_id.clone(),
            },
            false,
        )?);

        let authority_key_id = match issuer {
            Some(ca) => AuthorityKeyIdentifier {
                key_identifier: key_identifier(&ca.subject_public_key()?)?,
                authority_cert_issuer: Some(ca.subject()),
                authority_cert_serial_number: Some(ca.serial_number()),
            },
            None => AuthorityKeyIdentifier {
                key_identifier: subject_key_id,
                authority_cert_issuer: None,
                authority_cert_serial_number: None,
            },
        };
        builder.add_extension(ExtensionParam::from_extension(authority_key_id, false)?);

        builder.add_extension(ExtensionParam::from_extension(
            BasicConstraints {
                is_ca: parameters.is_ca,
                max_path_length: parameters.max_path_length,
            },
            true,
        )?);

        let mut key_usage_flags: FlagSet<KeyUsages> = FlagSet::empty();

        if parameters.is_ca {
            key_usage_flags |= KeyUsages::KeyCertSign;
            key_usage_flags |= KeyUsages::CRLSign;
        }

        for usage in &parameters.usages {
            match usage {
                ExtendedKeyUsageOption::ClientAuth
                | ExtendedKeyUsageOption::ServerAuth
                | ExtendedKeyUsageOption::EmailProtection => {
                    key_usage_flags |= KeyUsages::KeyEncipherment;
                }
                ExtendedKeyUsageOption::CodeSigning
                | ExtendedKeyUsageOption::TimeStamping
                | ExtendedKeyUsageOption::OcspSigning => {
                    key_usage_flags |= KeyUsages::DigitalSignature;
                }
            }
        }

        if !key_usage_flags.is_empty() {
            builder.add_extension(ExtensionParam::from_extension(
                KeyUsage(key_usage_flags),
                true,
            )?);
        }

        if !parameters.usages.is_empty() {
            builder.add_extension(ExtensionParam::from_extension(
                ExtendedKeyUsage {
                    usage: parameters.usages.clone(),
                },
                true,
            )?);
        }

        for extension in &parameters.extensions {
            builder.add_extension(extension.clone());
        }

        Ok(())
    }
}

/// Generates signed X.509 certificates.
///
/// Holds no per-call state; only the random source is advanced between
/// calls, which is why the generating methods take `&mut self`.
pub struct X509CertificateGenerator<R: CryptoRngCore> {
    signer: SignerBinding,
    parameters: X509CertificateGenerationParameters,
    signer_factory: Arc<dyn SignerFactory>,
    rng: R,
    profile: Box<dyn CertificateProfile>,
}

impl<R: CryptoRngCore> X509CertificateGenerator<R> {
    /// Creates a generator with a fixed signer binding, validity policy,
    /// signer factory, random source, and certificate profile.
    pub fn new(
        signer: SignerBinding,
        parameters: X509CertificateGenerationParameters,
        signer_factory: Arc<dyn SignerFactory>,
        rng: R,
        profile: Box<dyn CertificateProfile>,
    ) -> Self {
        Self {
            signer,
            parameters,
            signer_factory,
            rng,
            profile,
        }
    }

    /// Assembles the TBS certificate for `subject`, without signing it.
    ///
    /// The issuer is the certifying authority's certified subject when
    /// the signer binding carries one, otherwise `subject` itself. The
    /// serial number is drawn fresh from the random source; uniqueness
    /// is probabilistic over its 128 bits and not otherwise tracked.
    pub fn build_tbs_certificate(
        &mut self,
        subject: &DistinguishedName,
        subject_key: &PublicKey,
        parameters: &X509CertificateParameters,
    ) -> Result<TbsCertificate, CertForgeError> {
        let issuer = self.signer.issuer();
        let issuer_name = match issuer {
            Some(ca) => ca.subject(),
            None => subject.clone(),
        };

        let mut builder = self.profile.tbs_builder();

        builder
            .serial_number(random_serial_number(&mut self.rng))
            .issuer(issuer_name);

        let (not_before, not_after) =
            validity_window(OffsetDateTime::now_utc(), self.parameters.validity);
        builder.not_before(not_before).not_after(not_after);

        self.profile
            .extend_tbs(&mut builder, issuer, subject, subject_key, parameters)?;

        builder
            .subject(subject.clone())
            .subject_public_key(subject_key.clone())
            .signature_algorithm(self.signer.signer().signature_algorithm());

        builder.build()
    }

    /// Generates a signed certificate for `subject` wrapping
    /// `subject_key`.
    ///
    /// Rejects any parameter kind other than
    /// [`CertificateParameters::X509`] before the random source, the
    /// builder, or the signer is touched. Encoding and signature
    /// failures propagate to the caller; no partial certificate is ever
    /// returned, and a retried call draws a fresh serial number.
    pub fn generate(
        &mut self,
        subject: &DistinguishedName,
        subject_key: &PublicKey,
        parameters: &CertificateParameters,
    ) -> Result<CertifiedPublicKey, CertForgeError> {
        let x509_parameters = match parameters {
            CertificateParameters::X509(p) => p,
            other => {
                return Err(CertForgeError::InvalidInput(format!(
                    "invalid parameters for X.509 certificate generation: {}",
                    other.kind()
                )));
            }
        };

        let tbs_cert = self.build_tbs_certificate(subject, subject_key, x509_parameters)?;
        let tbs_cert_inner = tbs_cert.to_tbs_certificate_inner()?;
        let tbs_der = der::Encode::to_der(&tbs_cert_inner)
            .map_err(|e| CertForgeError::EncodingError(e.to_string()))?;

        let signature = self.signer.signer().sign(&tbs_der)?;

        let cert_inner = CertificateInner {
            tbs_certificate: tbs_cert_inner,
            signature_algorithm: tbs_cert.signature_algorithm().clone().into(),
            signature: der::asn1::BitString::from_bytes(&signature)
                .map_err(|e| CertForgeError::EncodingError(e.to_string()))?,
        };

        Ok(CertifiedPublicKey::new(
            Certificate { inner: cert_inner },
            Arc::clone(&self.signer_factory),
        ))
    }
}

/// Draws a 128-bit serial number from `rng`, as big-endian bytes of a
/// non-negative integer.
fn random_serial_number(rng: &mut impl CryptoRngCore) -> Vec<u8> {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes);
    bytes.to_vec()
}

/// Computes the validity window starting at `now`.
///
/// The start date keeps the calendar day of `now` with the time of day
/// zeroed, so certificates issued within the same day get identical
/// windows regardless of the moment of issuance. The end date is the
/// start date plus `validity_days`, with ordinary calendar rollover.
/// Days are taken in the offset of `now`; the generator always passes
/// UTC.
fn validity_window(now: OffsetDateTime, validity_days: u32) -> (OffsetDateTime, OffsetDateTime) {
    let not_before = now.replace_time(Time::MIDNIGHT);
    let not_after = not_before + Duration::days(i64::from(validity_days));
    (not_before, not_after)
}

fn key_identifier(key: &PublicKey) -> Result<Vec<u8>, CertForgeError> {
    let spki = key.as_spki()?;
    Ok(Sha1::digest(spki.subject_public_key.raw_bytes()).to_vec())
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn validity_window_zeroes_time_of_day() {
        let (not_before, _) = validity_window(datetime!(2026-08-26 17:03:41 UTC), 365);
        assert_eq!(not_before.hour(), 0);
        assert_eq!(not_before.minute(), 0);
        assert_eq!(not_before.second(), 0);
        assert_eq!(not_before.date(), datetime!(2026-08-26 0:00 UTC).date());
    }

    #[test]
    fn validity_window_rolls_over_calendar_months() {
        let (not_before, not_after) = validity_window(datetime!(2024-01-25 13:45:12 UTC), 40);
        assert_eq!(not_before, datetime!(2024-01-25 0:00 UTC));
        assert_eq!(not_after, datetime!(2024-03-05 0:00 UTC));
        assert_eq!((not_after - not_before).whole_days(), 40);
    }

    #[test]
    fn validity_window_exact_year() {
        let (not_before, not_after) = validity_window(datetime!(2026-08-26 23:59:59 UTC), 365);
        assert_eq!((not_after - not_before).whole_days(), 365);
        assert_eq!(not_after, datetime!(2027-08-26 0:00 UTC));
    }

    #[test]
    fn serial_number_uses_sixteen_bytes() {
        let serial = random_serial_number(&mut rand_core::OsRng);
        assert_eq!(serial.len(), 16);
    }
}
