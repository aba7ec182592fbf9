use std::sync::Arc;

use certforge::cert::CertifiedPublicKey;
use certforge::cert::params::{
    CertificateParameters, DistinguishedName, X509CertificateGenerationParameters,
    X509CertificateParameters,
};
use certforge::generator::{CertificateProfile, X509CertificateGenerator, X509v3Profile};
use certforge::key::KeyPair;
use certforge::signer::{KeyPairSigner, KeyPairSignerFactory, SignerBinding};
use rand_core::OsRng;

/// Builds a generator with the given binding, validity in days, and
/// profile, using the OS random source.
pub fn generator(
    signer: SignerBinding,
    validity: u32,
    profile: Box<dyn CertificateProfile>,
) -> X509CertificateGenerator<OsRng> {
    X509CertificateGenerator::new(
        signer,
        X509CertificateGenerationParameters::builder()
            .validity(validity)
            .build(),
        Arc::new(KeyPairSignerFactory),
        OsRng,
        profile,
    )
}

/// Self-signs a CA certificate and returns it together with the CA key.
pub fn self_signed_ca(common_name: &str) -> (CertifiedPublicKey, KeyPair) {
    let ca_key = KeyPair::generate_ecdsa_p256();
    let ca_subject = DistinguishedName::builder()
        .common_name(common_name.to_string())
        .build();

    let mut ca_generator = generator(
        SignerBinding::self_signed(KeyPairSigner::new(ca_key.clone())),
        3650,
        Box::new(X509v3Profile),
    );

    let parameters =
        CertificateParameters::X509(X509CertificateParameters::builder().is_ca(true).build());
    let certified = ca_generator
        .generate(&ca_subject, &ca_key.public_key(), &parameters)
        .expect("CA generation failed");

    (certified, ca_key)
}
