use std::sync::Arc;

use certforge::cert::extensions::SubjectAltName;
use certforge::cert::params::{
    CertificateParameters, DistinguishedName, ExtensionParam,
    X509CertificateGenerationParameters, X509CertificateParameters,
};
use certforge::error::CertForgeError;
use certforge::generator::{X509CertificateGenerator, X509v3Profile};
use certforge::key::KeyPair;
use certforge::signer::{KeyPairSigner, KeyPairSignerFactory, SignerBinding};

fn main() -> Result<(), CertForgeError> {
    let signer_factory = Arc::new(KeyPairSignerFactory);

    // Self-sign a root CA certificate.
    let ca_key = KeyPair::generate_ecdsa_p256();
    let ca_subject = DistinguishedName::builder()
        .common_name("My Test CA".to_string())
        .build();

    let mut ca_generator = X509CertificateGenerator::new(
        SignerBinding::self_signed(KeyPairSigner::new(ca_key.clone())),
        X509CertificateGenerationParameters::builder()
            .validity(3650)
            .build(),
        signer_factory.clone(),
        rand_core::OsRng,
        Box::new(X509v3Profile),
    );

    let ca_parameters =
        CertificateParameters::X509(X509CertificateParameters::builder().is_ca(true).build());
    let ca_certified = ca_generator.generate(&ca_subject, &ca_key.public_key(), &ca_parameters)?;

    println!("CA Certificate PEM:\n{}", ca_certified.to_pem()?);

    // Issue a server certificate from the CA.
    let server_key = KeyPair::generate_ed25519();
    let server_subject = DistinguishedName::builder()
        .common_name("myserver.local".to_string())
        .build();

    let mut generator = X509CertificateGenerator::new(
        SignerBinding::certifying(KeyPairSigner::new(ca_key), ca_certified.clone()),
        X509CertificateGenerationParameters::builder()
            .validity(825)
            .build(),
        signer_factory,
        rand_core::OsRng,
        Box::new(X509v3Profile),
    );

    let san = SubjectAltName {
        names: vec!["myserver.local".to_string(), "www.myserver.local".to_string()],
    };
    let parameters = CertificateParameters::X509(
        X509CertificateParameters::builder()
            .extensions(vec![ExtensionParam::from_extension(san, false)?])
            .build(),
    );
    let server_certified =
        generator.generate(&server_subject, &server_key.public_key(), &parameters)?;

    println!("Server Certificate PEM:\n{}", server_certified.to_pem()?);
    println!(
        "Server certificate verifies against CA: {}",
        server_certified.verify_signed_by(&ca_certified)?
    );

    Ok(())
}
