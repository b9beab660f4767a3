//! Test fixtures and helpers.
//!
//! Common setup code for integration tests: deterministic signers, key and
//! certificate text in the external format, and preconfigured clients.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use prefix_inject_client::{ClientConfig, InjectionClient, MemoryForwarder, SequencerConfig};
use prefix_inject_core::{make_data, Ed25519Signer, MetaInfo, Name, NullSigner};

/// A deterministic signer derived from a one-byte seed tag.
pub fn object_signer(tag: u8) -> Ed25519Signer {
    let mut seed = [0u8; 32];
    seed[0] = tag;
    let locator = Name::from_uri(&format!("/test/KEY/{tag}")).expect("static uri");
    Ed25519Signer::new(locator, &seed)
}

/// Key text in the external format, wrapping `seed` in a data packet.
pub fn key_file_text(name: &str, seed: [u8; 32]) -> String {
    let key_name = Name::from_uri(name).expect("valid key name");
    let packet = make_data(&key_name, &MetaInfo::default(), &seed, &NullSigner)
        .expect("null signer cannot fail");
    format!(
        "-----BEGIN NDN KEY-----\nName: {name}\nSigType: Ed25519\n\n{}\n-----END NDN KEY-----\n",
        STANDARD.encode(packet)
    )
}

/// Certificate text in the external format.
///
/// The body is a certificate packet carrying the signer's public key,
/// usable directly as stapling material.
pub fn cert_file_text(cert_name: &str, signer_key: &str, key_seed: [u8; 32]) -> String {
    let name = Name::from_uri(cert_name).expect("valid cert name");
    let key = Ed25519Signer::new(Name::from_uri(signer_key).expect("valid key name"), &key_seed);
    let packet = make_data(&name, &MetaInfo::default(), &key.verifying_key_bytes(), &key)
        .expect("ed25519 signing cannot fail");
    format!(
        "-----BEGIN NDN CERT-----\nName: {cert_name}\nSigType: Ed25519\nSignerKey: {signer_key}\nValidity: 2026-01-01 - 2027-01-01\n\n{}\n-----END NDN CERT-----\n",
        STANDARD.encode(packet)
    )
}

/// A client over the given forwarder with jitter disabled.
pub fn no_jitter_client(forwarder: MemoryForwarder) -> InjectionClient<MemoryForwarder> {
    let config =
        ClientConfig { sequencer: SequencerConfig::without_jitter(), ..ClientConfig::default() };
    InjectionClient::with_config(forwarder, config)
}
