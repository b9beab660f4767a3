//! Signer construction from parsed key/certificate text.

use prefix_inject_core::{Data, Ed25519Signer};

use crate::error::{KeyError, Result};
use crate::text::{CertText, KeyText};

/// Build an Ed25519 signer from key text, optionally paired with a
/// certificate.
///
/// When a certificate is supplied its `SignerKey` must name the key, and the
/// certificate's own name becomes the signer's key locator (the delegated
/// identity the forwarder resolves). Without a certificate the key's name is
/// used. Pairing is checked here, before any network call.
pub fn signer_from_text(key_text: &str, cert_text: Option<&str>) -> Result<Ed25519Signer> {
    let key = KeyText::parse(key_text)?;
    if key.sig_type != "Ed25519" {
        return Err(KeyError::UnsupportedSigType(key.sig_type));
    }

    // The key body is a data packet wrapping the secret bytes
    let (key_packet, _) = Data::decode(&key.data)?;

    let key_locator = match cert_text {
        Some(text) => {
            let cert = CertText::parse(text)?;
            match &cert.signer_key {
                Some(signer_key) if *signer_key == key.name => {}
                _ => {
                    return Err(KeyError::CertKeyMismatch {
                        key: key.name.to_string(),
                        cert_signer: cert
                            .signer_key
                            .map(|n| n.to_string())
                            .unwrap_or_else(|| "<none>".into()),
                    })
                }
            }
            cert.name
        }
        None => key.name,
    };

    Ok(Ed25519Signer::from_secret_bytes(key_locator, &key_packet.content)?)
}

/// Extract the raw certificate packet bytes for stapling.
pub fn stapled_cert_bytes(cert_text: &str) -> Result<Vec<u8>> {
    Ok(CertText::parse(cert_text)?.data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use prefix_inject_core::{make_data, MetaInfo, Name, NullSigner, Signer};

    fn wrapped_seed(name: &str, seed: [u8; 32]) -> String {
        let packet = make_data(
            &Name::from_uri(name).unwrap(),
            &MetaInfo::default(),
            &seed,
            &NullSigner,
        )
        .unwrap();
        STANDARD.encode(packet)
    }

    fn key_text(name: &str, seed: [u8; 32]) -> String {
        format!(
            "-----BEGIN NDN KEY-----\nName: {name}\nSigType: Ed25519\n\n{}\n-----END NDN KEY-----\n",
            wrapped_seed(name, seed)
        )
    }

    fn cert_text(name: &str, signer_key: &str) -> String {
        format!(
            "-----BEGIN NDN CERT-----\nName: {name}\nSigType: Ed25519\nSignerKey: {signer_key}\n\n{}\n-----END NDN CERT-----\n",
            STANDARD.encode(b"certificate-packet")
        )
    }

    #[test]
    fn test_signer_from_key_only() {
        let signer = signer_from_text(&key_text("/alice/KEY/1", [0x11; 32]), None).unwrap();
        assert_eq!(
            signer.key_locator(),
            Some(&Name::from_uri("/alice/KEY/1").unwrap())
        );
    }

    #[test]
    fn test_signer_with_matching_cert_uses_cert_name() {
        let signer = signer_from_text(
            &key_text("/alice/KEY/1", [0x11; 32]),
            Some(&cert_text("/alice/KEY/1/delegated/v1", "/alice/KEY/1")),
        )
        .unwrap();
        assert_eq!(
            signer.key_locator(),
            Some(&Name::from_uri("/alice/KEY/1/delegated/v1").unwrap())
        );
    }

    #[test]
    fn test_cert_key_mismatch_rejected() {
        let result = signer_from_text(
            &key_text("/alice/KEY/1", [0x11; 32]),
            Some(&cert_text("/bob/KEY/9/self/v1", "/bob/KEY/9")),
        );
        assert!(matches!(result, Err(KeyError::CertKeyMismatch { .. })));
    }

    #[test]
    fn test_unsupported_sig_type_rejected() {
        let text = format!(
            "Name: /alice/KEY/1\nSigType: RSA\n{}",
            wrapped_seed("/alice/KEY/1", [0; 32])
        );
        assert!(matches!(
            signer_from_text(&text, None),
            Err(KeyError::UnsupportedSigType(t)) if t == "RSA"
        ));
    }

    #[test]
    fn test_deterministic_signer() {
        let a = signer_from_text(&key_text("/a/KEY/1", [0x42; 32]), None).unwrap();
        let b = signer_from_text(&key_text("/a/KEY/1", [0x42; 32]), None).unwrap();
        assert_eq!(a.verifying_key_bytes(), b.verifying_key_bytes());
    }

    #[test]
    fn test_stapled_cert_bytes() {
        let bytes = stapled_cert_bytes(&cert_text("/a/KEY/1/self/v1", "/a/KEY/1")).unwrap();
        assert_eq!(bytes, b"certificate-packet");
    }
}
