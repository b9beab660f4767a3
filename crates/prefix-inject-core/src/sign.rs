//! Signer capabilities.
//!
//! A [`Signer`] produces a signature over arbitrary bytes and is bound to a
//! key-locator name. Two independent roles use this trait: the envelope
//! signer authorizing the outer request and the object signer authorizing
//! the insertion object content. They may be different identities, e.g. a
//! delegated sub-key.

use ed25519_dalek::{Signer as _, SigningKey};
use std::fmt;

use crate::error::SigningError;
use crate::name::Name;

/// Assigned signature type numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u64)]
pub enum SignatureType {
    DigestSha256 = 0,
    Sha256WithRsa = 1,
    Sha256WithEcdsa = 3,
    HmacWithSha256 = 4,
    Ed25519 = 5,
    /// No signature; used by [`NullSigner`].
    Null = 200,
}

impl SignatureType {
    /// Numeric wire value.
    pub fn to_u64(self) -> u64 {
        self as u64
    }

    /// Parse from the wire value.
    pub fn from_u64(value: u64) -> Option<Self> {
        match value {
            0 => Some(Self::DigestSha256),
            1 => Some(Self::Sha256WithRsa),
            3 => Some(Self::Sha256WithEcdsa),
            4 => Some(Self::HmacWithSha256),
            5 => Some(Self::Ed25519),
            200 => Some(Self::Null),
            _ => None,
        }
    }
}

/// Capability to sign arbitrary bytes, bound to a key-locator name.
pub trait Signer: Send + Sync {
    /// The signature algorithm this signer produces.
    fn sig_type(&self) -> SignatureType;

    /// The key-locator name embedded in SignatureInfo, if any.
    fn key_locator(&self) -> Option<&Name>;

    /// Sign the given message.
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SigningError>;
}

/// Ed25519 signer backed by ed25519-dalek.
#[derive(Clone)]
pub struct Ed25519Signer {
    key_locator: Name,
    signing_key: SigningKey,
}

impl Ed25519Signer {
    /// Create from a 32-byte seed.
    pub fn new(key_locator: Name, seed: &[u8; 32]) -> Self {
        Self { key_locator, signing_key: SigningKey::from_bytes(seed) }
    }

    /// Create from secret key bytes: a raw 32-byte seed or a PKCS#8 v1
    /// Ed25519 DER blob (48 bytes, seed in the inner OCTET STRING).
    pub fn from_secret_bytes(key_locator: Name, bytes: &[u8]) -> Result<Self, SigningError> {
        let seed: [u8; 32] = match bytes.len() {
            32 => bytes.try_into().expect("length checked"),
            48 if bytes[14..16] == [0x04, 0x20] => {
                bytes[16..48].try_into().expect("length checked")
            }
            n => {
                return Err(SigningError::InvalidKeyMaterial(format!(
                    "expected 32-byte seed or PKCS#8 Ed25519 DER, got {n} bytes"
                )))
            }
        };
        Ok(Self::new(key_locator, &seed))
    }

    /// Generate a random signer (tests and examples).
    pub fn generate(key_locator: Name) -> Self {
        let mut rng = rand::thread_rng();
        Self { key_locator, signing_key: SigningKey::generate(&mut rng) }
    }

    /// The public verifying key bytes.
    pub fn verifying_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }
}

impl Signer for Ed25519Signer {
    fn sig_type(&self) -> SignatureType {
        SignatureType::Ed25519
    }

    fn key_locator(&self) -> Option<&Name> {
        Some(&self.key_locator)
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SigningError> {
        Ok(self.signing_key.sign(message).to_bytes().to_vec())
    }
}

impl fmt::Debug for Ed25519Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ed25519Signer({}, pk={})",
            self.key_locator,
            &hex::encode(self.verifying_key_bytes())[..16]
        )
    }
}

/// Verify an Ed25519 signature.
pub fn verify_ed25519(
    public_key: &[u8; 32],
    message: &[u8],
    signature: &[u8],
) -> Result<(), SigningError> {
    use ed25519_dalek::{Signature, Verifier, VerifyingKey};

    let verifying_key = VerifyingKey::from_bytes(public_key)
        .map_err(|e| SigningError::InvalidKeyMaterial(e.to_string()))?;
    let sig_bytes: [u8; 64] = signature
        .try_into()
        .map_err(|_| SigningError::SignatureFailed("invalid signature length".into()))?;
    let sig = Signature::from_bytes(&sig_bytes);
    verifying_key
        .verify(message, &sig)
        .map_err(|e| SigningError::SignatureFailed(e.to_string()))
}

/// Signer that produces an empty signature (type 200).
///
/// Useful where the envelope does not need authentication, e.g. local test
/// forwarders.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSigner;

impl Signer for NullSigner {
    fn sig_type(&self) -> SignatureType {
        SignatureType::Null
    }

    fn key_locator(&self) -> Option<&Name> {
        None
    }

    fn sign(&self, _message: &[u8]) -> Result<Vec<u8>, SigningError> {
        Ok(Vec::new())
    }
}
