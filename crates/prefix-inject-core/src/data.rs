//! Signed data packet envelope.
//!
//! [`make_data`] builds the signed, opaque-content envelope that carries an
//! insertion command; [`Data::decode`] parses one back, reporting how many
//! bytes the outer TLV consumed so trailing stapled certificates are
//! preserved rather than rejected.
//!
//! The signed region is Name through SignatureInfo; SignatureValue and
//! anything stapled after the packet are outside it.

use bytes::Bytes;

use crate::error::{CoreError, SigningError};
use crate::name::Name;
use crate::sign::Signer;
use crate::tlv::{self, types, TlvReader};

/// ContentType for opaque command payloads.
pub const CONTENT_TYPE_OPAQUE: u64 = 5;

/// Packet metadata: content type and freshness.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MetaInfo {
    pub content_type: Option<u64>,
    pub freshness_period_ms: Option<u64>,
}

impl MetaInfo {
    /// MetaInfo for an opaque-content command object.
    pub fn opaque() -> Self {
        Self { content_type: Some(CONTENT_TYPE_OPAQUE), freshness_period_ms: None }
    }

    fn write_to(&self, buf: &mut Vec<u8>) {
        let mut inner = Vec::new();
        if let Some(ct) = self.content_type {
            tlv::write_uint_tlv(&mut inner, types::CONTENT_TYPE, ct);
        }
        if let Some(fp) = self.freshness_period_ms {
            tlv::write_uint_tlv(&mut inner, types::FRESHNESS_PERIOD, fp);
        }
        tlv::write_tlv(buf, types::META_INFO, &inner);
    }

    fn parse(bytes: &[u8]) -> Result<Self, CoreError> {
        let mut reader = TlvReader::new(bytes);
        let content_type = reader
            .optional_element(types::CONTENT_TYPE)?
            .map(tlv::decode_uint)
            .transpose()?;
        let freshness_period_ms = reader
            .optional_element(types::FRESHNESS_PERIOD)?
            .map(tlv::decode_uint)
            .transpose()?;
        // Unknown trailing elements (e.g. FinalBlockId) are tolerated
        Ok(Self { content_type, freshness_period_ms })
    }
}

/// Build a signed data packet.
///
/// Fails only if the signer cannot produce a signature.
pub fn make_data(
    name: &Name,
    meta: &MetaInfo,
    content: &[u8],
    signer: &dyn Signer,
) -> Result<Vec<u8>, SigningError> {
    let mut signed = Vec::new();
    name.write_to(&mut signed);
    meta.write_to(&mut signed);
    tlv::write_tlv(&mut signed, types::CONTENT, content);

    let mut sig_info = Vec::new();
    tlv::write_uint_tlv(&mut sig_info, types::SIGNATURE_TYPE, signer.sig_type().to_u64());
    if let Some(locator) = signer.key_locator() {
        let mut locator_bytes = Vec::new();
        locator.write_to(&mut locator_bytes);
        tlv::write_tlv(&mut sig_info, types::KEY_LOCATOR, &locator_bytes);
    }
    tlv::write_tlv(&mut signed, types::SIGNATURE_INFO, &sig_info);

    let signature = signer.sign(&signed)?;

    let mut packet_value = signed;
    tlv::write_tlv(&mut packet_value, types::SIGNATURE_VALUE, &signature);

    let mut out = Vec::new();
    tlv::write_tlv(&mut out, types::DATA, &packet_value);
    Ok(out)
}

/// A decoded data packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Data {
    pub name: Name,
    pub meta_info: MetaInfo,
    pub content: Bytes,
    pub signature_type: Option<u64>,
    pub key_locator: Option<Name>,
    pub signature_value: Vec<u8>,
    /// The exact bytes covered by the signature (Name..SignatureInfo).
    pub signed_region: Bytes,
}

impl Data {
    /// Decode the leading Data TLV from `bytes`.
    ///
    /// Returns the packet and the number of bytes consumed; anything after
    /// that is trailing material (stapled certificates) the caller may
    /// inspect separately.
    pub fn decode(bytes: &[u8]) -> Result<(Self, usize), CoreError> {
        let mut outer = TlvReader::new(bytes);
        let value = outer.expect_element(types::DATA)?;
        let consumed = outer.position();

        let mut reader = TlvReader::new(value);
        let name = Name::read_from(&mut reader)?;
        let meta_info = match reader.optional_element(types::META_INFO)? {
            Some(mi) => MetaInfo::parse(mi)?,
            None => MetaInfo::default(),
        };
        let content = reader
            .optional_element(types::CONTENT)?
            .map(Bytes::copy_from_slice)
            .unwrap_or_default();

        let (signature_type, key_locator) = match reader.optional_element(types::SIGNATURE_INFO)? {
            Some(si) => parse_signature_info(si)?,
            None => (None, None),
        };
        let signed_end = reader.position();

        let signature_value = reader
            .optional_element(types::SIGNATURE_VALUE)?
            .map(<[u8]>::to_vec)
            .unwrap_or_default();

        Ok((
            Self {
                name,
                meta_info,
                content,
                signature_type,
                key_locator,
                signature_value,
                signed_region: Bytes::copy_from_slice(&value[..signed_end]),
            },
            consumed,
        ))
    }
}

fn parse_signature_info(bytes: &[u8]) -> Result<(Option<u64>, Option<Name>), CoreError> {
    let mut reader = TlvReader::new(bytes);
    let sig_type = tlv::decode_uint(reader.expect_element(types::SIGNATURE_TYPE)?)?;
    let key_locator = match reader.optional_element(types::KEY_LOCATOR)? {
        Some(kl) => Some(Name::read_from(&mut TlvReader::new(kl))?),
        None => None,
    };
    Ok((Some(sig_type), key_locator))
}
