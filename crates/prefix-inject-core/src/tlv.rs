//! TLV encoding for NDN-style packets.
//!
//! This module implements the Type-Length-Value wire grammar shared by
//! names, data packets, and the forwarder management schema:
//! - Type and Length are VarNumbers (1/3/5/9-byte forms)
//! - Integers use the NonNegativeInteger encoding (1/2/4/8 bytes, big-endian)
//! - Encoders always emit the smallest valid form
//!
//! The encoding must be byte-stable: the signed region of a data packet is
//! exactly the bytes produced here, so any drift changes signatures.

use crate::error::CoreError;

/// Assigned TLV numbers used by this protocol.
pub mod types {
    /// Data packet.
    pub const DATA: u64 = 0x06;
    /// Name.
    pub const NAME: u64 = 0x07;
    /// GenericNameComponent.
    pub const GENERIC_COMPONENT: u64 = 0x08;
    /// KeywordNameComponent (used for the "PA" insertion marker).
    pub const KEYWORD_COMPONENT: u64 = 0x20;
    /// SegmentNameComponent.
    pub const SEGMENT_COMPONENT: u64 = 0x32;
    /// VersionNameComponent (carries the generation marker).
    pub const VERSION_COMPONENT: u64 = 0x36;
    /// MetaInfo.
    pub const META_INFO: u64 = 0x14;
    /// ContentType.
    pub const CONTENT_TYPE: u64 = 0x18;
    /// FreshnessPeriod.
    pub const FRESHNESS_PERIOD: u64 = 0x19;
    /// Content.
    pub const CONTENT: u64 = 0x15;
    /// SignatureInfo.
    pub const SIGNATURE_INFO: u64 = 0x16;
    /// SignatureType.
    pub const SIGNATURE_TYPE: u64 = 0x1b;
    /// KeyLocator.
    pub const KEY_LOCATOR: u64 = 0x1c;
    /// SignatureValue.
    pub const SIGNATURE_VALUE: u64 = 0x17;
}

/// Encode a VarNumber (used for both Type and Length).
pub fn write_var_number(buf: &mut Vec<u8>, n: u64) {
    if n < 253 {
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(253);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffff_ffff {
        buf.push(254);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(255);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Size in bytes of a VarNumber encoding.
pub fn var_number_size(n: u64) -> usize {
    if n < 253 {
        1
    } else if n <= 0xffff {
        3
    } else if n <= 0xffff_ffff {
        5
    } else {
        9
    }
}

/// Write one TLV element: type, length, value.
pub fn write_tlv(buf: &mut Vec<u8>, typ: u64, value: &[u8]) {
    write_var_number(buf, typ);
    write_var_number(buf, value.len() as u64);
    buf.extend_from_slice(value);
}

/// Write a TLV element whose value is a NonNegativeInteger.
pub fn write_uint_tlv(buf: &mut Vec<u8>, typ: u64, n: u64) {
    let value = encode_uint(n);
    write_tlv(buf, typ, &value);
}

/// Encode a NonNegativeInteger in its smallest form (1, 2, 4, or 8 bytes).
pub fn encode_uint(n: u64) -> Vec<u8> {
    if n <= 0xff {
        vec![n as u8]
    } else if n <= 0xffff {
        (n as u16).to_be_bytes().to_vec()
    } else if n <= 0xffff_ffff {
        (n as u32).to_be_bytes().to_vec()
    } else {
        n.to_be_bytes().to_vec()
    }
}

/// Decode a NonNegativeInteger. Accepts any of the four valid lengths.
pub fn decode_uint(value: &[u8]) -> Result<u64, CoreError> {
    match value.len() {
        1 => Ok(value[0] as u64),
        2 => Ok(u16::from_be_bytes([value[0], value[1]]) as u64),
        4 => {
            let arr: [u8; 4] = value.try_into().expect("length checked");
            Ok(u32::from_be_bytes(arr) as u64)
        }
        8 => {
            let arr: [u8; 8] = value.try_into().expect("length checked");
            Ok(u64::from_be_bytes(arr))
        }
        n => Err(CoreError::InvalidIntegerLength(n)),
    }
}

/// A sequential reader over a TLV-encoded byte slice.
pub struct TlvReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> TlvReader<'a> {
    /// Create a reader over the given bytes.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Current read position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }

    /// True when everything has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn read_var_number(&mut self) -> Result<u64, CoreError> {
        let first = *self.bytes.get(self.pos).ok_or(CoreError::TruncatedHeader)?;
        self.pos += 1;
        let width = match first {
            0..=252 => return Ok(first as u64),
            253 => 2,
            254 => 4,
            255 => 8,
        };
        let end = self.pos + width;
        if end > self.bytes.len() {
            return Err(CoreError::TruncatedHeader);
        }
        let mut n: u64 = 0;
        for &b in &self.bytes[self.pos..end] {
            n = (n << 8) | b as u64;
        }
        self.pos = end;
        Ok(n)
    }

    /// Read the next TLV element, returning its type and value slice.
    pub fn read_element(&mut self) -> Result<(u64, &'a [u8]), CoreError> {
        let typ = self.read_var_number()?;
        let len = self.read_var_number()? as usize;
        let have = self.bytes.len() - self.pos;
        if len > have {
            return Err(CoreError::TruncatedValue { need: len, have });
        }
        let value = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok((typ, value))
    }

    /// Read the next element and require the given type.
    pub fn expect_element(&mut self, expected: u64) -> Result<&'a [u8], CoreError> {
        let (typ, value) = self.read_element()?;
        if typ != expected {
            return Err(CoreError::UnexpectedType { expected, got: typ });
        }
        Ok(value)
    }

    /// Read the next element only if it has the given type.
    ///
    /// On a type mismatch the reader is left where it was.
    pub fn optional_element(&mut self, expected: u64) -> Result<Option<&'a [u8]>, CoreError> {
        if self.is_empty() {
            return Ok(None);
        }
        let saved = self.pos;
        let (typ, value) = self.read_element()?;
        if typ == expected {
            Ok(Some(value))
        } else {
            self.pos = saved;
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_var_number_forms() {
        let mut buf = Vec::new();
        write_var_number(&mut buf, 0);
        assert_eq!(buf, vec![0x00]);

        buf.clear();
        write_var_number(&mut buf, 252);
        assert_eq!(buf, vec![252]);

        buf.clear();
        write_var_number(&mut buf, 253);
        assert_eq!(buf, vec![253, 0x00, 0xfd]);

        buf.clear();
        write_var_number(&mut buf, 0x0216);
        assert_eq!(buf, vec![253, 0x02, 0x16]);

        buf.clear();
        write_var_number(&mut buf, 0x1_0000);
        assert_eq!(buf, vec![254, 0x00, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn test_uint_smallest_form() {
        assert_eq!(encode_uint(0), vec![0x00]);
        assert_eq!(encode_uint(255), vec![0xff]);
        assert_eq!(encode_uint(256), vec![0x01, 0x00]);
        assert_eq!(encode_uint(86_400_000), vec![0x05, 0x26, 0x5c, 0x00]);
    }

    #[test]
    fn test_uint_rejects_odd_lengths() {
        assert!(decode_uint(&[]).is_err());
        assert!(decode_uint(&[0, 0, 0]).is_err());
        assert!(decode_uint(&[0; 5]).is_err());
    }

    #[test]
    fn test_reader_roundtrip() {
        let mut buf = Vec::new();
        write_tlv(&mut buf, types::CONTENT, b"hello");
        write_uint_tlv(&mut buf, 0x6d, 5000);

        let mut reader = TlvReader::new(&buf);
        let (typ, value) = reader.read_element().unwrap();
        assert_eq!(typ, types::CONTENT);
        assert_eq!(value, b"hello");

        let value = reader.expect_element(0x6d).unwrap();
        assert_eq!(decode_uint(value).unwrap(), 5000);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_reader_truncated_value() {
        let mut buf = Vec::new();
        write_tlv(&mut buf, 0x08, b"abcdef");
        buf.truncate(buf.len() - 2);

        let mut reader = TlvReader::new(&buf);
        assert!(matches!(
            reader.read_element(),
            Err(CoreError::TruncatedValue { need: 6, have: 4 })
        ));
    }

    #[test]
    fn test_optional_element_mismatch_keeps_position() {
        let mut buf = Vec::new();
        write_tlv(&mut buf, 0x15, b"x");

        let mut reader = TlvReader::new(&buf);
        assert!(reader.optional_element(0x14).unwrap().is_none());
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.expect_element(0x15).unwrap(), b"x");
    }

    proptest! {
        #[test]
        fn prop_var_number_roundtrip(n in any::<u64>()) {
            let mut buf = Vec::new();
            write_var_number(&mut buf, n);
            prop_assert_eq!(buf.len(), var_number_size(n));

            // Round-trip through an element with type n and empty value
            let mut elem = Vec::new();
            write_tlv(&mut elem, n, &[]);
            let mut reader = TlvReader::new(&elem);
            let (typ, value) = reader.read_element().unwrap();
            prop_assert_eq!(typ, n);
            prop_assert!(value.is_empty());
        }

        #[test]
        fn prop_uint_roundtrip(n in any::<u64>()) {
            let encoded = encode_uint(n);
            prop_assert_eq!(decode_uint(&encoded).unwrap(), n);
        }
    }
}
