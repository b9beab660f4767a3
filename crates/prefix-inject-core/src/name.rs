//! Hierarchical names.
//!
//! A [`Name`] is an immutable ordered sequence of typed, opaque-valued
//! components. Names identify both route targets and the commands that
//! manipulate them; the insertion object's own name is the target name plus
//! three fixed trailing components (marker, version, segment).

use std::fmt;

use crate::error::{CoreError, ValidationError};
use crate::tlv::{self, types, TlvReader};

/// One name component: a TLV type plus an opaque value.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Component {
    typ: u64,
    value: Vec<u8>,
}

impl Component {
    /// A GenericNameComponent.
    pub fn generic(value: impl Into<Vec<u8>>) -> Self {
        Self { typ: types::GENERIC_COMPONENT, value: value.into() }
    }

    /// A KeywordNameComponent (type 32), e.g. the `PA` insertion marker.
    pub fn keyword(value: impl Into<Vec<u8>>) -> Self {
        Self { typ: types::KEYWORD_COMPONENT, value: value.into() }
    }

    /// A VersionNameComponent (type 54) carrying a NonNegativeInteger.
    pub fn version(v: u64) -> Self {
        Self { typ: types::VERSION_COMPONENT, value: tlv::encode_uint(v) }
    }

    /// A SegmentNameComponent (type 50) carrying a NonNegativeInteger.
    pub fn segment(s: u64) -> Self {
        Self { typ: types::SEGMENT_COMPONENT, value: tlv::encode_uint(s) }
    }

    /// Component from arbitrary type and value.
    pub fn new(typ: u64, value: impl Into<Vec<u8>>) -> Self {
        Self { typ, value: value.into() }
    }

    /// The TLV type of this component.
    pub fn typ(&self) -> u64 {
        self.typ
    }

    /// The raw value bytes.
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Interpret the value as a NonNegativeInteger (versions, segments).
    pub fn as_uint(&self) -> Result<u64, CoreError> {
        tlv::decode_uint(&self.value)
    }

    /// Parse one URI component, e.g. `foo`, `32=PA`, `%41b`.
    pub fn from_uri(text: &str) -> Result<Self, ValidationError> {
        let (typ, rest) = match text.split_once('=') {
            Some((prefix, rest)) if prefix.chars().all(|c| c.is_ascii_digit()) => {
                let typ = prefix.parse::<u64>().map_err(|_| {
                    ValidationError::MalformedComponent(format!("bad component type: {text}"))
                })?;
                (typ, rest)
            }
            _ => (types::GENERIC_COMPONENT, text),
        };

        let value = percent_decode(rest)?;
        if value.is_empty() {
            return Err(ValidationError::MalformedComponent(format!(
                "empty component value: {text:?}"
            )));
        }
        Ok(Self { typ, value })
    }

    fn write_to(&self, buf: &mut Vec<u8>) {
        tlv::write_tlv(buf, self.typ, &self.value);
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.typ != types::GENERIC_COMPONENT {
            write!(f, "{}=", self.typ)?;
        }
        for &b in &self.value {
            if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~') {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "%{b:02X}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Component({self})")
    }
}

fn percent_decode(text: &str) -> Result<Vec<u8>, ValidationError> {
    let mut out = Vec::with_capacity(text.len());
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3).ok_or_else(|| {
                ValidationError::MalformedComponent(format!("dangling percent escape: {text:?}"))
            })?;
            let s = std::str::from_utf8(hex).map_err(|_| {
                ValidationError::MalformedComponent(format!("bad percent escape: {text:?}"))
            })?;
            let b = u8::from_str_radix(s, 16).map_err(|_| {
                ValidationError::MalformedComponent(format!("bad percent escape: {text:?}"))
            })?;
            out.push(b);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Ok(out)
}

/// An immutable ordered sequence of components.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Name {
    components: Vec<Component>,
}

impl Name {
    /// The empty name (`/`).
    pub fn empty() -> Self {
        Self { components: Vec::new() }
    }

    /// Build from components.
    pub fn from_components(components: Vec<Component>) -> Self {
        Self { components }
    }

    /// Parse a URI such as `/foo/bar/baz` or `/a/32=PA/54=%07`.
    ///
    /// Fails with [`ValidationError`] on malformed input: missing leading
    /// slash or empty interior components.
    pub fn from_uri(uri: &str) -> Result<Self, ValidationError> {
        let trimmed = uri.trim();
        let rest = trimmed
            .strip_prefix('/')
            .ok_or_else(|| ValidationError::MalformedName(format!("missing leading slash: {uri:?}")))?;

        // "/" is the empty name; a trailing slash is tolerated
        let rest = rest.strip_suffix('/').unwrap_or(rest);
        if rest.is_empty() {
            return Ok(Self::empty());
        }

        let mut components = Vec::new();
        for part in rest.split('/') {
            if part.is_empty() {
                return Err(ValidationError::MalformedName(format!(
                    "empty component in {uri:?}"
                )));
            }
            components.push(Component::from_uri(part)?);
        }
        Ok(Self { components })
    }

    /// The components, in order.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// True for the empty name.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// A new name with the given components appended.
    pub fn appending(&self, extra: impl IntoIterator<Item = Component>) -> Self {
        let mut components = self.components.clone();
        components.extend(extra);
        Self { components }
    }

    /// Encode as a Name TLV element.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.write_to(&mut buf);
        buf
    }

    /// Write as a Name TLV element into the buffer.
    pub fn write_to(&self, buf: &mut Vec<u8>) {
        let mut inner = Vec::new();
        for component in &self.components {
            component.write_to(&mut inner);
        }
        tlv::write_tlv(buf, types::NAME, &inner);
    }

    /// Decode a Name TLV element.
    pub fn decode(bytes: &[u8]) -> Result<Self, CoreError> {
        let mut reader = TlvReader::new(bytes);
        let name = Self::read_from(&mut reader)?;
        Ok(name)
    }

    /// Read a Name TLV element from a reader.
    pub fn read_from(reader: &mut TlvReader<'_>) -> Result<Self, CoreError> {
        let inner = reader.expect_element(types::NAME)?;
        let mut components = Vec::new();
        let mut inner_reader = TlvReader::new(inner);
        while !inner_reader.is_empty() {
            let (typ, value) = inner_reader.read_element()?;
            components.push(Component::new(typ, value));
        }
        Ok(Self { components })
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.components.is_empty() {
            return write!(f, "/");
        }
        for component in &self.components {
            write!(f, "/{component}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({self})")
    }
}
