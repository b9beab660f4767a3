//! Insertion object construction and certificate stapling.
//!
//! One route command is encoded as a signed data packet whose name is the
//! target name plus three fixed trailing components: the `PA` keyword
//! marker, a version carrying the generation marker, and segment 0. The
//! version component makes every command's name unique even for repeated
//! targets.

use prefix_inject_core::{
    make_data, tlv, Component, MetaInfo, Name, Signer, SigningError, TlvReader,
};
use prefix_inject_core::CoreError;

/// Expiration field in the object content.
pub const TLV_EXPIRATION: u64 = 0x6d;
/// Routing cost field in the object content.
pub const TLV_COST: u64 = 0x6a;
/// Wrapper for one stapled certificate.
pub const TLV_STAPLED_CERT: u64 = 0x216;
/// Keyword marker component value.
pub const INSERTION_MARKER: &[u8] = b"PA";

/// One route command.
///
/// The wire schema overloads a single operation with an `expiration == 0`
/// sentinel for withdrawal; at the API boundary the two cases are distinct
/// variants and the sentinel only appears in the encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteCommand {
    /// Install the route with a time-to-live and routing cost.
    Install {
        /// Route lifetime in milliseconds. A zero value encodes the
        /// withdraw sentinel on the wire and the forwarder will treat the
        /// command as [`RouteCommand::Withdraw`]; use that variant instead.
        ttl_ms: u64,
        /// Routing cost.
        cost: u64,
    },
    /// Withdraw the route now.
    Withdraw,
}

impl RouteCommand {
    /// The expiration value encoded on the wire (0 = withdraw).
    pub fn expiration_ms(&self) -> u64 {
        match self {
            Self::Install { ttl_ms, .. } => *ttl_ms,
            Self::Withdraw => 0,
        }
    }

    /// The cost value encoded on the wire.
    pub fn cost(&self) -> u64 {
        match self {
            Self::Install { cost, .. } => *cost,
            Self::Withdraw => 0,
        }
    }

    /// True for the withdraw variant.
    pub fn is_withdraw(&self) -> bool {
        matches!(self, Self::Withdraw)
    }

    /// Reconstruct from decoded wire values.
    pub fn from_wire(expiration_ms: u64, cost: u64) -> Self {
        if expiration_ms == 0 {
            Self::Withdraw
        } else {
            Self::Install { ttl_ms: expiration_ms, cost }
        }
    }
}

/// Encode the `{expiration, cost}` content of an insertion object.
pub fn encode_route_parameters(command: &RouteCommand) -> Vec<u8> {
    let mut buf = Vec::new();
    tlv::write_uint_tlv(&mut buf, TLV_EXPIRATION, command.expiration_ms());
    tlv::write_uint_tlv(&mut buf, TLV_COST, command.cost());
    buf
}

/// Decode `{expiration, cost}` back from object content.
pub fn decode_route_parameters(bytes: &[u8]) -> Result<(u64, u64), CoreError> {
    let mut reader = TlvReader::new(bytes);
    let expiration = tlv::decode_uint(reader.expect_element(TLV_EXPIRATION)?)?;
    let cost = tlv::decode_uint(reader.expect_element(TLV_COST)?)?;
    Ok((expiration, cost))
}

/// Build one signed insertion object.
///
/// The generation marker is supplied by the caller (reserved through the
/// sequencer), never generated here; the builder is pure with respect to
/// observable state. Fails only if the object signer cannot sign.
pub fn build_insertion_object(
    target: &Name,
    object_signer: &dyn Signer,
    command: &RouteCommand,
    generation_marker: u64,
) -> Result<Vec<u8>, SigningError> {
    let object_name = target.appending([
        Component::keyword(INSERTION_MARKER.to_vec()),
        Component::version(generation_marker),
        Component::segment(0),
    ]);

    let content = encode_route_parameters(command);
    make_data(&object_name, &MetaInfo::opaque(), &content, object_signer)
}

/// Append stapled certificates after the signed object, in list order.
///
/// Each certificate is wrapped in its own length-delimited field. Stapling
/// never re-signs or modifies the object; the appended bytes sit outside the
/// signed region and are trust hints for the remote evaluator only. An empty
/// list returns the input unchanged.
pub fn staple_certificates<C: AsRef<[u8]>>(object: Vec<u8>, certs: &[C]) -> Vec<u8> {
    let mut extended = object;
    for cert in certs {
        tlv::write_tlv(&mut extended, TLV_STAPLED_CERT, cert.as_ref());
    }
    extended
}

/// Split a stapled object back into the signed object and its certificates.
pub fn strip_stapled_certificates(bytes: &[u8]) -> Result<(&[u8], Vec<&[u8]>), CoreError> {
    let mut reader = TlvReader::new(bytes);
    reader.read_element()?;
    let object_end = reader.position();

    let mut certs = Vec::new();
    while !reader.is_empty() {
        certs.push(reader.expect_element(TLV_STAPLED_CERT)?);
    }
    Ok((&bytes[..object_end], certs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use prefix_inject_core::tlv::types;
    use prefix_inject_core::{Data, Ed25519Signer, CONTENT_TYPE_OPAQUE};

    fn object_signer() -> Ed25519Signer {
        Ed25519Signer::new(Name::from_uri("/ops/KEY/1").unwrap(), &[0x21; 32])
    }

    #[test]
    fn test_object_name_shape() {
        let target = Name::from_uri("/foo/bar/baz").unwrap();
        let command = RouteCommand::Install { ttl_ms: 5000, cost: 1 };
        let object = build_insertion_object(&target, &object_signer(), &command, 1_700_000).unwrap();

        let (data, _) = Data::decode(&object).unwrap();
        let components = data.name.components();
        assert_eq!(components.len(), 6);
        assert_eq!(&components[..3], target.components());
        assert_eq!(components[3].typ(), types::KEYWORD_COMPONENT);
        assert_eq!(components[3].value(), INSERTION_MARKER);
        assert_eq!(components[4].typ(), types::VERSION_COMPONENT);
        assert_eq!(components[4].as_uint().unwrap(), 1_700_000);
        assert_eq!(components[5].typ(), types::SEGMENT_COMPONENT);
        assert_eq!(components[5].as_uint().unwrap(), 0);
        assert_eq!(data.meta_info.content_type, Some(CONTENT_TYPE_OPAQUE));
    }

    #[test]
    fn test_content_roundtrip() {
        let target = Name::from_uri("/foo").unwrap();
        let command = RouteCommand::Install { ttl_ms: 86_400_000, cost: 5 };
        let object = build_insertion_object(&target, &object_signer(), &command, 42).unwrap();

        let (data, _) = Data::decode(&object).unwrap();
        let (expiration, cost) = decode_route_parameters(&data.content).unwrap();
        assert_eq!(expiration, 86_400_000);
        assert_eq!(cost, 5);
        assert_eq!(RouteCommand::from_wire(expiration, cost), command);
    }

    #[test]
    fn test_withdraw_encodes_zero_expiration() {
        let target = Name::from_uri("/foo").unwrap();
        let object =
            build_insertion_object(&target, &object_signer(), &RouteCommand::Withdraw, 42).unwrap();

        let (data, _) = Data::decode(&object).unwrap();
        let (expiration, cost) = decode_route_parameters(&data.content).unwrap();
        assert_eq!(expiration, 0);
        assert_eq!(cost, 0);
        assert!(RouteCommand::from_wire(expiration, cost).is_withdraw());
    }

    #[test]
    fn test_zero_ttl_install_hits_the_withdraw_sentinel() {
        let encoded = encode_route_parameters(&RouteCommand::Install { ttl_ms: 0, cost: 3 });
        let (expiration, cost) = decode_route_parameters(&encoded).unwrap();
        assert_eq!(expiration, 0);
        assert_eq!(cost, 3);
        assert!(RouteCommand::from_wire(expiration, cost).is_withdraw());
    }

    #[test]
    fn test_distinct_markers_give_distinct_names() {
        let target = Name::from_uri("/foo").unwrap();
        let command = RouteCommand::Withdraw;
        let a = build_insertion_object(&target, &object_signer(), &command, 1).unwrap();
        let b = build_insertion_object(&target, &object_signer(), &command, 2).unwrap();

        let (data_a, _) = Data::decode(&a).unwrap();
        let (data_b, _) = Data::decode(&b).unwrap();
        assert_ne!(data_a.name, data_b.name);
    }

    #[test]
    fn test_staple_empty_is_identity() {
        let object = vec![0x06, 0x01, 0x00];
        let stapled = staple_certificates(object.clone(), &[] as &[&[u8]]);
        assert_eq!(stapled, object);
    }

    #[test]
    fn test_staple_order_preserving_and_reversible() {
        let target = Name::from_uri("/foo").unwrap();
        let object = build_insertion_object(
            &target,
            &object_signer(),
            &RouteCommand::Install { ttl_ms: 1000, cost: 0 },
            7,
        )
        .unwrap();

        let c1 = b"first-cert".to_vec();
        let c2 = b"second-cert".to_vec();
        let stapled = staple_certificates(object.clone(), &[c1.clone(), c2.clone()]);

        let (recovered, certs) = strip_stapled_certificates(&stapled).unwrap();
        assert_eq!(recovered, object.as_slice());
        assert_eq!(certs, vec![c1.as_slice(), c2.as_slice()]);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_route_parameters_roundtrip(ttl in any::<u64>(), cost in any::<u64>()) {
                let command = RouteCommand::from_wire(ttl, if ttl == 0 { 0 } else { cost });
                let encoded = encode_route_parameters(&command);
                let (expiration, cost) = decode_route_parameters(&encoded).unwrap();
                prop_assert_eq!(RouteCommand::from_wire(expiration, cost), command);
            }

            #[test]
            fn prop_staple_strip_roundtrip(
                certs in proptest::collection::vec(
                    proptest::collection::vec(any::<u8>(), 0..64),
                    0..4,
                ),
            ) {
                let object = build_insertion_object(
                    &Name::from_uri("/foo").unwrap(),
                    &object_signer(),
                    &RouteCommand::Withdraw,
                    9,
                )
                .unwrap();

                let stapled = staple_certificates(object.clone(), &certs);
                let (recovered, stripped) = strip_stapled_certificates(&stapled).unwrap();
                prop_assert_eq!(recovered, object.as_slice());
                let stripped: Vec<Vec<u8>> = stripped.iter().map(|c| c.to_vec()).collect();
                prop_assert_eq!(stripped, certs);
            }
        }
    }

    #[test]
    fn test_stapling_does_not_touch_signature() {
        let target = Name::from_uri("/foo").unwrap();
        let object = build_insertion_object(
            &target,
            &object_signer(),
            &RouteCommand::Install { ttl_ms: 1000, cost: 0 },
            7,
        )
        .unwrap();

        let stapled = staple_certificates(object.clone(), &[b"cert".to_vec()]);
        let (before, _) = Data::decode(&object).unwrap();
        let (after, consumed) = Data::decode(&stapled).unwrap();
        assert_eq!(before.signature_value, after.signature_value);
        assert_eq!(consumed, object.len());
    }
}
