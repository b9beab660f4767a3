//! Proptest generators for property-based testing.

use proptest::prelude::*;

use prefix_inject_client::RouteCommand;
use prefix_inject_core::{Component, Ed25519Signer, Name};

/// Generate one generic component label.
pub fn component_label() -> impl Strategy<Value = Vec<u8>> {
    "[a-z0-9]{1,8}".prop_map(String::into_bytes)
}

/// Generate a target name of 1 to 5 generic components.
pub fn target_name() -> impl Strategy<Value = Name> {
    prop::collection::vec(component_label(), 1..=5).prop_map(|labels| {
        Name::from_components(labels.into_iter().map(Component::generic).collect())
    })
}

/// Generate a route command.
pub fn route_command() -> impl Strategy<Value = RouteCommand> {
    prop_oneof![
        (1u64..=u64::MAX, any::<u64>())
            .prop_map(|(ttl_ms, cost)| RouteCommand::Install { ttl_ms, cost }),
        Just(RouteCommand::Withdraw),
    ]
}

/// Generate a generation marker in the wall-clock millisecond range.
pub fn generation_marker() -> impl Strategy<Value = u64> {
    1u64..=4_000_000_000_000u64
}

/// Generate a deterministic signer from a random seed.
pub fn signer() -> impl Strategy<Value = Ed25519Signer> {
    any::<[u8; 32]>().prop_map(|seed| {
        Ed25519Signer::new(Name::from_uri("/gen/KEY/0").expect("static uri"), &seed)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use prefix_inject_client::{
        build_insertion_object, decode_route_parameters, staple_certificates,
        strip_stapled_certificates,
    };
    use prefix_inject_core::tlv::types;
    use prefix_inject_core::{verify_ed25519, Data};

    proptest! {
        #[test]
        fn test_name_encoding_roundtrip(name in target_name()) {
            let encoded = name.encode();
            let decoded = Name::decode(&encoded).unwrap();
            prop_assert_eq!(decoded, name);
        }

        #[test]
        fn test_object_decodes_to_inputs(
            target in target_name(),
            command in route_command(),
            marker in generation_marker(),
            signer in signer(),
        ) {
            let object = build_insertion_object(&target, &signer, &command, marker).unwrap();
            let (data, consumed) = Data::decode(&object).unwrap();
            prop_assert_eq!(consumed, object.len());

            // Name: target ++ keyword, version(marker), segment(0)
            let components = data.name.components();
            prop_assert_eq!(components.len(), target.len() + 3);
            prop_assert_eq!(&components[..target.len()], target.components());
            let version = &components[target.len() + 1];
            prop_assert_eq!(version.typ(), types::VERSION_COMPONENT);
            prop_assert_eq!(version.as_uint().unwrap(), marker);

            // Content round-trips to the command
            let (expiration, cost) = decode_route_parameters(&data.content).unwrap();
            prop_assert_eq!(RouteCommand::from_wire(expiration, cost), command);
        }

        #[test]
        fn test_object_signature_verifies(
            target in target_name(),
            command in route_command(),
            marker in generation_marker(),
            signer in signer(),
        ) {
            let object = build_insertion_object(&target, &signer, &command, marker).unwrap();
            let (data, _) = Data::decode(&object).unwrap();

            prop_assert!(verify_ed25519(
                &signer.verifying_key_bytes(),
                &data.signed_region,
                &data.signature_value,
            )
            .is_ok());
        }

        #[test]
        fn test_stapling_preserves_object(
            target in target_name(),
            marker in generation_marker(),
            signer in signer(),
            certs in prop::collection::vec(prop::collection::vec(any::<u8>(), 1..32), 1..3),
        ) {
            let object =
                build_insertion_object(&target, &signer, &RouteCommand::Withdraw, marker).unwrap();
            let stapled = staple_certificates(object.clone(), &certs);
            let (recovered, stripped) = strip_stapled_certificates(&stapled).unwrap();
            prop_assert_eq!(recovered, object.as_slice());
            prop_assert_eq!(stripped.len(), certs.len());
        }
    }
}
