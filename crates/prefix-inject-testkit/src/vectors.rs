//! Golden encoding vectors.
//!
//! Every implementation of the injection protocol must produce identical
//! object names and content bytes for these inputs. Signatures are excluded
//! (they depend on the signer), so the vectors pin the signed-region inputs
//! rather than the final packet.

use prefix_inject_client::{build_insertion_object, RouteCommand};
use prefix_inject_core::{Data, Name};

use crate::fixtures::object_signer;

/// A single golden vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    pub name: &'static str,
    pub description: &'static str,

    // Inputs
    pub target_uri: &'static str,
    pub generation_marker: u64,
    pub command: RouteCommand,

    // Expected outputs (hex)
    pub expected_name: &'static str,
    pub expected_content: &'static str,
}

/// All golden vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "install_small_marker",
            description: "Install with 1-byte marker, 2-byte expiration",
            target_uri: "/foo",
            generation_marker: 42,
            command: RouteCommand::Install { ttl_ms: 1000, cost: 5 },
            expected_name: "070f0803666f6f2002504136012a320100",
            expected_content: "6d0203e86a0105",
        },
        GoldenVector {
            name: "withdraw",
            description: "Withdraw encodes expiration 0 and cost 0",
            target_uri: "/foo",
            generation_marker: 43,
            command: RouteCommand::Withdraw,
            expected_name: "070f0803666f6f2002504136012b320100",
            expected_content: "6d01006a0100",
        },
        GoldenVector {
            name: "install_epoch_marker",
            description: "Wall-clock sized marker takes the 8-byte integer form",
            target_uri: "/foo/bar/baz",
            generation_marker: 1_700_000_000_000,
            command: RouteCommand::Install { ttl_ms: 86_400_000, cost: 5 },
            expected_name: "0720\
                            0803666f6f\
                            0803626172\
                            080362617a\
                            20025041\
                            36080000018bcfe56800\
                            320100",
            expected_content: "6d0405265c006a0105",
        },
    ]
}

/// Check one vector against the builder.
pub fn verify_vector(vector: &GoldenVector) -> Result<(), String> {
    let target = Name::from_uri(vector.target_uri)
        .map_err(|e| format!("{}: bad target: {e}", vector.name))?;
    let object =
        build_insertion_object(&target, &object_signer(1), &vector.command, vector.generation_marker)
            .map_err(|e| format!("{}: build failed: {e}", vector.name))?;
    let (data, _) =
        Data::decode(&object).map_err(|e| format!("{}: decode failed: {e}", vector.name))?;

    let expected_name: String = vector.expected_name.split_whitespace().collect();
    let got_name = hex::encode(data.name.encode());
    if got_name != expected_name {
        return Err(format!(
            "{}: name mismatch\n  expected {expected_name}\n  got      {got_name}",
            vector.name
        ));
    }

    let got_content = hex::encode(&data.content);
    if got_content != vector.expected_content {
        return Err(format!(
            "{}: content mismatch\n  expected {}\n  got      {got_content}",
            vector.name, vector.expected_content
        ));
    }
    Ok(())
}

/// Check every vector; returns the list of failures.
pub fn verify_all_vectors() -> Vec<String> {
    all_vectors().iter().filter_map(|v| verify_vector(v).err()).collect()
}
