//! Property coverage for the artifact format's manifest/payload byte-accuracy (§6 wire
//! format): the length prefix `serialize` writes for an asset always equals that asset's
//! payload length in bytes, and `parse` always recovers the exact original bytes back out —
//! even when the content itself contains the format's own magic, divider or alias-marker
//! byte sequences, since extraction is length-prefixed rather than delimiter-scanned.

use std::path::PathBuf;

use fob_bundler::artifact::{parse, serialize};
use fob_bundler::AssetTable;
use proptest::prelude::*;

fn asset_name() -> impl Strategy<Value = String> {
    "/[a-z][a-z0-9]{0,6}\\.js"
}

/// Arbitrary bytes, weighted toward also producing content that embeds the format's own
/// marker sequences (📦, ✄, ↻) so those aren't accidentally treated as delimiters.
fn payload_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        3 => proptest::collection::vec(any::<u8>(), 0..64),
        1 => Just("📦 ✄ ↻ not a delimiter, just bytes".as_bytes().to_vec()),
        1 => Just(b"\n\xe2\x9c\x84\n".to_vec()),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Round-tripping an arbitrary single asset through `serialize`/`parse` always recovers
    /// its exact bytes, regardless of content.
    #[test]
    fn single_asset_round_trips_byte_exact(name in asset_name(), bytes in payload_bytes()) {
        let mut table = AssetTable::new();
        table.insert_asset(name.clone(), bytes.clone(), PathBuf::from("/p/src.ts"));

        let artifact = serialize(&table, &name);
        let parsed = parse(&artifact).unwrap();

        prop_assert_eq!(parsed.len(), 1);
        prop_assert_eq!(&parsed[0].name, &name);
        prop_assert_eq!(&parsed[0].bytes, &bytes);
    }

    /// The declared manifest length for an asset always equals its payload's byte length,
    /// not its character count — exercised with multi-byte UTF-8 and raw non-UTF-8 content.
    #[test]
    fn manifest_length_matches_payload_byte_length(name in asset_name(), bytes in payload_bytes()) {
        let mut table = AssetTable::new();
        table.insert_asset(name.clone(), bytes.clone(), PathBuf::from("/p/src.ts"));

        let artifact = serialize(&table, &name);
        let parsed = parse(&artifact).unwrap();

        prop_assert_eq!(parsed[0].bytes.len(), bytes.len());
    }

    /// Multiple assets with arbitrary, possibly delimiter-colliding content all round-trip
    /// together, each recovering its own bytes without bleeding into a neighbor's.
    #[test]
    fn multi_asset_table_round_trips_without_cross_contamination(
        entries in proptest::collection::vec((asset_name(), payload_bytes()), 1..5),
    ) {
        let mut table = AssetTable::new();
        let mut seen = std::collections::HashSet::new();
        let mut unique_entries = Vec::new();
        for (name, bytes) in entries {
            if seen.insert(name.clone()) {
                table.insert_asset(name.clone(), bytes.clone(), PathBuf::from("/p/src.ts"));
                unique_entries.push((name, bytes));
            }
        }
        prop_assume!(!unique_entries.is_empty());

        let entry_name = unique_entries[0].0.clone();
        let artifact = serialize(&table, &entry_name);
        let parsed = parse(&artifact).unwrap();

        prop_assert_eq!(parsed.len(), unique_entries.len());
        for (name, bytes) in &unique_entries {
            let found = parsed
                .iter()
                .find(|a| &a.name == name)
                .unwrap_or_else(|| panic!("missing {name} in parsed artifact"));
            prop_assert_eq!(&found.bytes, bytes);
        }
    }
}
