use driftwatch::diff::diff;
use driftwatch::inventory::{FileRecord, Inventory};
use driftwatch::matcher::find_matches;
use driftwatch::utils::serialization;
use proptest::prelude::*;
use std::collections::HashSet;
use std::path::PathBuf;

fn inventory_of(names: &HashSet<String>) -> Inventory {
    Inventory::from_files(
        names
            .iter()
            .map(|n| PathBuf::from(format!("/r/{n}")))
            .collect(),
    )
}

fn record(path: String, hash: Option<u8>) -> FileRecord {
    let path = PathBuf::from(format!("/r/{path}"));
    let name = path
        .file_name()
        .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
    FileRecord {
        path,
        name,
        hash: hash.map(|h| format!("{h:032x}")),
    }
}

proptest! {
    #[test]
    fn test_diff_matches_set_difference(
        loaded in prop::collection::hash_set("[a-z]{1,8}", 0..40),
        current in prop::collection::hash_set("[a-z]{1,8}", 0..40),
    ) {
        // Invariant: diff is exactly the path-set difference, both directions
        let result = diff(&inventory_of(&current), &inventory_of(&loaded));

        let expected_added: HashSet<_> = current.difference(&loaded)
            .map(|n| PathBuf::from(format!("/r/{n}")))
            .collect();
        let expected_removed: HashSet<_> = loaded.difference(&current)
            .map(|n| PathBuf::from(format!("/r/{n}")))
            .collect();

        let actual_added: HashSet<_> = result.added.iter().map(|r| r.path.clone()).collect();
        let actual_removed: HashSet<_> = result.removed.iter().map(|r| r.path.clone()).collect();

        prop_assert_eq!(actual_added, expected_added);
        prop_assert_eq!(actual_removed, expected_removed);
    }

    #[test]
    fn test_diff_sets_are_disjoint(
        loaded in prop::collection::hash_set("[a-z]{1,6}", 0..30),
        current in prop::collection::hash_set("[a-z]{1,6}", 0..30),
    ) {
        let result = diff(&inventory_of(&current), &inventory_of(&loaded));

        let added: HashSet<_> = result.added.iter().map(|r| &r.path).collect();
        let removed: HashSet<_> = result.removed.iter().map(|r| &r.path).collect();
        prop_assert!(added.is_disjoint(&removed));
    }

    #[test]
    fn test_from_files_order_independent(
        names in prop::collection::vec("[a-z]{1,8}", 0..40),
    ) {
        // Entry order is deterministic regardless of traversal order
        let paths: Vec<PathBuf> = names.iter()
            .map(|n| PathBuf::from(format!("/r/{n}")))
            .collect();
        let mut reversed = paths.clone();
        reversed.reverse();

        let a = Inventory::from_files(paths);
        let b = Inventory::from_files(reversed);
        prop_assert_eq!(a.entries, b.entries);
    }

    #[test]
    fn test_matcher_candidates_are_exactly_hash_equal_added(
        removed_hashes in prop::collection::vec(prop::option::of(0u8..4), 0..10),
        added_hashes in prop::collection::vec(prop::option::of(0u8..4), 0..10),
    ) {
        let removed: Vec<FileRecord> = removed_hashes.iter().enumerate()
            .map(|(i, h)| record(format!("gone{i}"), *h))
            .collect();
        let added: Vec<FileRecord> = added_hashes.iter().enumerate()
            .map(|(i, h)| record(format!("new{i}"), *h))
            .collect();

        let matches = find_matches(&removed, &added);
        prop_assert_eq!(matches.len(), removed.len());

        for (entry, result) in removed.iter().zip(&matches) {
            let expected: Vec<&FileRecord> = match &entry.hash {
                // Deferred digests never match anything
                None => Vec::new(),
                Some(h) => added.iter()
                    .filter(|a| a.hash.as_ref() == Some(h))
                    .collect(),
            };
            let actual: Vec<&FileRecord> = result.candidates.iter().collect();
            prop_assert_eq!(
                actual.iter().map(|r| &r.path).collect::<Vec<_>>(),
                expected.iter().map(|r| &r.path).collect::<Vec<_>>()
            );
        }
    }

    #[test]
    fn test_inventory_serialization_round_trip(
        names in prop::collection::hash_set("[a-z]{1,8}", 0..30),
        hashes in prop::collection::vec(any::<u128>(), 0..30),
    ) {
        let mut inventory = inventory_of(&names);
        for (entry, hash) in inventory.entries.iter_mut().zip(&hashes) {
            entry.hash = Some(format!("{hash:032x}"));
        }

        let bytes = serialization::serialize(&inventory).unwrap();
        let restored: Inventory = serialization::deserialize(&bytes).unwrap();
        prop_assert_eq!(inventory, restored);
    }
}
