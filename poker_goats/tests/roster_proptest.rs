/// Property-based tests for the roster using proptest
///
/// Adding names in any number of batches must behave like a set union that
/// remembers the order each name was first seen in.
use poker_goats::{PlayerId, Roster};
use proptest::prelude::*;

// Strategy for a small pool of names so batches overlap often
fn name_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["alice", "bob", "carol", "dave", "erin", "frank"])
        .prop_map(str::to_string)
}

fn batches_strategy() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(prop::collection::vec(name_strategy(), 0..6), 0..6)
}

proptest! {
    #[test]
    fn test_roster_is_first_seen_union(batches in batches_strategy()) {
        let mut roster = Roster::new();
        let mut expected: Vec<PlayerId> = Vec::new();

        for batch in &batches {
            let added = roster.add_players(batch).unwrap();

            let mut newly = Vec::new();
            for name in batch {
                let id = PlayerId::from(name.as_str());
                if !expected.contains(&id) {
                    expected.push(id.clone());
                    newly.push(id);
                }
            }
            prop_assert_eq!(added, newly);
        }

        prop_assert_eq!(roster.list_players(), expected.clone());
        prop_assert_eq!(roster.len(), expected.len());
    }

    #[test]
    fn test_padding_does_not_create_duplicates(name in name_strategy(), pad in 0usize..4) {
        let mut roster = Roster::new();
        let padded = format!("{}{}{}", " ".repeat(pad), name, " ".repeat(pad));

        roster.add_players([name.as_str()]).unwrap();
        let added = roster.add_players([padded.as_str()]).unwrap();

        prop_assert!(added.is_empty());
        prop_assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_empty_name_rejects_whole_batch(batch in prop::collection::vec(name_strategy(), 0..5)) {
        let mut roster = Roster::new();
        let mut with_blank = batch.clone();
        with_blank.push("   ".to_string());

        prop_assert!(roster.add_players(&with_blank).is_err());
        prop_assert!(roster.is_empty());
    }
}
