//! Property-based tests for the lower-cased tag set.
//!
//! Adding any tag makes it findable in any casing, deleting an absent tag
//! changes nothing, and the set never holds two spellings of one tag.

use proptest::prelude::*;
use tagmark::types::tag::TagSet;

fn arb_tag() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9_-]{0,12}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn added_tags_are_found_in_any_case(tags in prop::collection::vec(arb_tag(), 0..10)) {
        let mut set = TagSet::new();
        set.add(&tags);

        prop_assert!(set.has(&tags));
        prop_assert!(set.has(tags.iter().map(|t| t.to_uppercase())));
        prop_assert!(set.list().iter().all(|t| *t == t.to_lowercase()));
    }

    #[test]
    fn size_counts_distinct_lowercase_tags(tags in prop::collection::vec(arb_tag(), 0..10)) {
        let set: TagSet = tags.iter().collect();
        let mut distinct: Vec<String> = tags.iter().map(|t| t.to_lowercase()).collect();
        distinct.sort();
        distinct.dedup();
        prop_assert_eq!(set.len(), distinct.len());
    }

    #[test]
    fn deleting_absent_tag_is_noop(
        tags in prop::collection::vec("[a-m]{1,6}", 0..8),
        absent in "[n-z]{1,6}",
    ) {
        let mut set: TagSet = tags.iter().collect();
        let before = set.clone();
        set.delete([&absent]);
        prop_assert_eq!(set, before);
    }

    #[test]
    fn delete_removes_regardless_of_case(tag in arb_tag(), others in prop::collection::vec(arb_tag(), 0..5)) {
        let mut set: TagSet = others.iter().collect();
        set.add([&tag]);
        set.delete([tag.to_uppercase()]);
        prop_assert!(!set.has([&tag]));
    }
}

#[test]
fn empty_query_is_always_contained() {
    let set = TagSet::new();
    assert!(set.has(Vec::<String>::new()));
}

#[test]
fn reset_clears_everything() {
    let mut set: TagSet = ["a", "B", "c"].into_iter().collect();
    assert_eq!(set.len(), 3);
    set.reset();
    assert!(set.is_empty());
}
