// =====================================================================
// File: index/tests.rs
//
// Description:
//   Unit tests for `BTreeNode` and `BTreeIndex`: insert, search, remove,
//   length bookkeeping and ordered / prefix traversal.
//
// Notes:
//   * Only compiled when running `cargo test`.
// =====================================================================

/// Shorthand for string-valued lookups.
#[cfg(test)]
fn lookup<'a>(tree: &'a crate::BTreeIndex<String>, key: &str) -> Option<&'a str> {
    tree.search(key).map(String::as_str)
}

/// Keys of `tree` in traversal order.
#[cfg(test)]
fn keys<V: Clone>(tree: &crate::BTreeIndex<V>) -> Vec<String> {
    tree.entries().into_iter().map(|(k, _)| k.to_string()).collect()
}

// =================================================================
// Tree structure and simple search
// =================================================================
#[cfg(test)]
mod index_tests {
    use super::{keys, lookup};
    use crate::{BTreeIndex, BTreeNode};

    #[test]
    fn test_new_leaf_node() {
        let node: BTreeNode<String> = BTreeNode::new(true);
        assert!(node.kv_pairs.is_empty());
        assert!(node.children.is_empty());
        assert!(node.is_leaf);
    }

    #[test]
    fn test_new_index_clamps_degree() {
        let index: BTreeIndex<String> = BTreeIndex::new(0);
        assert_eq!(index.t, 2);
        assert!(index.root.is_leaf);
        assert!(index.is_empty());
    }

    #[test]
    // Hand-built tree, no inserts involved
    fn search_in_internal_node() {
        let mut root = BTreeNode::new(false);
        root.kv_pairs.push(("m".to_string(), "middle".to_string()));

        let mut left = BTreeNode::new(true);
        left.kv_pairs.push(("a".into(), "A".into()));
        left.kv_pairs.push(("f".into(), "F".into()));

        let mut right = BTreeNode::new(true);
        right.kv_pairs.push(("z".into(), "Z".into()));

        root.children.push(Box::new(left));
        root.children.push(Box::new(right));

        let tree = BTreeIndex { t: 2, root: Box::new(root), len: 4 };

        assert_eq!(lookup(&tree, "a"), Some("A"));
        assert_eq!(lookup(&tree, "m"), Some("middle"));
        assert_eq!(lookup(&tree, "z"), Some("Z"));
        assert_eq!(lookup(&tree, "x"), None);
        assert_eq!(keys(&tree), vec!["a", "f", "m", "z"]);
    }
}

// =================================================================
// Insertion
// =================================================================
#[cfg(test)]
mod index_insertion_tests {
    use super::{keys, lookup};
    use crate::BTreeIndex;

    #[test]
    fn insert_and_search_basic() {
        let mut t = BTreeIndex::new(2);
        t.insert("dog".into(), "bark".to_string());
        t.insert("cat".into(), "meow".to_string());
        t.insert("fish".into(), "splash".to_string());
        assert_eq!(lookup(&t, "dog"), Some("bark"));
        assert_eq!(lookup(&t, "cat"), Some("meow"));
        assert_eq!(lookup(&t, "bird"), None);
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn insert_overwrites_value() {
        let mut t = BTreeIndex::new(2);
        t.insert("dog".into(), "bark".to_string());
        t.insert("dog".into(), "woofwoof".to_string());
        assert_eq!(lookup(&t, "dog"), Some("woofwoof"));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn overwrite_of_promoted_median_does_not_duplicate() {
        let mut t = BTreeIndex::new(2);
        for k in ["a", "b", "c"] {
            t.insert(k.into(), k.to_uppercase());
        }
        // Root is full; "b" becomes the median on the next insert
        t.insert("b".into(), "again".to_string());

        assert_eq!(t.len(), 3);
        assert_eq!(keys(&t), vec!["a", "b", "c"]);
        assert_eq!(lookup(&t, "b"), Some("again"));
    }

    #[test]
    fn insert_causes_root_split() {
        let mut t = BTreeIndex::new(2);
        for (k, v) in [("a", "1"), ("b", "2"), ("c", "3"), ("d", "4")] {
            t.insert(k.into(), v.to_string());
        }
        assert!(!t.root.is_leaf);
        assert_eq!(lookup(&t, "a"), Some("1"));
        assert_eq!(lookup(&t, "d"), Some("4"));
    }

    #[test]
    fn search_many_keys() {
        let mut tree = BTreeIndex::new(2);
        for i in 0..50 {
            tree.insert(format!("k{:02}", i), format!("v{:02}", i));
        }

        assert_eq!(lookup(&tree, "k00"), Some("v00"));
        assert_eq!(lookup(&tree, "k25"), Some("v25"));
        assert_eq!(lookup(&tree, "k49"), Some("v49"));
        assert_eq!(lookup(&tree, "k99"), None);
        assert_eq!(tree.len(), 50);
    }
}

// =================================================================
// Ordered traversal
// =================================================================
#[cfg(test)]
mod index_traversal_tests {
    use crate::BTreeIndex;

    fn animals() -> BTreeIndex<u32> {
        let mut t = BTreeIndex::new(2);
        for (i, k) in ["dog", "cat", "dinosaur", "bird", "frog", "elephant", "fox", "donkey"]
            .iter()
            .enumerate()
        {
            t.insert(k.to_string(), i as u32);
        }
        t
    }

    #[test]
    fn entries_are_sorted() {
        let t = animals();
        let keys: Vec<&str> = t.entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec!["bird", "cat", "dinosaur", "dog", "donkey", "elephant", "fox", "frog"]
        );
    }

    #[test]
    fn prefix_selects_contiguous_run() {
        let t = animals();
        let keys: Vec<&str> = t.entries_with_prefix("d").into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["dinosaur", "dog", "donkey"]);

        let keys: Vec<&str> = t.entries_with_prefix("do").into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["dog", "donkey"]);

        let keys: Vec<&str> = t.entries_with_prefix("f").into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["fox", "frog"]);
    }

    #[test]
    fn prefix_without_match_is_empty() {
        let t = animals();
        assert!(t.entries_with_prefix("z").is_empty());
        assert!(t.entries_with_prefix("a").is_empty());
        assert!(t.entries_with_prefix("dogs").is_empty());
    }

    #[test]
    fn empty_prefix_matches_everything() {
        let t = animals();
        assert_eq!(t.entries_with_prefix("").len(), t.len());
    }

    #[test]
    fn prefix_scan_across_many_levels() {
        let mut t = BTreeIndex::new(2);
        for i in 0..300 {
            t.insert(format!("{}{:03}", if i % 3 == 0 { "x" } else { "y" }, i), i);
        }
        let xs = t.entries_with_prefix("x");
        assert_eq!(xs.len(), 100);
        assert!(xs.windows(2).all(|w| w[0].0 < w[1].0));
        assert!(xs.iter().all(|(k, _)| k.starts_with('x')));
    }
}

// =================================================================
// Deletion
// =================================================================
#[cfg(test)]
mod index_delete_tests {
    use super::{keys, lookup};
    use crate::BTreeIndex;

    fn sample_tree() -> BTreeIndex<String> {
        let mut t = BTreeIndex::new(2);
        for (k, v) in [
            ("dog", "bark"),
            ("cat", "meow"),
            ("dinosaur", "raaawr"),
            ("bird", "chirp"),
            ("frog", "ribbet"),
            ("elephant", "honkhonk"),
            ("fox", "fraka-kaka-kaka-kaka-kow!"),
        ] {
            t.insert(k.into(), v.to_string());
        }
        t
    }

    #[test]
    fn delete_leaf_key() {
        let mut t = sample_tree();
        assert!(t.remove("frog"));
        assert_eq!(lookup(&t, "frog"), None);
        assert_eq!(t.len(), 6);
    }

    #[test]
    fn delete_non_existent_key() {
        let mut t = sample_tree();
        assert!(!t.remove("unicorn"));
        t.delete("unicorn");
        assert_eq!(t.len(), 7);
        assert_eq!(lookup(&t, "dog"), Some("bark"));
    }

    #[test]
    fn delete_internal_keys() {
        let mut t = sample_tree();
        assert!(t.remove("cat"));
        assert!(t.remove("dinosaur"));
        assert_eq!(lookup(&t, "cat"), None);
        assert_eq!(lookup(&t, "dinosaur"), None);
        assert_eq!(lookup(&t, "fox"), Some("fraka-kaka-kaka-kaka-kow!"));
        assert_eq!(keys(&t), vec!["bird", "dog", "elephant", "fox", "frog"]);
    }

    #[test]
    fn delete_until_empty() {
        let mut t = sample_tree();
        for k in ["bird", "cat", "dinosaur", "dog", "elephant", "fox", "frog"] {
            assert!(t.remove(k), "missing before delete: {k}");
            assert_eq!(lookup(&t, k), None, "still present after delete: {k}");
        }
        assert!(t.root.is_leaf);
        assert!(t.root.kv_pairs.is_empty());
        assert!(t.is_empty());
    }

    #[test]
    fn interleaved_inserts_and_deletes_stay_sorted() {
        let mut t = BTreeIndex::new(3);
        for i in 0..200u32 {
            t.insert(format!("f{:03}", (i * 37) % 200), i);
        }
        for i in (0..200u32).filter(|i| i % 4 != 1) {
            assert!(t.remove(&format!("f{:03}", i)));
        }
        let remaining = keys(&t);
        assert_eq!(remaining.len(), 50);
        assert_eq!(t.len(), 50);
        assert!(remaining.windows(2).all(|w| w[0] < w[1]));
        assert!(remaining.iter().all(|k| k[1..].parse::<u32>().unwrap() % 4 == 1));
    }
}
