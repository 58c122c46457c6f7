// =====================================================================
// File: index/node.rs
//
// Description:
//   Node type for the ordered field index. A record keeps its fields in
//   one of these trees so that scans come out sorted by field name.
//
//   - `kv_pairs`: field name / payload pairs, sorted by name.
//   - `children`: child subtrees (empty for a leaf).
//   - `is_leaf` : true when the node has no children.
//
// Notes:
//   * Insert, search and delete live in `tree.rs`; this file only holds
//     the node layout and the read-only traversal helpers.
// =====================================================================

/// A single B-tree node. Keys are field names, `V` is the payload.
#[derive(Debug, Clone)]
pub struct BTreeNode<V> {
    pub kv_pairs: Vec<(String, V)>,
    /// Boxed so the recursive type has a known size.
    pub children: Vec<Box<BTreeNode<V>>>,
    pub is_leaf: bool,
}

impl<V> BTreeNode<V> {
    /// Creates an empty node.
    ///
    /// # Example
    /// ```
    /// use timed_kv::index::BTreeNode;
    /// let leaf: BTreeNode<String> = BTreeNode::new(true);
    /// assert!(leaf.kv_pairs.is_empty());
    /// assert!(leaf.is_leaf);
    /// ```
    pub fn new(is_leaf: bool) -> Self {
        Self {
            kv_pairs: Vec::new(),
            children: Vec::new(),
            is_leaf,
        }
    }

    /// Index of the first stored key that is `>= key`, or `kv_pairs.len()`
    /// when every stored key is smaller.
    ///
    /// # Example
    /// ```
    /// use timed_kv::BTreeNode;
    ///
    /// let mut node = BTreeNode::new(true);
    /// node.kv_pairs.push(("cat".to_string(), 1));
    /// node.kv_pairs.push(("dog".to_string(), 2));
    ///
    /// assert_eq!(node.lower_bound("ant"), 0);
    /// assert_eq!(node.lower_bound("dog"), 1);
    /// assert_eq!(node.lower_bound("elephant"), 2);
    /// ```
    pub fn lower_bound(&self, key: &str) -> usize {
        self.kv_pairs
            .binary_search_by(|(k, _)| k.as_str().cmp(key))
            .unwrap_or_else(|pos| pos)
    }

    /// Appends every pair of this subtree to `out` in ascending key order.
    pub fn collect_entries<'a>(&'a self, out: &mut Vec<(&'a str, &'a V)>) {
        if self.is_leaf {
            out.extend(self.kv_pairs.iter().map(|(k, v)| (k.as_str(), v)));
            return;
        }

        // In-order: child i, then separator i, then the rightmost child
        for (i, (k, v)) in self.kv_pairs.iter().enumerate() {
            self.children[i].collect_entries(out);
            out.push((k.as_str(), v));
        }
        self.children[self.kv_pairs.len()].collect_entries(out);
    }

    /// Appends the pairs whose key starts with `prefix`, in ascending order.
    ///
    /// Keys sharing a prefix form one contiguous run in sorted order, so
    /// subtrees left of `lower_bound(prefix)` are skipped and the walk stops
    /// at the first key past the run.
    ///
    /// Returns `false` once the run has ended so callers higher up the tree
    /// stop visiting siblings.
    pub fn collect_prefixed<'a>(&'a self, prefix: &str, out: &mut Vec<(&'a str, &'a V)>) -> bool {
        let start = self.lower_bound(prefix);

        for i in start..self.kv_pairs.len() {
            if !self.is_leaf && !self.children[i].collect_prefixed(prefix, out) {
                return false;
            }
            let (k, v) = &self.kv_pairs[i];
            if !k.starts_with(prefix) {
                return false;
            }
            out.push((k.as_str(), v));
        }

        if self.is_leaf {
            true
        } else {
            self.children[self.kv_pairs.len()].collect_prefixed(prefix, out)
        }
    }
}
