// =====================================================================
// File: index/tree.rs
//
// Description:
//   `BTreeIndex<V>`: the ordered map each record uses for its fields.
//   Field names are the keys, so an in-order walk yields the fields in
//   lexicographic order and prefix scans only touch the matching run.
//
// Features:
//   - `insert` : add or overwrite (last write wins).
//   - `search` : point lookup.
//   - `remove` : delete, reporting whether the key was present.
//   - `entries` / `entries_with_prefix` : ordered traversal.
//
// Notes:
//   * `t` is the minimum degree; a node holds at most `2t - 1` keys.
//   * `len` is maintained on every insert/remove so callers can prune
//     empty records without walking the tree.
// =====================================================================
use super::BTreeNode;

/// Default minimum degree used by records.
pub const DEFAULT_DEGREE: usize = 2;

/// B-tree keyed by `String`, holding payloads of type `V`.
#[derive(Debug, Clone)]
pub struct BTreeIndex<V> {
    pub t: usize,
    pub root: Box<BTreeNode<V>>,
    pub(crate) len: usize,
}

// BTree Referencing:
// https://build-your-own.org/database/
// https://www.geeksforgeeks.org/dsa/introduction-of-b-tree-2/
impl<V: Clone> BTreeIndex<V> {
    /// Create an empty tree. Degrees below 2 are raised to 2.
    pub fn new(t: usize) -> Self {
        Self {
            t: t.max(DEFAULT_DEGREE),
            root: Box::new(BTreeNode::new(true)),
            len: 0,
        }
    }

    /// Number of keys stored.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Look up the payload stored under `key`.
    ///
    /// # Example
    /// ```
    /// use timed_kv::BTreeIndex;
    /// let mut t = BTreeIndex::new(2);
    /// t.insert("dog".into(), "bark".to_string());
    /// assert_eq!(t.search("dog").map(String::as_str), Some("bark"));
    /// assert!(t.search("cat").is_none());
    /// ```
    pub fn search(&self, key: &str) -> Option<&V> {
        let mut node = &*self.root;
        loop {
            let idx = node.lower_bound(key);
            if idx < node.kv_pairs.len() && node.kv_pairs[idx].0 == key {
                return Some(&node.kv_pairs[idx].1);
            }
            if node.is_leaf {
                return None;
            }
            node = &node.children[idx];
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.search(key).is_some()
    }

    /// Insert a pair, overwriting the payload if the key already exists.
    /// Splits the root first when it is full, growing the tree by one level.
    ///
    /// # Example
    /// ```
    /// use timed_kv::BTreeIndex;
    ///
    /// let mut index = BTreeIndex::new(2);
    /// index.insert("dog".into(), 1);
    /// index.insert("cat".into(), 2);
    /// index.insert("dog".into(), 3);
    ///
    /// assert_eq!(index.search("dog"), Some(&3));
    /// assert_eq!(index.len(), 2);
    /// ```
    pub fn insert(&mut self, key: String, value: V) {
        let t = self.t;

        let added = if self.root.kv_pairs.len() == 2 * t - 1 {
            // Hang the old root under a fresh internal root and split it
            let mut new_root = Box::new(BTreeNode::new(false));
            new_root.children.push(std::mem::replace(
                &mut self.root,
                Box::new(BTreeNode::new(true)),
            ));
            Self::split_child(&mut new_root, t, 0);

            let added = if key == new_root.kv_pairs[0].0 {
                new_root.kv_pairs[0].1 = value;
                false
            } else {
                let idx = if key > new_root.kv_pairs[0].0 { 1 } else { 0 };
                Self::insert_internal(&mut new_root.children[idx], t, key, value)
            };
            self.root = new_root;
            added
        } else {
            Self::insert_internal(&mut self.root, t, key, value)
        };

        if added {
            self.len += 1;
        }
    }

    /// Remove `key`, returning `true` if it was present.
    ///
    /// # Example
    /// ```
    /// use timed_kv::index::BTreeIndex;
    /// let mut index = BTreeIndex::new(2);
    /// index.insert("dog".into(), "bark".to_string());
    /// assert!(index.remove("dog"));
    /// assert!(!index.remove("dog"));
    /// assert!(index.is_empty());
    /// ```
    pub fn remove(&mut self, key: &str) -> bool {
        if !self.contains_key(key) {
            return false;
        }
        self.delete(key);
        true
    }

    /// Delete `key` if present, rebalancing on the way down. Missing keys
    /// leave the tree unchanged.
    pub fn delete(&mut self, key: &str) {
        let t = self.t;

        if Self::delete_internal(&mut self.root, t, key) {
            self.len -= 1;
        }

        // An internal root left without keys hands over to its only child
        if !self.root.is_leaf && self.root.kv_pairs.is_empty() {
            self.root = self.root.children.remove(0);
        }
    }

    /// All pairs in ascending key order.
    pub fn entries(&self) -> Vec<(&str, &V)> {
        let mut out = Vec::with_capacity(self.len);
        self.root.collect_entries(&mut out);
        out
    }

    /// Pairs whose key starts with `prefix`, ascending. An empty prefix
    /// matches every key.
    pub fn entries_with_prefix(&self, prefix: &str) -> Vec<(&str, &V)> {
        let mut out = Vec::new();
        self.root.collect_prefixed(prefix, &mut out);
        out
    }

    // =========================
    // Insertion helpers
    // =========================

    /// Insert into the subtree at `node`, which must not be full.
    /// Returns `true` when a new key was added, `false` on overwrite.
    fn insert_internal(node: &mut BTreeNode<V>, t: usize, key: String, value: V) -> bool {
        let mut idx = node.lower_bound(&key);

        // Existing key at this level - last write wins
        if idx < node.kv_pairs.len() && node.kv_pairs[idx].0 == key {
            node.kv_pairs[idx].1 = value;
            return false;
        }

        if node.is_leaf {
            node.kv_pairs.insert(idx, (key, value));
            return true;
        }

        // Never descend into a full child
        if node.children[idx].kv_pairs.len() == 2 * t - 1 {
            Self::split_child(node, t, idx);

            if key > node.kv_pairs[idx].0 {
                idx += 1;
            } else if key == node.kv_pairs[idx].0 {
                node.kv_pairs[idx].1 = value;
                return false;
            }
        }
        Self::insert_internal(&mut node.children[idx], t, key, value)
    }

    /// Split the full child `node.children[i]`: the left half keeps `t - 1`
    /// keys, the right half takes `t - 1`, and the median moves up into
    /// `node` at position `i`.
    fn split_child(node: &mut BTreeNode<V>, t: usize, i: usize) {
        let full_child = &mut node.children[i];
        let mut right = Box::new(BTreeNode::new(full_child.is_leaf));

        right.kv_pairs = full_child.kv_pairs.split_off(t);
        let middle = full_child.kv_pairs.pop().expect("full child must have middle");

        if !full_child.is_leaf {
            right.children = full_child.children.split_off(t);
        }
        node.kv_pairs.insert(i, middle);
        node.children.insert(i + 1, right);
    }

    // =========================
    // Deletion helpers
    // =========================

    /// Recursive delete. Before descending, the target child is topped up
    /// to at least `t` keys so a removal below can never underflow it.
    ///
    /// Returns `true` if the key was found and removed.
    fn delete_internal(node: &mut BTreeNode<V>, t: usize, key: &str) -> bool {
        let idx = node.lower_bound(key);

        if idx < node.kv_pairs.len() && node.kv_pairs[idx].0 == key {
            if node.is_leaf {
                node.kv_pairs.remove(idx);
                return true;
            }

            if node.children[idx].kv_pairs.len() >= t {
                // Swap in the predecessor and delete it from the left subtree
                let pred = Self::max_kvs(&node.children[idx]);
                let pred_key = pred.0.clone();
                node.kv_pairs[idx] = pred;
                return Self::delete_internal(&mut node.children[idx], t, &pred_key);
            }
            if node.children[idx + 1].kv_pairs.len() >= t {
                // Swap in the successor and delete it from the right subtree
                let succ = Self::min_kvs(&node.children[idx + 1]);
                let succ_key = succ.0.clone();
                node.kv_pairs[idx] = succ;
                return Self::delete_internal(&mut node.children[idx + 1], t, &succ_key);
            }

            // Both neighbours are minimal: merge them around the key and recurse
            Self::merge_children(node, idx);
            return Self::delete_internal(&mut node.children[idx], t, key);
        }

        if node.is_leaf {
            return false;
        }

        Self::check_min_kvs(node, t, idx);

        // A merge with the left sibling shifts the target one slot left
        let next_idx = idx.min(node.kv_pairs.len());
        Self::delete_internal(&mut node.children[next_idx], t, key)
    }

    /// Make sure `node.children[idx]` holds at least `t` keys, borrowing from
    /// a sibling when one can spare a key, merging otherwise.
    fn check_min_kvs(node: &mut BTreeNode<V>, t: usize, idx: usize) {
        if node.children[idx].kv_pairs.len() >= t {
            return;
        }

        if idx > 0 && node.children[idx - 1].kv_pairs.len() >= t {
            Self::borrow_from_prev(node, idx);
        } else if idx + 1 < node.children.len() && node.children[idx + 1].kv_pairs.len() >= t {
            Self::borrow_from_next(node, idx);
        } else if idx + 1 < node.children.len() {
            Self::merge_children(node, idx);
        } else {
            Self::merge_children(node, idx - 1);
        }
    }

    /// Rotate right: the parent separator drops into `children[idx]` and the
    /// left sibling's last key replaces it.
    fn borrow_from_prev(node: &mut BTreeNode<V>, idx: usize) {
        let (left_slice, right_slice) = node.children.split_at_mut(idx);
        let left = &mut left_slice[idx - 1];
        let child = &mut right_slice[0];

        let left_last = left.kv_pairs.pop().expect("left sibling has kv_pairs");
        let separator = std::mem::replace(&mut node.kv_pairs[idx - 1], left_last);
        child.kv_pairs.insert(0, separator);

        if !left.is_leaf {
            let moved = left.children.pop().expect("left sibling has a child to move");
            child.children.insert(0, moved);
        }
    }

    /// Rotate left: the parent separator drops into `children[idx]` and the
    /// right sibling's first key replaces it.
    fn borrow_from_next(node: &mut BTreeNode<V>, idx: usize) {
        let (left_slice, right_slice) = node.children.split_at_mut(idx + 1);
        let right = &mut right_slice[0];
        let child = &mut left_slice[idx];

        let right_first = right.kv_pairs.remove(0);
        let separator = std::mem::replace(&mut node.kv_pairs[idx], right_first);
        child.kv_pairs.push(separator);

        if !right.is_leaf {
            let moved = right.children.remove(0);
            child.children.push(moved);
        }
    }

    /// Fold `children[idx + 1]` and the separator between them into
    /// `children[idx]`.
    fn merge_children(node: &mut BTreeNode<V>, idx: usize) {
        let mut right = node.children.remove(idx + 1);
        let separator = node.kv_pairs.remove(idx);
        let left = &mut node.children[idx];

        left.kv_pairs.push(separator);
        left.kv_pairs.append(&mut right.kv_pairs);

        if !left.is_leaf {
            left.children.append(&mut right.children);
        }
    }

    /// Smallest pair of a subtree.
    fn min_kvs(node: &BTreeNode<V>) -> (String, V) {
        let mut current = node;
        while !current.is_leaf {
            current = &current.children[0];
        }
        current.kv_pairs.first().expect("non-empty subtree").clone()
    }

    /// Largest pair of a subtree.
    fn max_kvs(node: &BTreeNode<V>) -> (String, V) {
        let mut current = node;
        while !current.is_leaf {
            current = &current.children[current.children.len() - 1];
        }
        current.kv_pairs.last().expect("non-empty subtree").clone()
    }
}
