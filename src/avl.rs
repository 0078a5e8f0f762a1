//! The AVL layer on top of [`BinarySearchTree`].
//!
//! After every structural change the balance factor of each node is recomputed from subtree
//! heights, and the tree is scanned for a node whose factor has reached ±2. The first such node
//! found (left subtree, then right subtree, then the node itself) is fixed with a single or double
//! rotation, after which balances are recomputed and the scan repeats until no node is out of
//! balance.

use core::borrow::Borrow;

use crate::{
    arena::{Dir, Node, NodeId},
    bst::{BinarySearchTree, Inserted},
    error::Result,
    iter::Iter,
};

/// An ordered map based on an [AVL tree].
///
/// [AVL tree]: https://en.wikipedia.org/wiki/AVL_tree
#[derive(Clone, Debug)]
pub struct AvlTree<K, V> {
    tree: BinarySearchTree<K, V>,
}

impl<K, V> AvlTree<K, V> {
    /// Returns a new empty tree.
    pub const fn new() -> Self {
        AvlTree {
            tree: BinarySearchTree::new(),
        }
    }

    /// Returns `true` if the tree contains no elements.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the number of elements in the tree.
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns the number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        self.tree.height()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.tree.root()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node<K, V>> {
        self.tree.node(id)
    }

    /// Returns the underlying binary search tree.
    pub fn as_tree(&self) -> &BinarySearchTree<K, V> {
        &self.tree
    }

    /// Returns an in-order iterator over the entries of the tree.
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.tree.iter()
    }

    /// Returns the first key-value pair in the tree.
    ///
    /// The returned key is the minimum key in the tree.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.tree.first_key_value()
    }

    /// Returns the last key-value pair in the tree.
    ///
    /// The returned key is the maximum key in the tree.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.tree.last_key_value()
    }

    /// Removes and returns the first key-value pair in the tree.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let id = self.tree.first_node()?;
        Some(self.remove_at(id))
    }

    /// Removes and returns the last key-value pair in the tree.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let id = self.tree.last_node()?;
        Some(self.remove_at(id))
    }

    /// Clears the tree, removing all elements.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    fn remove_at(&mut self, id: NodeId) -> (K, V) {
        let (entry, parent) = self.tree.remove_at(id);
        tracing::trace!(node = ?id, ?parent, len = self.len(), "removed");

        if !self.tree.is_empty() {
            self.rebalance();
        }

        entry
    }

    /// Restores the balance invariant after a single insertion or removal.
    fn rebalance(&mut self) {
        let mut rotations = 0;

        self.update_balances(self.tree.root);

        while let Some(target) = self.find_unbalanced(self.tree.root) {
            rotations += self.fix(target);
            self.update_balances(self.tree.root);
        }

        tracing::debug!(rotations, len = self.len(), "rebalanced");
    }

    // Stores `height(left) - height(right)` in every node of the subtree and returns its height.
    fn update_balances(&mut self, node: Option<NodeId>) -> usize {
        let Some(node) = node else {
            return 0;
        };

        let left = self.update_balances(self.tree.nodes[node].left());
        let right = self.update_balances(self.tree.nodes[node].right());

        // A single insertion or removal moves a height difference by at most one, so a tree that
        // was balanced beforehand stays within ±2 until it is fixed.
        debug_assert!(left.abs_diff(right) <= 2, "balance factor out of range");
        let balance = if left >= right {
            (left - right) as i8
        } else {
            -((right - left) as i8)
        };
        self.tree.nodes[node].set_balance(balance);

        1 + left.max(right)
    }

    // Post-order search for a node with |balance| >= 2.
    fn find_unbalanced(&self, node: Option<NodeId>) -> Option<NodeId> {
        let node = node?;
        let n = &self.tree.nodes[node];

        self.find_unbalanced(n.left())
            .or_else(|| self.find_unbalanced(n.right()))
            .or_else(|| (n.balance().abs() >= 2).then_some(node))
    }

    // Applies the single or double rotation matching the imbalance at `target`. Returns the number
    // of rotations performed.
    fn fix(&mut self, target: NodeId) -> usize {
        let balance = self.tree.nodes[target].balance();
        let heavy = if balance > 0 { Dir::Left } else { Dir::Right };

        let Some(child) = self.tree.nodes[target].child(heavy) else {
            unreachable!("a node with balance {balance} has a child on its heavy side");
        };
        let child_balance = self.tree.nodes[child].balance();

        tracing::trace!(node = ?target, balance, ?child, child_balance, "fixing imbalance");

        match heavy {
            // Left-left.
            Dir::Left if child_balance >= 0 => {
                self.rotate_right(target);
                1
            }
            // Left-right.
            Dir::Left => {
                self.rotate_left(child);
                self.rotate_right(target);
                2
            }
            // Right-right.
            Dir::Right if child_balance <= 0 => {
                self.rotate_left(target);
                1
            }
            // Right-left.
            Dir::Right => {
                self.rotate_right(child);
                self.rotate_left(target);
                2
            }
        }
    }

    /// Rotates left at `target`: its right child takes its place, `target` becomes that node's
    /// left child, and the promoted node's former left subtree becomes `target`'s right subtree.
    ///
    /// Balance factors are not updated. Panics if `target` has no right child.
    fn rotate_left(&mut self, target: NodeId) -> NodeId {
        self.rotate(target, Dir::Left)
    }

    /// Mirror image of [`rotate_left`](Self::rotate_left).
    fn rotate_right(&mut self, target: NodeId) -> NodeId {
        self.rotate(target, Dir::Right)
    }

    // Moves `down` one level down in direction `dir`, promoting its `!dir` child `up` into its
    // place. Returns `up`.
    fn rotate(&mut self, down: NodeId, dir: Dir) -> NodeId {
        let tree = &mut self.tree;

        let Some(up) = tree.nodes[down].child(!dir) else {
            panic!("rotation at {down:?} towards {dir:?} without a {:?} child", !dir);
        };

        // `across` goes from the `dir` child of `up` to the `!dir` child of `down`.
        let across = tree.nodes[up].child(dir);
        tree.nodes[down].set_child(!dir, across);
        tree.maybe_set_parent(across, Some(down));

        tree.nodes[up].set_child(dir, Some(down));
        let parent = tree.nodes[down].set_parent(Some(up));
        tree.nodes[up].set_parent(parent);
        tree.replace_child_or_set_root(parent, down, Some(up));

        tracing::trace!(?down, ?up, ?dir, "rotated");

        up
    }

    #[doc(hidden)]
    pub fn assert_invariants(&self)
    where
        K: Ord,
    {
        let Some(root) = self.tree.root else {
            assert_eq!(self.len(), 0);
            return;
        };

        assert_eq!(self.tree.nodes[root].parent(), None, "root has a parent");

        let mut count = 0;
        let height = self.assert_invariants_at(root, None, None, &mut count);
        assert_eq!(count, self.len(), "node count does not match length");

        let bound = (1.44 * ((self.len() + 2) as f64).log2()).ceil() as usize;
        assert!(height <= bound, "height {height} exceeds AVL bound {bound}");
    }

    // Returns the height of the subtree rooted at `node`.
    fn assert_invariants_at(
        &self,
        node: NodeId,
        lower: Option<&K>,
        upper: Option<&K>,
        count: &mut usize,
    ) -> usize
    where
        K: Ord,
    {
        let n = &self.tree.nodes[node];
        *count += 1;

        // Ensure keys respect the bounds inherited from ancestors.
        if let Some(lower) = lower {
            assert!(n.key() > lower, "BST order violated");
        }
        if let Some(upper) = upper {
            assert!(n.key() < upper, "BST order violated");
        }

        let mut heights = [0; 2];
        for dir in [Dir::Left, Dir::Right] {
            if let Some(child) = n.child(dir) {
                // Ensure child's parent link points to this node.
                assert_eq!(
                    self.tree.nodes[child].parent(),
                    Some(node),
                    "child's parent pointer not set"
                );

                let (lower, upper) = match dir {
                    Dir::Left => (lower, Some(n.key())),
                    Dir::Right => (Some(n.key()), upper),
                };
                heights[dir as usize] = self.assert_invariants_at(child, lower, upper, count);
            }
        }

        let [left, right] = heights;
        let expected = left as isize - right as isize;
        assert_eq!(n.balance() as isize, expected, "stale balance factor");
        assert!(expected.abs() <= 1, "node out of balance");

        1 + left.max(right)
    }
}

impl<K: Ord, V> AvlTree<K, V> {
    /// Returns `true` if the tree contains `key`.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.contains_key(key)
    }

    /// Returns a reference to the value associated with `key`.
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.get(key)
    }

    /// Returns a mutable reference to the value associated with `key`.
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.get_mut(key)
    }

    /// Returns a reference to the value associated with `key`, or
    /// [`Error::KeyNotFound`](crate::Error::KeyNotFound).
    #[inline]
    pub fn try_get<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.try_get(key)
    }

    /// Inserts a key-value pair into the tree.
    ///
    /// If the key is already present, its value is replaced and the old value returned; the shape
    /// of the tree does not change.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.tree.insert_node(key, value) {
            Inserted::Replaced(old) => Some(old),
            Inserted::New(id) => {
                tracing::trace!(node = ?id, len = self.len(), "inserted");
                self.rebalance();
                None
            }
        }
    }

    /// Removes `key` from the tree, returning its value if it was present.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.tree.find_node(key)?;
        let (_, value) = self.remove_at(id);
        Some(value)
    }
}

impl<K, V> Default for AvlTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, K, V> IntoIterator for &'a AvlTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for AvlTree<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = AvlTree::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord, V> Extend<(K, V)> for AvlTree<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}
