use core::{borrow::Borrow, cmp::Ordering};

use crate::{
    arena::{Arena, Dir, Node, NodeId},
    error::{Error, Result},
    iter::Iter,
};

/// An unbalanced binary search tree mapping keys to values.
///
/// This is the base that [`AvlTree`](crate::AvlTree) builds on: it owns node storage, descent,
/// splicing and traversal, and never restructures the tree on its own.
#[derive(Clone, Debug)]
pub struct BinarySearchTree<K, V> {
    pub(crate) nodes: Arena<K, V>,
    pub(crate) root: Option<NodeId>,
}

/// Outcome of an upsert at the base tree level.
pub(crate) enum Inserted<V> {
    /// A new leaf was attached.
    New(NodeId),
    /// The key already existed; its previous value is returned.
    Replaced(V),
}

impl<K, V> BinarySearchTree<K, V> {
    /// Returns a new empty tree.
    pub const fn new() -> Self {
        BinarySearchTree {
            nodes: Arena::new(),
            root: None,
        }
    }

    /// Returns `true` if the tree contains no elements.
    pub fn is_empty(&self) -> bool {
        let empty = self.len() == 0;
        debug_assert_eq!(empty, self.root.is_none());
        empty
    }

    /// Returns the number of elements in the tree.
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the handle of the root node, if any.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Returns the node behind `id`, or `None` if it has been removed.
    pub fn node(&self, id: NodeId) -> Option<&Node<K, V>> {
        self.nodes.get(id)
    }

    /// Returns an in-order iterator over the entries of the tree.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self)
    }

    /// Returns the minimum entry of the tree.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let node = &self.nodes[self.first_node()?];
        Some((node.key(), node.value()))
    }

    /// Returns the maximum entry of the tree.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let node = &self.nodes[self.last_node()?];
        Some((node.key(), node.value()))
    }

    pub(crate) fn first_node(&self) -> Option<NodeId> {
        Some(self.extreme(self.root?, Dir::Left))
    }

    pub(crate) fn last_node(&self) -> Option<NodeId> {
        Some(self.extreme(self.root?, Dir::Right))
    }

    /// Returns the node holding the largest key smaller than the key at `id`.
    pub fn predecessor(&self, id: NodeId) -> Option<NodeId> {
        self.neighbor(id, Dir::Left)
    }

    /// Returns the node holding the smallest key larger than the key at `id`.
    pub fn successor(&self, id: NodeId) -> Option<NodeId> {
        self.neighbor(id, Dir::Right)
    }

    // Descends from `from` in direction `dir` as far as possible.
    fn extreme(&self, from: NodeId, dir: Dir) -> NodeId {
        let mut cur = from;
        while let Some(next) = self.nodes[cur].child(dir) {
            cur = next;
        }
        cur
    }

    // The in-order neighbor on side `dir`: the predecessor for `Left`, the successor for `Right`.
    fn neighbor(&self, id: NodeId, dir: Dir) -> Option<NodeId> {
        if let Some(child) = self.nodes[id].child(dir) {
            return Some(self.extreme(child, !dir));
        }

        // Climb while `cur` hangs off its parent on side `dir`.
        let mut cur = id;
        loop {
            let parent = self.nodes[cur].parent()?;
            if self.nodes[parent].child(dir) != Some(cur) {
                return Some(parent);
            }
            cur = parent;
        }
    }

    /// Returns the number of nodes on the longest root-to-leaf path. An empty tree has height 0.
    pub fn height(&self) -> usize {
        let heights = self.subtree_heights();
        self.root.map(|root| heights[root.index()]).unwrap_or(0)
    }

    /// Returns `true` if the heights of the two subtrees of every node differ by at most one.
    pub fn is_balanced(&self) -> bool {
        let heights = self.subtree_heights();
        let height = |id: Option<NodeId>| id.map(|id| heights[id.index()]).unwrap_or(0);

        self.post_order().into_iter().all(|id| {
            let node = &self.nodes[id];
            height(node.left()).abs_diff(height(node.right())) <= 1
        })
    }

    // Subtree height of every live node, indexed by slot.
    fn subtree_heights(&self) -> Vec<usize> {
        let mut heights = vec![0; self.nodes.capacity()];

        for id in self.post_order() {
            let node = &self.nodes[id];
            let left = node.left().map(|l| heights[l.index()]).unwrap_or(0);
            let right = node.right().map(|r| heights[r.index()]).unwrap_or(0);
            heights[id.index()] = 1 + left.max(right);
        }

        heights
    }

    // Children before parents, left subtree before right. Iterative, so unbalanced chains of any
    // length are fine.
    fn post_order(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.len());
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();

        while let Some(id) = stack.pop() {
            out.push(id);
            let node = &self.nodes[id];
            stack.extend(node.left());
            stack.extend(node.right());
        }

        out.reverse();
        out
    }

    /// Removes every element from the tree.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    #[inline]
    pub(crate) fn which_child(&self, parent: NodeId, child: NodeId) -> Dir {
        if self.nodes[parent].left() == Some(child) {
            Dir::Left
        } else {
            debug_assert_eq!(
                self.nodes[parent].right(),
                Some(child),
                "`child` must be a child of `parent`"
            );
            Dir::Right
        }
    }

    #[inline]
    pub(crate) fn maybe_set_parent(&mut self, opt_node: Option<NodeId>, parent: Option<NodeId>) {
        if let Some(node) = opt_node {
            self.nodes[node].set_parent(parent);
        }
    }

    // Points the link that referenced `old_child` (a child slot of `parent`, or the root) at
    // `new_child`. `new_child`'s parent pointer is not updated.
    pub(crate) fn replace_child_or_set_root(
        &mut self,
        parent: Option<NodeId>,
        old_child: NodeId,
        new_child: Option<NodeId>,
    ) {
        match parent {
            Some(parent) => {
                let dir = self.which_child(parent, old_child);
                self.nodes[parent].set_child(dir, new_child);
            }
            None => self.root = new_child,
        }
    }

    /// Removes the node at `id` and returns its entry.
    ///
    /// A node with two children first trades contents (key, value and balance factor) with its
    /// in-order predecessor, and the predecessor's node is spliced out instead. The parent of the
    /// spliced node is returned alongside the entry.
    pub(crate) fn remove_at(&mut self, id: NodeId) -> ((K, V), Option<NodeId>) {
        let mut target = id;

        if let (Some(left), Some(_)) = (self.nodes[id].left(), self.nodes[id].right()) {
            let predecessor = self.extreme(left, Dir::Right);
            self.nodes.swap_contents(id, predecessor);
            target = predecessor;
        }

        let node = &self.nodes[target];
        let parent = node.parent();
        let child = node.left().or(node.right());

        self.replace_child_or_set_root(parent, target, child);
        self.maybe_set_parent(child, parent);

        tracing::trace!(node = ?target, ?parent, ?child, "spliced node");

        (self.nodes.free(target).into_entry(), parent)
    }
}

impl<K: Ord, V> BinarySearchTree<K, V> {
    /// Returns the handle of the node holding `key`.
    pub fn find_node<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut opt_cur = self.root;

        loop {
            let cur = opt_cur?;
            let node = &self.nodes[cur];

            match key.cmp(node.key().borrow()) {
                Ordering::Less => opt_cur = node.left(),
                Ordering::Equal => return Some(cur),
                Ordering::Greater => opt_cur = node.right(),
            }
        }
    }

    /// Returns `true` if the tree contains `key`.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_node(key).is_some()
    }

    /// Returns a reference to the value associated with `key`.
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_node(key).map(|id| self.nodes[id].value())
    }

    /// Returns a mutable reference to the value associated with `key`.
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.find_node(key)?;
        Some(self.nodes[id].value_mut())
    }

    /// Returns a reference to the value associated with `key`, or [`Error::KeyNotFound`].
    pub fn try_get<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Inserts `key` and `value` without rebalancing.
    ///
    /// If `key` is already present its value is overwritten in place and the old value is
    /// returned.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.insert_node(key, value) {
            Inserted::New(_) => None,
            Inserted::Replaced(old) => Some(old),
        }
    }

    pub(crate) fn insert_node(&mut self, key: K, value: V) -> Inserted<V> {
        let Some(mut cur) = self.root else {
            // Tree is empty. The new node becomes the root.
            let id = self.nodes.alloc(Node::new(key, value, None));
            self.root = Some(id);
            return Inserted::New(id);
        };

        // Descend the tree, looking for a free child slot.
        loop {
            let dir = match key.cmp(self.nodes[cur].key()) {
                Ordering::Less => Dir::Left,
                Ordering::Equal => return Inserted::Replaced(self.nodes[cur].set_value(value)),
                Ordering::Greater => Dir::Right,
            };

            match self.nodes[cur].child(dir) {
                Some(child) => cur = child,
                None => {
                    let id = self.nodes.alloc(Node::new(key, value, Some(cur)));
                    self.nodes[cur].set_child(dir, Some(id));
                    tracing::trace!(node = ?id, parent = ?cur, ?dir, "attached leaf");
                    return Inserted::New(id);
                }
            }
        }
    }

    /// Removes `key` from the tree without rebalancing, returning its value if it was present.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.find_node(key)?;
        let ((_, value), _) = self.remove_at(id);
        Some(value)
    }
}

impl<K, V> Default for BinarySearchTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, K, V> IntoIterator for &'a BinarySearchTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
