use core::iter::FusedIterator;

use crate::{
    arena::{Dir, NodeId},
    bst::BinarySearchTree,
};

enum CameFrom {
    Parent,
    LeftChild,
    Here,
    RightChild,
}

/// An in-order iterator over the entries of a tree.
pub struct Iter<'tree, K, V> {
    tree: &'tree BinarySearchTree<K, V>,

    front_cur: Option<NodeId>,
    front_from: CameFrom,

    len: usize,
}

impl<'tree, K, V> Iter<'tree, K, V> {
    pub(crate) fn new(tree: &'tree BinarySearchTree<K, V>) -> Self {
        Iter {
            tree,

            front_cur: tree.root,
            front_from: CameFrom::Parent,
            len: tree.len(),
        }
    }
}

impl<'tree, K, V> Iterator for Iter<'tree, K, V> {
    type Item = (&'tree K, &'tree V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }

        let tree: &'tree BinarySearchTree<K, V> = self.tree;
        let nodes = &tree.nodes;
        let mut cur = self.front_cur?;

        loop {
            match self.front_from {
                CameFrom::Parent => {
                    // Upon entering a new subtree, find the minimum element.
                    while let Some(left) = nodes[cur].left() {
                        cur = left;
                    }

                    // Once the minimum is found, its (empty) left subtree has been exhausted.
                    self.front_from = CameFrom::LeftChild;
                }

                CameFrom::LeftChild => {
                    // The left subtree has been exhausted, so this node is up next.
                    self.front_cur = Some(cur);
                    self.front_from = CameFrom::Here;
                    self.len -= 1;

                    let node = &nodes[cur];
                    return Some((node.key(), node.value()));
                }

                CameFrom::Here => {
                    // The current node was just yielded.
                    if let Some(right) = nodes[cur].right() {
                        self.front_from = CameFrom::Parent;
                        cur = right;
                    } else {
                        // Otherwise, ascend one level. `len` is nonzero, so a later element
                        // exists and the root cannot have been reached from the right.
                        let parent = nodes[cur].parent()?;
                        self.front_from = match tree.which_child(parent, cur) {
                            Dir::Left => CameFrom::LeftChild,
                            Dir::Right => CameFrom::RightChild,
                        };
                        cur = parent;
                    }
                }

                CameFrom::RightChild => {
                    // Ascend until we find the successor element.
                    while let Some(parent) = nodes[cur].parent() {
                        match tree.which_child(parent, cur) {
                            Dir::Left => break,
                            Dir::Right => cur = parent,
                        }
                    }

                    cur = nodes[cur].parent()?;
                    self.front_cur = Some(cur);
                    self.front_from = CameFrom::LeftChild;
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

#[cfg(test)]
mod tests {
    use crate::BinarySearchTree;

    #[test]
    fn yields_in_order_for_every_shape() {
        let cases: [&[u32]; 7] = [
            &[],
            &[1],
            &[1, 2, 3, 4, 5],
            &[5, 4, 3, 2, 1],
            &[3, 1, 5, 2, 4],
            &[4, 2, 6, 1, 3, 5, 7],
            &[1, 7, 2, 6, 3, 5, 4],
        ];

        for keys in cases {
            let mut tree = BinarySearchTree::new();
            for &k in keys {
                tree.insert(k, ());
            }

            let mut expected = keys.to_vec();
            expected.sort_unstable();

            let iter = tree.iter();
            assert_eq!(iter.len(), keys.len());
            assert_eq!(iter.map(|(&k, _)| k).collect::<Vec<_>>(), expected);
        }
    }

    #[test]
    fn fused_after_exhaustion() {
        let mut tree = BinarySearchTree::new();
        tree.insert(1, "one");

        let mut iter = tree.iter();
        assert_eq!(iter.next(), Some((&1, &"one")));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }
}
