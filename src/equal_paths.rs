//! Checks whether every leaf of a binary tree sits at the same depth.
//!
//! This works on its own minimal node type, which carries only child links.

use arbitrary::Arbitrary;

/// A node of a plain binary tree, owning its children.
#[derive(Clone, Debug, Default, PartialEq, Eq, Arbitrary)]
pub struct Node {
    pub left: Option<Box<Node>>,
    pub right: Option<Box<Node>>,
}

impl Node {
    /// Returns a node without children.
    pub fn leaf() -> Self {
        Node::default()
    }

    pub fn new(left: Option<Node>, right: Option<Node>) -> Self {
        Node {
            left: left.map(Box::new),
            right: right.map(Box::new),
        }
    }

    /// Returns a node whose only child is `left`.
    pub fn with_left(left: Node) -> Self {
        Node::new(Some(left), None)
    }

    /// Returns a node whose only child is `right`.
    pub fn with_right(right: Node) -> Self {
        Node::new(None, Some(right))
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

impl Drop for Node {
    // Unlinks descendants onto a heap stack so that dropping a long chain does not recurse.
    fn drop(&mut self) {
        let mut stack: Vec<Box<Node>> = Vec::new();
        stack.extend(self.left.take());
        stack.extend(self.right.take());

        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}

/// Returns `true` if every leaf of the tree rooted at `root` is at the same depth.
///
/// An empty tree and a single node both qualify. A node with exactly one child is judged by that
/// child's subtree alone; a node with two children additionally needs both subtrees to reach the
/// same maximum depth.
///
/// ```
/// use avl_bst::equal_paths::{equal_paths, Node};
///
/// let balanced = Node::new(Some(Node::leaf()), Some(Node::leaf()));
/// assert!(equal_paths(Some(&balanced)));
///
/// let lopsided = Node::new(Some(Node::leaf()), Some(Node::with_left(Node::leaf())));
/// assert!(!equal_paths(Some(&lopsided)));
/// ```
pub fn equal_paths(root: Option<&Node>) -> bool {
    let Some(root) = root else {
        return true;
    };

    enum Visit<'a> {
        Enter(&'a Node),
        Exit(&'a Node),
    }

    // Maximum depth of each finished subtree, in visiting order.
    let mut depths: Vec<usize> = Vec::new();
    let mut stack = vec![Visit::Enter(root)];

    while let Some(visit) = stack.pop() {
        match visit {
            Visit::Enter(node) => {
                stack.push(Visit::Exit(node));
                // Pushed right first so the left subtree finishes first.
                if let Some(right) = node.right.as_deref() {
                    stack.push(Visit::Enter(right));
                }
                if let Some(left) = node.left.as_deref() {
                    stack.push(Visit::Enter(left));
                }
            }

            Visit::Exit(node) => {
                let depth = match (node.left.is_some(), node.right.is_some()) {
                    (false, false) => 1,
                    (true, false) | (false, true) => 1 + depths.pop().unwrap_or_default(),
                    (true, true) => {
                        let right = depths.pop().unwrap_or_default();
                        let left = depths.pop().unwrap_or_default();
                        if left != right {
                            return false;
                        }
                        1 + left
                    }
                };
                depths.push(depth);
            }
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::model;

    fn leaf() -> Option<Node> {
        Some(Node::leaf())
    }

    fn perfect(depth: usize) -> Node {
        match depth {
            0 | 1 => Node::leaf(),
            _ => Node::new(Some(perfect(depth - 1)), Some(perfect(depth - 1))),
        }
    }

    #[test]
    fn empty_tree() {
        assert!(equal_paths(None));
    }

    #[test]
    fn single_node() {
        assert!(equal_paths(Some(&Node::leaf())));
    }

    #[test]
    fn left_leaf_only() {
        assert!(equal_paths(Some(&Node::with_left(Node::leaf()))));
    }

    #[test]
    fn right_leaf_only() {
        assert!(equal_paths(Some(&Node::with_right(Node::leaf()))));
    }

    #[test]
    fn leaf_against_full_subtree() {
        //   r
        //  / \
        // a   b
        //    / \
        //   c   d
        let root = Node::new(leaf(), Some(Node::new(leaf(), leaf())));
        assert!(!equal_paths(Some(&root)));
    }

    #[test]
    fn perfect_tree_of_depth_three() {
        let root = perfect(3);
        assert!(equal_paths(Some(&root)));
    }

    #[test]
    fn one_child_delegates_to_its_subtree() {
        // A bare chain: every node has exactly one child, so there is a single leaf.
        let chain = Node::with_right(Node::with_left(Node::with_right(Node::leaf())));
        assert!(equal_paths(Some(&chain)));

        // The missing side of `r` does not count as a path of depth 1.
        //     r
        //    /
        //   a
        //  / \
        // b   c
        let root = Node::with_left(Node::new(leaf(), leaf()));
        assert!(equal_paths(Some(&root)));

        // Chains of equal length on both sides.
        //     r
        //    / \
        //   a   b
        //  /     \
        // c       d
        let root = Node::new(
            Some(Node::with_left(Node::leaf())),
            Some(Node::with_right(Node::leaf())),
        );
        assert!(equal_paths(Some(&root)));
    }

    #[test]
    fn chain_against_leaf_sibling() {
        // The chain's leaf is one level deeper than its sibling leaf.
        //     r
        //    / \
        //   a   b
        //  /
        // c
        let root = Node::new(Some(Node::with_left(Node::leaf())), leaf());
        assert!(!equal_paths(Some(&root)));
    }

    #[test]
    fn mismatch_deep_inside_subtree() {
        // Both subtrees of the root reach depth 3, but the left one is uneven.
        let left = Node::new(leaf(), Some(Node::new(leaf(), leaf())));
        let root = Node::new(Some(left), Some(perfect(3)));
        assert!(!equal_paths(Some(&root)));
    }

    #[test]
    fn very_long_chain() {
        let mut node = Node::leaf();
        for i in 0..200_000 {
            node = if i % 2 == 0 {
                Node::with_left(node)
            } else {
                Node::with_right(node)
            };
        }

        assert!(equal_paths(Some(&node)));
        drop(node);
    }

    fn tree_strategy() -> impl Strategy<Value = Node> {
        Just(Node::leaf()).prop_recursive(6, 64, 2, |inner| {
            (proptest::option::of(inner.clone()), proptest::option::of(inner))
                .prop_map(|(left, right)| Node::new(left, right))
        })
    }

    proptest::proptest! {
        #[test]
        fn matches_leaf_depth_definition(root in tree_strategy()) {
            prop_assert_eq!(equal_paths(Some(&root)), model::leaves_at_equal_depth(Some(&root)));
        }
    }
}
