//! An arena-backed AVL tree, plus a leaf-depth check for plain binary trees.
//!
//! [`AvlTree`] is an ordered map layered over [`BinarySearchTree`], which owns node storage and the
//! plain BST mechanics (descent, splicing, traversal). Nodes live in an arena and refer to each
//! other through [`NodeId`] handles, so the tree contains no raw pointers.
//!
//! ```
//! use avl_bst::AvlTree;
//!
//! let mut tree = AvlTree::new();
//! for key in 0..100 {
//!     tree.insert(key, key * 2);
//! }
//!
//! assert_eq!(tree.get(&21), Some(&42));
//! assert!(tree.height() <= 9);
//!
//! assert_eq!(tree.remove(&21), Some(42));
//! assert!(tree.try_get(&21).is_err());
//! ```
//!
//! Balance factors follow the usual convention: `height(left) - height(right)`.

mod arena;
mod avl;
mod bst;
mod debug;
pub mod equal_paths;
mod error;
mod iter;

#[cfg(any(test, feature = "model"))]
pub mod model;

#[cfg(test)]
mod tests;

pub use crate::{
    arena::{Node, NodeId},
    avl::AvlTree,
    bst::BinarySearchTree,
    equal_paths::equal_paths,
    error::{Error, Result},
    iter::Iter,
};
