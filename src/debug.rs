use core::fmt;
use std::collections::VecDeque;

use crate::{arena::NodeId, bst::BinarySearchTree};

impl<K: fmt::Display, V> BinarySearchTree<K, V> {
    /// Writes the tree in Graphviz `dot` format, one rank per tree level.
    ///
    /// Nodes are labelled `key:balance`; missing children are drawn as points.
    pub fn dotgraph<W: fmt::Write>(&self, name: &str, mut w: W) -> fmt::Result {
        let Some(root) = self.root else {
            return write!(w, "digraph \"graph-{name}\" {{}}");
        };

        enum Item {
            Node(NodeId),
            Missing(u32),
        }

        let mut queue = VecDeque::new();
        queue.push_back(Item::Node(root));

        write!(
            w,
            "digraph \"graph-{name}\" {{\n subgraph \"subgraph-{name}\" {{"
        )?;

        let mut missing = 0;
        let mut links = String::new();

        while !queue.is_empty() {
            use fmt::Write;

            write!(w, "{{rank=same; ")?;

            for _ in 0..queue.len() {
                let id = match queue.pop_front() {
                    Some(Item::Node(id)) => id,
                    Some(Item::Missing(id)) => {
                        write!(w, "\"graph{name}-missing{id}\" [shape=point]; ")?;
                        continue;
                    }
                    None => break,
                };

                let node = &self.nodes[id];
                let key = node.key();
                let balance = node.balance();
                write!(w, "\"graph{name}-{key}\" [label=\"{key}:{balance}\"]; ")?;

                for child in [node.left(), node.right()] {
                    match child {
                        Some(child) => {
                            let child_key = self.nodes[child].key();
                            queue.push_back(Item::Node(child));
                            writeln!(
                                links,
                                "\"graph{name}-{key}\" -> \"graph{name}-{child_key}\";"
                            )?;
                        }
                        None => {
                            queue.push_back(Item::Missing(missing));
                            writeln!(
                                links,
                                "\"graph{name}-{key}\" -> \"graph{name}-missing{missing}\";"
                            )?;
                            missing += 1;
                        }
                    }
                }
            }

            writeln!(w, "}}")?;
        }

        w.write_str(&links)?;

        w.write_str(" }\n}")
    }
}

#[cfg(test)]
mod tests {
    use crate::{AvlTree, BinarySearchTree};

    #[test]
    fn empty_graph() {
        let tree: BinarySearchTree<u32, ()> = BinarySearchTree::new();
        let mut out = String::new();
        tree.dotgraph("empty", &mut out).unwrap();
        assert_eq!(out, "digraph \"graph-empty\" {}");
    }

    #[test]
    fn labels_carry_balance() {
        let mut tree = AvlTree::new();
        tree.insert(2u32, ());
        tree.insert(1u32, ());

        let mut out = String::new();
        tree.as_tree().dotgraph("t", &mut out).unwrap();

        assert!(out.contains("\"grapht-2\" [label=\"2:1\"];"));
        assert!(out.contains("\"grapht-1\" [label=\"1:0\"];"));
        assert!(out.contains("\"grapht-2\" -> \"grapht-1\";"));
        assert!(out.contains("\"grapht-2\" -> \"grapht-missing0\";"));
        assert!(out.ends_with(" }\n}"));
    }
}
