//! Model-based checking against [`BTreeMap`], shared by the test suite and the fuzz targets.

use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use proptest::strategy::{Just, Strategy};

use crate::{equal_paths, AvlTree};

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum ItemValue {
    Index(usize),
    Random(u32),
}

proptest::prop_compose! {
    fn index_strategy()(
        index in 0usize..1000,
    ) -> ItemValue {
        ItemValue::Index(index)
    }
}

proptest::prop_compose! {
    fn random_strategy()(
        random in 0u32..1000,
    ) -> ItemValue {
        ItemValue::Random(random)
    }
}

fn item_strategy() -> impl Strategy<Value = ItemValue> {
    proptest::prop_oneof![index_strategy(), random_strategy()]
}

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum Op {
    Insert(ItemValue, u32),
    Get(ItemValue),
    Remove(ItemValue),
    First,
    PopFirst,
    Last,
    PopLast,
}

impl Op {
    // `Index` items address keys already in the map, so removals and lookups mostly hit.
    fn finalize(self, keys: &[u32]) -> FinalOp {
        fn get_key(keys: &[u32], item: ItemValue) -> u32 {
            match item {
                ItemValue::Index(idx) => {
                    if keys.is_empty() {
                        idx as u32
                    } else {
                        keys[idx % keys.len()]
                    }
                }
                ItemValue::Random(key) => key,
            }
        }

        match self {
            Op::Insert(item, value) => FinalOp::Insert(get_key(keys, item), value),
            Op::Get(item) => FinalOp::Get(get_key(keys, item)),
            Op::Remove(item) => FinalOp::Remove(get_key(keys, item)),
            Op::First => FinalOp::First,
            Op::PopFirst => FinalOp::PopFirst,
            Op::Last => FinalOp::Last,
            Op::PopLast => FinalOp::PopLast,
        }
    }
}

#[derive(Copy, Clone, Debug)]
enum FinalOp {
    Insert(u32, u32),
    Get(u32),
    Remove(u32),
    First,
    PopFirst,
    Last,
    PopLast,
}

pub fn op_strategy() -> impl Strategy<Value = Op> {
    proptest::prop_oneof![
        (item_strategy(), proptest::num::u32::ANY).prop_map(|(item, value)| Op::Insert(item, value)),
        item_strategy().prop_map(Op::Get),
        item_strategy().prop_map(Op::Remove),
        Just(Op::First),
        Just(Op::PopFirst),
        Just(Op::Last),
        Just(Op::PopLast),
    ]
}

/// Applies `ops` to both an [`AvlTree`] and a [`BTreeMap`], asserting that every operation
/// returns the same result and that the tree stays a valid AVL tree throughout.
pub fn run_btree_equivalence(ops: Vec<Op>) {
    let mut btree = BTreeMap::new();
    let mut avl: AvlTree<u32, u32> = AvlTree::new();

    for (op_id, op) in ops.into_iter().enumerate() {
        let keys: Vec<u32> = btree.keys().copied().collect();
        let final_op = op.finalize(&keys);

        match final_op {
            FinalOp::Insert(key, value) => {
                let from_btree = btree.insert(key, value);
                let from_avl = avl.insert(key, value);

                assert_eq!(from_btree, from_avl, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Get(key) => {
                let from_btree = btree.get(&key);
                let from_avl = avl.get(&key);

                assert_eq!(from_btree, from_avl, "FinalOp #{op_id}: {final_op:?}");
                assert_eq!(
                    from_btree.is_some(),
                    avl.try_get(&key).is_ok(),
                    "FinalOp #{op_id}: {final_op:?}"
                );
            }

            FinalOp::Remove(key) => {
                let from_btree = btree.remove(&key);
                let from_avl = avl.remove(&key);

                assert_eq!(from_btree, from_avl, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::First => {
                let from_btree = btree.first_key_value();
                let from_avl = avl.first_key_value();

                assert_eq!(from_btree, from_avl, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::PopFirst => {
                let from_btree = btree.pop_first();
                let from_avl = avl.pop_first();

                assert_eq!(from_btree, from_avl, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Last => {
                let from_btree = btree.last_key_value();
                let from_avl = avl.last_key_value();

                assert_eq!(from_btree, from_avl, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::PopLast => {
                let from_btree = btree.pop_last();
                let from_avl = avl.pop_last();

                assert_eq!(from_btree, from_avl, "FinalOp #{op_id}: {final_op:?}");
            }
        }

        avl.assert_invariants();
        assert_eq!(btree.len(), avl.len());
        assert!(btree.iter().eq(avl.iter()));
    }
}

/// Reference definition for [`equal_paths`]: collects the depth of every leaf and compares them.
pub fn leaves_at_equal_depth(root: Option<&equal_paths::Node>) -> bool {
    let mut depths = Vec::new();
    let mut stack: Vec<(&equal_paths::Node, usize)> = root.map(|r| (r, 0)).into_iter().collect();

    while let Some((node, depth)) = stack.pop() {
        if node.is_leaf() {
            depths.push(depth);
        }
        for child in [node.left.as_deref(), node.right.as_deref()].into_iter().flatten() {
            stack.push((child, depth + 1));
        }
    }

    depths.windows(2).all(|w| w[0] == w[1])
}

pub fn run_equal_paths_equivalence(root: Option<&equal_paths::Node>) {
    assert_eq!(
        equal_paths::equal_paths(root),
        leaves_at_equal_depth(root),
        "tree: {root:?}"
    );
}
