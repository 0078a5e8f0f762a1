use avl_bst::{
    equal_paths::{equal_paths, Node},
    AvlTree,
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut tree: AvlTree<u32, char> = AvlTree::new();

    for (key, value) in [(2, 'c'), (0, 'a'), (3, 'd'), (4, 'e'), (5, 'f'), (1, 'b'), (6, 'g')] {
        tree.insert(key, value);
        tree.assert_invariants();
        println!("{:?}", tree.iter().map(|(k, _)| *k).collect::<Vec<_>>());
    }

    let mut graph = String::new();
    tree.as_tree()
        .dotgraph("demo", &mut graph)
        .expect("writing to a String cannot fail");
    println!("{graph}");

    let zero = tree.pop_first().map(|(k, _)| k);
    assert_eq!(zero, Some(0));
    tree.assert_invariants();

    match tree.try_get(&0) {
        Ok(value) => println!("0 => {value}"),
        Err(err) => println!("0: {err}"),
    }

    let shape = Node::new(
        Some(Node::with_left(Node::leaf())),
        Some(Node::with_right(Node::leaf())),
    );
    println!("equal paths: {}", equal_paths(Some(&shape)));
}
