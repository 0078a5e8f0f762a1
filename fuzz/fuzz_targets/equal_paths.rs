#![no_main]

use avl_bst::{equal_paths::Node, model::run_equal_paths_equivalence};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|root: Option<Node>| { run_equal_paths_equivalence(root.as_ref()) });
