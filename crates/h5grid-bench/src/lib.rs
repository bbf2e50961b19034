//! Benchmark hierarchies for h5grid.
//!
//! - [`wide_tree`]: `fanout^depth` leaf groups, one dataset per leaf
//! - [`looped_chain`]: a deep chain whose every level links back to the root
//! - [`reference_grid`]: the five reference datasets at grid size `n`

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use h5grid_test_utils::fixtures::write_reference_datasets;
use h5grid_test_utils::{ContainerBuilder, MemoryContainer, NodeAddr};

/// Balanced tree of groups with one `i32` dataset in every leaf.
///
/// Returns the container and its dataset count.
pub fn wide_tree(fanout: usize, depth: usize) -> (MemoryContainer, usize) {
    let mut b = ContainerBuilder::new();
    let mut level = vec![b.root()];
    for d in 0..depth {
        let mut next = Vec::with_capacity(level.len() * fanout);
        for &g in &level {
            for k in 0..fanout {
                next.push(b.group(g, &format!("g{d}_{k}")));
            }
        }
        level = next;
    }
    for (i, &leaf) in level.iter().enumerate() {
        b.dataset_i32(leaf, &format!("d{i}"), [1], vec![i as i32]);
    }
    let datasets = level.len();
    (b.finish(), datasets)
}

/// Chain of `depth` nested groups, each holding a hard link to the root
/// and a soft link to its parent.
pub fn looped_chain(depth: usize) -> MemoryContainer {
    let mut b = ContainerBuilder::new();
    let root = b.root();
    let mut g: NodeAddr = root;
    let mut path = String::new();
    for i in 0..depth {
        let parent_path = if path.is_empty() { "/".to_string() } else { path.clone() };
        g = b.group(g, &format!("level{i}"));
        path = format!("{path}/level{i}");
        b.hard_link(g, "root", root);
        b.soft_link(g, "up", &parent_path);
    }
    b.finish()
}

/// Flat container with the five reference datasets for an `n x n` grid.
pub fn reference_grid(n: usize) -> MemoryContainer {
    let mut b = ContainerBuilder::new();
    let root = b.root();
    write_reference_datasets(&mut b, root, n);
    b.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use h5grid_core::Container;

    #[test]
    fn wide_tree_counts_leaves() {
        let (c, datasets) = wide_tree(3, 2);
        assert_eq!(datasets, 9);
        assert_eq!(c.group_addrs().len(), 1 + 3 + 9);
    }

    #[test]
    fn looped_chain_links_resolve_to_ancestors() {
        let c = looped_chain(3);
        let root = c.root().unwrap();
        let level0 = c.object_info(&root, "level0").unwrap().addr;
        let level1 = c.object_info(&level0, "level1").unwrap().addr;
        assert_eq!(c.object_info(&level1, "root").unwrap().addr, root);
        assert_eq!(c.object_info(&level1, "up").unwrap().addr, level0);
    }
}
