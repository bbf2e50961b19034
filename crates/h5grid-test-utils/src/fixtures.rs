//! Reference containers.
//!
//! - [`square_grid`]: flat root holding the five reference datasets.
//! - [`nested_square_grid`]: the same datasets two groups down, with a
//!   soft link looping back to an ancestor.

use crate::memory::{ContainerBuilder, MemoryContainer, NodeAddr};

/// Names of the five reference datasets, in the order they are written.
pub const REFERENCE_NAMES: [&str; 5] = ["dim", "domain_box", "interior_box", "mask", "xy"];

/// Write the five reference datasets for an `n x n` grid into `group`.
///
/// - `dim` = `[[2]]`
/// - `domain_box` = identity pattern
/// - `interior_box` = all ones
/// - `mask` = all zeros
/// - `xy` = `n x n x 2`, cell `(i, j)` holds `(i, j)`
pub fn write_reference_datasets(b: &mut ContainerBuilder, group: NodeAddr, n: usize) {
    b.dataset_i32(group, "dim", [1, 1], vec![2]);
    let identity: Vec<i32> = (0..n * n)
        .map(|k| i32::from(k / n == k % n))
        .collect();
    b.dataset_i32(group, "domain_box", [n, n], identity);
    b.dataset_i32(group, "interior_box", [n, n], vec![1; n * n]);
    b.dataset_i32(group, "mask", [n, n], vec![0; n * n]);
    let mut xy = Vec::with_capacity(n * n * 2);
    for i in 0..n {
        for j in 0..n {
            xy.push(i as f32);
            xy.push(j as f32);
        }
    }
    b.dataset_f32(group, "xy", [n, n, 2], xy);
}

/// Flat container: the root holds the five reference datasets.
pub fn square_grid(n: usize) -> MemoryContainer {
    let mut b = ContainerBuilder::new();
    let root = b.root();
    write_reference_datasets(&mut b, root, n);
    b.finish()
}

/// `/simulation/grid/{dim, domain_box, interior_box, mask, xy}` plus
/// `/simulation/grid/parent` soft-linked back to `/simulation`.
pub fn nested_square_grid(n: usize) -> MemoryContainer {
    let mut b = ContainerBuilder::new();
    let root = b.root();
    let sim = b.group(root, "simulation");
    let grid = b.group(sim, "grid");
    write_reference_datasets(&mut b, grid, n);
    b.soft_link(grid, "parent", "/simulation");
    b.finish()
}
