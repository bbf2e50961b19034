//! Loop detection on the current descent path.

use crate::chain::TraversalChain;

/// Decides whether entering a group would revisit an ancestor.
///
/// Only the exact current chain is consulted: a group reachable through
/// two unrelated paths is entered once per path, while a link back to
/// any ancestor is reported as a loop.
pub struct CycleGuard;

impl CycleGuard {
    /// Returns `true` if `candidate` equals the address of any node from
    /// the tail of `chain` back to its root. O(depth).
    pub fn is_on_path<A: PartialEq>(chain: &TraversalChain<'_, A>, candidate: &A) -> bool {
        chain.iter().any(|node| node.addr() == candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_self_and_ancestors() {
        let root = TraversalChain::root(1u64);
        let mid = root.push(2);
        let leaf = mid.push(3);
        assert!(CycleGuard::is_on_path(&leaf, &3));
        assert!(CycleGuard::is_on_path(&leaf, &2));
        assert!(CycleGuard::is_on_path(&leaf, &1));
        assert!(!CycleGuard::is_on_path(&leaf, &4));
    }

    #[test]
    fn descendants_are_not_on_an_ancestor_path() {
        let root = TraversalChain::root(1u64);
        let mid = root.push(2);
        let _leaf = mid.push(3);
        assert!(!CycleGuard::is_on_path(&mid, &3));
    }
}
