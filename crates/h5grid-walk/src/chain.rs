//! Backward-linked chain of the groups on the current descent path.

/// One node of the descent path: a group address at a given depth.
///
/// Nodes live on the recursion stack. [`push`](Self::push) creates the
/// node for a child call that borrows its parent, so a node is dropped
/// exactly when the call that created it returns and no node ever
/// outlives the ancestors it links to.
#[derive(Debug)]
pub struct TraversalChain<'p, A> {
    depth: usize,
    addr: A,
    parent: Option<&'p TraversalChain<'p, A>>,
}

impl<'p, A> TraversalChain<'p, A> {
    /// The root node (depth 0).
    pub fn root(addr: A) -> Self {
        Self {
            depth: 0,
            addr,
            parent: None,
        }
    }

    /// A child node one level below `self`.
    pub fn push(&self, addr: A) -> TraversalChain<'_, A> {
        TraversalChain {
            depth: self.depth + 1,
            addr,
            parent: Some(self),
        }
    }

    /// Depth of this node; the root is 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Address of the group this node stands for.
    pub fn addr(&self) -> &A {
        &self.addr
    }

    /// The enclosing node, `None` at the root.
    pub fn parent(&self) -> Option<&TraversalChain<'p, A>> {
        self.parent
    }

    /// Iterate from this node back to the root.
    pub fn iter(&self) -> Ancestors<'_, A> {
        Ancestors { next: Some(self) }
    }
}

/// Iterator from a chain node to the root, see [`TraversalChain::iter`].
pub struct Ancestors<'c, A> {
    next: Option<&'c TraversalChain<'c, A>>,
}

impl<'c, A> Iterator for Ancestors<'c, A> {
    type Item = &'c TraversalChain<'c, A>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.parent;
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_increments_depth_and_links_parent() {
        let root = TraversalChain::root(10u64);
        let a = root.push(11);
        let b = a.push(12);
        assert_eq!(b.depth(), 2);
        assert_eq!(b.parent().map(|p| *p.addr()), Some(11));
        let addrs: Vec<u64> = b.iter().map(|n| *n.addr()).collect();
        assert_eq!(addrs, vec![12, 11, 10]);
    }

    #[test]
    fn sibling_chains_share_only_common_ancestors() {
        let root = TraversalChain::root(0u64);
        let left = root.push(1);
        let right = root.push(2);
        assert!(left.iter().all(|n| *n.addr() != 2));
        assert!(right.iter().all(|n| *n.addr() != 1));
    }
}
