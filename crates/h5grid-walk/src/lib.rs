//! Cycle-safe hierarchy traversal for h5grid.
//!
//! [`PathWalker`] enumerates every link reachable from a container's root,
//! recursing into groups and recording datasets into a fixed-capacity
//! [`DatasetCatalog`]. Soft and hard links may form loops; each recursion
//! frame owns a [`TraversalChain`] node borrowing its parent, and
//! [`CycleGuard`] refuses to re-enter any group already on the current
//! descent path.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod chain;
pub mod guard;
pub mod walker;

pub use catalog::{CatalogEntry, DatasetCatalog};
pub use chain::TraversalChain;
pub use guard::CycleGuard;
pub use walker::{EventKind, LoopWarning, Outline, PathWalker, WalkEvent, WalkReport};
