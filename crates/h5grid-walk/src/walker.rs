//! Recursive, loop-guarded enumeration of a container hierarchy.

use std::fmt;

use h5grid_core::{Container, ObjectKind, TraversalError};
use tracing::{debug, warn};

use crate::catalog::DatasetCatalog;
use crate::chain::TraversalChain;
use crate::guard::CycleGuard;

/// A group link that was not entered because it leads back to an ancestor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoopWarning {
    /// Path of the offending link.
    pub path: String,
    /// Depth the link was found at (children of the root are depth 1).
    pub depth: usize,
}

/// What happened at one point of the traversal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    /// Descending into a group.
    EnterGroup,
    /// Finished enumerating a group.
    LeaveGroup,
    /// A group link refused by the cycle guard.
    Loop,
    /// A dataset recorded in the catalog.
    Dataset,
    /// A committed datatype (diagnostic only).
    NamedDatatype,
    /// An object of unknown kind (diagnostic only).
    Unknown,
}

/// One entry of the traversal log, in visiting order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalkEvent {
    /// Depth of the link; children of the root are depth 1.
    pub depth: usize,
    /// Link name.
    pub name: String,
    /// What the walker did with it.
    pub kind: EventKind,
}

/// Summary of a completed traversal.
#[derive(Clone, Debug)]
pub struct WalkReport<A> {
    /// The last group entered, or the root if none was.
    pub last_group: A,
    /// Number of groups entered (the root is not counted).
    pub groups_entered: usize,
    /// Links refused by the cycle guard.
    pub loops: Vec<LoopWarning>,
    /// Every link encountered, in order.
    pub events: Vec<WalkEvent>,
}

impl<A> WalkReport<A> {
    fn new(root: A) -> Self {
        Self {
            last_group: root,
            groups_entered: 0,
            loops: Vec::new(),
            events: Vec::new(),
        }
    }

    fn record(&mut self, depth: usize, name: &str, kind: EventKind) {
        self.events.push(WalkEvent {
            depth,
            name: name.to_string(),
            kind,
        });
    }

    /// Indented rendering of the hierarchy as it was walked.
    pub fn outline(&self) -> Outline<'_> {
        Outline {
            events: &self.events,
        }
    }
}

/// Display adapter returned by [`WalkReport::outline`].
///
/// ```text
/// / {
///   Group: simulation {
///     Dataset: dim
///     Group: parent {
///       Warning: Loop detected!
///     }
///   }
/// }
/// ```
pub struct Outline<'a> {
    events: &'a [WalkEvent],
}

impl fmt::Display for Outline<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "/ {{")?;
        for e in self.events {
            let pad = 2 * e.depth;
            match e.kind {
                EventKind::EnterGroup => writeln!(f, "{:pad$}Group: {} {{", "", e.name)?,
                EventKind::LeaveGroup => writeln!(f, "{:pad$}}}", "")?,
                EventKind::Loop => {
                    writeln!(f, "{:pad$}Group: {} {{", "", e.name)?;
                    writeln!(f, "{:pad$}  Warning: Loop detected!", "")?;
                    writeln!(f, "{:pad$}}}", "")?;
                }
                EventKind::Dataset => writeln!(f, "{:pad$}Dataset: {}", "", e.name)?,
                EventKind::NamedDatatype => writeln!(f, "{:pad$}Datatype: {}", "", e.name)?,
                EventKind::Unknown => writeln!(f, "{:pad$}Unknown: {}", "", e.name)?,
            }
        }
        writeln!(f, "}}")
    }
}

fn join_path(parent: &str, name: &str) -> String {
    if parent.ends_with('/') {
        format!("{parent}{name}")
    } else {
        format!("{parent}/{name}")
    }
}

/// Walks a container from its root, cataloguing every dataset.
///
/// Links are visited in the container's native order. Groups are entered
/// depth-first unless [`CycleGuard`] finds them on the current path.
/// Datasets are appended to the caller's catalog together with the
/// address of the group they were found in.
#[derive(Clone, Copy, Debug, Default)]
pub struct PathWalker;

impl PathWalker {
    /// Create a walker.
    pub fn new() -> Self {
        Self
    }

    /// Traverse `container` from its root.
    ///
    /// On error the traversal stops immediately; entries already appended
    /// stay in `catalog`.
    pub fn traverse<C: Container>(
        &self,
        container: &C,
        catalog: &mut DatasetCatalog<C::Addr>,
    ) -> Result<WalkReport<C::Addr>, TraversalError> {
        let root = container
            .root()
            .map_err(|reason| TraversalError::TraversalFailed {
                path: "/".to_string(),
                reason,
            })?;
        let mut report = WalkReport::new(root.clone());
        let chain = TraversalChain::root(root);
        self.visit(container, &chain, "/", catalog, &mut report)?;
        debug!(
            groups = report.groups_entered,
            datasets = catalog.len(),
            loops = report.loops.len(),
            "traversal complete"
        );
        Ok(report)
    }

    /// Enumerate the group at the tail of `chain`, recursing into children.
    fn visit<C: Container>(
        &self,
        container: &C,
        chain: &TraversalChain<'_, C::Addr>,
        path: &str,
        catalog: &mut DatasetCatalog<C::Addr>,
        report: &mut WalkReport<C::Addr>,
    ) -> Result<(), TraversalError> {
        let group = chain.addr();
        let depth = chain.depth() + 1;
        let names = container
            .children(group)
            .map_err(|reason| TraversalError::TraversalFailed {
                path: path.to_string(),
                reason,
            })?;

        for name in names {
            let child_path = join_path(path, &name);
            let info = container.object_info(group, &name).map_err(|reason| {
                TraversalError::TraversalFailed {
                    path: child_path.clone(),
                    reason,
                }
            })?;

            match info.kind {
                ObjectKind::Group => {
                    if CycleGuard::is_on_path(chain, &info.addr) {
                        warn!(depth, path = %child_path, "loop detected, not descending");
                        report.loops.push(LoopWarning {
                            path: child_path,
                            depth,
                        });
                        report.record(depth, &name, EventKind::Loop);
                        continue;
                    }
                    debug!(depth, path = %child_path, "group");
                    report.record(depth, &name, EventKind::EnterGroup);
                    report.last_group = info.addr.clone();
                    report.groups_entered += 1;
                    let next = chain.push(info.addr);
                    self.visit(container, &next, &child_path, catalog, report)?;
                    report.record(depth, &name, EventKind::LeaveGroup);
                }
                ObjectKind::Dataset => {
                    debug!(depth, path = %child_path, "dataset");
                    report.record(depth, &name, EventKind::Dataset);
                    catalog.append(name, path, group.clone())?;
                }
                ObjectKind::NamedDatatype => {
                    debug!(depth, path = %child_path, "named datatype");
                    report.record(depth, &name, EventKind::NamedDatatype);
                }
                ObjectKind::Unknown => {
                    debug!(depth, path = %child_path, "unknown object");
                    report.record(depth, &name, EventKind::Unknown);
                }
            }
        }
        Ok(())
    }
}
