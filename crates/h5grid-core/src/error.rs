//! Error types for h5grid.
//!
//! Organized by subsystem: the container collaborator, hierarchy
//! traversal, and array extraction. Orchestration errors live with the
//! loader in the `h5grid` crate.

use std::error::Error;
use std::fmt;

use crate::shape::{ElementType, Shape};

/// Errors reported by a container backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContainerError {
    /// No object exists at the given path.
    NotFound {
        /// Path or link name that failed to resolve.
        path: String,
    },
    /// A soft link points at a path that does not resolve.
    DanglingLink {
        /// Name of the soft link.
        link: String,
        /// The unresolved target path.
        target: String,
    },
    /// The object is not a group but was used as one.
    NotAGroup {
        /// Path of the object.
        path: String,
    },
    /// The object is not a dataset but was used as one.
    NotADataset {
        /// Path of the object.
        path: String,
    },
    /// A read asked for a different element type than the one stored.
    TypeMismatch {
        /// Dataset name.
        name: String,
        /// Type stored in the container.
        stored: ElementType,
        /// Type the caller asked for.
        requested: ElementType,
    },
    /// Any other failure inside the underlying library.
    Backend {
        /// Human-readable description from the library.
        reason: String,
    },
}

impl fmt::Display for ContainerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => write!(f, "object not found: {path}"),
            Self::DanglingLink { link, target } => {
                write!(f, "soft link '{link}' points at missing '{target}'")
            }
            Self::NotAGroup { path } => write!(f, "not a group: {path}"),
            Self::NotADataset { path } => write!(f, "not a dataset: {path}"),
            Self::TypeMismatch {
                name,
                stored,
                requested,
            } => write!(
                f,
                "dataset '{name}' stores {stored}, refusing to read it as {requested}"
            ),
            Self::Backend { reason } => write!(f, "container backend error: {reason}"),
        }
    }
}

impl Error for ContainerError {}

/// Errors that abort hierarchy traversal.
///
/// Catalog entries appended before the failure stay in the caller's
/// catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TraversalError {
    /// A metadata query failed.
    TraversalFailed {
        /// Path of the group or link being queried.
        path: String,
        /// The underlying container failure.
        reason: ContainerError,
    },
    /// More datasets were discovered than the catalog can hold.
    CatalogOverflow {
        /// Fixed catalog capacity.
        capacity: usize,
        /// Name of the dataset that did not fit.
        name: String,
    },
}

impl fmt::Display for TraversalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TraversalFailed { path, reason } => {
                write!(f, "traversal failed at '{path}': {reason}")
            }
            Self::CatalogOverflow { capacity, name } => write!(
                f,
                "catalog overflow: dataset '{name}' exceeds capacity of {capacity}"
            ),
        }
    }
}

impl Error for TraversalError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::TraversalFailed { reason, .. } => Some(reason),
            Self::CatalogOverflow { .. } => None,
        }
    }
}

/// Errors raised while turning a catalogued dataset into a typed array.
///
/// Structural errors (see [`is_structural`](Self::is_structural)) mean
/// the container does not match the expected layout and abort the whole
/// extraction. The rest only cost the affected dataset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExtractionError {
    /// The dataset could not be opened in its source group.
    DatasetNotFound {
        /// Dataset name.
        name: String,
    },
    /// The stored element type is not one this crate can read, or not the
    /// one the reshaping rule needs.
    UnsupportedElementType {
        /// Dataset name.
        name: String,
        /// Type the rule requires; `None` when no rule names the dataset.
        expected: Option<ElementType>,
        /// Type reported by the container.
        found: ElementType,
    },
    /// The grid's two leading axes differ while square grids are required.
    NonSquareGridUnsupported {
        /// Dataset name.
        name: String,
        /// Reported shape.
        shape: Shape,
    },
    /// The dataset has the wrong number of axes for its rule.
    RankMismatch {
        /// Dataset name.
        name: String,
        /// Rank the rule requires.
        expected: usize,
        /// Reported shape.
        found: Shape,
    },
    /// The innermost axis of a 3D grid has the wrong length.
    InnerAxisMismatch {
        /// Dataset name.
        name: String,
        /// Length the rule requires.
        expected: usize,
        /// Reported length.
        found: usize,
    },
    /// The buffer read does not hold exactly as many elements as the shape.
    ElementCountMismatch {
        /// Dataset name.
        name: String,
        /// Element count implied by the shape.
        expected: usize,
        /// Elements actually read.
        actual: usize,
    },
    /// A scalar was requested from a dataset with no elements.
    EmptyDataset {
        /// Dataset name.
        name: String,
    },
    /// The dataset exists but could not be described or read.
    ExtractionFailed {
        /// Dataset name.
        name: String,
        /// The underlying container failure.
        reason: ContainerError,
    },
}

impl ExtractionError {
    /// Returns `true` for errors that make every downstream array
    /// meaningless and therefore abort the whole extraction.
    pub fn is_structural(&self) -> bool {
        !matches!(
            self,
            Self::DatasetNotFound { .. } | Self::ExtractionFailed { .. }
        )
    }

    /// Name of the dataset the error concerns.
    pub fn dataset(&self) -> &str {
        match self {
            Self::DatasetNotFound { name }
            | Self::UnsupportedElementType { name, .. }
            | Self::NonSquareGridUnsupported { name, .. }
            | Self::RankMismatch { name, .. }
            | Self::InnerAxisMismatch { name, .. }
            | Self::ElementCountMismatch { name, .. }
            | Self::EmptyDataset { name }
            | Self::ExtractionFailed { name, .. } => name,
        }
    }
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DatasetNotFound { name } => write!(f, "dataset '{name}' not found"),
            Self::UnsupportedElementType {
                name,
                expected,
                found,
            } => match expected {
                Some(expected) => write!(
                    f,
                    "dataset '{name}' has unsupported element type {found} (expected {expected})"
                ),
                None => write!(
                    f,
                    "dataset '{name}' has unsupported element type {found} (expected i32 or f32)"
                ),
            },
            Self::NonSquareGridUnsupported { name, shape } => {
                write!(f, "dataset '{name}' has non-square grid shape {shape}")
            }
            Self::RankMismatch {
                name,
                expected,
                found,
            } => write!(
                f,
                "dataset '{name}' has shape {found}, expected rank {expected}"
            ),
            Self::InnerAxisMismatch {
                name,
                expected,
                found,
            } => write!(
                f,
                "dataset '{name}' innermost axis is {found}, expected {expected}"
            ),
            Self::ElementCountMismatch {
                name,
                expected,
                actual,
            } => write!(
                f,
                "dataset '{name}' read {actual} elements, shape implies {expected}"
            ),
            Self::EmptyDataset { name } => write!(f, "dataset '{name}' is empty"),
            Self::ExtractionFailed { name, reason } => {
                write!(f, "failed to extract dataset '{name}': {reason}")
            }
        }
    }
}

impl Error for ExtractionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ExtractionFailed { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Non-fatal observations made during extraction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExtractionWarning {
    /// A catalogued dataset has no reshaping rule and was left out.
    UnrecognizedDataset {
        /// Dataset name.
        name: String,
    },
    /// A dataset name was catalogued more than once; the later one wins.
    DuplicateDataset {
        /// Dataset name.
        name: String,
    },
}

impl fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnrecognizedDataset { name } => write!(f, "unrecognized dataset '{name}'"),
            Self::DuplicateDataset { name } => {
                write!(f, "dataset '{name}' found more than once, keeping the last")
            }
        }
    }
}
