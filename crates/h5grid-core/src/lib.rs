//! Core types and traits for h5grid.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! data model shared by the traversal and extraction crates: object kinds,
//! dataset shapes and element types, the typed arrays handed to callers,
//! the collaborator traits through which a hierarchical container is
//! accessed, and the error taxonomy.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod array;
pub mod container;
pub mod error;
pub mod shape;

pub use array::{ExtractionResult, FloatGrid3D, IntGrid2D, ScalarInt, TypedArray};
pub use container::{Backend, Container, DatasetInfo, ObjectInfo, ObjectKind};
pub use error::{ContainerError, ExtractionError, ExtractionWarning, TraversalError};
pub use shape::{ElementBuffer, ElementType, Shape};
