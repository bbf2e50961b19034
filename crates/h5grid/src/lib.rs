//! h5grid: a loop-safe reader for simulation grids stored in hierarchical
//! containers such as HDF5 files.
//!
//! This is the top-level facade crate. It re-exports the sub-crates and
//! adds the [`Loader`], which opens a container, walks it, extracts the
//! recognized datasets, and closes it again.
//!
//! # Quick start
//!
//! ```rust
//! use h5grid::prelude::*;
//! use h5grid_test_utils::fixtures::nested_square_grid;
//! use h5grid_test_utils::MemoryBackend;
//! use std::path::Path;
//!
//! let backend = MemoryBackend::new().with_file("squaregrid.hdf", nested_square_grid(4));
//! let loaded = Loader::new(LoadConfig::default())
//!     .run(&backend, Path::new("squaregrid.hdf"))
//!     .unwrap();
//! assert!(loaded.result.is_complete());
//! assert_eq!(loaded.walk.loops.len(), 1);
//! assert_eq!(loaded.result.xy.unwrap()[(3, 1)], [3.0, 1.0]);
//! ```
//!
//! With the `hdf5` feature, `h5grid::load` reads a file from disk with the
//! default configuration.
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `h5grid-core` | Shapes, arrays, collaborator traits, errors |
//! | [`walk`] | `h5grid-walk` | Traversal chain, cycle guard, catalog, walker |
//! | [`extract`] | `h5grid-extract` | Schema, grid policy, array extractor |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod loader;

#[cfg(feature = "hdf5")]
pub mod native;

/// Core types, traits, and errors (`h5grid-core`).
pub use h5grid_core as types;

/// Hierarchy traversal (`h5grid-walk`).
pub use h5grid_walk as walk;

/// Typed array extraction (`h5grid-extract`).
pub use h5grid_extract as extract;

pub use config::{ConfigError, LoadConfig, SourceGroup};
pub use loader::{CataloguedDataset, LoadError, Loaded, Loader};

#[cfg(feature = "hdf5")]
pub use native::{load, Hdf5Addr, Hdf5Backend, Hdf5Container};

/// Common imports for typical h5grid usage.
pub mod prelude {
    // Configuration and orchestration
    pub use crate::config::{LoadConfig, SourceGroup};
    pub use crate::loader::{LoadError, Loaded, Loader};

    // Arrays
    pub use h5grid_core::{ExtractionResult, FloatGrid3D, IntGrid2D, ScalarInt, TypedArray};

    // Collaborators
    pub use h5grid_core::{Backend, Container};

    // Extraction
    pub use h5grid_extract::{ExpectedSchema, GridPolicy, ReshapeRule};
}
