//! Typed array extraction for h5grid.
//!
//! [`ArrayExtractor`] takes the [`DatasetCatalog`](h5grid_walk::DatasetCatalog)
//! produced by traversal and, for every entry the [`ExpectedSchema`]
//! recognizes, describes the dataset, checks its element type and shape
//! under a [`GridPolicy`], reads it once and reshapes the flat buffer into
//! an owned array of the [`ExtractionResult`](h5grid_core::ExtractionResult).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod extractor;
pub mod reshape;
pub mod schema;

pub use extractor::{ArrayExtractor, Extraction, ExtractionAborted, SourceResolution};
pub use reshape::GridPolicy;
pub use schema::{ExpectedSchema, ReshapeRule};
