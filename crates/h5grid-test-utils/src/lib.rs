//! Test utilities for h5grid development.
//!
//! Provides [`MemoryContainer`], an in-memory implementation of the
//! [`Container`](h5grid_core::Container) collaborator with hard and soft
//! links, call counters and failure injection, a [`ContainerBuilder`] to
//! assemble hierarchies, a [`MemoryBackend`] that opens containers by
//! path, and the reference fixtures in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
mod memory;

pub use memory::{
    CallCounts, ContainerBuilder, Link, MemoryBackend, MemoryContainer, NodeAddr, StoredData,
};
