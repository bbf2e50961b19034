//! The container-access collaborator.
//!
//! h5grid never decodes the container's on-disk format itself. Everything
//! it needs from the underlying hierarchical-file library goes through the
//! two traits in this module: [`Backend`] opens a container by path, and
//! [`Container`] answers metadata queries and reads flat element buffers.

use std::fmt;
use std::path::Path;

use crate::error::ContainerError;
use crate::shape::{ElementBuffer, ElementType, Shape};

/// Classification of the object a child link resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// A group that may hold further links.
    Group,
    /// A typed, multi-dimensional dataset.
    Dataset,
    /// A committed (named) datatype.
    NamedDatatype,
    /// Anything the container cannot classify as one of the above.
    Unknown,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Group => write!(f, "Group"),
            Self::Dataset => write!(f, "Dataset"),
            Self::NamedDatatype => write!(f, "Datatype"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Metadata for the object a child link resolves to.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectInfo<A> {
    /// Object classification.
    pub kind: ObjectKind,
    /// Canonical address of the object after following any soft link.
    pub addr: A,
}

/// Shape and element type of a dataset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetInfo {
    /// Per-axis sizes.
    pub shape: Shape,
    /// Stored element type.
    pub element: ElementType,
}

/// An opened hierarchical container.
///
/// Groups are named by their [`Addr`](Container::Addr). Addresses are
/// compared with `==` to decide whether two links lead to the same group,
/// so implementations must derive equality from the container's own
/// object identity, never from link text.
pub trait Container {
    /// Canonical address of an object in this container.
    type Addr: Clone + PartialEq + fmt::Debug;

    /// Address of the root group.
    fn root(&self) -> Result<Self::Addr, ContainerError>;

    /// Names of the links directly inside `group`, in the container's
    /// native order. The order must be stable for one container instance.
    fn children(&self, group: &Self::Addr) -> Result<Vec<String>, ContainerError>;

    /// Resolve `link` inside `group` (following soft links) and classify it.
    fn object_info(
        &self,
        group: &Self::Addr,
        link: &str,
    ) -> Result<ObjectInfo<Self::Addr>, ContainerError>;

    /// Open dataset `name` inside `group` and report its shape and type.
    fn describe_dataset(&self, group: &Self::Addr, name: &str)
        -> Result<DatasetInfo, ContainerError>;

    /// Read the full contents of dataset `name` inside `group` as `element`.
    ///
    /// Implementations must refuse to read a dataset whose stored type is
    /// not `element` rather than converting or reinterpreting bytes.
    fn read_buffer(
        &self,
        group: &Self::Addr,
        name: &str,
        element: &ElementType,
    ) -> Result<ElementBuffer, ContainerError>;

    /// Release the container.
    fn close(self) -> Result<(), ContainerError>
    where
        Self: Sized;
}

/// Opens containers by path.
pub trait Backend {
    /// The container type this backend produces.
    type Container: Container;

    /// Open the container at `path` for reading.
    fn open(&self, path: &Path) -> Result<Self::Container, ContainerError>;
}
