//! Native HDF5 backend on the `hdf5` crate.

use std::path::Path;

use h5grid_core::{
    Backend, Container, ContainerError, DatasetInfo, ElementBuffer, ElementType, ObjectInfo,
    ObjectKind, Shape,
};
use hdf5::types::{FloatSize, IntSize, TypeDescriptor};
use hdf5::{Dataset, File, Group, LocationToken, LocationType};

use crate::config::LoadConfig;
use crate::loader::{LoadError, Loaded, Loader};

/// Opens HDF5 files read-only.
#[derive(Clone, Copy, Debug, Default)]
pub struct Hdf5Backend;

impl Backend for Hdf5Backend {
    type Container = Hdf5Container;

    fn open(&self, path: &Path) -> Result<Hdf5Container, ContainerError> {
        if !path.exists() {
            return Err(ContainerError::NotFound {
                path: path.display().to_string(),
            });
        }
        let file = File::open(path).map_err(backend_error)?;
        Ok(Hdf5Container { file })
    }
}

/// Identity of an HDF5 object plus a path it can be reopened through.
///
/// Two addresses are equal when they name the same object in the same
/// file, whatever path reached it.
#[derive(Clone, Debug)]
pub struct Hdf5Addr {
    fileno: u64,
    token: LocationToken,
    path: String,
}

impl Hdf5Addr {
    /// A path that resolves to this object.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl PartialEq for Hdf5Addr {
    fn eq(&self, other: &Self) -> bool {
        self.fileno == other.fileno && self.token == other.token
    }
}

impl Eq for Hdf5Addr {}

/// An open HDF5 file.
#[derive(Debug)]
pub struct Hdf5Container {
    file: File,
}

impl Hdf5Container {
    fn group(&self, addr: &Hdf5Addr) -> Result<Group, ContainerError> {
        self.file.group(&addr.path).map_err(|_| ContainerError::NotAGroup {
            path: addr.path.clone(),
        })
    }

    fn dataset(&self, group: &Hdf5Addr, name: &str) -> Result<Dataset, ContainerError> {
        let path = join(&group.path, name);
        let g = self.group(group)?;
        if !g.link_exists(name) {
            return Err(ContainerError::NotFound { path });
        }
        let info = g
            .loc_info_by_name(name)
            .map_err(|e| ContainerError::Backend {
                reason: format!("cannot resolve '{path}': {e}"),
            })?;
        if !matches!(info.loc_type, LocationType::Dataset) {
            return Err(ContainerError::NotADataset { path });
        }
        g.dataset(name).map_err(backend_error)
    }
}

impl Container for Hdf5Container {
    type Addr = Hdf5Addr;

    fn root(&self) -> Result<Hdf5Addr, ContainerError> {
        let info = self.file.loc_info().map_err(backend_error)?;
        Ok(Hdf5Addr {
            fileno: info.fileno,
            token: info.token,
            path: "/".to_string(),
        })
    }

    fn children(&self, group: &Hdf5Addr) -> Result<Vec<String>, ContainerError> {
        self.group(group)?.member_names().map_err(backend_error)
    }

    fn object_info(
        &self,
        group: &Hdf5Addr,
        link: &str,
    ) -> Result<ObjectInfo<Hdf5Addr>, ContainerError> {
        let path = join(&group.path, link);
        let g = self.group(group)?;
        if !g.link_exists(link) {
            return Err(ContainerError::NotFound { path });
        }
        let info = g
            .loc_info_by_name(link)
            .map_err(|e| ContainerError::Backend {
                reason: format!("cannot resolve '{path}': {e}"),
            })?;
        #[allow(unreachable_patterns)]
        let kind = match info.loc_type {
            LocationType::Group => ObjectKind::Group,
            LocationType::Dataset => ObjectKind::Dataset,
            LocationType::NamedDatatype => ObjectKind::NamedDatatype,
            _ => ObjectKind::Unknown,
        };
        Ok(ObjectInfo {
            kind,
            addr: Hdf5Addr {
                fileno: info.fileno,
                token: info.token,
                path,
            },
        })
    }

    fn describe_dataset(
        &self,
        group: &Hdf5Addr,
        name: &str,
    ) -> Result<DatasetInfo, ContainerError> {
        let ds = self.dataset(group, name)?;
        Ok(DatasetInfo {
            shape: Shape::from(ds.shape()),
            element: element_type(&ds)?,
        })
    }

    fn read_buffer(
        &self,
        group: &Hdf5Addr,
        name: &str,
        element: &ElementType,
    ) -> Result<ElementBuffer, ContainerError> {
        let ds = self.dataset(group, name)?;
        let stored = element_type(&ds)?;
        if &stored != element {
            return Err(ContainerError::TypeMismatch {
                name: name.to_string(),
                stored,
                requested: element.clone(),
            });
        }
        let read = match stored {
            ElementType::Int32 => ds.read_raw::<i32>().map(ElementBuffer::Int32),
            ElementType::Float32 => ds.read_raw::<f32>().map(ElementBuffer::Float32),
            ElementType::Other(desc) => {
                return Err(ContainerError::Backend {
                    reason: format!("no buffer representation for {desc} dataset '{name}'"),
                })
            }
        };
        read.map_err(backend_error)
    }

    fn close(self) -> Result<(), ContainerError> {
        self.file.close().map_err(backend_error)
    }
}

fn element_type(ds: &Dataset) -> Result<ElementType, ContainerError> {
    let desc = ds
        .dtype()
        .and_then(|t| t.to_descriptor())
        .map_err(backend_error)?;
    Ok(match desc {
        TypeDescriptor::Integer(IntSize::U4) => ElementType::Int32,
        TypeDescriptor::Float(FloatSize::U4) => ElementType::Float32,
        other => ElementType::Other(format!("{other:?}").to_lowercase()),
    })
}

fn join(parent: &str, name: &str) -> String {
    if parent.ends_with('/') {
        format!("{parent}{name}")
    } else {
        format!("{parent}/{name}")
    }
}

fn backend_error(e: hdf5::Error) -> ContainerError {
    ContainerError::Backend {
        reason: e.to_string(),
    }
}

/// Load `path` with the default configuration.
pub fn load(path: impl AsRef<Path>) -> Result<Loaded<Hdf5Addr>, LoadError> {
    Loader::new(LoadConfig::default()).run(&Hdf5Backend, path.as_ref())
}
