//! In-memory container with hard links, soft links, and call tracking.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use h5grid_core::{
    Backend, Container, ContainerError, DatasetInfo, ElementBuffer, ElementType, ObjectInfo,
    ObjectKind, Shape,
};

/// Maximum number of soft links followed while resolving one path.
const MAX_SOFT_HOPS: usize = 16;

/// Address of a node in a [`MemoryContainer`]. The root is `NodeAddr(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeAddr(pub u64);

/// A named link inside a group.
#[derive(Clone, Debug, PartialEq)]
pub enum Link {
    /// Points directly at a node.
    Hard(NodeAddr),
    /// Points at a path, absolute (`/a/b`) or relative to the owning group.
    Soft(String),
}

/// Stored dataset contents.
#[derive(Clone, Debug, PartialEq)]
pub enum StoredData {
    Int32(Vec<i32>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
}

impl StoredData {
    fn element_type(&self) -> ElementType {
        match self {
            Self::Int32(_) => ElementType::Int32,
            Self::Float32(_) => ElementType::Float32,
            Self::Float64(_) => ElementType::Other("f64".into()),
        }
    }
}

#[derive(Clone, Debug)]
enum Node {
    Group(Vec<(String, Link)>),
    Dataset { shape: Shape, data: StoredData },
    NamedDatatype,
    Opaque,
}

/// Totals of collaborator calls made against a container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub children: usize,
    pub object_info: usize,
    pub describe: usize,
    pub reads: usize,
}

#[derive(Debug, Default)]
struct Tracker {
    counts: Cell<CallCounts>,
    children_of: RefCell<HashMap<NodeAddr, usize>>,
    info_of: RefCell<HashMap<(NodeAddr, String), usize>>,
    describes_of: RefCell<HashMap<String, usize>>,
    reads_of: RefCell<HashMap<String, usize>>,
    closes: Cell<usize>,
}

impl Tracker {
    fn bump(&self, f: impl FnOnce(&mut CallCounts)) {
        let mut c = self.counts.get();
        f(&mut c);
        self.counts.set(c);
    }
}

/// An immutable in-memory hierarchy implementing [`Container`].
///
/// Clones share their call tracker, so a test can keep a clone around to
/// inspect what the code under test did with the original.
#[derive(Clone, Debug)]
pub struct MemoryContainer {
    nodes: Rc<Vec<Node>>,
    tracker: Rc<Tracker>,
    fail_info_on: Vec<String>,
    fail_read_on: Vec<String>,
}

impl MemoryContainer {
    /// Make `object_info` fail for every link with this name.
    pub fn fail_object_info_on(mut self, link: impl Into<String>) -> Self {
        self.fail_info_on.push(link.into());
        self
    }

    /// Make `read_buffer` fail for every dataset with this name.
    pub fn fail_read_on(mut self, name: impl Into<String>) -> Self {
        self.fail_read_on.push(name.into());
        self
    }

    /// Call totals so far.
    pub fn counts(&self) -> CallCounts {
        self.tracker.counts.get()
    }

    /// How many times `children` was called for `group`.
    pub fn children_calls_for(&self, group: NodeAddr) -> usize {
        self.tracker
            .children_of
            .borrow()
            .get(&group)
            .copied()
            .unwrap_or(0)
    }

    /// How many times `object_info` was called for `link` inside `group`.
    pub fn info_calls_for(&self, group: NodeAddr, link: &str) -> usize {
        self.tracker
            .info_of
            .borrow()
            .get(&(group, link.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// How many times dataset `name` was described.
    pub fn describes_of(&self, name: &str) -> usize {
        self.tracker
            .describes_of
            .borrow()
            .get(name)
            .copied()
            .unwrap_or(0)
    }

    /// How many times dataset `name` was read.
    pub fn reads_of(&self, name: &str) -> usize {
        self.tracker.reads_of.borrow().get(name).copied().unwrap_or(0)
    }

    /// How many times any clone of this container was closed.
    pub fn closes(&self) -> usize {
        self.tracker.closes.get()
    }

    /// Addresses of every group node, root first.
    pub fn group_addrs(&self) -> Vec<NodeAddr> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| matches!(n, Node::Group(_)))
            .map(|(i, _)| NodeAddr(i as u64))
            .collect()
    }

    /// Link names inside `group`, in insertion order.
    pub fn link_names(&self, group: NodeAddr) -> Vec<String> {
        match self.nodes.get(group.0 as usize) {
            Some(Node::Group(links)) => links.iter().map(|(n, _)| n.clone()).collect(),
            _ => Vec::new(),
        }
    }

    fn node(&self, addr: NodeAddr) -> Result<&Node, ContainerError> {
        self.nodes
            .get(addr.0 as usize)
            .ok_or_else(|| ContainerError::NotFound {
                path: format!("#{}", addr.0),
            })
    }

    fn links(&self, group: NodeAddr) -> Result<&[(String, Link)], ContainerError> {
        match self.node(group)? {
            Node::Group(links) => Ok(links),
            _ => Err(ContainerError::NotAGroup {
                path: format!("#{}", group.0),
            }),
        }
    }

    fn resolve(&self, group: NodeAddr, name: &str) -> Result<NodeAddr, ContainerError> {
        let link = self
            .links(group)?
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, l)| l)
            .ok_or_else(|| ContainerError::NotFound {
                path: name.to_string(),
            })?;
        match link {
            Link::Hard(addr) => Ok(*addr),
            Link::Soft(target) => self.resolve_path(group, target, MAX_SOFT_HOPS).ok_or_else(|| {
                ContainerError::DanglingLink {
                    link: name.to_string(),
                    target: target.clone(),
                }
            }),
        }
    }

    fn resolve_path(&self, base: NodeAddr, path: &str, hops: usize) -> Option<NodeAddr> {
        let mut current = if path.starts_with('/') {
            NodeAddr(0)
        } else {
            base
        };
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            let links = self.links(current).ok()?;
            let (_, link) = links.iter().find(|(n, _)| n == segment)?;
            current = match link {
                Link::Hard(addr) => *addr,
                Link::Soft(target) => {
                    if hops == 0 {
                        return None;
                    }
                    self.resolve_path(current, target, hops - 1)?
                }
            };
        }
        Some(current)
    }

    fn dataset(
        &self,
        group: NodeAddr,
        name: &str,
    ) -> Result<(&Shape, &StoredData), ContainerError> {
        let addr = self.resolve(group, name)?;
        match self.node(addr)? {
            Node::Dataset { shape, data } => Ok((shape, data)),
            _ => Err(ContainerError::NotADataset {
                path: name.to_string(),
            }),
        }
    }
}

impl Container for MemoryContainer {
    type Addr = NodeAddr;

    fn root(&self) -> Result<NodeAddr, ContainerError> {
        Ok(NodeAddr(0))
    }

    fn children(&self, group: &NodeAddr) -> Result<Vec<String>, ContainerError> {
        self.tracker.bump(|c| c.children += 1);
        *self
            .tracker
            .children_of
            .borrow_mut()
            .entry(*group)
            .or_insert(0) += 1;
        Ok(self
            .links(*group)?
            .iter()
            .map(|(name, _)| name.clone())
            .collect())
    }

    fn object_info(
        &self,
        group: &NodeAddr,
        link: &str,
    ) -> Result<ObjectInfo<NodeAddr>, ContainerError> {
        self.tracker.bump(|c| c.object_info += 1);
        *self
            .tracker
            .info_of
            .borrow_mut()
            .entry((*group, link.to_string()))
            .or_insert(0) += 1;
        if self.fail_info_on.iter().any(|n| n == link) {
            return Err(ContainerError::Backend {
                reason: format!("injected metadata failure for '{link}'"),
            });
        }
        let addr = self.resolve(*group, link)?;
        let kind = match self.node(addr)? {
            Node::Group(_) => ObjectKind::Group,
            Node::Dataset { .. } => ObjectKind::Dataset,
            Node::NamedDatatype => ObjectKind::NamedDatatype,
            Node::Opaque => ObjectKind::Unknown,
        };
        Ok(ObjectInfo { kind, addr })
    }

    fn describe_dataset(
        &self,
        group: &NodeAddr,
        name: &str,
    ) -> Result<DatasetInfo, ContainerError> {
        self.tracker.bump(|c| c.describe += 1);
        *self
            .tracker
            .describes_of
            .borrow_mut()
            .entry(name.to_string())
            .or_insert(0) += 1;
        let (shape, data) = self.dataset(*group, name)?;
        Ok(DatasetInfo {
            shape: shape.clone(),
            element: data.element_type(),
        })
    }

    fn read_buffer(
        &self,
        group: &NodeAddr,
        name: &str,
        element: &ElementType,
    ) -> Result<ElementBuffer, ContainerError> {
        self.tracker.bump(|c| c.reads += 1);
        *self
            .tracker
            .reads_of
            .borrow_mut()
            .entry(name.to_string())
            .or_insert(0) += 1;
        if self.fail_read_on.iter().any(|n| n == name) {
            return Err(ContainerError::Backend {
                reason: format!("injected read failure for '{name}'"),
            });
        }
        let (_, data) = self.dataset(*group, name)?;
        let stored = data.element_type();
        if &stored != element {
            return Err(ContainerError::TypeMismatch {
                name: name.to_string(),
                stored,
                requested: element.clone(),
            });
        }
        match data {
            StoredData::Int32(v) => Ok(ElementBuffer::Int32(v.clone())),
            StoredData::Float32(v) => Ok(ElementBuffer::Float32(v.clone())),
            StoredData::Float64(_) => Err(ContainerError::Backend {
                reason: format!("no buffer representation for f64 dataset '{name}'"),
            }),
        }
    }

    fn close(self) -> Result<(), ContainerError> {
        self.tracker.closes.set(self.tracker.closes.get() + 1);
        Ok(())
    }
}

/// Assembles a [`MemoryContainer`] node by node.
///
/// Links are kept in insertion order, which becomes the container's
/// native enumeration order. Shapes and data are not cross-checked so
/// tests can build deliberately inconsistent datasets.
#[derive(Debug)]
pub struct ContainerBuilder {
    nodes: Vec<Node>,
}

impl ContainerBuilder {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::Group(Vec::new())],
        }
    }

    /// Address of the root group.
    pub fn root(&self) -> NodeAddr {
        NodeAddr(0)
    }

    fn push(&mut self, parent: NodeAddr, name: &str, node: Node) -> NodeAddr {
        let addr = NodeAddr(self.nodes.len() as u64);
        self.nodes.push(node);
        self.link(parent, name, Link::Hard(addr));
        addr
    }

    fn link(&mut self, parent: NodeAddr, name: &str, link: Link) {
        match self.nodes.get_mut(parent.0 as usize) {
            Some(Node::Group(links)) => links.push((name.to_string(), link)),
            _ => panic!("parent {parent:?} is not a group"),
        }
    }

    /// Create a child group.
    pub fn group(&mut self, parent: NodeAddr, name: &str) -> NodeAddr {
        self.push(parent, name, Node::Group(Vec::new()))
    }

    /// Create an `i32` dataset.
    pub fn dataset_i32(
        &mut self,
        parent: NodeAddr,
        name: &str,
        shape: impl Into<Shape>,
        data: Vec<i32>,
    ) -> NodeAddr {
        let node = Node::Dataset {
            shape: shape.into(),
            data: StoredData::Int32(data),
        };
        self.push(parent, name, node)
    }

    /// Create an `f32` dataset.
    pub fn dataset_f32(
        &mut self,
        parent: NodeAddr,
        name: &str,
        shape: impl Into<Shape>,
        data: Vec<f32>,
    ) -> NodeAddr {
        let node = Node::Dataset {
            shape: shape.into(),
            data: StoredData::Float32(data),
        };
        self.push(parent, name, node)
    }

    /// Create an `f64` dataset.
    pub fn dataset_f64(
        &mut self,
        parent: NodeAddr,
        name: &str,
        shape: impl Into<Shape>,
        data: Vec<f64>,
    ) -> NodeAddr {
        let node = Node::Dataset {
            shape: shape.into(),
            data: StoredData::Float64(data),
        };
        self.push(parent, name, node)
    }

    /// Create a committed datatype.
    pub fn named_datatype(&mut self, parent: NodeAddr, name: &str) -> NodeAddr {
        self.push(parent, name, Node::NamedDatatype)
    }

    /// Create an object of unknown kind.
    pub fn opaque(&mut self, parent: NodeAddr, name: &str) -> NodeAddr {
        self.push(parent, name, Node::Opaque)
    }

    /// Add a second hard link to an existing node.
    pub fn hard_link(&mut self, parent: NodeAddr, name: &str, target: NodeAddr) {
        self.link(parent, name, Link::Hard(target));
    }

    /// Add a soft link to a path.
    pub fn soft_link(&mut self, parent: NodeAddr, name: &str, target: &str) {
        self.link(parent, name, Link::Soft(target.to_string()));
    }

    pub fn finish(self) -> MemoryContainer {
        MemoryContainer {
            nodes: Rc::new(self.nodes),
            tracker: Rc::new(Tracker::default()),
            fail_info_on: Vec::new(),
            fail_read_on: Vec::new(),
        }
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Opens [`MemoryContainer`]s registered under file paths.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    files: HashMap<PathBuf, MemoryContainer>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `container` under `path`.
    pub fn with_file(mut self, path: impl Into<PathBuf>, container: MemoryContainer) -> Self {
        self.files.insert(path.into(), container);
        self
    }
}

impl Backend for MemoryBackend {
    type Container = MemoryContainer;

    fn open(&self, path: &Path) -> Result<MemoryContainer, ContainerError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| ContainerError::NotFound {
                path: path.display().to_string(),
            })
    }
}
