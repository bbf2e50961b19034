//! Dataset shapes, element types, and flat element buffers.

use smallvec::SmallVec;
use std::fmt;

/// Ordered per-axis sizes of a dataset, one entry per axis.
///
/// The rank is the number of axes. A rank-0 shape describes a scalar
/// dataspace holding exactly one element.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Shape(SmallVec<[usize; 4]>);

impl Shape {
    /// Build a shape from per-axis sizes.
    pub fn new(dims: impl IntoIterator<Item = usize>) -> Self {
        Self(dims.into_iter().collect())
    }

    /// Number of axes.
    pub fn rank(&self) -> usize {
        self.0.len()
    }

    /// Per-axis sizes, outermost first.
    pub fn dims(&self) -> &[usize] {
        &self.0
    }

    /// Size of a single axis, or `None` if `axis >= rank`.
    pub fn axis(&self, axis: usize) -> Option<usize> {
        self.0.get(axis).copied()
    }

    /// Total number of elements, or `None` on overflow.
    pub fn element_count(&self) -> Option<usize> {
        self.0
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Self(SmallVec::from_slice(dims))
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(dims: [usize; N]) -> Self {
        Self(dims.into_iter().collect())
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Self(SmallVec::from_vec(dims))
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "scalar");
        }
        for (i, d) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "x")?;
            }
            write!(f, "{d}")?;
        }
        Ok(())
    }
}

/// Element type reported by the container for a dataset.
///
/// Only 32-bit signed integers and 32-bit floats are ever read. Every
/// other stored type is carried as [`ElementType::Other`] with a short
/// descriptor so it can be reported, never reinterpreted.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// 32-bit signed integer.
    Int32,
    /// 32-bit IEEE float.
    Float32,
    /// Any other stored type (e.g. `"f64"`, `"u8"`, `"string"`).
    Other(String),
}

impl ElementType {
    /// Returns `true` for the types a dataset can be read as.
    pub fn is_supported(&self) -> bool {
        matches!(self, Self::Int32 | Self::Float32)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int32 => write!(f, "i32"),
            Self::Float32 => write!(f, "f32"),
            Self::Other(desc) => write!(f, "{desc}"),
        }
    }
}

/// A flat, row-major sequence of elements read from a dataset.
#[derive(Clone, Debug, PartialEq)]
pub enum ElementBuffer {
    /// Buffer of 32-bit signed integers.
    Int32(Vec<i32>),
    /// Buffer of 32-bit floats.
    Float32(Vec<f32>),
}

impl ElementBuffer {
    /// Number of elements in the buffer.
    pub fn len(&self) -> usize {
        match self {
            Self::Int32(v) => v.len(),
            Self::Float32(v) => v.len(),
        }
    }

    /// Returns `true` if the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element type of the buffer.
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::Int32(_) => ElementType::Int32,
            Self::Float32(_) => ElementType::Float32,
        }
    }
}
