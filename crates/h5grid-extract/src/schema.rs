//! Names the extractor looks for and how each one is reshaped.

use h5grid_core::ElementType;
use indexmap::IndexMap;

/// Name of the scalar holding the number of spatial dimensions.
pub const DIMENSION_COUNT: &str = "dim";
/// Name of the integer domain bounding box grid.
pub const DOMAIN_BOX: &str = "domain_box";
/// Name of the integer interior bounding box grid.
pub const INTERIOR_BOX: &str = "interior_box";
/// Name of the integer cell mask grid.
pub const MASK: &str = "mask";
/// Name of the coordinate grid.
pub const XY: &str = "xy";

/// How a flat buffer becomes a typed array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReshapeRule {
    /// First `i32` element of a dataset of any rank.
    Scalar,
    /// Rank-2 `i32` grid.
    IntGrid2D,
    /// Rank-3 `f32` grid whose innermost axis has exactly `inner` elements.
    FloatGrid3D {
        /// Required innermost axis length.
        inner: usize,
    },
}

impl ReshapeRule {
    /// Element type the stored dataset must have.
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::Scalar | Self::IntGrid2D => ElementType::Int32,
            Self::FloatGrid3D { .. } => ElementType::Float32,
        }
    }

    /// Required rank, `None` if any rank is accepted.
    pub fn rank(&self) -> Option<usize> {
        match self {
            Self::Scalar => None,
            Self::IntGrid2D => Some(2),
            Self::FloatGrid3D { .. } => Some(3),
        }
    }
}

/// Ordered mapping from dataset name to [`ReshapeRule`].
///
/// Datasets whose names are absent from the schema are reported as
/// unrecognized and never read.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpectedSchema {
    rules: IndexMap<String, ReshapeRule>,
}

impl ExpectedSchema {
    /// An empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// The five datasets of a square simulation grid file:
    /// `dim`, `domain_box`, `interior_box`, `mask` and `xy` (inner axis 2).
    pub fn reference() -> Self {
        Self::new()
            .with_rule(DIMENSION_COUNT, ReshapeRule::Scalar)
            .with_rule(DOMAIN_BOX, ReshapeRule::IntGrid2D)
            .with_rule(INTERIOR_BOX, ReshapeRule::IntGrid2D)
            .with_rule(MASK, ReshapeRule::IntGrid2D)
            .with_rule(XY, ReshapeRule::FloatGrid3D { inner: 2 })
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_rule(mut self, name: impl Into<String>, rule: ReshapeRule) -> Self {
        self.insert(name, rule);
        self
    }

    /// Add or replace the rule for `name`. Returns the previous rule.
    pub fn insert(&mut self, name: impl Into<String>, rule: ReshapeRule) -> Option<ReshapeRule> {
        self.rules.insert(name.into(), rule)
    }

    /// Rule for `name`, if recognized.
    pub fn get(&self, name: &str) -> Option<&ReshapeRule> {
        self.rules.get(name)
    }

    /// Number of recognized names.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if no name is recognized.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ReshapeRule)> + '_ {
        self.rules.iter().map(|(n, r)| (n.as_str(), r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_schema_lists_five_datasets_in_order() {
        let s = ExpectedSchema::reference();
        let names: Vec<&str> = s.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["dim", "domain_box", "interior_box", "mask", "xy"]);
        assert_eq!(s.get("xy"), Some(&ReshapeRule::FloatGrid3D { inner: 2 }));
        assert_eq!(s.get("velocity"), None);
    }

    #[test]
    fn rule_types_and_ranks() {
        assert_eq!(ReshapeRule::Scalar.element_type(), ElementType::Int32);
        assert_eq!(ReshapeRule::Scalar.rank(), None);
        assert_eq!(ReshapeRule::IntGrid2D.rank(), Some(2));
        let xy = ReshapeRule::FloatGrid3D { inner: 2 };
        assert_eq!(xy.element_type(), ElementType::Float32);
        assert_eq!(xy.rank(), Some(3));
    }

    #[test]
    fn insert_replaces_and_keeps_position() {
        let mut s = ExpectedSchema::reference();
        let old = s.insert("dim", ReshapeRule::IntGrid2D);
        assert_eq!(old, Some(ReshapeRule::Scalar));
        assert_eq!(s.len(), 5);
        assert_eq!(s.iter().next(), Some(("dim", &ReshapeRule::IntGrid2D)));
    }
}
