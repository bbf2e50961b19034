//! Load configuration, validation, and error types.
//!
//! [`LoadConfig`] is the input to [`Loader::new`](crate::Loader::new).
//! [`validate()`](LoadConfig::validate) checks it before any container is
//! opened.

use std::error::Error;
use std::fmt;

use h5grid_extract::{ExpectedSchema, GridPolicy, ReshapeRule};

// ── SourceGroup ────────────────────────────────────────────────────

/// Which group each catalogued dataset is opened from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SourceGroup {
    /// The group the dataset was discovered in.
    #[default]
    Recorded,
    /// The last group the traversal entered, for every dataset.
    ///
    /// Only correct when a single group holds every dataset of interest.
    LastEntered,
}

// ── LoadConfig ─────────────────────────────────────────────────────

/// Everything a [`Loader`](crate::Loader) needs besides the backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadConfig {
    /// Recognized dataset names and their reshape rules. Default: reference schema.
    pub schema: ExpectedSchema,
    /// Source group resolution. Default: [`SourceGroup::Recorded`].
    pub source: SourceGroup,
    /// Accepted grid shapes. Default: [`GridPolicy::SquareOnly`].
    pub grid: GridPolicy,
    /// Maximum number of datasets the traversal may catalogue.
    /// `None` = one slot per schema entry.
    pub catalog_capacity: Option<usize>,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            schema: ExpectedSchema::reference(),
            source: SourceGroup::Recorded,
            grid: GridPolicy::SquareOnly,
            catalog_capacity: None,
        }
    }
}

impl LoadConfig {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.schema.is_empty() {
            return Err(ConfigError::EmptySchema);
        }
        for (name, rule) in self.schema.iter() {
            if name.is_empty() {
                return Err(ConfigError::InvalidRule {
                    name: name.to_string(),
                    reason: "dataset name is empty".into(),
                });
            }
            if let ReshapeRule::FloatGrid3D { inner: 0 } = rule {
                return Err(ConfigError::InvalidRule {
                    name: name.to_string(),
                    reason: "innermost axis length must be at least 1".into(),
                });
            }
        }
        if self.catalog_capacity == Some(0) {
            return Err(ConfigError::CatalogCapacityZero);
        }
        Ok(())
    }

    /// Catalog capacity after applying the default.
    pub fn effective_capacity(&self) -> usize {
        self.catalog_capacity.unwrap_or(self.schema.len())
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected by [`LoadConfig::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The schema recognizes no dataset.
    EmptySchema,
    /// A schema entry can never match a dataset.
    InvalidRule {
        /// Dataset name of the entry.
        name: String,
        /// Which constraint the rule violates.
        reason: String,
    },
    /// `catalog_capacity` is `Some(0)`.
    CatalogCapacityZero,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySchema => write!(f, "schema recognizes no dataset"),
            Self::InvalidRule { name, reason } => {
                write!(f, "invalid rule for dataset '{name}': {reason}")
            }
            Self::CatalogCapacityZero => write!(f, "catalog_capacity must be at least 1"),
        }
    }
}

impl Error for ConfigError {}
