//! Catalog-driven extraction of typed arrays.

use std::error::Error;
use std::fmt;

use h5grid_core::{
    Container, ContainerError, ExtractionError, ExtractionResult, ExtractionWarning, TypedArray,
};
use h5grid_walk::DatasetCatalog;
use tracing::{debug, info, warn};

use crate::reshape::{check_shape, reshape, GridPolicy};
use crate::schema::{
    ExpectedSchema, ReshapeRule, DIMENSION_COUNT, DOMAIN_BOX, INTERIOR_BOX, MASK, XY,
};

/// Where each catalogued dataset is opened from.
#[derive(Debug)]
pub enum SourceResolution<'a, A> {
    /// The group recorded in the dataset's own catalog entry.
    PerEntry,
    /// One group for every entry.
    Fixed(&'a A),
}

// Derived Clone/Copy would require `A: Copy`.
impl<A> Clone for SourceResolution<'_, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A> Copy for SourceResolution<'_, A> {}

/// Everything one extraction pass produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Extraction {
    /// Arrays extracted so far.
    pub result: ExtractionResult,
    /// Unrecognized and duplicate datasets, in discovery order.
    pub warnings: Vec<ExtractionWarning>,
    /// Non-structural per-dataset failures, in discovery order.
    pub failures: Vec<ExtractionError>,
}

/// A structural error that stopped extraction, together with the warnings
/// and failures collected from earlier entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractionAborted {
    /// The error that stopped the pass.
    pub error: ExtractionError,
    /// Warnings collected before the abort, in discovery order.
    pub warnings: Vec<ExtractionWarning>,
    /// Non-structural failures collected before the abort.
    pub failures: Vec<ExtractionError>,
}

impl fmt::Display for ExtractionAborted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "extraction aborted at '{}' after {} earlier failure(s)",
            self.error.dataset(),
            self.failures.len()
        )
    }
}

impl Error for ExtractionAborted {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.error)
    }
}

/// Reads every catalog entry and reshapes the recognized ones into an
/// [`ExtractionResult`].
///
/// Each entry is described exactly once and read exactly once, whether or
/// not the schema names it. The stored element type is checked before the
/// read: against the entry's [`ReshapeRule`] when there is one, otherwise
/// against the readable types. Names without a rule are then reported as
/// [`ExtractionWarning::UnrecognizedDataset`] and left out of the result.
/// Structural violations (see [`ExtractionError::is_structural`]) abort the
/// pass. Missing datasets and failed reads are collected in
/// [`Extraction::failures`] and the pass continues.
#[derive(Clone, Debug)]
pub struct ArrayExtractor {
    schema: ExpectedSchema,
    policy: GridPolicy,
}

impl Default for ArrayExtractor {
    /// Reference schema, square grids only.
    fn default() -> Self {
        Self::new(ExpectedSchema::reference(), GridPolicy::SquareOnly)
    }
}

impl ArrayExtractor {
    /// Create an extractor for `schema` under `policy`.
    pub fn new(schema: ExpectedSchema, policy: GridPolicy) -> Self {
        Self { schema, policy }
    }

    /// The schema entries are matched against.
    pub fn schema(&self) -> &ExpectedSchema {
        &self.schema
    }

    /// The grid shape policy.
    pub fn policy(&self) -> GridPolicy {
        self.policy
    }

    /// Extract every catalogued dataset from `container`.
    pub fn extract<C: Container>(
        &self,
        container: &C,
        catalog: &DatasetCatalog<C::Addr>,
        source: SourceResolution<'_, C::Addr>,
    ) -> Result<Extraction, ExtractionAborted> {
        let mut out = Extraction::default();

        for entry in catalog {
            let group = match source {
                SourceResolution::PerEntry => &entry.group,
                SourceResolution::Fixed(addr) => addr,
            };
            if let Err(error) = self.extract_entry(container, group, &entry.name, &mut out) {
                warn!(dataset = error.dataset(), error = %error, "extraction aborted");
                return Err(ExtractionAborted {
                    error,
                    warnings: out.warnings,
                    failures: out.failures,
                });
            }
        }

        info!(
            entries = catalog.len(),
            complete = out.result.is_complete(),
            warnings = out.warnings.len(),
            failures = out.failures.len(),
            "extraction finished"
        );
        Ok(out)
    }

    /// Describe, check, read and classify one entry. Only structural errors
    /// are returned; the rest land in `out`.
    fn extract_entry<C: Container>(
        &self,
        container: &C,
        group: &C::Addr,
        name: &str,
        out: &mut Extraction,
    ) -> Result<(), ExtractionError> {
        let info = match container.describe_dataset(group, name) {
            Ok(info) => info,
            Err(reason) => {
                self.fail(out, lookup_error(name, reason));
                return Ok(());
            }
        };

        let rule = self.schema.get(name);
        let expected = rule.map(ReshapeRule::element_type);
        let readable = match &expected {
            Some(expected) => info.element == *expected,
            None => info.element.is_supported(),
        };
        if !readable {
            return Err(ExtractionError::UnsupportedElementType {
                name: name.to_string(),
                expected,
                found: info.element,
            });
        }
        if let Some(rule) = rule {
            check_shape(name, rule, &info.shape, self.policy)?;
        }

        let buffer = match container.read_buffer(group, name, &info.element) {
            Ok(buffer) => buffer,
            Err(ContainerError::TypeMismatch { stored, .. }) => {
                return Err(ExtractionError::UnsupportedElementType {
                    name: name.to_string(),
                    expected,
                    found: stored,
                })
            }
            Err(reason) => {
                self.fail(out, lookup_error(name, reason));
                return Ok(());
            }
        };

        let Some(rule) = rule else {
            warn!(dataset = name, "unrecognized dataset, left out of the result");
            out.warnings.push(ExtractionWarning::UnrecognizedDataset {
                name: name.to_string(),
            });
            return Ok(());
        };
        let array = reshape(name, rule, &info.shape, buffer)?;
        debug!(dataset = name, shape = %info.shape, "extracted");

        if store(&mut out.result, name, rule, array) {
            warn!(dataset = name, "duplicate dataset, keeping the later one");
            out.warnings.push(ExtractionWarning::DuplicateDataset {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn fail(&self, out: &mut Extraction, err: ExtractionError) {
        warn!(dataset = err.dataset(), error = %err, "dataset skipped");
        out.failures.push(err);
    }
}

/// Lookup failures become `DatasetNotFound`; anything else is a failed read.
fn lookup_error(name: &str, reason: ContainerError) -> ExtractionError {
    match reason {
        ContainerError::NotFound { .. }
        | ContainerError::NotADataset { .. }
        | ContainerError::DanglingLink { .. } => ExtractionError::DatasetNotFound {
            name: name.to_string(),
        },
        reason => ExtractionError::ExtractionFailed {
            name: name.to_string(),
            reason,
        },
    }
}

/// Place `array` in its slot. Returns `true` if a value was replaced.
fn store(result: &mut ExtractionResult, name: &str, rule: &ReshapeRule, array: TypedArray) -> bool {
    match (name, rule, array) {
        (DIMENSION_COUNT, ReshapeRule::Scalar, TypedArray::Scalar(v)) => {
            result.dimension_count.replace(v).is_some()
        }
        (DOMAIN_BOX, ReshapeRule::IntGrid2D, TypedArray::Int2(g)) => {
            result.domain_box.replace(g).is_some()
        }
        (INTERIOR_BOX, ReshapeRule::IntGrid2D, TypedArray::Int2(g)) => {
            result.interior_box.replace(g).is_some()
        }
        (MASK, ReshapeRule::IntGrid2D, TypedArray::Int2(g)) => result.mask.replace(g).is_some(),
        (XY, ReshapeRule::FloatGrid3D { inner: 2 }, TypedArray::Float3(g)) => {
            result.xy.replace(g).is_some()
        }
        (_, _, other) => result.extra.insert(name.to_string(), other).is_some(),
    }
}
