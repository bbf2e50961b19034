//! Open, walk, extract, close.

use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};

use h5grid_core::{
    Backend, Container, ContainerError, ExtractionError, ExtractionResult, ExtractionWarning,
    TraversalError,
};
use h5grid_extract::{ArrayExtractor, SourceResolution};
use h5grid_walk::{CatalogEntry, DatasetCatalog, PathWalker, WalkReport};
use tracing::{info, warn};

use crate::config::{ConfigError, LoadConfig, SourceGroup};

/// Outcome of a successful load.
#[derive(Clone, Debug)]
pub struct Loaded<A> {
    /// The extracted arrays.
    pub result: ExtractionResult,
    /// What the traversal saw, including loops and the hierarchy outline.
    pub walk: WalkReport<A>,
    /// Unrecognized and duplicate datasets.
    pub warnings: Vec<ExtractionWarning>,
    /// Datasets that were catalogued but could not be extracted.
    pub failures: Vec<ExtractionError>,
}

/// Runs the whole pipeline against one container.
///
/// The container is closed on every path out of [`run`](Self::run),
/// including traversal and extraction failures.
#[derive(Clone, Debug, Default)]
pub struct Loader {
    config: LoadConfig,
}

impl Loader {
    /// Create a loader. The configuration is validated by [`run`](Self::run).
    pub fn new(config: LoadConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &LoadConfig {
        &self.config
    }

    /// Open `path` with `backend`, load it, and close it.
    ///
    /// When loading and closing both fail, the loading error is returned and
    /// the close error is logged.
    pub fn run<B: Backend>(
        &self,
        backend: &B,
        path: &Path,
    ) -> Result<Loaded<<B::Container as Container>::Addr>, LoadError> {
        self.config.validate().map_err(LoadError::InvalidConfig)?;
        let container = backend
            .open(path)
            .map_err(|source| LoadError::ContainerOpenFailed {
                path: path.to_path_buf(),
                source,
            })?;
        info!(path = %path.display(), "container opened");

        let loaded = self.load_from(&container);
        match (loaded, container.close()) {
            (Ok(loaded), Ok(())) => Ok(loaded),
            (Ok(_), Err(e)) => Err(LoadError::CloseFailed(e)),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(close)) => {
                warn!(error = %close, "close failed after an earlier error");
                Err(e)
            }
        }
    }

    /// Walk and extract an already open container. The caller closes it.
    pub fn load_from<C: Container>(&self, container: &C) -> Result<Loaded<C::Addr>, LoadError> {
        self.config.validate().map_err(LoadError::InvalidConfig)?;
        let mut catalog = DatasetCatalog::with_capacity(self.config.effective_capacity());

        let walk = match PathWalker::new().traverse(container, &mut catalog) {
            Ok(walk) => walk,
            Err(source) => {
                return Err(LoadError::Traversal {
                    source,
                    partial: catalog.iter().map(CataloguedDataset::from).collect(),
                })
            }
        };
        for l in &walk.loops {
            info!(path = %l.path, depth = l.depth, "loop skipped");
        }

        let source = match self.config.source {
            SourceGroup::Recorded => SourceResolution::PerEntry,
            SourceGroup::LastEntered => SourceResolution::Fixed(&walk.last_group),
        };
        let extractor = ArrayExtractor::new(self.config.schema.clone(), self.config.grid);
        let extraction = extractor
            .extract(container, &catalog, source)
            .map_err(|aborted| LoadError::Extraction {
                source: aborted.error,
                warnings: aborted.warnings,
                failures: aborted.failures,
            })?;

        info!(
            datasets = catalog.len(),
            groups = walk.groups_entered,
            complete = extraction.result.is_complete(),
            "load complete"
        );
        Ok(Loaded {
            result: extraction.result,
            walk,
            warnings: extraction.warnings,
            failures: extraction.failures,
        })
    }
}

/// A dataset catalogued before traversal stopped.
///
/// The group address is not kept: the container is closed before the
/// error reaches the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CataloguedDataset {
    /// Position in discovery order.
    pub index: usize,
    /// Link name of the dataset.
    pub name: String,
    /// Path of the group it was discovered in.
    pub group_path: String,
}

impl<A> From<&CatalogEntry<A>> for CataloguedDataset {
    fn from(entry: &CatalogEntry<A>) -> Self {
        Self {
            index: entry.index,
            name: entry.name.clone(),
            group_path: entry.group_path.clone(),
        }
    }
}

/// Errors that end a load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadError {
    /// The configuration failed validation.
    InvalidConfig(ConfigError),
    /// The backend could not open the file.
    ContainerOpenFailed {
        /// File that was being opened.
        path: PathBuf,
        /// Backend error.
        source: ContainerError,
    },
    /// Traversal aborted.
    Traversal {
        /// Why traversal stopped.
        source: TraversalError,
        /// Datasets catalogued before the failure, in discovery order.
        partial: Vec<CataloguedDataset>,
    },
    /// Extraction hit a structural error.
    Extraction {
        /// The structural error.
        source: ExtractionError,
        /// Warnings collected before the abort.
        warnings: Vec<ExtractionWarning>,
        /// Non-structural failures collected before the abort.
        failures: Vec<ExtractionError>,
    },
    /// Loading succeeded but closing the container did not.
    CloseFailed(ContainerError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(_) => write!(f, "invalid load configuration"),
            Self::ContainerOpenFailed { path, .. } => {
                write!(f, "cannot open '{}'", path.display())
            }
            Self::Traversal { partial, .. } => write!(
                f,
                "traversal failed after cataloguing {} dataset(s)",
                partial.len()
            ),
            Self::Extraction { failures, .. } => write!(
                f,
                "extraction aborted after {} earlier dataset failure(s)",
                failures.len()
            ),
            Self::CloseFailed(_) => write!(f, "failed to close container"),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidConfig(e) => Some(e),
            Self::ContainerOpenFailed { source, .. } => Some(source),
            Self::Traversal { source, .. } => Some(source),
            Self::Extraction { source, .. } => Some(source),
            Self::CloseFailed(e) => Some(e),
        }
    }
}
