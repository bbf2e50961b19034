//! Fixed-capacity, append-only record of discovered datasets.

use h5grid_core::TraversalError;

/// One discovered dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogEntry<A> {
    /// Link name of the dataset inside its group.
    pub name: String,
    /// Position in discovery order, starting at 0.
    pub index: usize,
    /// Path of the group the dataset was discovered in, e.g. `/simulation`.
    pub group_path: String,
    /// Address of the group the dataset was discovered in.
    pub group: A,
}

/// Datasets in discovery order, bounded to the number the caller expects.
///
/// Written once during traversal and consumed once by extraction.
/// Appending past [`capacity`](Self::capacity) is a caller configuration
/// error and reported as [`TraversalError::CatalogOverflow`].
#[derive(Clone, Debug)]
pub struct DatasetCatalog<A> {
    entries: Vec<CatalogEntry<A>>,
    capacity: usize,
}

impl<A> DatasetCatalog<A> {
    /// An empty catalog holding at most `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a dataset found in `group`, reachable at `group_path`.
    /// Returns its discovery index.
    pub fn append(
        &mut self,
        name: impl Into<String>,
        group_path: impl Into<String>,
        group: A,
    ) -> Result<usize, TraversalError> {
        let name = name.into();
        if self.is_full() {
            return Err(TraversalError::CatalogOverflow {
                capacity: self.capacity,
                name,
            });
        }
        let index = self.entries.len();
        self.entries.push(CatalogEntry {
            name,
            index,
            group_path: group_path.into(),
            group,
        });
        Ok(index)
    }

    /// Entries in discovery order.
    pub fn iter(&self) -> std::slice::Iter<'_, CatalogEntry<A>> {
        self.entries.iter()
    }

    /// Entry at discovery index `index`.
    pub fn get(&self, index: usize) -> Option<&CatalogEntry<A>> {
        self.entries.get(index)
    }

    /// Dataset names in discovery order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Returns `true` once `len() == capacity()`.
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Number of entries recorded.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Consume the catalog, returning its entries.
    pub fn into_entries(self) -> Vec<CatalogEntry<A>> {
        self.entries
    }
}

impl<'a, A> IntoIterator for &'a DatasetCatalog<A> {
    type Item = &'a CatalogEntry<A>;
    type IntoIter = std::slice::Iter<'a, CatalogEntry<A>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
