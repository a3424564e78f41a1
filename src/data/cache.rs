use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use super::loader;
use super::model::Table;
use super::schema::Schema;
use crate::error::{PipelineError, PipelineResult};

/// Something that can turn a file into a [`Table`].
pub trait TableReader {
    fn read(&self, path: &Path) -> Result<Table>;
}

/// Reads from disk through [`loader::load_file`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FileReader;

impl TableReader for FileReader {
    fn read(&self, path: &Path) -> Result<Table> {
        loader::load_file(path)
    }
}

// ---------------------------------------------------------------------------
// Read-through cache keyed by file identity
// ---------------------------------------------------------------------------

/// Loaded tables keyed by canonical path.
///
/// An entry stays until [`TableCache::invalidate`] or
/// [`TableCache::invalidate_all`] drops it; there is no implicit expiry.
/// Schema checks are remembered alongside the table and dropped with it.
pub struct TableCache<R = FileReader> {
    reader: R,
    tables: HashMap<PathBuf, Arc<Table>>,
    checked: HashMap<(PathBuf, &'static str), PipelineResult<()>>,
}

impl Default for TableCache<FileReader> {
    fn default() -> Self {
        TableCache::new(FileReader)
    }
}

impl<R: TableReader> TableCache<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            tables: HashMap::new(),
            checked: HashMap::new(),
        }
    }

    /// File identity: the canonical path when the file exists, else the path as given.
    fn key(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
    }

    /// Return the cached table for `path`, reading it on first use.
    pub fn load(&mut self, path: &Path) -> Result<Arc<Table>> {
        let key = Self::key(path);
        if let Some(table) = self.tables.get(&key) {
            log::debug!("cache hit for {}", key.display());
            return Ok(Arc::clone(table));
        }

        let table = Arc::new(self.reader.read(path)?);
        log::info!(
            "Loaded {} rows with columns {:?} from {}",
            table.len(),
            table.columns(),
            path.display()
        );
        self.tables.insert(key, Arc::clone(&table));
        Ok(table)
    }

    /// Load and check against `schema`.
    ///
    /// The check runs once per loaded table; later calls replay its outcome.
    /// A table that fails validation stays cached: fixing the file requires
    /// an explicit reload anyway.
    pub fn load_validated(
        &mut self,
        path: &Path,
        schema: &Schema,
    ) -> PipelineResult<Arc<Table>> {
        let table = self.load(path).map_err(|e| {
            log::error!("Failed to load {}: {e:#}", path.display());
            PipelineError::SourceUnavailable {
                source_name: schema.name.to_string(),
                reason: format!("{e:#}"),
            }
        })?;
        self.checked
            .entry((Self::key(path), schema.name))
            .or_insert_with(|| schema.validate(&table))
            .clone()?;
        Ok(table)
    }

    /// Drop the cached table for `path`. Returns whether an entry existed.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        let key = Self::key(path);
        self.checked.retain(|(p, _), _| *p != key);
        self.tables.remove(&key).is_some()
    }

    pub fn invalidate_all(&mut self) {
        self.tables.clear();
        self.checked.clear();
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::data::model::Value;

    struct CountingReader {
        reads: Cell<usize>,
    }

    impl TableReader for &CountingReader {
        fn read(&self, _path: &Path) -> Result<Table> {
            self.reads.set(self.reads.get() + 1);
            Ok(Table::from_columns(vec![("Muestra", vec![Value::from("A")])])?)
        }
    }

    #[test]
    fn second_load_is_served_from_cache() {
        let reader = CountingReader { reads: Cell::new(0) };
        let mut cache = TableCache::new(&reader);
        let a = cache.load(Path::new("reo2.xlsx")).unwrap();
        let b = cache.load(Path::new("reo2.xlsx")).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(reader.reads.get(), 1);
    }

    #[test]
    fn invalidate_forces_a_reread() {
        let reader = CountingReader { reads: Cell::new(0) };
        let mut cache = TableCache::new(&reader);
        cache.load(Path::new("reo2.xlsx")).unwrap();
        assert!(cache.invalidate(Path::new("reo2.xlsx")));
        assert!(!cache.invalidate(Path::new("reo2.xlsx")));
        cache.load(Path::new("reo2.xlsx")).unwrap();
        assert_eq!(reader.reads.get(), 2);
    }

    #[test]
    fn schema_check_runs_once_per_load() {
        let reader = CountingReader { reads: Cell::new(0) };
        let mut cache = TableCache::new(&reader);
        let schema = crate::data::source::DataSource::Viability.schema();
        let path = Path::new("viabilidad.xlsx");

        let first = cache.load_validated(path, &schema).unwrap_err();
        assert!(matches!(first, PipelineError::MissingColumns { .. }));
        assert_eq!(cache.checked.len(), 1);

        let second = cache.load_validated(path, &schema).unwrap_err();
        assert_eq!(second, first);
        assert_eq!(cache.checked.len(), 1);
        assert_eq!(reader.reads.get(), 1);

        assert!(cache.invalidate(path));
        assert!(cache.checked.is_empty());
        assert_eq!(cache.load_validated(path, &schema).unwrap_err(), first);
        assert_eq!(reader.reads.get(), 2);

        cache.invalidate_all();
        assert!(cache.checked.is_empty());
    }

    #[test]
    fn unreadable_file_is_reported_as_unavailable_source() {
        let mut cache = TableCache::default();
        let schema = crate::data::source::DataSource::Rheology.schema();
        let err = cache
            .load_validated(Path::new("/definitely/not/here/reo2.xlsx"), &schema)
            .unwrap_err();
        assert!(matches!(err, PipelineError::SourceUnavailable { .. }));
        assert!(cache.is_empty());
    }
}
