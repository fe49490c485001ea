use crate::error::SchemaError;
use crate::factory::SchemaFactory;
use crate::schema::Schema;
use dashmap::{DashMap, Entry, VacantEntry};
use std::fmt::{Display, Formatter};
use std::hash::Hash;
use std::path::Path;
use std::sync::{Arc, OnceLock};

static GLOBAL_CACHE: OnceLock<SchemaCollection<String>> = OnceLock::new();
pub fn global_schema_cache() -> &'static SchemaCollection<String> {
    GLOBAL_CACHE.get_or_init(SchemaCollection::new)
}

/// Error types for cache operations
#[derive(Debug, Clone, PartialEq)]
pub enum CacheError {
    /// No schema is stored under the given ID
    SchemaNotFound,
    /// A schema is already stored under the given ID
    SchemaAlreadyExists,
    /// Building or restoring the schema failed.
    FailedToCreateSchema(SchemaError),
}

impl Display for CacheError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheError::SchemaNotFound => write!(f, "Schema not found in cache"),
            CacheError::SchemaAlreadyExists => write!(f, "Schema already exists in cache"),
            CacheError::FailedToCreateSchema(err) => {
                write!(f, "Failed to create new schema: {}", err)
            }
        }
    }
}

impl std::error::Error for CacheError {}

/// Built schemas shared across threads, keyed by an ID chosen by the caller.
pub struct SchemaCollection<K> {
    cache: DashMap<K, Arc<Schema>>,
}

impl<K> Default for SchemaCollection<K>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> SchemaCollection<K>
where
    K: Hash + Eq,
{
    pub fn new() -> Self {
        SchemaCollection {
            cache: DashMap::new(),
        }
    }

    pub fn insert(&self, id: K, schema: Schema) -> Result<Arc<Schema>, CacheError> {
        self.insert_with(id, || Ok(schema))
    }

    /// Builds the document at `path` with `factory` and stores the result.
    pub fn insert_from_file_path<P>(
        &self,
        id: K,
        file_path: P,
        factory: &SchemaFactory,
    ) -> Result<Arc<Schema>, CacheError>
    where
        P: AsRef<Path>,
    {
        let path = file_path.as_ref();
        log::debug!("Caching schema built from '{}'", path.display());
        self.insert_with(id, || factory.create_schema(path))
    }

    /// Restores a schema from the output of [`Schema::snapshot`] and stores it.
    pub fn insert_snapshot(&self, id: K, snapshot: &[u8]) -> Result<Arc<Schema>, CacheError> {
        self.insert_with(id, || Schema::restore(snapshot))
    }

    /// Stores the schema produced by `create` unless the ID is already taken.
    /// `create` is not called when the ID is taken.
    pub fn insert_with<F>(&self, id: K, create: F) -> Result<Arc<Schema>, CacheError>
    where
        F: FnOnce() -> Result<Schema, SchemaError>,
    {
        match self.cache.entry(id) {
            Entry::Occupied(_) => Err(CacheError::SchemaAlreadyExists),
            Entry::Vacant(entry) => Self::create_schema(entry, create),
        }
    }

    /// Returns the stored schema, building and storing it with `create` first
    /// if the ID is free.
    pub fn get_or_insert_with<F>(&self, id: K, create: F) -> Result<Arc<Schema>, CacheError>
    where
        F: FnOnce() -> Result<Schema, SchemaError>,
    {
        match self.cache.entry(id) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => Self::create_schema(entry, create),
        }
    }

    fn create_schema<F>(
        entry: VacantEntry<K, Arc<Schema>>,
        create: F,
    ) -> Result<Arc<Schema>, CacheError>
    where
        F: FnOnce() -> Result<Schema, SchemaError>,
    {
        match create() {
            Ok(schema) => {
                let schema = Arc::new(schema);
                entry.insert(schema.clone());
                log::debug!("Cached schema '{}'", schema.info().title());
                Ok(schema)
            }
            Err(e) => Err(CacheError::FailedToCreateSchema(e)),
        }
    }

    pub fn get(&self, id: &K) -> Result<Arc<Schema>, CacheError> {
        match self.cache.get(id) {
            Some(schema) => Ok(Arc::clone(schema.value())),
            None => Err(CacheError::SchemaNotFound),
        }
    }

    pub fn remove(&self, id: &K) -> Result<(), CacheError> {
        if self.cache.remove(id).is_none() {
            return Err(CacheError::SchemaNotFound);
        }
        log::debug!("Removed schema from cache");
        Ok(())
    }

    pub fn contains(&self, id: &K) -> bool {
        self.cache.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn clear(&self) {
        self.cache.clear();
        log::debug!("Cleared schema cache");
    }
}
