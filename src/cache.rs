//! Analysis results keyed by schema identity.

use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;

use crate::analysis::analyze_schema;
use crate::error::ShapeError;
use crate::ir::SchemaInfo;
use crate::schema::{ObjectSchema, SchemaId};

/// Memoizes analysis per [`SchemaId`], optionally storing an application
/// record `I` built from the fresh [`SchemaInfo`].
///
/// Lookups and inserts go through a concurrent map. Analysis itself runs
/// outside the map's locks, so two threads missing on the same schema both
/// compute it and the later insert wins; both results are equivalent.
pub struct SchemaCache<I = SchemaInfo> {
    entries: DashMap<SchemaId, Arc<I>>,
}

impl<I> Default for SchemaCache<I> {
    fn default() -> Self {
        SchemaCache { entries: DashMap::new() }
    }
}

impl<I> std::fmt::Debug for SchemaCache<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaCache").field("len", &self.entries.len()).finish()
    }
}

impl<I> SchemaCache<I> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached record for `schema`, analyzing and running `extend` on a miss.
    /// `extend` is not called again for a schema already cached.
    pub fn analyze_with<F>(&self, schema: &ObjectSchema, extend: F) -> Result<Arc<I>, ShapeError>
    where
        F: FnOnce(SchemaInfo) -> I,
    {
        let id = schema.id();
        if let Some(hit) = self.entries.get(&id) {
            tracing::trace!(schema = id.get(), "schema info cache hit");
            return Ok(Arc::clone(hit.value()));
        }

        tracing::debug!(schema = id.get(), fields = schema.len(), "analyzing schema");
        let record = Arc::new(extend(analyze_schema(schema)?));
        self.entries.insert(id, Arc::clone(&record));
        Ok(record)
    }

    pub fn get(&self, schema: &ObjectSchema) -> Option<Arc<I>> {
        self.entries.get(&schema.id()).map(|hit| Arc::clone(hit.value()))
    }

    /// Drop the entry for one schema.
    pub fn evict(&self, schema: &ObjectSchema) -> Option<Arc<I>> {
        self.entries.remove(&schema.id()).map(|(_, record)| record)
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<I: From<SchemaInfo>> SchemaCache<I> {
    pub fn analyze(&self, schema: &ObjectSchema) -> Result<Arc<I>, ShapeError> {
        self.analyze_with(schema, I::from)
    }
}

// -------------------------- Process-wide cache ---------------------------- //

static GLOBAL: Lazy<SchemaCache> = Lazy::new(SchemaCache::new);

/// Analyze through the process-wide cache.
pub fn analyze(schema: &ObjectSchema) -> Result<Arc<SchemaInfo>, ShapeError> {
    GLOBAL.analyze(schema)
}

/// Empty the process-wide cache.
pub fn reset_analysis_cache() {
    GLOBAL.clear();
}
