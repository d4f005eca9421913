use std::sync::Arc;
use std::time::Instant;

use once_cell::sync::OnceCell;
use tracing::info;

use crate::error::IngestError;
use crate::source::RecordSource;
use crate::types::{Document, Entity, RecordTable};

/// Read-only lookup tables populated lazily, exactly once.
///
/// Each table is loaded from the [`RecordSource`] on first access. Concurrent
/// first callers block on the same initialization, so the source is read once
/// per table no matter how many requests race. A failed load is not cached;
/// the next access tries again. Once loaded, a table is never reloaded.
pub struct RecordStore {
    source: Arc<dyn RecordSource>,
    entities: OnceCell<RecordTable<Entity>>,
    documents: OnceCell<RecordTable<Document>>,
}

impl RecordStore {
    pub fn new(source: impl RecordSource + 'static) -> Self {
        Self::with_source(Arc::new(source))
    }

    pub fn with_source(source: Arc<dyn RecordSource>) -> Self {
        Self {
            source,
            entities: OnceCell::new(),
            documents: OnceCell::new(),
        }
    }

    /// The entity table (`id -> label`), loading it on first call.
    pub fn entities(&self) -> Result<&RecordTable<Entity>, IngestError> {
        self.entities.get_or_try_init(|| {
            let start = Instant::now();
            let table = self.source.load_entities()?;
            info!(
                rows = table.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "entity table loaded"
            );
            Ok(table)
        })
    }

    /// The document table (`id -> text`), loading it on first call.
    pub fn documents(&self) -> Result<&RecordTable<Document>, IngestError> {
        self.documents.get_or_try_init(|| {
            let start = Instant::now();
            let table = self.source.load_documents()?;
            info!(
                rows = table.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "document table loaded"
            );
            Ok(table)
        })
    }

    /// Look up a single document's text. Loads the document table if needed.
    pub fn document_text(&self, id: &str) -> Result<Option<&str>, IngestError> {
        Ok(self.documents()?.get(id).map(|doc| doc.text.as_str()))
    }

    /// Populate both tables now instead of on first request.
    pub fn preload(&self) -> Result<(), IngestError> {
        self.entities()?;
        self.documents()?;
        Ok(())
    }

    /// Whether both tables have been populated.
    pub fn is_loaded(&self) -> bool {
        self.entities.get().is_some() && self.documents.get().is_some()
    }
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("entities", &self.entities.get().map(RecordTable::len))
            .field("documents", &self.documents.get().map(RecordTable::len))
            .finish()
    }
}
