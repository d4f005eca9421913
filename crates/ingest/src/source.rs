use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::IngestError;
use crate::types::{Document, Entity, RecordTable};

/// Column holding the record identifier in both tables.
pub const ID_COLUMN: &str = "id";
/// Column holding the entity label in the users table.
pub const LABEL_COLUMN: &str = "name";
/// Column holding the document text in the transactions table.
pub const TEXT_COLUMN: &str = "description";

/// Backing storage for the two lookup tables.
///
/// Implementations are called at most once per table by [`RecordStore`](crate::RecordStore)
/// after a successful load.
pub trait RecordSource: Send + Sync {
    fn load_entities(&self) -> Result<RecordTable<Entity>, IngestError>;
    fn load_documents(&self) -> Result<RecordTable<Document>, IngestError>;
}

/// CSV files with a header row: `id,name` for users and `id,description`
/// for transactions. Extra columns are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvSource {
    users_path: PathBuf,
    transactions_path: PathBuf,
}

impl CsvSource {
    pub fn new(users_path: impl Into<PathBuf>, transactions_path: impl Into<PathBuf>) -> Self {
        Self {
            users_path: users_path.into(),
            transactions_path: transactions_path.into(),
        }
    }

    pub fn users_path(&self) -> &Path {
        &self.users_path
    }

    pub fn transactions_path(&self) -> &Path {
        &self.transactions_path
    }
}

impl RecordSource for CsvSource {
    fn load_entities(&self) -> Result<RecordTable<Entity>, IngestError> {
        let rows = read_id_value_pairs(&self.users_path, LABEL_COLUMN)?;
        Ok(rows
            .into_iter()
            .map(|(id, label)| Entity { id, label })
            .collect())
    }

    fn load_documents(&self) -> Result<RecordTable<Document>, IngestError> {
        let rows = read_id_value_pairs(&self.transactions_path, TEXT_COLUMN)?;
        Ok(rows
            .into_iter()
            .map(|(id, text)| Document { id, text })
            .collect())
    }
}

/// In-memory tables, cloned on every load. Handy for tests and for callers
/// that already hold their records.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    entities: RecordTable<Entity>,
    documents: RecordTable<Document>,
}

impl StaticSource {
    pub fn new(entities: RecordTable<Entity>, documents: RecordTable<Document>) -> Self {
        Self {
            entities,
            documents,
        }
    }

    /// Build from `(id, label)` and `(id, text)` pairs.
    pub fn from_pairs<E, D, K, V>(entities: E, documents: D) -> Self
    where
        E: IntoIterator<Item = (K, V)>,
        D: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entities: entities
                .into_iter()
                .map(|(id, label)| Entity::new(id, label))
                .collect(),
            documents: documents
                .into_iter()
                .map(|(id, text)| Document::new(id, text))
                .collect(),
        }
    }
}

impl RecordSource for StaticSource {
    fn load_entities(&self) -> Result<RecordTable<Entity>, IngestError> {
        Ok(self.entities.clone())
    }

    fn load_documents(&self) -> Result<RecordTable<Document>, IngestError> {
        Ok(self.documents.clone())
    }
}

/// Read `(id, value)` pairs from a headed CSV file.
///
/// A missing file or a header without the required columns yields no rows.
/// Rows too short to carry both fields are skipped.
fn read_id_value_pairs(
    path: &Path,
    value_column: &str,
) -> Result<Vec<(String, String)>, IngestError> {
    let location = path.display().to_string();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            warn!(path = %location, "record source not found, using empty table");
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(IngestError::Io {
                path: location,
                source,
            })
        }
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|source| IngestError::Csv {
            path: location.clone(),
            source,
        })?
        .clone();
    let id_idx = headers.iter().position(|h| h == ID_COLUMN);
    let value_idx = headers.iter().position(|h| h == value_column);
    let (Some(id_idx), Some(value_idx)) = (id_idx, value_idx) else {
        warn!(
            path = %location,
            required = %format!("{ID_COLUMN},{value_column}"),
            "record source header is missing required columns, using empty table"
        );
        return Ok(Vec::new());
    };

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::Csv {
            path: location.clone(),
            source,
        })?;
        match (record.get(id_idx), record.get(value_idx)) {
            (Some(id), Some(value)) => rows.push((id.to_string(), value.to_string())),
            _ => skipped += 1,
        }
    }

    debug!(path = %location, rows = rows.len(), skipped, "read record source");
    Ok(rows)
}
