//! txmatch record ingest
//!
//! This is where records enter the system. Two read-only lookup tables are
//! exposed to the matching layer:
//!
//! - **entities** (`id -> label`): the people we try to find in free text.
//! - **documents** (`id -> text`): transaction descriptions to match or search.
//!
//! ## What we do here
//!
//! - **Load CSV sources** - `users.csv` (`id,name`) and `transactions.csv`
//!   (`id,description`). Missing files load as empty tables.
//! - **Keep load order** - [`RecordTable`] iterates in insertion order, which
//!   downstream ranking uses to break score ties.
//! - **Cache once** - [`RecordStore`] populates each table on first access and
//!   keeps it for the life of the process. No TTL, no reloads.
//!
//! ## Example
//!
//! ```
//! use ingest::{RecordStore, StaticSource};
//!
//! let store = RecordStore::new(StaticSource::from_pairs(
//!     vec![("u1", "Liam Johnson")],
//!     vec![("t1", "payment to liam johnson for march")],
//! ));
//!
//! assert_eq!(store.entities().unwrap().len(), 1);
//! assert_eq!(
//!     store.document_text("t1").unwrap(),
//!     Some("payment to liam johnson for march")
//! );
//! ```

mod error;
mod source;
mod store;
mod types;

pub use crate::error::IngestError;
pub use crate::source::{
    CsvSource, RecordSource, StaticSource, ID_COLUMN, LABEL_COLUMN, TEXT_COLUMN,
};
pub use crate::store::RecordStore;
pub use crate::types::{Document, Entity, Record, RecordTable};
