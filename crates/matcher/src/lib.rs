//! # txmatch scoring core (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` holds the only real algorithmic content of txmatch: it ranks
//! entities against a document's text and documents against a free-text
//! query. Everything around it (record loading, HTTP, configuration) is lookup
//! plumbing living in other crates.
//!
//! Both scorers are pure over their inputs: they never mutate the record
//! tables, never log, and never retry. The only side effect is the embedding
//! call made by [`SimilaritySearch`].
//!
//! ## Core Types
//!
//! - [`FuzzyMatcher`]: five-stage lexical cascade evaluated per entity, first
//!   stage to fire wins:
//!   1. exact text (`1.0`)
//!   2. exact token (`0.95`)
//!   3. substring (`0.85 + 0.1 * label_chars / text_chars`)
//!   4. best single-token fuzzy ratio, if `>= 0.70`
//!   5. whole-text fuzzy ratio, if `>= 0.70`
//! - [`SimilaritySearch`]: cosine similarity over embeddings, normalized to
//!   `(cos + 1) / 2` and kept only when strictly above a threshold.
//! - [`MatchOutcome`] / [`SearchOutcome`]: score-sorted result carriers.
//!
//! Fuzzy matches are ordered on their unrounded scores and rounded to two
//! decimals afterwards; similarity results are rounded and then ordered.
//! Sorting is stable, so equal keys keep the load order of the input table.
//!
//! ## Example Usage
//!
//! ```
//! use ingest::{Document, Entity};
//! use matcher::{FuzzyMatcher, SimilaritySearch};
//! use semantic::HashEmbedder;
//!
//! let users = vec![Entity::new("u1", "Liam Johnson"), Entity::new("u2", "Zoe")];
//! let outcome = FuzzyMatcher::new().rank("payment to liam johnson for march", &users);
//! assert_eq!(outcome.matches[0].entity_id, "u1");
//! assert_eq!(outcome.matches[0].score, 0.89);
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let docs = vec![Document::new("t1", "salary payment")];
//! let search = SimilaritySearch::new(0.3).unwrap();
//! let found = search.search("salary", &docs, &HashEmbedder::new(384)).await.unwrap();
//! assert_eq!(found.token_count, 1);
//! # });
//! ```

pub mod fuzzy;
pub mod rank;
pub mod ratio;
pub mod similarity;
pub mod text;
pub mod types;

pub use crate::fuzzy::{score_label, FuzzyMatcher, FUZZY_THRESHOLD};
pub use crate::ratio::{indel_ratio, token_sort_ratio};
pub use crate::similarity::{
    cosine_similarity, normalize_cosine, SimilaritySearch, DEFAULT_THRESHOLD,
};
pub use crate::types::{MatchError, MatchOutcome, MatchResult, SearchOutcome, SimilarityResult};
