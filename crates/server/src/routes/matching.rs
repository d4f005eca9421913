use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use txmatch::{MatchOutcome, SearchOutcome};

use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;

/// One matched user
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct UserMatch {
    pub id: String,
    pub match_metric: f32,
}

/// Response of `GET /match-users/{id}`
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct MatchUsersResponse {
    pub users: Vec<UserMatch>,
    pub total_number_of_matches: usize,
}

impl From<MatchOutcome> for MatchUsersResponse {
    fn from(outcome: MatchOutcome) -> Self {
        Self {
            users: outcome
                .matches
                .into_iter()
                .map(|m| UserMatch {
                    id: m.entity_id,
                    match_metric: m.score,
                })
                .collect(),
            total_number_of_matches: outcome.total,
        }
    }
}

/// One similar transaction; `embedding` is the normalized similarity score
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TransactionMatch {
    pub id: String,
    pub embedding: f32,
}

/// Response of `GET /search-similar-descriptions`
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    pub transactions: Vec<TransactionMatch>,
    pub total_number_of_tokens_used: usize,
}

impl From<SearchOutcome> for SearchResponse {
    fn from(outcome: SearchOutcome) -> Self {
        Self {
            transactions: outcome
                .results
                .into_iter()
                .map(|r| TransactionMatch {
                    id: r.document_id,
                    embedding: r.score,
                })
                .collect(),
            total_number_of_tokens_used: outcome.token_count,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: Option<String>,
}

/// Users whose names plausibly appear in a transaction's description.
///
/// An unknown transaction id returns an empty list, not a 404.
pub async fn match_users(
    State(state): State<Arc<ServerState>>,
    Path(transaction_id): Path<String>,
) -> ServerResult<Json<MatchUsersResponse>> {
    let engine = Arc::clone(&state.engine);
    // First call may read the CSV files
    let outcome =
        tokio::task::spawn_blocking(move || engine.match_users(&transaction_id)).await??;

    metrics::histogram!("txmatch_matches_returned", "endpoint" => "match_users")
        .record(outcome.total as f64);
    Ok(Json(outcome.into()))
}

/// Transactions whose descriptions are semantically close to `query`.
pub async fn search_similar_descriptions(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<SearchParams>,
) -> ServerResult<Json<SearchResponse>> {
    let query = params
        .query
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ServerError::Validation("query parameter must not be empty".into()))?;

    let outcome = state.engine.search_similar(&query).await?;

    metrics::histogram!("txmatch_matches_returned", "endpoint" => "search_similar_descriptions")
        .record(outcome.results.len() as f64);
    Ok(Json(outcome.into()))
}
