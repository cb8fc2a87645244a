//! Defines the endpoint for the transaction summary.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    summary::aggregation::{Summary, summarize},
    transaction::get_all_transactions,
};

/// The state needed to summarize transactions.
#[derive(Debug, Clone)]
pub struct SummaryState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for the transaction summary: income and expense totals,
/// the balance, and the per-category and per-day expense breakdowns.
///
/// The summary is recomputed from the full transaction list on every request.
pub async fn get_summary_endpoint(
    State(state): State<SummaryState>,
) -> Result<(StatusCode, Json<Summary>), Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_all_transactions(&connection)?;

    Ok((StatusCode::OK, Json(summarize(&transactions))))
}
