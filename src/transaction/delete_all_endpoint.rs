//! Defines the endpoint for deleting all transactions.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde_json::{Value, json};

use crate::{AppState, Error, transaction::delete_all_transactions};

/// The state needed to delete all transactions.
#[derive(Debug, Clone)]
pub struct DeleteAllTransactionsState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteAllTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting every transaction, responds with a
/// confirmation message.
///
/// Deleting from an empty store is not an error; the response is the same.
pub async fn delete_all_transactions_endpoint(
    State(state): State<DeleteAllTransactionsState>,
) -> Result<(StatusCode, Json<Value>), Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let count = delete_all_transactions(&connection)?;
    tracing::info!("Deleted {count} transactions");

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "All transactions deleted" })),
    ))
}
