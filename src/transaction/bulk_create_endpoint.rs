//! Defines the endpoint for creating many transactions in one request.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    transaction::{NewTransaction, Transaction, create_transaction_list},
};

/// The state needed to create transactions in bulk.
#[derive(Debug, Clone)]
pub struct BulkCreateTransactionsState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BulkCreateTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a list of transactions in a single batch,
/// responds with the stored transactions in the same order as the request.
///
/// The batch is all-or-nothing: every row is validated before any insert
/// happens, and the inserts share one database transaction, so a bad row
/// anywhere in the list means no rows are persisted. An empty list is a
/// no-op that responds with an empty list.
pub async fn bulk_create_transactions_endpoint(
    State(state): State<BulkCreateTransactionsState>,
    payload: Result<Json<Vec<NewTransaction>>, JsonRejection>,
) -> Result<(StatusCode, Json<Vec<Transaction>>), Error> {
    let Json(new_transactions) =
        payload.map_err(|rejection| Error::InvalidBody(rejection.body_text()))?;

    let builders = new_transactions
        .into_iter()
        .map(NewTransaction::into_builder)
        .collect::<Result<Vec<_>, Error>>()?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = create_transaction_list(builders, &connection)?;
    tracing::info!("Saved {} transactions in bulk", transactions.len());

    Ok((StatusCode::OK, Json(transactions)))
}
