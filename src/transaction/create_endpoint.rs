//! Defines the endpoint for creating a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    transaction::{NewTransaction, Transaction, create_transaction},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new transaction, responds with the stored
/// transaction including its assigned ID.
///
/// A body that is missing `text`, `amount`, or `type`, or that fails the
/// presence checks on `text` and `amount`, responds with a 422 validation
/// error rather than a store error.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    payload: Result<Json<NewTransaction>, JsonRejection>,
) -> Result<(StatusCode, Json<Transaction>), Error> {
    let Json(new_transaction) =
        payload.map_err(|rejection| Error::InvalidBody(rejection.body_text()))?;
    let builder = new_transaction.into_builder()?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = create_transaction(builder, &connection)?;
    tracing::info!(
        "Saved transaction {}: {} {} for '{}'",
        transaction.id,
        transaction.kind,
        transaction.amount,
        transaction.text
    );

    Ok((StatusCode::OK, Json(transaction)))
}
