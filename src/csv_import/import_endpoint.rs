//! Defines the endpoint for importing transactions from uploaded CSV files.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Multipart, State, multipart::Field},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    csv_import::csv::parse_csv,
    transaction::{Transaction, create_transaction_list},
};

/// The state needed for importing transactions.
#[derive(Debug, Clone)]
pub struct ImportState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ImportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for importing transactions from uploaded CSV files,
/// responds with the stored transactions.
///
/// Accepts a multipart form where every field is a CSV file. Rows from all
/// files are parsed with the fallbacks described in
/// [parse_csv] and stored in one batch, so a failure
/// anywhere means nothing is persisted. A form with no files is a no-op that
/// responds with an empty list.
pub async fn import_transactions_endpoint(
    State(state): State<ImportState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Vec<Transaction>>), Error> {
    let mut builders = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| Error::MultipartError(error.to_string()))?
    {
        let csv_data = parse_multipart_field(field).await?;
        builders.extend(parse_csv(&csv_data)?);
    }

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = create_transaction_list(builders, &connection)?;
    tracing::info!("Imported {} transactions from CSV", transactions.len());

    Ok((StatusCode::CREATED, Json(transactions)))
}

async fn parse_multipart_field(field: Field<'_>) -> Result<String, Error> {
    if field.content_type() != Some("text/csv") {
        return Err(Error::NotCSV);
    }

    let file_name = match field.file_name() {
        Some(file_name) => file_name.to_owned(),
        None => {
            tracing::error!("Could not get file name from multipart form field: {field:#?}");
            return Err(Error::MultipartError(
                "Could not get file name from multipart form field".to_owned(),
            ));
        }
    };
    let data = match field.text().await {
        Ok(data) => data,
        Err(error) => {
            tracing::error!("Could not read data from multipart form field: {error}");
            return Err(Error::MultipartError(
                "Could not read data from multipart form field.".to_owned(),
            ));
        }
    };

    tracing::debug!("Received file '{}' that is {} bytes", file_name, data.len());

    Ok(data)
}
