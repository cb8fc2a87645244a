//! Money Tracker is a personal finance tracker.
//!
//! This library provides a REST API that stores income and expense
//! transactions in SQLite and derives the balance summary and chart data
//! from the full transaction list.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod csv_import;
mod database_id;
mod db;
mod endpoints;
mod routing;
mod summary;
mod transaction;

pub use app_state::AppState;
pub use csv_import::parse_csv;
pub use db::initialize as initialize_db;
pub use routing::build_router;
pub use summary::{CategoryTotal, DailyTotal, Summary, summarize};
pub use transaction::{DEFAULT_CATEGORY, Transaction, TransactionBuilder, TransactionKind};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request body could not be parsed as the expected JSON shape.
    ///
    /// Covers missing required fields and wrong-typed values, e.g. a body
    /// without an `amount` or with a `type` other than "credit" or "debit".
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// An empty string was used for a transaction description.
    #[error("Transaction text cannot be empty")]
    EmptyText,

    /// A negative or non-finite number was used for a transaction amount.
    ///
    /// Amounts are unsigned magnitudes; the direction of the money comes
    /// from the transaction type.
    #[error("Invalid amount {0}: amounts must be finite and not negative")]
    InvalidAmount(f64),

    /// The multipart form could not be parsed as a list of CSV files.
    #[error("Could not parse multipart form: {0}")]
    MultipartError(String),

    /// The multipart form did not contain a CSV file.
    #[error("File is not a CSV")]
    NotCSV,

    /// The CSV had issues that prevented it from being parsed.
    ///
    /// This is a file-level error; problems with individual rows are
    /// handled by the import fallbacks and never raised.
    #[error("Could not parse the CSV file: {0}")]
    InvalidCSV(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self {
            Error::InvalidBody(_) | Error::EmptyText | Error::InvalidAmount(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Error::MultipartError(_) | Error::NotCSV | Error::InvalidCSV(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::SqlError(_) | Error::DatabaseLockError => {
                tracing::error!("An unexpected error occurred: {}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod error_response_tests {
    use axum::{body, http::StatusCode, response::IntoResponse};

    use crate::Error;

    async fn response_parts(error: Error) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Could not read response body");
        let body = serde_json::from_slice(&bytes).expect("Response body was not JSON");

        (status, body)
    }

    #[tokio::test]
    async fn validation_errors_respond_422_with_error_body() {
        let (status, body) = response_parts(Error::EmptyText).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "Transaction text cannot be empty");
    }

    #[tokio::test]
    async fn upload_errors_respond_400_with_error_body() {
        let (status, body) = response_parts(Error::NotCSV).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "File is not a CSV");
    }

    #[tokio::test]
    async fn store_errors_respond_500_with_error_body() {
        let (status, body) = response_parts(Error::DatabaseLockError).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "could not acquire the database lock");
    }
}
