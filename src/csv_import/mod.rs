//! CSV import for the money tracker.
//!
//! This module contains everything related to bulk-importing transactions
//! from uploaded CSV files:
//! - A lossy CSV parser that maps rows to transactions by header name
//! - The route handler that accepts multipart file uploads

mod csv;
mod import_endpoint;

pub use csv::parse_csv;
pub use import_endpoint::import_transactions_endpoint;
