//! The API endpoint URIs.

/// The route to list, create, and delete transactions.
pub const TRANSACTIONS: &str = "/transactions";
/// The route to create many transactions in a single request.
pub const TRANSACTIONS_BULK: &str = "/transactions/bulk";
/// The route to upload CSV files for importing transactions.
pub const TRANSACTIONS_IMPORT: &str = "/transactions/import";
/// The route to get the balance summary and chart data.
pub const TRANSACTIONS_SUMMARY: &str = "/transactions/summary";

/// The route to request a cup of coffee (experimental).
pub const COFFEE: &str = "/coffee";
