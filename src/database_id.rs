//! Database ID type definition.

/// Alias for the integer type used for mapping to database IDs.
pub type TransactionId = i64;
