//! Transaction management for the money tracker.
//!
//! This module contains everything related to transaction records:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, listing, and deleting transactions
//! - The REST endpoint handlers for the `/transactions` routes

mod bulk_create_endpoint;
mod core;
mod create_endpoint;
mod delete_all_endpoint;
mod list_endpoint;

pub use bulk_create_endpoint::bulk_create_transactions_endpoint;
pub use core::{
    DEFAULT_CATEGORY, NewTransaction, Transaction, TransactionBuilder, TransactionKind,
    create_transaction, create_transaction_list, create_transaction_table,
    delete_all_transactions, get_all_transactions,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_all_endpoint::delete_all_transactions_endpoint;
pub use list_endpoint::list_transactions_endpoint;

#[cfg(test)]
pub use core::count_transactions;
