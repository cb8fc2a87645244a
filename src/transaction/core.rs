//! Defines the core data models and database queries for transactions.

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{Error, database_id::TransactionId};

/// The category given to transactions created without one.
pub const DEFAULT_CATEGORY: &str = "Others";

// ============================================================================
// MODELS
// ============================================================================

/// Whether a transaction moves money into or out of the account.
///
/// Serialized on the wire and stored in the database as the lowercase strings
/// `"credit"` and `"debit"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// An inflow, i.e. income.
    Credit,
    /// An outflow, i.e. an expense.
    Debit,
}

impl TransactionKind {
    /// The lowercase name used on the wire and in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Credit => "credit",
            TransactionKind::Debit => "debit",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "credit" => Ok(TransactionKind::Credit),
            "debit" => Ok(TransactionKind::Debit),
            other => Err(FromSqlError::Other(
                format!("unrecognised transaction type {other:?}").into(),
            )),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// The amount is always an unsigned magnitude; the direction of the money
/// comes from [TransactionKind], never from the sign of `amount`.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction, assigned by the database on creation.
    pub id: TransactionId,
    /// A text description of what the transaction was for.
    pub text: String,
    /// The amount of money spent or earned, as a non-negative magnitude.
    pub amount: f64,
    /// Whether the transaction is a credit (inflow) or debit (outflow).
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The category the transaction belongs to, e.g. "Food", "Rent".
    pub category: String,
    /// When the transaction happened.
    pub date: Date,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(text: &str, amount: f64, kind: TransactionKind) -> TransactionBuilder {
        TransactionBuilder {
            text: text.to_owned(),
            amount,
            kind,
            category: DEFAULT_CATEGORY.to_owned(),
            date: OffsetDateTime::now_utc().date(),
        }
    }
}

/// A candidate transaction that has not been persisted yet.
///
/// Carries the required fields from [Transaction::build] and defaults for the
/// optional ones: the category defaults to [DEFAULT_CATEGORY] and the date to
/// the current UTC date. Both the manual-entry endpoints and the CSV importer
/// build transactions through this type.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// A text description of what the transaction is for.
    pub text: String,
    /// The amount of money, as a non-negative magnitude.
    pub amount: f64,
    /// Whether the transaction is a credit (inflow) or debit (outflow).
    pub kind: TransactionKind,
    /// The category the transaction belongs to.
    pub category: String,
    /// When the transaction happened.
    pub date: Date,
}

impl TransactionBuilder {
    /// Set the category for the transaction.
    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_owned();
        self
    }

    /// Set the date for the transaction.
    pub fn date(mut self, date: Date) -> Self {
        self.date = date;
        self
    }
}

/// The request body for creating a transaction.
///
/// `text`, `amount`, and `type` are required at the deserialization level;
/// `category` and `date` fall back to the model defaults when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTransaction {
    /// A text description of what the transaction is for.
    pub text: String,
    /// The amount of money, as a non-negative magnitude.
    pub amount: f64,
    /// Whether the transaction is a credit (inflow) or debit (outflow).
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The category the transaction belongs to, if given.
    #[serde(default)]
    pub category: Option<String>,
    /// When the transaction happened, if given.
    #[serde(default)]
    pub date: Option<Date>,
}

impl NewTransaction {
    /// Validate the request body and convert it into a [TransactionBuilder].
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmptyText] if `text` is empty or only whitespace,
    /// - or [Error::InvalidAmount] if `amount` is negative or not finite.
    pub fn into_builder(self) -> Result<TransactionBuilder, Error> {
        if self.text.trim().is_empty() {
            return Err(Error::EmptyText);
        }

        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(Error::InvalidAmount(self.amount));
        }

        let mut builder = Transaction::build(&self.text, self.amount, self.kind);

        if let Some(category) = self.category {
            builder = builder.category(&category);
        }

        if let Some(date) = self.date {
            builder = builder.date(date);
        }

        Ok(builder)
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (text, amount, type, category, date)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, text, amount, type, category, date",
        )?
        .query_row(
            (
                builder.text,
                builder.amount,
                builder.kind,
                builder.category,
                builder.date,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Create every transaction in `builders`, all within a single database
/// transaction.
///
/// The batch is all-or-nothing: if any insert fails, the database transaction
/// is rolled back and no records are persisted. An empty `builders` list is a
/// no-op that returns an empty list.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_transaction_list(
    builders: Vec<TransactionBuilder>,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    let mut stmt = sql_transaction.prepare(
        "INSERT INTO \"transaction\" (text, amount, type, category, date)
         VALUES (?1, ?2, ?3, ?4, ?5)
         RETURNING id, text, amount, type, category, date",
    )?;

    let mut transactions = Vec::with_capacity(builders.len());

    for builder in builders {
        let transaction = stmt.query_row(
            (
                builder.text,
                builder.amount,
                builder.kind,
                builder.category,
                builder.date,
            ),
            map_transaction_row,
        )?;

        transactions.push(transaction);
    }

    drop(stmt);
    sql_transaction.commit()?;

    Ok(transactions)
}

/// Retrieve every transaction in the database, in insertion order.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    let transactions = connection
        .prepare("SELECT id, text, amount, type, category, date FROM \"transaction\" ORDER BY id ASC")?
        .query_map([], map_transaction_row)?
        .collect::<Result<Vec<Transaction>, rusqlite::Error>>()?;

    Ok(transactions)
}

/// Delete every transaction in the database and return how many were removed.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn delete_all_transactions(connection: &Connection) -> Result<usize, Error> {
    let count = connection.execute("DELETE FROM \"transaction\"", ())?;

    Ok(count)
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                text TEXT NOT NULL,
                amount REAL NOT NULL,
                type TEXT NOT NULL,
                category TEXT NOT NULL,
                date TEXT NOT NULL
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transaction', 0)",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let text = row.get(1)?;
    let amount = row.get(2)?;
    let kind = row.get(3)?;
    let category = row.get(4)?;
    let date = row.get(5)?;

    Ok(Transaction {
        id,
        text,
        amount,
        kind,
        category,
        date,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod model_tests {
    use serde_json::json;
    use time::{OffsetDateTime, macros::date};

    use crate::{
        Error,
        transaction::{DEFAULT_CATEGORY, NewTransaction, Transaction, TransactionKind},
    };

    #[test]
    fn serializes_kind_as_lowercase_type_field() {
        let transaction = Transaction {
            id: 1,
            text: "Coffee".to_owned(),
            amount: 150.0,
            kind: TransactionKind::Debit,
            category: "Food".to_owned(),
            date: date!(2024 - 01 - 05),
        };

        let got = serde_json::to_value(&transaction).expect("Could not serialize transaction");

        assert_eq!(
            got,
            json!({
                "id": 1,
                "text": "Coffee",
                "amount": 150.0,
                "type": "debit",
                "category": "Food",
                "date": "2024-01-05",
            })
        );
    }

    #[test]
    fn deserializes_type_field() {
        let body = json!({
            "text": "Salary",
            "amount": 5000.0,
            "type": "credit",
        });

        let new_transaction: NewTransaction =
            serde_json::from_value(body).expect("Could not deserialize body");

        assert_eq!(new_transaction.kind, TransactionKind::Credit);
        assert_eq!(new_transaction.category, None);
        assert_eq!(new_transaction.date, None);
    }

    #[test]
    fn rejects_unknown_type_string() {
        let body = json!({
            "text": "Mystery",
            "amount": 1.0,
            "type": "payment",
        });

        let result = serde_json::from_value::<NewTransaction>(body);

        assert!(result.is_err());
    }

    #[test]
    fn rejects_missing_required_fields() {
        let body = json!({ "amount": 1.0, "type": "debit" });

        let result = serde_json::from_value::<NewTransaction>(body);

        assert!(result.is_err());
    }

    #[test]
    fn builder_applies_defaults() {
        let builder = Transaction::build("Groceries", 42.5, TransactionKind::Debit);

        assert_eq!(builder.category, DEFAULT_CATEGORY);
        assert_eq!(builder.date, OffsetDateTime::now_utc().date());
    }

    #[test]
    fn into_builder_keeps_explicit_fields() {
        let new_transaction = NewTransaction {
            text: "Rent".to_owned(),
            amount: 1200.0,
            kind: TransactionKind::Debit,
            category: Some("Housing".to_owned()),
            date: Some(date!(2024 - 02 - 01)),
        };

        let builder = new_transaction
            .into_builder()
            .expect("Could not convert body into builder");

        assert_eq!(builder.text, "Rent");
        assert_eq!(builder.amount, 1200.0);
        assert_eq!(builder.kind, TransactionKind::Debit);
        assert_eq!(builder.category, "Housing");
        assert_eq!(builder.date, date!(2024 - 02 - 01));
    }

    #[test]
    fn into_builder_rejects_empty_text() {
        let new_transaction = NewTransaction {
            text: "  ".to_owned(),
            amount: 1.0,
            kind: TransactionKind::Debit,
            category: None,
            date: None,
        };

        assert_eq!(new_transaction.into_builder(), Err(Error::EmptyText));
    }

    #[test]
    fn into_builder_rejects_negative_amount() {
        let new_transaction = NewTransaction {
            text: "Refund".to_owned(),
            amount: -50.0,
            kind: TransactionKind::Credit,
            category: None,
            date: None,
        };

        assert_eq!(
            new_transaction.into_builder(),
            Err(Error::InvalidAmount(-50.0))
        );
    }

    #[test]
    fn into_builder_rejects_non_finite_amount() {
        let new_transaction = NewTransaction {
            text: "Oops".to_owned(),
            amount: f64::NAN,
            kind: TransactionKind::Debit,
            category: None,
            date: None,
        };

        assert!(matches!(
            new_transaction.into_builder(),
            Err(Error::InvalidAmount(_))
        ));
    }
}
