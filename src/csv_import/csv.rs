//! Parses transactions from uploaded CSV files.

use csv::StringRecord;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    transaction::{Transaction, TransactionBuilder, TransactionKind},
};

/// The description given to imported rows without one.
pub const FALLBACK_TEXT: &str = "Imported Txn";

/// The category given to imported rows without one.
pub const FALLBACK_CATEGORY: &str = "Uncategorized";

/// Where each transaction field lives in a CSV file, found by header name.
#[derive(Debug, Clone, Copy, Default)]
struct ColumnMap {
    date: Option<usize>,
    description: Option<usize>,
    amount: Option<usize>,
    kind: Option<usize>,
    category: Option<usize>,
}

impl ColumnMap {
    /// Match the header row against the recognised column names,
    /// ignoring case. Unrecognised headers are ignored.
    fn from_headers(headers: &StringRecord) -> Self {
        let mut columns = Self::default();

        for (index, header) in headers.iter().enumerate() {
            match header.to_lowercase().as_str() {
                "date" => columns.date = Some(index),
                "description" => columns.description = Some(index),
                "amount" => columns.amount = Some(index),
                "type" => columns.kind = Some(index),
                "category" => columns.category = Some(index),
                _ => {}
            }
        }

        columns
    }
}

/// Parses transactions from the text of a CSV file.
///
/// Expects the first row to be a header; columns are matched to transaction
/// fields by name, ignoring case: `Date`, `Description`, `Amount`, `Type`,
/// `Category`. Extra columns and rows whose fields are all empty are ignored.
///
/// Parsing is deliberately lossy so that one messy row does not reject a
/// whole bank statement. A row is never dropped for a bad field; instead each
/// field falls back on its own:
/// - a missing or empty description becomes "Imported Txn",
/// - a missing or unparseable amount becomes 0, negative amounts are folded
///   into their magnitude, and non-finite amounts become 0,
/// - a type other than "credit" or "debit" becomes a debit,
/// - a missing or empty category becomes "Uncategorized",
/// - a date that is not `2024-01-05`, `2024/01/05`, or `01/05/2024` becomes
///   the current date.
///
/// # Errors
/// Returns an [Error::InvalidCSV] if the text cannot be read as CSV at all.
pub fn parse_csv(text: &str) -> Result<Vec<TransactionBuilder>, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let columns = ColumnMap::from_headers(
        reader
            .headers()
            .map_err(|error| Error::InvalidCSV(error.to_string()))?,
    );

    let mut transactions = Vec::new();

    for record in reader.records() {
        let record = record.map_err(|error| Error::InvalidCSV(error.to_string()))?;

        if record.iter().all(str::is_empty) {
            continue;
        }

        transactions.push(parse_record(&record, columns));
    }

    Ok(transactions)
}

fn parse_record(record: &StringRecord, columns: ColumnMap) -> TransactionBuilder {
    let text = match get_field(record, columns.description) {
        Some(description) => description,
        None => {
            tracing::debug!("Row has no description, using '{FALLBACK_TEXT}'");
            FALLBACK_TEXT
        }
    };
    let amount = parse_amount(get_field(record, columns.amount));
    let kind = parse_kind(get_field(record, columns.kind));
    let category = get_field(record, columns.category).unwrap_or(FALLBACK_CATEGORY);

    let mut builder = Transaction::build(text, amount, kind).category(category);

    if let Some(date) = get_field(record, columns.date).and_then(parse_date) {
        builder = builder.date(date);
    }

    builder
}

/// Look up a field by its mapped column, treating empty fields as absent.
fn get_field<'a>(record: &'a StringRecord, column: Option<usize>) -> Option<&'a str> {
    column
        .and_then(|column| record.get(column))
        .filter(|field| !field.is_empty())
}

fn parse_amount(field: Option<&str>) -> f64 {
    let Some(field) = field else {
        return 0.0;
    };

    match field.parse::<f64>() {
        Ok(amount) if amount.is_finite() => amount.abs(),
        Ok(amount) => {
            tracing::debug!("Amount '{amount}' is not finite, using 0");
            0.0
        }
        Err(error) => {
            tracing::debug!("Could not parse '{field}' as an amount, using 0: {error}");
            0.0
        }
    }
}

fn parse_kind(field: Option<&str>) -> TransactionKind {
    match field {
        Some(field) if field.eq_ignore_ascii_case("credit") => TransactionKind::Credit,
        Some(field) if field.eq_ignore_ascii_case("debit") => TransactionKind::Debit,
        Some(field) => {
            tracing::debug!("Unrecognised transaction type '{field}', using debit");
            TransactionKind::Debit
        }
        None => TransactionKind::Debit,
    }
}

fn parse_date(field: &str) -> Option<Date> {
    const ISO_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");
    const SLASH_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]/[month]/[day]");
    const US_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[month]/[day]/[year]");

    for format in [ISO_DATE_FORMAT, SLASH_DATE_FORMAT, US_DATE_FORMAT] {
        if let Ok(date) = Date::parse(field, format) {
            return Some(date);
        }
    }

    tracing::debug!("Could not parse '{field}' as a date, using today");
    None
}
