//! Transaction data aggregation for the balance summary and charts.
//!
//! Provides a pure function that derives income and expense totals, the
//! overall balance, and per-category and per-day expense breakdowns from
//! the full transaction list.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::transaction::{Transaction, TransactionKind};

/// The aggregated view of the full transaction list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// The sum of all credit amounts.
    pub income: f64,
    /// The sum of all debit amounts.
    pub expense: f64,
    /// Income minus expense.
    pub balance: f64,
    /// Expense totals per category, in the order categories first appear.
    pub category_totals: Vec<CategoryTotal>,
    /// Expense totals per calendar day, ordered by date.
    pub daily_totals: Vec<DailyTotal>,
}

/// The total amount spent in one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// The category the expenses belong to.
    pub category: String,
    /// The sum of the debit amounts in the category.
    pub amount: f64,
}

/// The total amount spent on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotal {
    /// The day the expenses happened.
    pub date: Date,
    /// The day formatted for chart axes, e.g. "Jan 5".
    pub label: String,
    /// The sum of the debit amounts on the day.
    pub amount: f64,
}

/// Derive the balance summary and chart breakdowns from `transactions`.
///
/// The summary is a pure function of the full list and is recomputed from
/// scratch on every call. Credits count toward income, debits toward expense;
/// only debits appear in the category and daily breakdowns. An empty list
/// yields zero totals and empty breakdowns.
pub fn summarize(transactions: &[Transaction]) -> Summary {
    let mut income = 0.0;
    let mut expense = 0.0;

    for transaction in transactions {
        match transaction.kind {
            TransactionKind::Credit => income += transaction.amount,
            TransactionKind::Debit => expense += transaction.amount,
        }
    }

    Summary {
        income,
        expense,
        balance: income - expense,
        category_totals: aggregate_by_category(transactions),
        daily_totals: aggregate_by_day(transactions),
    }
}

/// Sums debit amounts per category, keeping first-seen category order.
fn aggregate_by_category(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    let mut index_by_category: HashMap<&str, usize> = HashMap::new();

    for transaction in transactions {
        if transaction.kind != TransactionKind::Debit {
            continue;
        }

        match index_by_category.get(transaction.category.as_str()) {
            Some(&index) => totals[index].amount += transaction.amount,
            None => {
                index_by_category.insert(&transaction.category, totals.len());
                totals.push(CategoryTotal {
                    category: transaction.category.clone(),
                    amount: transaction.amount,
                });
            }
        }
    }

    totals
}

/// Sums debit amounts per calendar day, sorted ascending by date.
///
/// Days are keyed by the full date, so the same day of the same month in
/// different years stays two separate entries even though both format to
/// the same label.
fn aggregate_by_day(transactions: &[Transaction]) -> Vec<DailyTotal> {
    let mut totals: HashMap<Date, f64> = HashMap::new();

    for transaction in transactions {
        if transaction.kind != TransactionKind::Debit {
            continue;
        }

        *totals.entry(transaction.date).or_insert(0.0) += transaction.amount;
    }

    let mut daily_totals: Vec<DailyTotal> = totals
        .into_iter()
        .map(|(date, amount)| DailyTotal {
            date,
            label: format_day_label(date),
            amount,
        })
        .collect();
    daily_totals.sort_by_key(|daily_total| daily_total.date);

    daily_totals
}

/// Formats a date as a short chart label, e.g. "Jan 5".
fn format_day_label(date: Date) -> String {
    use time::Month;

    let month = match date.month() {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    };

    format!("{month} {}", date.day())
}

#[cfg(test)]
mod aggregation_tests {
    use serde_json::json;
    use time::{Date, macros::date};

    use crate::{
        summary::aggregation::{CategoryTotal, summarize},
        transaction::{Transaction, TransactionKind},
    };

    fn create_test_transaction(
        amount: f64,
        kind: TransactionKind,
        category: &str,
        date: Date,
    ) -> Transaction {
        Transaction {
            id: 0,
            text: "Txn".to_owned(),
            amount,
            kind,
            category: category.to_owned(),
            date,
        }
    }

    #[test]
    fn balance_is_income_minus_expense() {
        let transactions = vec![
            create_test_transaction(5000.0, TransactionKind::Credit, "Job", date!(2024 - 01 - 01)),
            create_test_transaction(
                1200.0,
                TransactionKind::Debit,
                "Housing",
                date!(2024 - 01 - 03),
            ),
            create_test_transaction(300.0, TransactionKind::Debit, "Food", date!(2024 - 01 - 05)),
        ];

        let summary = summarize(&transactions);

        assert_eq!(summary.income, 5000.0);
        assert_eq!(summary.expense, 1500.0);
        assert_eq!(summary.balance, 3500.0);
    }

    #[test]
    fn empty_list_summarizes_to_zeros() {
        let summary = summarize(&[]);

        assert_eq!(summary.income, 0.0);
        assert_eq!(summary.expense, 0.0);
        assert_eq!(summary.balance, 0.0);
        assert_eq!(summary.category_totals, vec![]);
        assert_eq!(summary.daily_totals, vec![]);
    }

    #[test]
    fn category_totals_sum_debits_per_category() {
        let transactions = vec![
            create_test_transaction(100.0, TransactionKind::Debit, "Food", date!(2024 - 01 - 01)),
            create_test_transaction(
                50.0,
                TransactionKind::Debit,
                "Transport",
                date!(2024 - 01 - 02),
            ),
            create_test_transaction(30.0, TransactionKind::Debit, "Food", date!(2024 - 01 - 03)),
        ];

        let summary = summarize(&transactions);

        assert_eq!(
            summary.category_totals,
            vec![
                CategoryTotal {
                    category: "Food".to_owned(),
                    amount: 130.0,
                },
                CategoryTotal {
                    category: "Transport".to_owned(),
                    amount: 50.0,
                },
            ]
        );
    }

    #[test]
    fn category_totals_keep_first_seen_order() {
        let transactions = vec![
            create_test_transaction(10.0, TransactionKind::Debit, "Zoo", date!(2024 - 01 - 01)),
            create_test_transaction(20.0, TransactionKind::Debit, "Alpha", date!(2024 - 01 - 02)),
            create_test_transaction(30.0, TransactionKind::Debit, "Zoo", date!(2024 - 01 - 03)),
        ];

        let summary = summarize(&transactions);

        let categories: Vec<&str> = summary
            .category_totals
            .iter()
            .map(|total| total.category.as_str())
            .collect();
        assert_eq!(categories, vec!["Zoo", "Alpha"]);
    }

    #[test]
    fn category_totals_exclude_credits() {
        let transactions = vec![
            create_test_transaction(5000.0, TransactionKind::Credit, "Job", date!(2024 - 01 - 01)),
            create_test_transaction(100.0, TransactionKind::Debit, "Food", date!(2024 - 01 - 02)),
        ];

        let summary = summarize(&transactions);

        assert_eq!(summary.category_totals.len(), 1);
        assert_eq!(summary.category_totals[0].category, "Food");

        let category_sum: f64 = summary
            .category_totals
            .iter()
            .map(|total| total.amount)
            .sum();
        assert_eq!(category_sum, summary.expense);
    }

    #[test]
    fn daily_totals_sum_debits_per_day_sorted_by_date() {
        let transactions = vec![
            create_test_transaction(30.0, TransactionKind::Debit, "Food", date!(2024 - 01 - 05)),
            create_test_transaction(100.0, TransactionKind::Debit, "Food", date!(2024 - 01 - 02)),
            create_test_transaction(20.0, TransactionKind::Debit, "Food", date!(2024 - 01 - 05)),
        ];

        let summary = summarize(&transactions);

        assert_eq!(summary.daily_totals.len(), 2);
        assert_eq!(summary.daily_totals[0].date, date!(2024 - 01 - 02));
        assert_eq!(summary.daily_totals[0].amount, 100.0);
        assert_eq!(summary.daily_totals[1].date, date!(2024 - 01 - 05));
        assert_eq!(summary.daily_totals[1].amount, 50.0);

        let daily_sum: f64 = summary.daily_totals.iter().map(|total| total.amount).sum();
        assert_eq!(daily_sum, summary.expense);
    }

    #[test]
    fn daily_totals_format_labels_from_dates() {
        let transactions = vec![
            create_test_transaction(10.0, TransactionKind::Debit, "Food", date!(2024 - 01 - 05)),
            create_test_transaction(20.0, TransactionKind::Debit, "Food", date!(2024 - 12 - 25)),
        ];

        let summary = summarize(&transactions);

        assert_eq!(summary.daily_totals[0].label, "Jan 5");
        assert_eq!(summary.daily_totals[1].label, "Dec 25");
    }

    #[test]
    fn same_day_in_different_years_stays_separate() {
        let transactions = vec![
            create_test_transaction(10.0, TransactionKind::Debit, "Food", date!(2024 - 01 - 05)),
            create_test_transaction(20.0, TransactionKind::Debit, "Food", date!(2023 - 01 - 05)),
        ];

        let summary = summarize(&transactions);

        assert_eq!(summary.daily_totals.len(), 2);
        assert_eq!(summary.daily_totals[0].date, date!(2023 - 01 - 05));
        assert_eq!(summary.daily_totals[1].date, date!(2024 - 01 - 05));
        assert_eq!(summary.daily_totals[0].label, summary.daily_totals[1].label);
    }

    #[test]
    fn credit_only_list_has_empty_breakdowns() {
        let transactions = vec![create_test_transaction(
            5000.0,
            TransactionKind::Credit,
            "Job",
            date!(2024 - 01 - 01),
        )];

        let summary = summarize(&transactions);

        assert_eq!(summary.income, 5000.0);
        assert_eq!(summary.balance, 5000.0);
        assert_eq!(summary.category_totals, vec![]);
        assert_eq!(summary.daily_totals, vec![]);
    }

    #[test]
    fn summary_serializes_with_wire_field_names() {
        let transactions = vec![
            create_test_transaction(5000.0, TransactionKind::Credit, "Job", date!(2024 - 01 - 01)),
            create_test_transaction(150.0, TransactionKind::Debit, "Food", date!(2024 - 01 - 05)),
        ];

        let got = serde_json::to_value(summarize(&transactions))
            .expect("Could not serialize summary");

        assert_eq!(
            got,
            json!({
                "income": 5000.0,
                "expense": 150.0,
                "balance": 4850.0,
                "category_totals": [
                    { "category": "Food", "amount": 150.0 },
                ],
                "daily_totals": [
                    { "date": "2024-01-05", "label": "Jan 5", "amount": 150.0 },
                ],
            })
        );
    }
}
