//! Summary and chart data derived from the transaction list.
//!
//! This module contains everything related to aggregation:
//! - The `Summary` output model and the pure `summarize` function
//! - The route handler that serves the summary over the API

mod aggregation;
mod summary_endpoint;

pub use aggregation::{CategoryTotal, DailyTotal, Summary, summarize};
pub use summary_endpoint::get_summary_endpoint;
