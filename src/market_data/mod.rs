mod yahoo;

pub use yahoo::YahooQuoteClient;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Scalar fundamentals for one ticker.
///
/// Every field is optional: a missing value from the provider resolves to
/// `None` here, and the caller decides which sentinel (zero, blank, skip) is
/// appropriate for its report. Only a connectivity failure is an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fundamentals {
    pub previous_close: Option<Decimal>,
    pub low_52wk: Option<Decimal>,
    pub high_52wk: Option<Decimal>,
    pub market_cap: Option<Decimal>,
    pub pe_ratio: Option<Decimal>,
    pub eps: Option<Decimal>,
    pub beta: Option<Decimal>,
    pub dividend_yield: Option<Decimal>,
    pub sector: Option<String>,
    pub fund_family: Option<String>,
    pub fund_category: Option<String>,
}

/// External quote collaborator.
pub trait QuoteService: Send + Sync {
    fn fundamentals(&self, ticker: &str) -> Result<Fundamentals>;
}
