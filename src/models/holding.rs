use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Symbol recorded for holdings without a ticker (bank CDs, cash buckets).
pub const SYMBOL_NOT_AVAILABLE: &str = "n/a";

/// Investment-type tag carried on position rows.
///
/// Source files are inconsistent about casing ("ETF" vs "etf"), so parsing
/// is case-insensitive and unknown tags are preserved rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InvestmentType {
    Stock,
    Etf,
    FixedIncome,
    CashEquivalent,
    Other(String),
}

impl InvestmentType {
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_uppercase().as_str() {
            "STOCK" => Self::Stock,
            "ETF" => Self::Etf,
            "FIXED_INCOME" => Self::FixedIncome,
            "CASH_EQUIVALENT" => Self::CashEquivalent,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Stock => "STOCK",
            Self::Etf => "ETF",
            Self::FixedIncome => "FIXED_INCOME",
            Self::CashEquivalent => "CASH_EQUIVALENT",
            Self::Other(tag) => tag,
        }
    }
}

impl fmt::Display for InvestmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for InvestmentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for InvestmentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::parse(&tag))
    }
}

/// Current equity/ETF position, one row per held symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquityPosition {
    pub symbol: String,
    pub description: String,
    pub investment_type: InvestmentType,
    /// Last quoted price per share.
    pub unit_price: Decimal,
    /// Current market value of the whole position.
    pub market_value: Decimal,
}

/// Current fixed-income position (bond, CD, treasury note).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedPosition {
    pub name: String,
    /// [`SYMBOL_NOT_AVAILABLE`] for instruments without a ticker.
    pub symbol: String,
    pub investment_type: InvestmentType,
    pub total_dollars: Decimal,
    /// Maturity date as recorded (`YYYY-MM-DD`). Kept raw: a malformed date
    /// must drop the row from the calendar, not fail deserialization of the
    /// whole file.
    pub maturity_date: String,
    /// Annual return rate as a fraction (0.03 = 3%).
    pub return_rate: Decimal,
}

/// Cash-equivalent or otherwise uncategorized holding, recorded with its
/// classification inline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtherHolding {
    pub description: String,
    pub major_category: String,
    pub minor_category: String,
    pub dollars: Decimal,
    pub account: String,
}
