//! Pure classification of holdings against the fund catalog.
//!
//! No error paths: an unknown symbol degrades to the `Others` bucket, and
//! the caller decides what to do with it.

use std::fmt;

use crate::catalog::FundCatalog;
use crate::models::InvestmentType;

/// Bucket label for symbols absent from the relevant catalog table.
pub const OTHERS: &str = "Others";

/// Top-level classification of a holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MajorCategory {
    Equity,
    FixedIncome,
}

impl MajorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equity => "EQUITY",
            Self::FixedIncome => "FIXED_INCOME",
        }
    }
}

impl fmt::Display for MajorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Asset-class / subclass pair assigned to an ETF holding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub asset_class: String,
    pub subclass: String,
}

impl Classification {
    fn others() -> Self {
        Self {
            asset_class: OTHERS.to_string(),
            subclass: OTHERS.to_string(),
        }
    }
}

/// Which catalog table(s) an ETF lookup consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EtfScope {
    Equity,
    FixedIncome,
    /// Equity table first, then fixed income.
    Any,
}

/// Assign the major category for a holding.
///
/// Membership in the fixed-income ETF catalog always wins, regardless of the
/// stored investment-type tag; otherwise the tag decides between fixed
/// income and equity.
pub fn classify_major(
    catalog: &FundCatalog,
    symbol: &str,
    investment_type: &InvestmentType,
) -> MajorCategory {
    if catalog.is_fixed_income(symbol) {
        return MajorCategory::FixedIncome;
    }
    match investment_type {
        InvestmentType::FixedIncome => MajorCategory::FixedIncome,
        _ => MajorCategory::Equity,
    }
}

/// Assign asset class and subclass for an ETF symbol.
pub fn classify_etf(catalog: &FundCatalog, symbol: &str, scope: EtfScope) -> Classification {
    let entry = match scope {
        EtfScope::Equity => catalog.equity(symbol),
        EtfScope::FixedIncome => catalog.fixed_income(symbol),
        EtfScope::Any => catalog.any(symbol),
    };
    match entry {
        Some(entry) => Classification {
            asset_class: entry.asset_class.clone(),
            subclass: entry.subclass.clone(),
        },
        None => Classification::others(),
    }
}
