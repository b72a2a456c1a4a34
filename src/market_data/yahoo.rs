//! Yahoo Finance quote provider.
//!
//! Thin wrapper around the quoteSummary endpoint. Absent fields become
//! `None`; only transport/HTTP failures surface as errors.

use anyhow::anyhow;
use reqwest::blocking::Client;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{ReportError, Result};

use super::{Fundamentals, QuoteService};

const YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";
const MODULES: &str = "summaryDetail,defaultKeyStatistics,assetProfile,fundProfile";

/// Yahoo wraps every numeric field in `{"raw": ..., "fmt": ...}`.
#[derive(Debug, Deserialize, Default)]
struct RawValue {
    raw: Option<f64>,
}

impl RawValue {
    fn to_decimal(&self) -> Option<Decimal> {
        self.raw.and_then(Decimal::from_f64)
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct SummaryDetail {
    #[serde(default)]
    previous_close: RawValue,
    #[serde(default)]
    fifty_two_week_low: RawValue,
    #[serde(default)]
    fifty_two_week_high: RawValue,
    #[serde(default)]
    market_cap: RawValue,
    #[serde(default)]
    trailing_pe: RawValue,
    #[serde(default)]
    beta: RawValue,
    #[serde(default)]
    dividend_yield: RawValue,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct KeyStatistics {
    #[serde(default)]
    trailing_eps: RawValue,
}

#[derive(Debug, Deserialize, Default)]
struct AssetProfile {
    sector: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct FundProfile {
    family: Option<String>,
    category_name: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResult {
    #[serde(default)]
    summary_detail: SummaryDetail,
    #[serde(default)]
    default_key_statistics: KeyStatistics,
    #[serde(default)]
    asset_profile: AssetProfile,
    #[serde(default)]
    fund_profile: FundProfile,
}

#[derive(Debug, Deserialize)]
struct QuoteSummary {
    result: Option<Vec<QuoteSummaryResult>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResponse {
    quote_summary: QuoteSummary,
}

/// Blocking Yahoo Finance client implementing [`QuoteService`].
pub struct YahooQuoteClient {
    client: Client,
    base_url: String,
}

impl YahooQuoteClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: YAHOO_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint, for tests and proxies.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn unavailable(ticker: &str, source: impl Into<anyhow::Error>) -> ReportError {
        ReportError::QuoteService {
            ticker: ticker.to_string(),
            source: source.into(),
        }
    }
}

impl Default for YahooQuoteClient {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteService for YahooQuoteClient {
    fn fundamentals(&self, ticker: &str) -> Result<Fundamentals> {
        let url = format!("{}/{}", self.base_url, ticker.to_uppercase());
        let response = self
            .client
            .get(&url)
            .query(&[("modules", MODULES)])
            .send()
            .map_err(|e| Self::unavailable(ticker, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::unavailable(
                ticker,
                anyhow!("quote endpoint returned HTTP {status}"),
            ));
        }

        let body: QuoteSummaryResponse =
            response.json().map_err(|e| Self::unavailable(ticker, e))?;

        let result = body
            .quote_summary
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .unwrap_or_default();

        Ok(Fundamentals {
            previous_close: result.summary_detail.previous_close.to_decimal(),
            low_52wk: result.summary_detail.fifty_two_week_low.to_decimal(),
            high_52wk: result.summary_detail.fifty_two_week_high.to_decimal(),
            market_cap: result.summary_detail.market_cap.to_decimal(),
            pe_ratio: result.summary_detail.trailing_pe.to_decimal(),
            beta: result.summary_detail.beta.to_decimal(),
            dividend_yield: result.summary_detail.dividend_yield.to_decimal(),
            eps: result.default_key_statistics.trailing_eps.to_decimal(),
            sector: result.asset_profile.sector,
            fund_family: result.fund_profile.family,
            fund_category: result.fund_profile.category_name,
        })
    }
}
