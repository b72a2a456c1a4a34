//! Forward-looking maturity calendar for fixed-income holdings.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use tracing::warn;

use crate::format;
use crate::models::{FixedPosition, SYMBOL_NOT_AVAILABLE};

/// Display marker substituted for the `n/a` symbol sentinel: a CD with no
/// ticker rolls over at maturity.
pub const CD_RENEW: &str = "CD-renew";

/// A calendar period: maturity dates truncated to year and month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// One month of the maturity calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct MaturityBucket {
    pub period: YearMonth,
    pub total_dollars: Decimal,
    pub total_count: usize,
    /// Dollar-weighted yield: Σ(dollars × rate) / Σdollars × 100. `None`
    /// when the bucket's dollars sum to zero.
    pub weighted_yield_pct: Option<Decimal>,
    /// Comma-joined symbols, with [`CD_RENEW`] substituted for the
    /// not-available sentinel.
    pub symbols: String,
}

/// Parse a recorded maturity date, `YYYY-MM-DD`.
pub(crate) fn parse_maturity_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

#[derive(Default)]
struct BucketAccumulator {
    dollars: Decimal,
    count: usize,
    dollar_weighted_return: Decimal,
    symbols: Vec<String>,
}

/// Build the calendar: bucket by maturity month, drop periods already past,
/// sort ascending.
///
/// A holding with a missing or unparseable maturity date is excluded with a
/// warning; it must not take the rest of the report down.
pub fn build_maturity_calendar(
    positions: &[FixedPosition],
    current_month: YearMonth,
) -> Vec<MaturityBucket> {
    let mut buckets: BTreeMap<YearMonth, BucketAccumulator> = BTreeMap::new();

    for position in positions {
        let Some(date) = parse_maturity_date(&position.maturity_date) else {
            warn!(
                name = %position.name,
                symbol = %position.symbol,
                maturity_date = %position.maturity_date,
                "skipping fixed-income holding with unparseable maturity date"
            );
            continue;
        };

        let acc = buckets.entry(YearMonth::from_date(date)).or_default();
        acc.dollars += position.total_dollars;
        acc.count += 1;
        acc.dollar_weighted_return += position.total_dollars * position.return_rate;
        acc.symbols.push(display_symbol(&position.symbol));
    }

    buckets
        .into_iter()
        .filter(|(period, _)| *period >= current_month)
        .map(|(period, acc)| MaturityBucket {
            period,
            total_dollars: acc.dollars,
            total_count: acc.count,
            weighted_yield_pct: if acc.dollars.is_zero() {
                None
            } else {
                Some(acc.dollar_weighted_return / acc.dollars * Decimal::ONE_HUNDRED)
            },
            symbols: acc.symbols.join(", "),
        })
        .collect()
}

fn display_symbol(symbol: &str) -> String {
    if symbol.eq_ignore_ascii_case(SYMBOL_NOT_AVAILABLE) {
        CD_RENEW.to_string()
    } else {
        symbol.to_string()
    }
}

/// Formatted calendar row for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaturityDisplayRow {
    pub period: String,
    pub total_dollars: String,
    pub total_count: String,
    pub weighted_yield_pct: String,
    pub symbols: String,
}

pub fn format_maturity_calendar(buckets: &[MaturityBucket]) -> Vec<MaturityDisplayRow> {
    buckets
        .iter()
        .map(|b| MaturityDisplayRow {
            period: b.period.to_string(),
            total_dollars: format::dollars(b.total_dollars),
            total_count: b.total_count.to_string(),
            weighted_yield_pct: format::percent(b.weighted_yield_pct, 2),
            symbols: b.symbols.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InvestmentType;
    use rust_decimal_macros::dec;

    fn cd(name: &str, symbol: &str, dollars: Decimal, date: &str, rate: Decimal) -> FixedPosition {
        FixedPosition {
            name: name.to_string(),
            symbol: symbol.to_string(),
            investment_type: InvestmentType::FixedIncome,
            total_dollars: dollars,
            maturity_date: date.to_string(),
            return_rate: rate,
        }
    }

    #[test]
    fn single_holding_bucket_shows_its_own_rate() {
        let positions = vec![cd("12mo CD", "n/a", dec!(10000), "2022-03-15", dec!(0.03))];
        let calendar = build_maturity_calendar(&positions, YearMonth::new(2021, 11));

        assert_eq!(calendar.len(), 1);
        let bucket = &calendar[0];
        assert_eq!(bucket.period, YearMonth::new(2022, 3));
        assert_eq!(bucket.total_dollars, dec!(10000));
        assert_eq!(bucket.total_count, 1);
        assert_eq!(bucket.weighted_yield_pct, Some(dec!(3)));
        assert_eq!(bucket.symbols, "CD-renew");
    }

    #[test]
    fn yield_is_dollar_weighted_not_a_plain_mean() {
        // $9,000 at 1% and $1,000 at 5%: plain mean would say 3%, the
        // dollar-weighted yield is 1.4%.
        let positions = vec![
            cd("big", "912797GL4", dec!(9000), "2022-06-01", dec!(0.01)),
            cd("small", "n/a", dec!(1000), "2022-06-20", dec!(0.05)),
        ];
        let calendar = build_maturity_calendar(&positions, YearMonth::new(2022, 1));

        assert_eq!(calendar.len(), 1);
        assert_eq!(calendar[0].total_dollars, dec!(10000));
        assert_eq!(calendar[0].total_count, 2);
        assert_eq!(calendar[0].weighted_yield_pct, Some(dec!(1.4)));
        assert_eq!(calendar[0].symbols, "912797GL4, CD-renew");
    }

    #[test]
    fn past_periods_are_dropped_and_order_is_ascending() {
        let positions = vec![
            cd("late", "n/a", dec!(3000), "2022-09-01", dec!(0.02)),
            cd("matured", "n/a", dec!(1000), "2021-10-01", dec!(0.01)),
            cd("soon", "n/a", dec!(2000), "2021-12-01", dec!(0.02)),
        ];
        let calendar = build_maturity_calendar(&positions, YearMonth::new(2021, 11));

        let periods: Vec<String> = calendar.iter().map(|b| b.period.to_string()).collect();
        assert_eq!(periods, vec!["2021-12", "2022-09"]);
    }

    #[test]
    fn current_month_is_kept() {
        let positions = vec![cd("now", "n/a", dec!(500), "2021-11-30", dec!(0.01))];
        let calendar = build_maturity_calendar(&positions, YearMonth::new(2021, 11));
        assert_eq!(calendar.len(), 1);
    }

    #[test]
    fn unparseable_date_skips_the_row_only() {
        let positions = vec![
            cd("bad", "n/a", dec!(1000), "someday", dec!(0.01)),
            cd("blank", "n/a", dec!(1000), "", dec!(0.01)),
            cd("good", "n/a", dec!(2000), "2022-01-10", dec!(0.02)),
        ];
        let calendar = build_maturity_calendar(&positions, YearMonth::new(2021, 11));

        assert_eq!(calendar.len(), 1);
        assert_eq!(calendar[0].total_dollars, dec!(2000));
    }

    #[test]
    fn formatted_rows_use_two_decimal_yield() {
        let positions = vec![cd("cd", "n/a", dec!(10000), "2022-03-15", dec!(0.03))];
        let calendar = build_maturity_calendar(&positions, YearMonth::new(2021, 11));
        let display = format_maturity_calendar(&calendar);

        assert_eq!(display[0].period, "2022-03");
        assert_eq!(display[0].total_dollars, "$10,000");
        assert_eq!(display[0].weighted_yield_pct, "3.00%");
    }
}
