//! Allocation aggregation: group classified holdings, compute dollar totals
//! and percentage shares, and shape the result into report tables.
//!
//! All functions here are pure: same input rows, same output table.
//! Formatting (and the display collapse that depends on formatted values)
//! is separated from the numeric aggregation so that no arithmetic ever
//! touches a rendered string.

use std::collections::{BTreeMap, HashSet};

use rust_decimal::Decimal;

use crate::error::{ReportError, Result};
use crate::format;

/// Label of the synthetic grand-total row.
pub const TOTAL_LABEL: &str = "TOTAL";

/// One holding annotated with its two-level classification.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedHolding {
    pub major: String,
    pub minor: String,
    pub dollars: Decimal,
}

impl ClassifiedHolding {
    pub fn new(major: impl Into<String>, minor: impl Into<String>, dollars: Decimal) -> Self {
        Self {
            major: major.into(),
            minor: minor.into(),
            dollars,
        }
    }
}

/// One output row of the two-level allocation report.
///
/// Percentages are `None` exactly when their denominator was zero (the
/// undefined-ratio sentinel). `minor_total_dollars` is `None` only on the
/// TOTAL row, whose minor cells are undefined.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationRow {
    pub major_category: String,
    pub major_total_dollars: Decimal,
    pub major_allocation_pct: Option<Decimal>,
    pub minor_category: String,
    pub minor_total_dollars: Option<Decimal>,
    pub minor_allocation_pct: Option<Decimal>,
}

/// Percentage share of `part` in `whole`, or the undefined-ratio sentinel
/// when the denominator is zero.
fn pct_of(part: Decimal, whole: Decimal) -> Option<Decimal> {
    if whole.is_zero() {
        None
    } else {
        Some(part / whole * Decimal::ONE_HUNDRED)
    }
}

/// Build the two-level allocation table.
///
/// Majors are percentaged against the grand total. Minors are percentaged
/// against the sum over ALL minor groups (not per-major): minor percentages
/// therefore sum to 100 globally, not within one major category. That
/// denominator choice is long-standing observed behavior and is kept
/// deliberately.
///
/// Rows are sorted by (major share desc, minor share desc) with category
/// names as deterministic tie-breakers, and exactly one TOTAL row is
/// appended. Empty input produces only the TOTAL row with zero totals and
/// undefined percentages.
pub fn two_level_allocation(holdings: &[ClassifiedHolding]) -> Result<Vec<AllocationRow>> {
    let mut major_totals: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut minor_totals: BTreeMap<(String, String), Decimal> = BTreeMap::new();

    for h in holdings {
        *major_totals.entry(h.major.clone()).or_default() += h.dollars;
        *minor_totals
            .entry((h.major.clone(), h.minor.clone()))
            .or_default() += h.dollars;
    }

    let grand_total: Decimal = major_totals.values().copied().sum();
    let minor_grand_total: Decimal = minor_totals.values().copied().sum();

    // Left-merge the major grouping onto each minor row.
    let mut rows = Vec::with_capacity(minor_totals.len() + 1);
    for ((major, minor), minor_total) in &minor_totals {
        let major_total = *major_totals
            .get(major)
            .ok_or_else(|| ReportError::UnknownMajorGroup {
                major: major.clone(),
                minor: minor.clone(),
            })?;
        rows.push(AllocationRow {
            major_category: major.clone(),
            major_total_dollars: major_total,
            major_allocation_pct: pct_of(major_total, grand_total),
            minor_category: minor.clone(),
            minor_total_dollars: Some(*minor_total),
            minor_allocation_pct: pct_of(*minor_total, minor_grand_total),
        });
    }

    rows.sort_by(|a, b| {
        b.major_allocation_pct
            .cmp(&a.major_allocation_pct)
            .then_with(|| b.minor_allocation_pct.cmp(&a.minor_allocation_pct))
            .then_with(|| a.major_category.cmp(&b.major_category))
            .then_with(|| a.minor_category.cmp(&b.minor_category))
    });

    rows.push(AllocationRow {
        major_category: TOTAL_LABEL.to_string(),
        major_total_dollars: minor_grand_total,
        major_allocation_pct: if holdings.is_empty() {
            None
        } else {
            Some(Decimal::ONE_HUNDRED)
        },
        minor_category: String::new(),
        minor_total_dollars: None,
        minor_allocation_pct: None,
    });

    Ok(rows)
}

/// One output row of a single-level allocation report.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleAllocationRow {
    pub key: String,
    pub total_dollars: Decimal,
    pub allocation_pct: Option<Decimal>,
}

/// Single-level variant: group, sum, percentage against one grand total,
/// sort by share descending (key ascending on ties), append a TOTAL row.
pub fn single_level_allocation(
    entries: impl IntoIterator<Item = (String, Decimal)>,
) -> Vec<SingleAllocationRow> {
    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut any = false;
    for (key, dollars) in entries {
        any = true;
        *totals.entry(key).or_default() += dollars;
    }

    let grand_total: Decimal = totals.values().copied().sum();

    let mut rows: Vec<SingleAllocationRow> = totals
        .into_iter()
        .map(|(key, total)| SingleAllocationRow {
            allocation_pct: pct_of(total, grand_total),
            key,
            total_dollars: total,
        })
        .collect();

    rows.sort_by(|a, b| {
        b.allocation_pct
            .cmp(&a.allocation_pct)
            .then_with(|| a.key.cmp(&b.key))
    });

    rows.push(SingleAllocationRow {
        key: TOTAL_LABEL.to_string(),
        total_dollars: grand_total,
        allocation_pct: if any { Some(Decimal::ONE_HUNDRED) } else { None },
    });

    rows
}

/// Fully formatted two-level row, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationDisplayRow {
    pub major_category: String,
    pub major_total_dollars: String,
    pub major_allocation_pct: String,
    pub minor_category: String,
    pub minor_total_dollars: String,
    pub minor_allocation_pct: String,
}

/// Format a two-level table and collapse repeated major cells.
///
/// The collapse check runs over the FORMATTED (post-rounding) values: two
/// raw totals that round to the same display string count as the same
/// triple. The major's numeric cells render only on the first occurrence of
/// each (label, total, pct) triple; the label column always renders.
pub fn format_two_level(rows: &[AllocationRow], pct_dp: u32) -> Vec<AllocationDisplayRow> {
    let mut seen: HashSet<(String, String, String)> = HashSet::new();
    let mut out = Vec::with_capacity(rows.len());

    for row in rows {
        let major_total = format::dollars(row.major_total_dollars);
        let major_pct = format::percent(row.major_allocation_pct, pct_dp);

        let (minor_total, minor_pct) = match row.minor_total_dollars {
            Some(total) => (
                format::dollars(total),
                format::percent(row.minor_allocation_pct, pct_dp),
            ),
            // TOTAL row: minor cells are undefined and render blank.
            None => (String::new(), String::new()),
        };

        let triple = (
            row.major_category.clone(),
            major_total.clone(),
            major_pct.clone(),
        );
        let first_occurrence = seen.insert(triple);

        out.push(AllocationDisplayRow {
            major_category: row.major_category.clone(),
            major_total_dollars: if first_occurrence {
                major_total
            } else {
                String::new()
            },
            major_allocation_pct: if first_occurrence {
                major_pct
            } else {
                String::new()
            },
            minor_category: row.minor_category.clone(),
            minor_total_dollars: minor_total,
            minor_allocation_pct: minor_pct,
        });
    }

    out
}

/// Formatted single-level row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleAllocationDisplayRow {
    pub key: String,
    pub total_dollars: String,
    pub allocation_pct: String,
}

pub fn format_single_level(
    rows: &[SingleAllocationRow],
    pct_dp: u32,
) -> Vec<SingleAllocationDisplayRow> {
    rows.iter()
        .map(|row| SingleAllocationDisplayRow {
            key: row.key.clone(),
            total_dollars: format::dollars(row.total_dollars),
            allocation_pct: format::percent(row.allocation_pct, pct_dp),
        })
        .collect()
}
