use chrono::{DateTime, NaiveDate, Utc};

use crate::report::maturity::YearMonth;

/// Abstraction over "current time" to make behavior deterministic in tests.
///
/// The maturity calendar and the account report both compare record dates
/// against "now", so everything that needs the current date takes a `Clock`.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// The current year-month, used as the forward-looking calendar cutoff.
    fn current_month(&self) -> YearMonth {
        YearMonth::from_date(self.today())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}
