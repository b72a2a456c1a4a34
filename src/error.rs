use thiserror::Error;

/// Failures that abort a report.
///
/// Missing classifications, absent quote fields, and zero-denominator
/// percentages are *not* errors: they resolve locally to the `Others` bucket,
/// `None` fields, and the undefined-ratio sentinel respectively.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A position/transaction store could not produce its rows. The whole
    /// report fails; no partial table is returned.
    #[error("failed to load {operation}")]
    Store {
        operation: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// The quote service could not be reached at all. Individual missing
    /// fields are represented as `None` and never surface here.
    #[error("quote service unavailable for {ticker}")]
    QuoteService {
        ticker: String,
        #[source]
        source: anyhow::Error,
    },

    /// A minor allocation row referenced a major category that the
    /// major-level grouping never produced. Cannot happen when both levels
    /// are built from the same rows; treated as a bug in the caller.
    #[error("minor group {minor:?} references unknown major category {major:?}")]
    UnknownMajorGroup { major: String, minor: String },
}

impl ReportError {
    pub fn store(operation: &'static str, source: impl Into<anyhow::Error>) -> Self {
        Self::Store {
            operation,
            source: source.into(),
        }
    }
}

pub type Result<T, E = ReportError> = std::result::Result<T, E>;
