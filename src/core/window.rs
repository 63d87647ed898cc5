use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

const SECS_PER_HOUR: i64 = 3_600;
const SECS_PER_MINUTE: i64 = 60;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
    #[error("A lookback of {0} days reaches past the supported date range")]
    OutOfRange(u32),
}

/// The [start, end) range metrics are sampled over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSpec {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl WindowSpec {
    pub fn ending_now(lookback_days: u32) -> Result<Self, WindowError> {
        Self::ending_at(Utc::now(), lookback_days)
    }

    pub fn ending_at(end: DateTime<Utc>, lookback_days: u32) -> Result<Self, WindowError> {
        let start = Duration::try_days(i64::from(lookback_days))
            .and_then(|lookback| end.checked_sub_signed(lookback))
            .ok_or(WindowError::OutOfRange(lookback_days))?;
        Ok(Self { start, end })
    }

    pub fn duration_secs(&self) -> i64 {
        (self.end - self.start).num_seconds().max(0)
    }

    /// Window length in hours; multiplier for provisioned costs only.
    pub fn hours(&self) -> f64 {
        self.duration_secs() as f64 / SECS_PER_HOUR as f64
    }
}

/// Bucket length requested from the metrics provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatisticsPeriod {
    /// One bucket spanning the whole window.
    #[default]
    WholeWindow,
    Seconds(u32),
}

impl StatisticsPeriod {
    /// Resolve to a concrete period in seconds for `window`.
    ///
    /// Whole-window buckets round up to whole hours, which satisfies the
    /// 60/300/3600-second granularity CloudWatch enforces on older data.
    pub fn resolve(&self, window: &WindowSpec) -> i32 {
        let secs = match self {
            Self::WholeWindow => round_up(window.duration_secs().max(1), SECS_PER_HOUR),
            Self::Seconds(n) => round_up(i64::from(*n).max(1), SECS_PER_MINUTE),
        };
        i32::try_from(secs).unwrap_or(i32::MAX)
    }
}

fn round_up(value: i64, multiple: i64) -> i64 {
    ((value + multiple - 1) / multiple) * multiple
}
