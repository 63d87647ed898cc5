use serde::{Deserialize, Serialize};

use crate::core::error::EstimateError;
use crate::core::models::metric::{MetricKind, Scope};

/// Aggregated utilization per metric kind, summed across the table and its indexes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub provisioned_write: f64,
    pub consumed_write: f64,
    pub provisioned_read: f64,
    pub consumed_read: f64,
}

impl Totals {
    pub fn get(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::ProvisionedWrite => self.provisioned_write,
            MetricKind::ConsumedWrite => self.consumed_write,
            MetricKind::ProvisionedRead => self.provisioned_read,
            MetricKind::ConsumedRead => self.consumed_read,
        }
    }

    pub fn set(&mut self, kind: MetricKind, value: f64) {
        match kind {
            MetricKind::ProvisionedWrite => self.provisioned_write = value,
            MetricKind::ConsumedWrite => self.consumed_write = value,
            MetricKind::ProvisionedRead => self.provisioned_read = value,
            MetricKind::ConsumedRead => self.consumed_read = value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeFailure {
    pub scope: Scope,
    pub error: String,
    pub no_data: bool,
}

impl ScopeFailure {
    pub fn new(scope: Scope, error: &EstimateError) -> Self {
        Self {
            scope,
            error: error.to_string(),
            no_data: error.is_no_data(),
        }
    }
}

/// Outcome of one metric round: a total, or every scope that failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub kind: MetricKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ScopeFailure>,
}

impl RoundOutcome {
    pub fn succeeded(&self) -> bool {
        self.total.is_some()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub provisioned_write: f64,
    pub provisioned_read: f64,
    pub ondemand_write: f64,
    pub ondemand_read: f64,
    pub provisioned_total: f64,
    pub ondemand_total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    ProvisionedCheaper,
    OnDemandCheaper,
    Equal,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProvisionedCheaper => write!(f, "Provisioned cost is cheaper!"),
            Self::OnDemandCheaper => write!(f, "On-demand cost is cheaper!"),
            Self::Equal => write!(f, "Two costs are the same!"),
        }
    }
}

/// Everything the report shows for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projection {
    pub table_name: String,
    pub window_start: chrono::DateTime<chrono::Utc>,
    pub window_end: chrono::DateTime<chrono::Utc>,
    pub window_hours: f64,
    pub period_secs: i32,
    pub indexes: Vec<String>,
    pub rounds: Vec<RoundOutcome>,
    pub totals: Totals,
    pub costs: CostBreakdown,
    pub verdict: Verdict,
}

impl Projection {
    /// True when at least one round fell back to a zero total.
    pub fn is_partial(&self) -> bool {
        self.rounds.iter().any(|r| !r.succeeded())
    }
}
