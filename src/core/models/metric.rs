use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Either the base table or one of its global secondary indexes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Scope {
    Table,
    Index(String),
}

impl Scope {
    pub fn index_name(&self) -> Option<&str> {
        match self {
            Self::Table => None,
            Self::Index(name) => Some(name),
        }
    }

    #[cfg(test)]
    pub fn is_table(&self) -> bool {
        matches!(self, Self::Table)
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Index(name) => write!(f, "index {}", name),
        }
    }
}

/// How a series of datapoints collapses into one scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    /// Per-period totals, summed over the window.
    Sum,
    /// Instantaneous settings, averaged over the window.
    Average,
}

impl Statistic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sum => "Sum",
            Self::Average => "Average",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    ProvisionedWrite,
    ConsumedWrite,
    ProvisionedRead,
    ConsumedRead,
}

impl MetricKind {
    /// Round order used by the projector.
    pub fn all() -> &'static [MetricKind] {
        &[
            MetricKind::ProvisionedWrite,
            MetricKind::ConsumedWrite,
            MetricKind::ProvisionedRead,
            MetricKind::ConsumedRead,
        ]
    }

    /// CloudWatch metric name in the `AWS/DynamoDB` namespace.
    pub fn metric_name(&self) -> &'static str {
        match self {
            Self::ProvisionedWrite => "ProvisionedWriteCapacityUnits",
            Self::ConsumedWrite => "ConsumedWriteCapacityUnits",
            Self::ProvisionedRead => "ProvisionedReadCapacityUnits",
            Self::ConsumedRead => "ConsumedReadCapacityUnits",
        }
    }

    pub fn statistic(&self) -> Statistic {
        match self {
            Self::ConsumedWrite | Self::ConsumedRead => Statistic::Sum,
            Self::ProvisionedWrite | Self::ProvisionedRead => Statistic::Average,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::ProvisionedWrite => "Provisioned write",
            Self::ConsumedWrite => "Consumed write",
            Self::ProvisionedRead => "Provisioned read",
            Self::ConsumedRead => "Consumed read",
        }
    }
}

/// One timestamped sample of the requested statistic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datapoint {
    pub timestamp: Option<DateTime<Utc>>,
    pub value: f64,
}

/// Everything the provider needs to answer a `GetMetricStatistics` call.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricQuery {
    pub table_name: String,
    pub scope: Scope,
    pub kind: MetricKind,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Bucket length in seconds.
    pub period_secs: i32,
}

impl MetricQuery {
    /// Dimension pairs keyed the way CloudWatch expects them.
    pub fn dimensions(&self) -> Vec<(&'static str, &str)> {
        let mut dims = vec![("TableName", self.table_name.as_str())];
        if let Some(index) = self.scope.index_name() {
            dims.push(("GlobalSecondaryIndexName", index));
        }
        dims
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableDescription {
    pub table_name: String,
    /// Global secondary index names, in the order the provider reported them.
    pub secondary_index_names: Vec<String>,
}
