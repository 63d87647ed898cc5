use futures::future::join_all;

use crate::core::error::EstimateError;
use crate::core::models::metric::{MetricKind, MetricQuery, Scope, Statistic};
use crate::core::models::report::{Projection, RoundOutcome, ScopeFailure, Totals};
use crate::core::pricing::{self, STANDARD_RATES};
use crate::core::providers::CapacityProvider;
use crate::core::window::WindowSpec;

/// Collapse a series by its statistic. `None` for an empty series.
pub fn fold_values(stat: Statistic, values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: f64 = values.iter().sum();
    match stat {
        Statistic::Sum => Some(sum),
        Statistic::Average => Some(sum / values.len() as f64),
    }
}

/// Runs the four metric rounds for one table and prices the result.
pub struct Projector<'a> {
    provider: &'a dyn CapacityProvider,
    table_name: &'a str,
    window: WindowSpec,
    period_secs: i32,
}

impl<'a> Projector<'a> {
    pub fn new(
        provider: &'a dyn CapacityProvider,
        table_name: &'a str,
        window: WindowSpec,
        period_secs: i32,
    ) -> Self {
        Self {
            provider,
            table_name,
            window,
            period_secs,
        }
    }

    /// One scalar for (`scope`, `kind`) over the whole window.
    pub async fn aggregate(&self, scope: &Scope, kind: MetricKind) -> Result<f64, EstimateError> {
        let query = MetricQuery {
            table_name: self.table_name.to_string(),
            scope: scope.clone(),
            kind,
            start: self.window.start,
            end: self.window.end,
            period_secs: self.period_secs,
        };
        let datapoints = self.provider.get_metric_statistics(&query).await?;
        let values: Vec<f64> = datapoints.iter().map(|d| d.value).collect();
        tracing::debug!(
            scope = %scope,
            metric = kind.metric_name(),
            datapoints = values.len(),
            latest = ?datapoints.iter().filter_map(|d| d.timestamp).max(),
            "aggregating"
        );
        fold_values(kind.statistic(), &values).ok_or_else(|| EstimateError::NoData {
            scope: scope.to_string(),
            metric: kind.metric_name().to_string(),
        })
    }

    /// Fan out one fetch per scope, join, then sum. Any failing scope fails the round.
    pub async fn run_round(&self, scopes: &[Scope], kind: MetricKind) -> RoundOutcome {
        let results = join_all(scopes.iter().map(|scope| self.aggregate(scope, kind))).await;

        let mut total = 0.0;
        let mut failures = Vec::new();
        for (scope, result) in scopes.iter().zip(results) {
            match result {
                Ok(value) => total += value,
                Err(err) => failures.push(ScopeFailure::new(scope.clone(), &err)),
            }
        }

        if failures.is_empty() {
            tracing::debug!(metric = kind.metric_name(), total, "round complete");
            RoundOutcome {
                kind,
                total: Some(total),
                failures,
            }
        } else {
            tracing::debug!(
                metric = kind.metric_name(),
                failed_scopes = failures.len(),
                "round failed"
            );
            RoundOutcome {
                kind,
                total: None,
                failures,
            }
        }
    }

    /// Run every round in sequence and price the totals that were gathered.
    /// Failed rounds leave their total at zero.
    pub async fn project(&self, scopes: &[Scope]) -> Projection {
        let mut totals = Totals::default();
        let mut rounds = Vec::with_capacity(MetricKind::all().len());
        for kind in MetricKind::all() {
            let outcome = self.run_round(scopes, *kind).await;
            if let Some(total) = outcome.total {
                totals.set(*kind, total);
            }
            tracing::debug!(metric = kind.metric_name(), total = totals.get(*kind), "total");
            rounds.push(outcome);
        }

        let window_hours = self.window.hours();
        let costs = STANDARD_RATES.project(&totals, window_hours);
        let verdict = pricing::verdict(costs.provisioned_total, costs.ondemand_total);

        Projection {
            table_name: self.table_name.to_string(),
            window_start: self.window.start,
            window_end: self.window.end,
            window_hours,
            period_secs: self.period_secs,
            indexes: scopes
                .iter()
                .filter_map(|s| s.index_name().map(str::to_string))
                .collect(),
            rounds,
            totals,
            costs,
            verdict,
        }
    }
}
