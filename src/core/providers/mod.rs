pub mod aws;

use async_trait::async_trait;

use crate::core::error::EstimateError;
use crate::core::models::metric::{Datapoint, MetricQuery, TableDescription};

/// Table metadata and utilization metrics for one account/region.
#[async_trait]
pub trait CapacityProvider: Send + Sync {
    /// Describe `table_name`, failing with `NotFound` when it does not exist.
    async fn describe_table(&self, table_name: &str) -> Result<TableDescription, EstimateError>;

    /// Raw datapoints for the statistic `query.kind` calls for.
    async fn get_metric_statistics(
        &self,
        query: &MetricQuery,
    ) -> Result<Vec<Datapoint>, EstimateError>;
}

#[cfg(test)]
pub mod testing {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;
    use crate::core::models::metric::{MetricKind, Scope};

    /// In-memory provider: fixed series per (scope, kind), optional failures.
    #[derive(Default)]
    pub struct StaticProvider {
        pub table: Option<TableDescription>,
        pub describe_error: Option<EstimateError>,
        pub series: HashMap<(Scope, MetricKind), Vec<f64>>,
        pub failures: HashMap<(Scope, MetricKind), EstimateError>,
        pub calls: Mutex<Vec<MetricQuery>>,
    }

    impl StaticProvider {
        pub fn with_indexes(table_name: &str, indexes: &[&str]) -> Self {
            Self {
                table: Some(TableDescription {
                    table_name: table_name.to_string(),
                    secondary_index_names: indexes.iter().map(|s| s.to_string()).collect(),
                }),
                ..Self::default()
            }
        }

        pub fn series(mut self, scope: Scope, kind: MetricKind, values: &[f64]) -> Self {
            self.series.insert((scope, kind), values.to_vec());
            self
        }

        /// Same series for every scope of the table and every metric kind.
        pub fn everywhere(mut self, values: &[f64]) -> Self {
            let scopes = self.scopes();
            for scope in scopes {
                for kind in MetricKind::all() {
                    self.series.insert((scope.clone(), *kind), values.to_vec());
                }
            }
            self
        }

        pub fn fail(mut self, scope: Scope, kind: MetricKind, err: EstimateError) -> Self {
            self.failures.insert((scope, kind), err);
            self
        }

        pub fn calls_for(&self, kind: MetricKind) -> Vec<MetricQuery> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|q| q.kind == kind)
                .cloned()
                .collect()
        }

        fn scopes(&self) -> Vec<Scope> {
            let mut scopes: Vec<Scope> = self
                .table
                .iter()
                .flat_map(|t| t.secondary_index_names.iter().cloned().map(Scope::Index))
                .collect();
            scopes.push(Scope::Table);
            scopes
        }
    }

    #[async_trait]
    impl CapacityProvider for StaticProvider {
        async fn describe_table(
            &self,
            table_name: &str,
        ) -> Result<TableDescription, EstimateError> {
            if let Some(err) = &self.describe_error {
                return Err(err.clone());
            }
            match &self.table {
                Some(t) if t.table_name == table_name => Ok(t.clone()),
                _ => Err(EstimateError::NotFound(format!("table {}", table_name))),
            }
        }

        async fn get_metric_statistics(
            &self,
            query: &MetricQuery,
        ) -> Result<Vec<Datapoint>, EstimateError> {
            self.calls.lock().unwrap().push(query.clone());
            let key = (query.scope.clone(), query.kind);
            if let Some(err) = self.failures.get(&key) {
                return Err(err.clone());
            }
            Ok(self
                .series
                .get(&key)
                .map(|values| {
                    values
                        .iter()
                        .map(|v| Datapoint {
                            timestamp: Some(query.start),
                            value: *v,
                        })
                        .collect()
                })
                .unwrap_or_default())
        }
    }
}
