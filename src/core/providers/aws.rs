use anyhow::Result;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_cloudwatch::primitives::DateTime as SmithyDateTime;
use aws_sdk_cloudwatch::types::{Datapoint as CwDatapoint, Dimension, Statistic as CwStatistic};
use chrono::{DateTime, Utc};

use crate::core::config::ProviderConfig;
use crate::core::error::EstimateError;
use crate::core::models::metric::{Datapoint, MetricQuery, Statistic, TableDescription};
use crate::core::providers::CapacityProvider;

const NAMESPACE: &str = "AWS/DynamoDB";
const CREDENTIALS_SOURCE: &str = "ddb-cost-config";

/// DynamoDB `DescribeTable` plus CloudWatch `GetMetricStatistics`.
pub struct AwsProvider {
    dynamodb: aws_sdk_dynamodb::Client,
    cloudwatch: aws_sdk_cloudwatch::Client,
}

impl AwsProvider {
    /// Build SDK clients from the config file, falling back to the default
    /// credential and region chain for anything it leaves out.
    pub async fn from_config(config: &ProviderConfig) -> Result<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(profile) = &config.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let (Some(id), Some(secret)) = (&config.access_key_id, &config.secret_access_key) {
            loader = loader.credentials_provider(Credentials::new(
                id.clone(),
                secret.clone(),
                config.session_token.clone(),
                None,
                CREDENTIALS_SOURCE,
            ));
        }
        let sdk_config = loader.load().await;
        if sdk_config.region().is_none() {
            anyhow::bail!("No AWS region configured; set `region` in the config file or pass --region");
        }
        tracing::debug!(
            region = ?sdk_config.region(),
            static_credentials = config.has_static_credentials(),
            "loaded AWS configuration"
        );

        Ok(Self {
            dynamodb: aws_sdk_dynamodb::Client::new(&sdk_config),
            cloudwatch: aws_sdk_cloudwatch::Client::new(&sdk_config),
        })
    }
}

fn to_smithy(ts: &DateTime<Utc>) -> SmithyDateTime {
    SmithyDateTime::from_secs(ts.timestamp())
}

fn from_smithy(ts: &SmithyDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts.secs(), ts.subsec_nanos())
}

fn cw_statistic(stat: Statistic) -> CwStatistic {
    match stat {
        Statistic::Sum => CwStatistic::Sum,
        Statistic::Average => CwStatistic::Average,
    }
}

fn to_dimensions(query: &MetricQuery) -> Vec<Dimension> {
    query
        .dimensions()
        .into_iter()
        .map(|(name, value)| Dimension::builder().name(name).value(value).build())
        .collect()
}

/// Pull the requested statistic out of each datapoint, dropping those without it.
fn extract_values(datapoints: &[CwDatapoint], stat: Statistic) -> Vec<Datapoint> {
    datapoints
        .iter()
        .filter_map(|d| {
            let value = match stat {
                Statistic::Sum => d.sum(),
                Statistic::Average => d.average(),
            }?;
            Some(Datapoint {
                timestamp: d.timestamp().and_then(from_smithy),
                value,
            })
        })
        .collect()
}

#[async_trait]
impl CapacityProvider for AwsProvider {
    async fn describe_table(&self, table_name: &str) -> Result<TableDescription, EstimateError> {
        let output = self
            .dynamodb
            .describe_table()
            .table_name(table_name)
            .send()
            .await
            .map_err(|err| {
                let service_err = err.into_service_error();
                if service_err.is_resource_not_found_exception() {
                    EstimateError::NotFound(format!("table {}", table_name))
                } else {
                    EstimateError::Transport(
                        aws_sdk_dynamodb::error::DisplayErrorContext(&service_err).to_string(),
                    )
                }
            })?;

        let table = output
            .table()
            .ok_or_else(|| EstimateError::NotFound(format!("table {}", table_name)))?;

        Ok(TableDescription {
            table_name: table.table_name().unwrap_or(table_name).to_string(),
            secondary_index_names: table
                .global_secondary_indexes()
                .iter()
                .filter_map(|gsi| gsi.index_name().map(str::to_string))
                .collect(),
        })
    }

    async fn get_metric_statistics(
        &self,
        query: &MetricQuery,
    ) -> Result<Vec<Datapoint>, EstimateError> {
        let stat = query.kind.statistic();
        let output = self
            .cloudwatch
            .get_metric_statistics()
            .namespace(NAMESPACE)
            .metric_name(query.kind.metric_name())
            .set_dimensions(Some(to_dimensions(query)))
            .start_time(to_smithy(&query.start))
            .end_time(to_smithy(&query.end))
            .period(query.period_secs)
            .statistics(cw_statistic(stat))
            .send()
            .await
            .map_err(|err| {
                EstimateError::Transport(
                    aws_sdk_cloudwatch::error::DisplayErrorContext(&err).to_string(),
                )
            })?;

        let values = extract_values(output.datapoints(), stat);
        tracing::debug!(
            scope = %query.scope,
            metric = query.kind.metric_name(),
            statistic = stat.as_str(),
            datapoints = values.len(),
            "fetched metric statistics"
        );
        Ok(values)
    }
}
