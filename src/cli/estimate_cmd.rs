use anyhow::{Context, Result};
use std::path::Path;

use crate::cli::output::{OutputFormat, OutputOptions};
use crate::cli::renderer;
use crate::core::config::ProviderConfig;
use crate::core::discovery;
use crate::core::models::report::Projection;
use crate::core::projector::Projector;
use crate::core::providers::aws::AwsProvider;
use crate::core::providers::CapacityProvider;
use crate::core::window::{StatisticsPeriod, WindowSpec};

pub struct EstimateArgs<'a> {
    pub config_path: &'a Path,
    pub table_name: &'a str,
    pub lookback_days: u32,
    pub region: Option<String>,
    pub period: StatisticsPeriod,
}

/// Discover scopes, run the projection and print it.
pub async fn run(args: EstimateArgs<'_>, opts: &OutputOptions) -> Result<()> {
    let mut config = ProviderConfig::load(args.config_path)
        .with_context(|| format!("Failed to load {}", args.config_path.display()))?;
    if args.region.is_some() {
        config.region = args.region;
    }

    let provider = AwsProvider::from_config(&config).await?;
    let window = WindowSpec::ending_now(args.lookback_days)
        .with_context(|| format!("Invalid lookback of {} days", args.lookback_days))?;

    let spinner = if spinner_enabled(opts) {
        Some(tokio::spawn(async move {
            let frames = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
            let mut i = 0usize;
            loop {
                eprint!("\r {} Fetching capacity metrics...", frames[i % frames.len()]);
                i = i.wrapping_add(1);
                tokio::time::sleep(std::time::Duration::from_millis(80)).await;
            }
        }))
    } else {
        None
    };

    let result = estimate(&provider, args.table_name, window, args.period).await;

    if let Some(s) = spinner {
        s.abort();
        eprint!("\r\x1b[2K");
    }

    let projection = result?;
    log_round_failures(&projection);
    print_projection(&projection, opts)
}

/// The spinner redraws stderr, so it only runs when nothing below `warn`
/// can be logged while fetching.
fn spinner_enabled(opts: &OutputOptions) -> bool {
    matches!(opts.format, OutputFormat::Text)
        && !opts.verbose
        && !tracing::enabled!(tracing::Level::DEBUG)
}

/// Emitted after the spinner has stopped so the lines are not overwritten.
fn log_round_failures(projection: &Projection) {
    for round in projection.rounds.iter().filter(|r| !r.succeeded()) {
        for failure in &round.failures {
            tracing::warn!(
                metric = round.kind.metric_name(),
                scope = %failure.scope,
                error = %failure.error,
                "metric round failed"
            );
        }
    }
}

/// Discovery followed by the four metric rounds.
pub async fn estimate(
    provider: &dyn CapacityProvider,
    table_name: &str,
    window: WindowSpec,
    period: StatisticsPeriod,
) -> Result<Projection> {
    let scopes = discovery::list_scopes(provider, table_name)
        .await
        .with_context(|| format!("Failed to describe table `{}`", table_name))?;
    tracing::debug!(table = table_name, scopes = scopes.len(), "discovered scopes");

    let period_secs = period.resolve(&window);
    let projector = Projector::new(provider, table_name, window, period_secs);
    Ok(projector.project(&scopes).await)
}

fn print_projection(projection: &Projection, opts: &OutputOptions) -> Result<()> {
    match opts.format {
        OutputFormat::Text => {
            println!("{}", renderer::render_projection(projection, opts.use_color));
        }
        OutputFormat::Json => {
            let json = if opts.pretty {
                serde_json::to_string_pretty(projection)?
            } else {
                serde_json::to_string(projection)?
            };
            println!("{}", json);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::EstimateError;
    use crate::core::models::metric::{MetricKind, Scope};
    use crate::core::providers::testing::StaticProvider;
    use chrono::{TimeZone, Utc};

    fn window() -> WindowSpec {
        WindowSpec::ending_at(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(), 10).unwrap()
    }

    #[tokio::test]
    async fn estimate_runs_discovery_and_rounds() {
        let provider = StaticProvider::with_indexes("orders", &["gsi1"]).everywhere(&[1.0]);
        let projection = estimate(&provider, "orders", window(), StatisticsPeriod::WholeWindow)
            .await
            .unwrap();
        assert_eq!(projection.indexes, vec!["gsi1".to_string()]);
        assert_eq!(projection.period_secs, 864_000);
        assert_eq!(projection.totals.consumed_write, 2.0);
        assert_eq!(provider.calls_for(MetricKind::ProvisionedWrite).len(), 2);
    }

    #[tokio::test]
    async fn estimate_fails_when_table_missing() {
        let provider = StaticProvider::with_indexes("orders", &[]);
        let err = estimate(&provider, "missing", window(), StatisticsPeriod::WholeWindow)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("missing"));
        assert!(matches!(
            err.downcast_ref::<EstimateError>(),
            Some(EstimateError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn estimate_survives_failed_round() {
        let provider = StaticProvider::with_indexes("orders", &[])
            .everywhere(&[1.0])
            .fail(
                Scope::Table,
                MetricKind::ConsumedRead,
                EstimateError::Transport("boom".into()),
            );
        let projection = estimate(&provider, "orders", window(), StatisticsPeriod::Seconds(300))
            .await
            .unwrap();
        assert!(projection.is_partial());
        assert_eq!(projection.period_secs, 300);
    }

    fn opts(format: OutputFormat, verbose: bool) -> OutputOptions {
        OutputOptions {
            format,
            pretty: false,
            use_color: false,
            verbose,
        }
    }

    #[test]
    fn spinner_only_for_quiet_text_output() {
        assert!(spinner_enabled(&opts(OutputFormat::Text, false)));
        assert!(!spinner_enabled(&opts(OutputFormat::Text, true)));
        assert!(!spinner_enabled(&opts(OutputFormat::Json, false)));
    }

    #[test]
    fn spinner_off_when_debug_logging_is_enabled() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::sink)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            assert!(!spinner_enabled(&opts(OutputFormat::Text, false)));
        });
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[tokio::test]
    async fn round_failures_are_logged_only_after_fetching() {
        let provider = StaticProvider::with_indexes("orders", &[])
            .everywhere(&[1.0])
            .fail(
                Scope::Table,
                MetricKind::ConsumedRead,
                EstimateError::Transport("boom".into()),
            );
        let projector = Projector::new(&provider, "orders", window(), 864_000);

        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let projection = projector.project(&[Scope::Table]).await;
        assert!(projection.is_partial());
        assert!(logs.text().is_empty(), "fetching logged: {}", logs.text());

        log_round_failures(&projection);
        let text = logs.text();
        assert!(text.contains("metric round failed"));
        assert!(text.contains("ConsumedReadCapacityUnits"));
        assert!(text.contains("boom"));
    }

    #[test]
    fn json_output_is_serializable() {
        let projection = tokio::runtime::Runtime::new().unwrap().block_on(async {
            let provider = StaticProvider::with_indexes("orders", &[]).everywhere(&[1.0]);
            estimate(&provider, "orders", window(), StatisticsPeriod::WholeWindow)
                .await
                .unwrap()
        });
        let json = serde_json::to_value(&projection).unwrap();
        assert_eq!(json["table_name"], "orders");
        assert_eq!(json["verdict"], "on_demand_cheaper");
        assert_eq!(json["rounds"].as_array().unwrap().len(), 4);
    }
}
