use colored::{control, Colorize};

use crate::core::formatter::{format_period, format_timestamp, format_units, format_usd};
use crate::core::models::metric::Statistic;
use crate::core::models::report::{Projection, RoundOutcome, Verdict};

const RULE: &str = "------------------------------------------------------";

/// Render the full cost report as a colored (or plain) string.
///
/// Layout:
/// ```text
///  orders (2024-05-22 00:00 UTC .. 2024-06-01 00:00 UTC, 240h, period 10d)
///  This table has 2 indexes
///  by_customer, by_status
/// ------------------------------------------------------
///   Provisioned write   5.00 avg
///   Consumed write      1.2M total
///   ...
/// ------------------------------------------------------
///   Write cost with Provisioned : $0.78
///   ...
/// ```
pub fn render_projection(projection: &Projection, use_color: bool) -> String {
    control::set_override(use_color);

    let mut lines: Vec<String> = Vec::new();

    let header = format!(
        " {} ({} .. {}, {}h, period {})",
        projection.table_name,
        format_timestamp(&projection.window_start),
        format_timestamp(&projection.window_end),
        projection.window_hours,
        format_period(projection.period_secs)
    );
    lines.push(header.bold().to_string());

    let count = projection.indexes.len();
    lines.push(format!(
        " This table has {} index{}",
        count,
        if count == 1 { "" } else { "es" }
    ));
    if !projection.indexes.is_empty() {
        lines.push(format!(" {}", projection.indexes.join(", ")));
    }
    lines.push(RULE.dimmed().to_string());

    for round in &projection.rounds {
        render_round(&mut lines, round);
    }
    lines.push(RULE.dimmed().to_string());

    let costs = &projection.costs;
    let cost_rows = [
        ("Write cost with Provisioned", costs.provisioned_write),
        ("Write cost with On-demand  ", costs.ondemand_write),
        ("Read cost with Provisioned ", costs.provisioned_read),
        ("Read cost with On-demand   ", costs.ondemand_read),
    ];
    for (label, amount) in cost_rows {
        lines.push(format!("  {} : {}", label.cyan(), format_usd(amount)));
    }
    lines.push(RULE.dimmed().to_string());

    lines.push(format!(
        "  {} : {}",
        "Total cost with Provisioned".cyan(),
        format_usd(costs.provisioned_total).bold()
    ));
    lines.push(format!(
        "  {} : {}",
        "Total cost with On-demand  ".cyan(),
        format_usd(costs.ondemand_total).bold()
    ));
    lines.push(RULE.dimmed().to_string());

    let verdict = projection.verdict.to_string();
    lines.push(match projection.verdict {
        Verdict::ProvisionedCheaper | Verdict::OnDemandCheaper => {
            format!(" {}", verdict.green().bold())
        }
        Verdict::Equal => format!(" {}", verdict.yellow().bold()),
    });

    if projection.is_partial() {
        lines.push(format!(
            " {}",
            "Some metric rounds failed; failed totals count as zero, so this comparison is partial."
                .yellow()
        ));
    }

    lines.join("\n")
}

fn render_round(lines: &mut Vec<String>, round: &RoundOutcome) {
    let label = format!("{:<18}", round.kind.label());
    match round.total {
        Some(total) => {
            let suffix = match round.kind.statistic() {
                Statistic::Average => "avg",
                Statistic::Sum => "total",
            };
            lines.push(format!("  {}  {} {}", label.cyan(), format_units(total), suffix));
        }
        None => {
            lines.push(format!("  {}  {}", label.cyan(), "failed".red()));
            for failure in &round.failures {
                lines.push(format!(
                    "    {}",
                    format!("{}: {}", failure.scope, failure.error).red()
                ));
            }
        }
    }
}
