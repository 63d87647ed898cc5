use crate::core::models::report::{CostBreakdown, Totals, Verdict};

/// Per-unit dollar rates for both billing modes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostModel {
    /// Per write-capacity-unit hour.
    pub provisioned_write_hour: f64,
    /// Per read-capacity-unit hour.
    pub provisioned_read_hour: f64,
    /// Per write request unit.
    pub ondemand_write_request: f64,
    /// Per read request unit.
    pub ondemand_read_request: f64,
}

/// us-east-1 list prices.
pub const STANDARD_RATES: CostModel = CostModel {
    provisioned_write_hour: 0.00065,
    provisioned_read_hour: 0.00013,
    ondemand_write_request: 0.00000125,
    ondemand_read_request: 0.00000025,
};

impl Default for CostModel {
    fn default() -> Self {
        STANDARD_RATES
    }
}

impl CostModel {
    /// Project both plans from aggregated totals over a window of `window_hours`.
    pub fn project(&self, totals: &Totals, window_hours: f64) -> CostBreakdown {
        let provisioned_write = window_hours * totals.provisioned_write * self.provisioned_write_hour;
        let provisioned_read = window_hours * totals.provisioned_read * self.provisioned_read_hour;
        let ondemand_write = totals.consumed_write * self.ondemand_write_request;
        let ondemand_read = totals.consumed_read * self.ondemand_read_request;
        CostBreakdown {
            provisioned_write,
            provisioned_read,
            ondemand_write,
            ondemand_read,
            provisioned_total: provisioned_write + provisioned_read,
            ondemand_total: ondemand_write + ondemand_read,
        }
    }
}

/// Three-way comparison with exact float equality; no tolerance is applied.
pub fn verdict(provisioned_total: f64, ondemand_total: f64) -> Verdict {
    if provisioned_total < ondemand_total {
        Verdict::ProvisionedCheaper
    } else if provisioned_total > ondemand_total {
        Verdict::OnDemandCheaper
    } else {
        Verdict::Equal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provisioned_write_cost() {
        let totals = Totals {
            provisioned_write: 5.0,
            ..Totals::default()
        };
        let costs = STANDARD_RATES.project(&totals, 240.0);
        assert!((costs.provisioned_write - 0.78).abs() < 1e-12);
        assert_eq!(costs.provisioned_read, 0.0);
    }

    #[test]
    fn ondemand_write_cost() {
        let totals = Totals {
            consumed_write: 1000.0,
            ..Totals::default()
        };
        let costs = STANDARD_RATES.project(&totals, 240.0);
        assert!((costs.ondemand_write - 0.00125).abs() < 1e-12);
    }

    #[test]
    fn window_hours_only_scale_provisioned() {
        let totals = Totals {
            provisioned_write: 1.0,
            consumed_write: 1_000_000.0,
            provisioned_read: 1.0,
            consumed_read: 1_000_000.0,
        };
        let short = STANDARD_RATES.project(&totals, 1.0);
        let long = STANDARD_RATES.project(&totals, 10.0);
        assert!((long.provisioned_total - short.provisioned_total * 10.0).abs() < 1e-12);
        assert_eq!(long.ondemand_total, short.ondemand_total);
    }

    #[test]
    fn plan_totals_add_read_and_write() {
        let totals = Totals {
            provisioned_write: 2.0,
            consumed_write: 4_000.0,
            provisioned_read: 10.0,
            consumed_read: 8_000.0,
        };
        let c = STANDARD_RATES.project(&totals, 24.0);
        assert!((c.provisioned_read - 24.0 * 10.0 * 0.00013).abs() < 1e-12);
        assert!((c.ondemand_read - 8_000.0 * 0.00000025).abs() < 1e-12);
        assert_eq!(c.provisioned_total, c.provisioned_write + c.provisioned_read);
        assert_eq!(c.ondemand_total, c.ondemand_write + c.ondemand_read);
    }

    #[test]
    fn verdict_three_way() {
        assert_eq!(verdict(1.0, 1.2), Verdict::ProvisionedCheaper);
        assert_eq!(verdict(1.2, 1.0), Verdict::OnDemandCheaper);
        assert_eq!(verdict(0.5, 0.5), Verdict::Equal);
    }

    #[test]
    fn verdict_uses_exact_equality() {
        // 0.1 + 0.2 != 0.3 in binary floating point, so this is not "equal".
        assert_eq!(verdict(0.1 + 0.2, 0.3), Verdict::OnDemandCheaper);
        assert_eq!(verdict(0.0, 0.0), Verdict::Equal);
    }
}
