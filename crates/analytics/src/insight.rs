use crate::report::MetricsReport;
use configuration::InsightConfig;
use serde::{Deserialize, Serialize};

/// How urgent an insight card is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Positive,
    Warning,
    Critical,
}

/// One rule-generated narrative card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    pub severity: Severity,
    pub title: String,
    pub message: String,
}

/// Turns a metrics report into narrative cards by comparing KPIs against the
/// configured business benchmarks.
#[derive(Debug, Clone)]
pub struct InsightEngine {
    thresholds: InsightConfig,
}

impl InsightEngine {
    pub fn new(thresholds: InsightConfig) -> Self {
        Self { thresholds }
    }

    pub fn generate(&self, report: &MetricsReport) -> Vec<Insight> {
        let mut insights = Vec::new();

        // Margin against the sector benchmark; always produces a card.
        if report.margin_pct > self.thresholds.margin_benchmark_pct {
            insights.push(Insight {
                severity: Severity::Positive,
                title: "Healthy Margin".to_string(),
                message: format!(
                    "Margin of {:.1}% is above the {:.0}% benchmark. Efficient operation.",
                    report.margin_pct, self.thresholds.margin_benchmark_pct
                ),
            });
        } else {
            insights.push(Insight {
                severity: Severity::Warning,
                title: "Margin Under Pressure".to_string(),
                message: format!(
                    "Margin of {:.1}% is below {:.0}%. Review operating costs urgently.",
                    report.margin_pct, self.thresholds.margin_benchmark_pct
                ),
            });
        }

        // Delivery punctuality; silent between the two thresholds.
        if report.late_delivery_rate_pct > self.thresholds.late_rate_critical_pct {
            insights.push(Insight {
                severity: Severity::Critical,
                title: "Logistics Crisis".to_string(),
                message: format!(
                    "{:.1}% of deliveries are late. Target: under {:.0}%. \
                     Direct impact on customer satisfaction.",
                    report.late_delivery_rate_pct, self.thresholds.late_rate_excellent_pct
                ),
            });
        } else if report.late_delivery_rate_pct < self.thresholds.late_rate_excellent_pct {
            insights.push(Insight {
                severity: Severity::Positive,
                title: "Delivery Excellence".to_string(),
                message: format!(
                    "Only {:.1}% of deliveries are late. Logistics is performing \
                     above the market.",
                    report.late_delivery_rate_pct
                ),
            });
        }

        // Commodity exposure; only raised when volatility is elevated.
        if report.brent_volatility > self.thresholds.brent_volatility_threshold {
            insights.push(Insight {
                severity: Severity::Warning,
                title: "High Brent Volatility".to_string(),
                message: format!(
                    "Price standard deviation of ${:.2}. Hedging is recommended \
                     to protect margins.",
                    report.brent_volatility
                ),
            });
        }

        insights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> InsightEngine {
        InsightEngine::new(InsightConfig::default())
    }

    fn report_with(margin: f64, late_rate: f64, volatility: f64) -> MetricsReport {
        MetricsReport {
            margin_pct: margin,
            late_delivery_rate_pct: late_rate,
            on_time_rate_pct: 100.0 - late_rate,
            brent_volatility: volatility,
            ..MetricsReport::new()
        }
    }

    #[test]
    fn strong_quarter_yields_two_positive_cards() {
        let insights = engine().generate(&report_with(20.0, 2.0, 5.0));

        assert_eq!(insights.len(), 2);
        assert_eq!(insights[0].severity, Severity::Positive);
        assert_eq!(insights[0].title, "Healthy Margin");
        assert_eq!(insights[1].severity, Severity::Positive);
        assert_eq!(insights[1].title, "Delivery Excellence");
    }

    #[test]
    fn stressed_quarter_raises_all_three_alerts() {
        let insights = engine().generate(&report_with(10.0, 15.0, 12.0));

        assert_eq!(insights.len(), 3);
        assert_eq!(insights[0].severity, Severity::Warning);
        assert_eq!(insights[0].title, "Margin Under Pressure");
        assert_eq!(insights[1].severity, Severity::Critical);
        assert_eq!(insights[1].title, "Logistics Crisis");
        assert_eq!(insights[2].severity, Severity::Warning);
        assert_eq!(insights[2].title, "High Brent Volatility");
    }

    #[test]
    fn middling_late_rate_produces_no_logistics_card() {
        let insights = engine().generate(&report_with(20.0, 7.5, 0.0));

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].title, "Healthy Margin");
    }

    #[test]
    fn margin_exactly_at_benchmark_is_under_pressure() {
        let insights = engine().generate(&report_with(15.0, 7.5, 0.0));
        assert_eq!(insights[0].severity, Severity::Warning);
    }
}
