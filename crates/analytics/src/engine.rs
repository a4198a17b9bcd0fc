use crate::error::AnalyticsError;
use crate::report::MetricsReport;
use database::AnalyticalRow;
use std::cmp::Ordering;
use std::collections::HashMap;

/// The delivery-status token the source dataset uses for a missed deadline.
pub const LATE_DELIVERY_STATUS: &str = "Late delivery";

/// A stateless calculator for deriving KPIs from the analytical working set.
#[derive(Debug, Default)]
pub struct MetricsEngine {}

impl MetricsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for computing the KPI report.
    ///
    /// # Arguments
    ///
    /// * `rows` - The full fact table joined back to its dimensions.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `MetricsReport`, or `AnalyticsError::NoData`
    /// when the warehouse has nothing to aggregate.
    pub fn calculate(&self, rows: &[AnalyticalRow]) -> Result<MetricsReport, AnalyticsError> {
        if rows.is_empty() {
            return Err(AnalyticsError::NoData(
                "the fact table has no rows".to_string(),
            ));
        }

        let mut report = MetricsReport::new();
        self.calculate_revenue(rows, &mut report);
        self.calculate_commodity_context(rows, &mut report);
        self.calculate_logistics(rows, &mut report);
        self.calculate_momentum(rows, &mut report);
        Ok(report)
    }

    /// Calculates all revenue-related metrics.
    fn calculate_revenue(&self, rows: &[AnalyticalRow], report: &mut MetricsReport) {
        report.order_count = rows.len();
        report.total_revenue = rows.iter().map(|row| row.sale_amount).sum();
        report.total_profit = rows.iter().filter_map(|row| row.order_profit).sum();

        report.margin_pct = if report.total_revenue > 0.0 {
            report.total_profit / report.total_revenue * 100.0
        } else {
            0.0
        };
        // order_count is never zero here; calculate() rejects empty input.
        report.average_ticket = report.total_revenue / report.order_count as f64;
    }

    /// Mean and sample volatility of the enriched commodity price. Rows that
    /// carry no price stay out of both statistics.
    fn calculate_commodity_context(&self, rows: &[AnalyticalRow], report: &mut MetricsReport) {
        let prices: Vec<f64> = rows.iter().filter_map(|row| row.brent_price).collect();
        report.brent_average = mean(&prices);
        report.brent_volatility = sample_std_dev(&prices);
    }

    /// Share of orders flagged late; a missing status counts as on time.
    fn calculate_logistics(&self, rows: &[AnalyticalRow], report: &mut MetricsReport) {
        let late = rows
            .iter()
            .filter(|row| row.delivery_status.as_deref() == Some(LATE_DELIVERY_STATUS))
            .count();
        report.late_delivery_rate_pct = late as f64 / rows.len() as f64 * 100.0;
        report.on_time_rate_pct = 100.0 - report.late_delivery_rate_pct;
    }

    /// Trend delta between the two date-ordered halves of the order book,
    /// plus the best and worst ends of the category mix.
    fn calculate_momentum(&self, rows: &[AnalyticalRow], report: &mut MetricsReport) {
        // Undated rows sort after every dated one, so they weigh on the
        // "recent" half of the split.
        let mut ordered: Vec<&AnalyticalRow> = rows.iter().collect();
        ordered.sort_by(|a, b| match (a.full_date, b.full_date) {
            (Some(left), Some(right)) => left.cmp(&right),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });

        let midpoint = ordered.len() / 2;
        let first_half: f64 = ordered[..midpoint].iter().map(|row| row.sale_amount).sum();
        let second_half: f64 = ordered[midpoint..].iter().map(|row| row.sale_amount).sum();
        report.sales_trend_pct = if first_half > 0.0 {
            (second_half - first_half) / first_half * 100.0
        } else {
            0.0
        };

        // Rows that lost their product dimension stay out of the ranking.
        let mut revenue_by_category: HashMap<&str, f64> = HashMap::new();
        let mut profit_by_category: HashMap<&str, f64> = HashMap::new();
        for row in rows {
            if let Some(category) = row.category.as_deref() {
                *revenue_by_category.entry(category).or_default() += row.sale_amount;
                *profit_by_category.entry(category).or_default() +=
                    row.order_profit.unwrap_or(0.0);
            }
        }

        report.top_category = revenue_by_category
            .iter()
            .max_by(|a, b| {
                a.1.partial_cmp(b.1)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| b.0.cmp(a.0))
            })
            .map(|(category, _)| category.to_string());
        report.weakest_category = profit_by_category
            .iter()
            .min_by(|a, b| {
                a.1.partial_cmp(b.1)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| a.0.cmp(b.0))
            })
            .map(|(category, _)| category.to_string());
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n − 1 denominator); 0 with fewer than two
/// observations.
fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let average = mean(values);
    let variance = values
        .iter()
        .map(|value| (value - average).powi(2))
        .sum::<f64>()
        / (values.len() - 1) as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn date(day: u32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(2018, 1, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
    }

    fn row(
        full_date: Option<NaiveDateTime>,
        sale: f64,
        profit: Option<f64>,
        brent: Option<f64>,
        status: Option<&str>,
        category: Option<&str>,
    ) -> AnalyticalRow {
        AnalyticalRow {
            full_date,
            sale_amount: sale,
            order_profit: profit,
            brent_price: brent,
            shipping_days_actual: Some(4),
            category: category.map(str::to_string),
            product_name: Some("Smart watch".to_string()),
            customer_city: Some("Caguas".to_string()),
            customer_state: Some("PR".to_string()),
            customer_country: Some("Puerto Rico".to_string()),
            delivery_status: status.map(str::to_string),
            shipping_mode: Some("Standard Class".to_string()),
        }
    }

    #[test]
    fn calculates_the_full_report() {
        let rows = vec![
            row(
                date(1),
                100.0,
                Some(10.0),
                Some(70.0),
                Some("Shipping on time"),
                Some("Fitness"),
            ),
            row(
                date(2),
                100.0,
                Some(20.0),
                Some(72.0),
                Some(LATE_DELIVERY_STATUS),
                Some("Golf"),
            ),
            row(
                date(3),
                300.0,
                Some(30.0),
                Some(74.0),
                Some("Shipping on time"),
                Some("Fitness"),
            ),
            // Fully unmatched fact row: no dimensions, no profit, no price.
            row(date(4), 500.0, None, None, None, None),
        ];

        let report = MetricsEngine::new().calculate(&rows).unwrap();

        assert_eq!(report.order_count, 4);
        assert_eq!(report.total_revenue, 1000.0);
        assert_eq!(report.total_profit, 60.0);
        assert_eq!(report.margin_pct, 6.0);
        assert_eq!(report.average_ticket, 250.0);

        assert_eq!(report.brent_average, 72.0);
        // Sample std-dev of [70, 72, 74] is exactly 2.
        assert_eq!(report.brent_volatility, 2.0);

        assert_eq!(report.late_delivery_rate_pct, 25.0);
        assert_eq!(report.on_time_rate_pct, 75.0);

        // Halves: [100, 100] vs [300, 500].
        assert_eq!(report.sales_trend_pct, 300.0);
        assert_eq!(report.top_category.as_deref(), Some("Fitness"));
        assert_eq!(report.weakest_category.as_deref(), Some("Golf"));
    }

    #[test]
    fn undated_rows_count_toward_the_recent_half() {
        let rows = vec![
            row(None, 900.0, None, None, None, None),
            row(date(1), 100.0, None, None, None, None),
            row(date(2), 200.0, None, None, None, None),
            row(date(3), 300.0, None, None, None, None),
        ];

        let report = MetricsEngine::new().calculate(&rows).unwrap();
        // Ordered: 100, 200, 300, undated 900 → halves 300 vs 1200.
        assert_eq!(report.sales_trend_pct, 300.0);
    }

    #[test]
    fn zero_revenue_keeps_ratios_at_zero() {
        let rows = vec![
            row(date(1), 0.0, Some(0.0), None, None, Some("Fitness")),
            row(date(2), 0.0, None, None, None, Some("Fitness")),
        ];

        let report = MetricsEngine::new().calculate(&rows).unwrap();
        assert_eq!(report.margin_pct, 0.0);
        assert_eq!(report.average_ticket, 0.0);
        assert_eq!(report.sales_trend_pct, 0.0);
        assert_eq!(report.brent_average, 0.0);
    }

    #[test]
    fn single_price_observation_has_no_volatility() {
        let rows = vec![
            row(date(1), 50.0, None, Some(68.13), None, None),
            row(date(2), 50.0, None, None, None, None),
        ];

        let report = MetricsEngine::new().calculate(&rows).unwrap();
        assert_eq!(report.brent_average, 68.13);
        assert_eq!(report.brent_volatility, 0.0);
    }

    #[test]
    fn empty_working_set_is_an_error() {
        let err = MetricsEngine::new().calculate(&[]).unwrap_err();
        assert!(matches!(err, AnalyticsError::NoData(_)));
    }
}
