use chrono::NaiveDateTime;
use core_types::SalesRecord;
use serde::Serialize;
use tracing::{info, warn};

/// Placeholder-fill counters accumulated while canonicalizing rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct FillCounts {
    pub category: usize,
    pub product_name: usize,
    pub customer_country: usize,
    pub customer_state: usize,
}

/// Outcome of the data-quality audit over canonicalized rows.
///
/// Violations are reported, never fatal: only the survival filter removes
/// rows, and it removes solely what cannot be aggregated (missing or negative
/// sale amounts). Future order dates and negative shipping days stay in the
/// data with a warning, preserving the source's auditing behavior.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QualityReport {
    pub rows_scanned: usize,
    pub future_order_dates: usize,
    pub negative_sale_amounts: usize,
    pub negative_shipping_days: usize,
    pub filled_categories: usize,
    pub filled_product_names: usize,
    pub filled_customer_countries: usize,
    pub filled_customer_states: usize,
}

impl QualityReport {
    pub fn has_violations(&self) -> bool {
        self.future_order_dates > 0
            || self.negative_sale_amounts > 0
            || self.negative_shipping_days > 0
    }

    pub fn log(&self) {
        if self.future_order_dates > 0 {
            warn!(count = self.future_order_dates, "orders dated in the future");
        }
        if self.negative_sale_amounts > 0 {
            warn!(
                count = self.negative_sale_amounts,
                "orders with negative sale amounts (dropped by the survival filter)"
            );
        }
        if self.negative_shipping_days > 0 {
            warn!(
                count = self.negative_shipping_days,
                "orders with negative actual shipping days"
            );
        }
        let filled = self.filled_categories
            + self.filled_product_names
            + self.filled_customer_countries
            + self.filled_customer_states;
        if filled > 0 {
            info!(
                categories = self.filled_categories,
                products = self.filled_product_names,
                countries = self.filled_customer_countries,
                states = self.filled_customer_states,
                "blank descriptive fields replaced with placeholders"
            );
        }
        if !self.has_violations() {
            info!(rows = self.rows_scanned, "quality audit passed");
        }
    }
}

/// Runs the audit checks over every canonical row.
pub struct QualityAuditor;

impl QualityAuditor {
    /// `now` is injected so the future-date check is deterministic in tests.
    pub fn audit(records: &[SalesRecord], now: NaiveDateTime, fills: FillCounts) -> QualityReport {
        let mut report = QualityReport {
            rows_scanned: records.len(),
            filled_categories: fills.category,
            filled_product_names: fills.product_name,
            filled_customer_countries: fills.customer_country,
            filled_customer_states: fills.customer_state,
            ..QualityReport::default()
        };

        for record in records {
            if record.order_date.is_some_and(|date| date > now) {
                report.future_order_dates += 1;
            }
            // NaN (unparseable amount) is neither negative nor valid; the
            // survival filter handles it.
            if record.sale_amount < 0.0 {
                report.negative_sale_amounts += 1;
            }
            if record.shipping_days_actual < 0 {
                report.negative_shipping_days += 1;
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn base_record() -> SalesRecord {
        SalesRecord {
            category: "Fitness".to_string(),
            product_name: "Smart watch".to_string(),
            customer_city: Some("Caguas".to_string()),
            customer_state: "PR".to_string(),
            customer_country: "Puerto Rico".to_string(),
            order_city: None,
            order_state: None,
            order_country: None,
            order_region: None,
            delivery_status: Some("Advance shipping".to_string()),
            shipping_mode: Some("Standard Class".to_string()),
            shipping_days_actual: 3,
            shipping_days_scheduled: 4,
            order_date: NaiveDate::from_ymd_opt(2018, 1, 13)
                .unwrap()
                .and_hms_opt(12, 27, 0),
            shipping_date: None,
            sale_amount: 314.64,
            order_profit: Some(91.25),
            sales_per_customer: Some(314.64),
            benefit_per_order: Some(91.25),
            brent_price: 68.13,
            source_order_id: Some(77202),
            source_product_id: Some(1360),
            source_customer_id: Some(20755),
        }
    }

    fn audit_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 6, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn counts_each_violation_kind() {
        let mut future = base_record();
        future.order_date = NaiveDate::from_ymd_opt(2099, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0);

        let mut negative_sale = base_record();
        negative_sale.sale_amount = -10.0;

        let mut negative_days = base_record();
        negative_days.shipping_days_actual = -2;

        let records = vec![base_record(), future, negative_sale, negative_days];
        let report = QualityAuditor::audit(&records, audit_now(), FillCounts::default());

        assert_eq!(report.rows_scanned, 4);
        assert_eq!(report.future_order_dates, 1);
        assert_eq!(report.negative_sale_amounts, 1);
        assert_eq!(report.negative_shipping_days, 1);
        assert!(report.has_violations());
    }

    #[test]
    fn unparseable_amounts_are_not_counted_as_negative() {
        let mut nan_sale = base_record();
        nan_sale.sale_amount = f64::NAN;

        let report = QualityAuditor::audit(&[nan_sale], audit_now(), FillCounts::default());
        assert_eq!(report.negative_sale_amounts, 0);
    }

    #[test]
    fn clean_rows_produce_a_passing_report() {
        let report =
            QualityAuditor::audit(&[base_record()], audit_now(), FillCounts::default());
        assert!(!report.has_violations());
        assert_eq!(report.rows_scanned, 1);
    }

    #[test]
    fn fill_counts_flow_into_the_report() {
        let fills = FillCounts {
            category: 2,
            product_name: 1,
            customer_country: 3,
            customer_state: 4,
        };
        let report = QualityAuditor::audit(&[], audit_now(), fills);
        assert_eq!(report.filled_categories, 2);
        assert_eq!(report.filled_customer_states, 4);
        assert!(!report.has_violations());
    }
}
