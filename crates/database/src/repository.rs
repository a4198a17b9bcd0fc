use crate::DbError;
use crate::star_schema::{GOLD_BUILDS, GOLD_TABLES};
use chrono::{DateTime, NaiveDateTime, Utc};
use core_types::{PipelineStage, SalesRecord};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::sqlite::SqlitePool;
use tracing::debug;

/// The `WarehouseRepository` provides a high-level, application-specific
/// interface to the warehouse. It encapsulates all SQL queries and data
/// access logic for the silver and gold layers.
#[derive(Debug, Clone)]
pub struct WarehouseRepository {
    pool: SqlitePool,
}

/// One fact row joined back to its dimensions: the working set every KPI is
/// computed from. Dimension attributes are nullable because unmatched fact
/// rows keep NULL surrogate keys.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AnalyticalRow {
    pub full_date: Option<NaiveDateTime>,
    pub sale_amount: f64,
    pub order_profit: Option<f64>,
    pub brent_price: Option<f64>,
    pub shipping_days_actual: Option<i64>,
    pub category: Option<String>,
    pub product_name: Option<String>,
    pub customer_city: Option<String>,
    pub customer_state: Option<String>,
    pub customer_country: Option<String>,
    pub delivery_status: Option<String>,
    pub shipping_mode: Option<String>,
}

/// Aggregate performance of one product category, ranked by revenue.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CategoryKpi {
    pub category: String,
    pub order_count: i64,
    pub total_revenue: f64,
    pub avg_brent_price: Option<f64>,
    pub total_profit: Option<f64>,
}

/// Order volume per delivery status.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DeliveryStatusCount {
    pub delivery_status: Option<String>,
    pub order_count: i64,
}

/// Distinct-value summary logged after a silver load.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SilverSummary {
    pub row_count: i64,
    pub distinct_countries: i64,
    pub distinct_categories: i64,
    pub distinct_cities: i64,
}

/// Row count captured for one warehouse table after a build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableCount {
    pub table_name: String,
    pub row_count: i64,
}

/// Integrity probe over the fact table: row count plus sales and profit
/// aggregates, rounded the way the validation summary reports them.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct FactTotals {
    pub row_count: i64,
    pub total_sales: Option<f64>,
    pub avg_profit: Option<f64>,
}

/// A row from the `build_manifest` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct BuildRecord {
    pub run_id: String,
    pub stage: String,
    pub table_name: String,
    pub row_count: i64,
    pub built_at: DateTime<Utc>,
}

const INSERT_SILVER_ROW: &str = r#"
INSERT INTO silver_sales (
    category, product_name,
    customer_city, customer_state, customer_country,
    order_city, order_state, order_country, order_region,
    delivery_status, shipping_mode,
    shipping_days_actual, shipping_days_scheduled,
    order_date, shipping_date,
    sale_amount, order_profit, sales_per_customer, benefit_per_order,
    brent_price,
    source_order_id, source_product_id, source_customer_id
) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

impl WarehouseRepository {
    /// Creates a new `WarehouseRepository` with a shared connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Replaces the entire silver table with the given records inside a
    /// single transaction. The pipeline rebuilds rather than upserts, so a
    /// failed load leaves the previous table intact.
    pub async fn replace_silver_rows(&self, records: &[SalesRecord]) -> Result<u64, DbError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM silver_sales")
            .execute(&mut *tx)
            .await?;

        for record in records {
            sqlx::query(INSERT_SILVER_ROW)
                .bind(&record.category)
                .bind(&record.product_name)
                .bind(record.customer_city.as_deref())
                .bind(&record.customer_state)
                .bind(&record.customer_country)
                .bind(record.order_city.as_deref())
                .bind(record.order_state.as_deref())
                .bind(record.order_country.as_deref())
                .bind(record.order_region.as_deref())
                .bind(record.delivery_status.as_deref())
                .bind(record.shipping_mode.as_deref())
                .bind(record.shipping_days_actual)
                .bind(record.shipping_days_scheduled)
                .bind(record.order_date)
                .bind(record.shipping_date)
                .bind(record.sale_amount)
                .bind(record.order_profit)
                .bind(record.sales_per_customer)
                .bind(record.benefit_per_order)
                .bind(record.brent_price)
                .bind(record.source_order_id)
                .bind(record.source_product_id)
                .bind(record.source_customer_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(records.len() as u64)
    }

    pub async fn silver_row_count(&self) -> Result<i64, DbError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM silver_sales")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Distinct-value counts reported in the silver load summary.
    pub async fn silver_summary(&self) -> Result<SilverSummary, DbError> {
        let summary = sqlx::query_as::<_, SilverSummary>(
            r#"
            SELECT
                COUNT(*) AS row_count,
                COUNT(DISTINCT customer_country) AS distinct_countries,
                COUNT(DISTINCT category) AS distinct_categories,
                COUNT(DISTINCT customer_city) AS distinct_cities
            FROM silver_sales
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(summary)
    }

    /// Clears and repopulates every gold table from the silver layer,
    /// returning the resulting row counts in build order.
    ///
    /// Each statement runs on its own: a failure mid-build leaves earlier
    /// tables populated, which the batch-rebuild model tolerates because the
    /// next successful run replaces everything.
    pub async fn rebuild_gold(&self) -> Result<Vec<TableCount>, DbError> {
        // Clear in reverse build order so the fact goes first.
        for table in GOLD_TABLES.iter().rev() {
            sqlx::query(&format!("DELETE FROM {}", table))
                .execute(&self.pool)
                .await?;
        }

        let mut counts = Vec::with_capacity(GOLD_BUILDS.len());
        for (table, build_sql) in GOLD_BUILDS {
            sqlx::query(build_sql).execute(&self.pool).await?;
            let row_count =
                sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table))
                    .fetch_one(&self.pool)
                    .await?;
            debug!(table, rows = row_count, "gold table rebuilt");
            counts.push(TableCount {
                table_name: table.to_string(),
                row_count,
            });
        }

        Ok(counts)
    }

    /// The integrity totals logged after a gold build.
    pub async fn fact_totals(&self) -> Result<FactTotals, DbError> {
        let totals = sqlx::query_as::<_, FactTotals>(
            r#"
            SELECT
                COUNT(*) AS row_count,
                ROUND(SUM(sale_amount), 2) AS total_sales,
                ROUND(AVG(order_profit), 2) AS avg_profit
            FROM fact_sales
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(totals)
    }

    /// Fetches the full analytical working set: every fact row joined back to
    /// its product, customer and logistics dimensions.
    pub async fn fetch_analytical_rows(&self) -> Result<Vec<AnalyticalRow>, DbError> {
        let rows = sqlx::query_as::<_, AnalyticalRow>(
            r#"
            SELECT
                f.full_date,
                f.sale_amount,
                f.order_profit,
                f.brent_price,
                f.shipping_days_actual,
                p.category,
                p.product_name,
                c.customer_city,
                c.customer_state,
                c.customer_country,
                l.delivery_status,
                l.shipping_mode
            FROM fact_sales f
            LEFT JOIN dim_product p ON f.product_key = p.product_key
            LEFT JOIN dim_customer c ON f.customer_key = c.customer_key
            LEFT JOIN dim_logistics l ON f.logistics_key = l.logistics_key
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Top categories by revenue with their order volume, profit and the
    /// average commodity price over their orders.
    pub async fn category_performance(&self, limit: i64) -> Result<Vec<CategoryKpi>, DbError> {
        let rows = sqlx::query_as::<_, CategoryKpi>(
            r#"
            SELECT
                p.category,
                COUNT(f.product_key) AS order_count,
                ROUND(SUM(f.sale_amount), 2) AS total_revenue,
                ROUND(AVG(f.brent_price), 2) AS avg_brent_price,
                ROUND(SUM(f.order_profit), 2) AS total_profit
            FROM fact_sales f
            JOIN dim_product p ON f.product_key = p.product_key
            GROUP BY p.category
            ORDER BY total_revenue DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Order volume per delivery status, busiest first.
    pub async fn delivery_status_breakdown(&self) -> Result<Vec<DeliveryStatusCount>, DbError> {
        let rows = sqlx::query_as::<_, DeliveryStatusCount>(
            r#"
            SELECT l.delivery_status, COUNT(*) AS order_count
            FROM fact_sales f
            JOIN dim_logistics l ON f.logistics_key = l.logistics_key
            GROUP BY l.delivery_status
            ORDER BY order_count DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Writes one manifest row per table for a pipeline run, atomically.
    pub async fn record_builds(
        &self,
        run_id: &str,
        stage: PipelineStage,
        counts: &[TableCount],
    ) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        for count in counts {
            sqlx::query(
                r#"
                INSERT INTO build_manifest (run_id, stage, table_name, row_count, built_at)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(run_id)
            .bind(stage.as_str())
            .bind(&count.table_name)
            .bind(count.row_count)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// All manifest rows recorded for one run, in write order.
    pub async fn builds_for_run(&self, run_id: &str) -> Result<Vec<BuildRecord>, DbError> {
        let records = sqlx::query_as::<_, BuildRecord>(
            r#"
            SELECT run_id, stage, table_name, row_count, built_at
            FROM build_manifest
            WHERE run_id = ?
            ORDER BY id
            "#,
        )
        .bind(run_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::{connect_in_memory, run_migrations};
    use chrono::NaiveDate;

    async fn setup_repo() -> WarehouseRepository {
        let pool = connect_in_memory().await.unwrap();
        run_migrations(&pool).await.unwrap();
        WarehouseRepository::new(pool)
    }

    fn record(category: &str, city: Option<&str>, country: &str, sale: f64) -> SalesRecord {
        SalesRecord {
            category: category.to_string(),
            product_name: "Field Hockey Stick".to_string(),
            customer_city: city.map(str::to_string),
            customer_state: "PR".to_string(),
            customer_country: country.to_string(),
            order_city: Some("Curitiba".to_string()),
            order_state: None,
            order_country: Some("Brasil".to_string()),
            order_region: Some("LATAM".to_string()),
            delivery_status: Some("Late delivery".to_string()),
            shipping_mode: Some("Standard Class".to_string()),
            shipping_days_actual: 5,
            shipping_days_scheduled: 4,
            order_date: NaiveDate::from_ymd_opt(2018, 1, 13)
                .unwrap()
                .and_hms_opt(12, 27, 0),
            shipping_date: None,
            sale_amount: sale,
            order_profit: Some(sale * 0.2),
            sales_per_customer: Some(sale),
            benefit_per_order: Some(sale * 0.2),
            brent_price: 68.13,
            source_order_id: Some(75139),
            source_product_id: Some(365),
            source_customer_id: Some(5690),
        }
    }

    #[tokio::test]
    async fn replace_silver_rows_replaces_instead_of_appending() {
        let repo = setup_repo().await;

        let first = vec![
            record("Fitness", Some("Caguas"), "Puerto Rico", 100.0),
            record("Golf", Some("San Jose"), "EE. UU.", 250.0),
        ];
        repo.replace_silver_rows(&first).await.unwrap();
        assert_eq!(repo.silver_row_count().await.unwrap(), 2);

        let second = vec![record("Fitness", Some("Caguas"), "Puerto Rico", 80.0)];
        repo.replace_silver_rows(&second).await.unwrap();
        assert_eq!(repo.silver_row_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn silver_summary_counts_distinct_values() {
        let repo = setup_repo().await;
        let rows = vec![
            record("Fitness", Some("Caguas"), "Puerto Rico", 100.0),
            record("Fitness", Some("San Jose"), "EE. UU.", 50.0),
            record("Golf", None, "EE. UU.", 75.0),
        ];
        repo.replace_silver_rows(&rows).await.unwrap();

        let summary = repo.silver_summary().await.unwrap();
        assert_eq!(summary.row_count, 3);
        assert_eq!(summary.distinct_categories, 2);
        assert_eq!(summary.distinct_countries, 2);
        // COUNT(DISTINCT ...) ignores the NULL city.
        assert_eq!(summary.distinct_cities, 2);
    }

    #[tokio::test]
    async fn build_manifest_round_trip() {
        let repo = setup_repo().await;
        let counts = vec![
            TableCount {
                table_name: "dim_time".to_string(),
                row_count: 42,
            },
            TableCount {
                table_name: "fact_sales".to_string(),
                row_count: 180_000,
            },
        ];

        repo.record_builds("run-1", PipelineStage::Gold, &counts)
            .await
            .unwrap();

        let records = repo.builds_for_run("run-1").await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].table_name, "dim_time");
        assert_eq!(records[0].stage, "gold");
        assert_eq!(records[1].row_count, 180_000);

        assert!(repo.builds_for_run("other-run").await.unwrap().is_empty());
    }
}
