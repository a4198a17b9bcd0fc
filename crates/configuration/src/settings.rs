use serde::Deserialize;

/// The root configuration structure for the entire application.
///
/// Every section and field carries a default, so a missing `config.toml` (or
/// a partial one) still yields a runnable configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub market_data: MarketDataConfig,
    #[serde(default)]
    pub insights: InsightConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Rejects configurations that would make downstream behavior
    /// contradictory rather than merely unusual.
    pub fn validate(&self) -> Result<(), String> {
        if self.data.dataset_source.trim().is_empty() {
            return Err("data.dataset_source must not be empty".to_string());
        }
        if self.insights.late_rate_excellent_pct > self.insights.late_rate_critical_pct {
            return Err(format!(
                "insights.late_rate_excellent_pct ({}) must not exceed late_rate_critical_pct ({})",
                self.insights.late_rate_excellent_pct, self.insights.late_rate_critical_pct
            ));
        }
        Ok(())
    }
}

/// File-system and warehouse locations for the pipeline layers.
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// The bundled retail dataset the bronze layer snapshots.
    #[serde(default = "default_dataset_source")]
    pub dataset_source: String,
    /// Directory holding immutable raw snapshots (bronze layer).
    #[serde(default = "default_bronze_dir")]
    pub bronze_dir: String,
    /// SQLite warehouse holding the silver and gold layers. The DATABASE_URL
    /// environment variable overrides this at startup.
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

/// Settings for the daily commodity-quote feed.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketDataConfig {
    /// Instrument symbol for the context commodity (Brent crude futures).
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Base URL of the quote API; tests point this at a local fixture server.
    #[serde(default = "default_market_base_url")]
    pub base_url: String,
    #[serde(default = "default_market_timeout_secs")]
    pub timeout_secs: u64,
}

/// Business benchmarks the insight rules compare KPIs against.
#[derive(Debug, Clone, Deserialize)]
pub struct InsightConfig {
    /// Profit margin (in percent) considered healthy for the sector.
    #[serde(default = "default_margin_benchmark_pct")]
    pub margin_benchmark_pct: f64,
    /// Late-delivery rate (in percent) above which logistics is in crisis.
    #[serde(default = "default_late_rate_critical_pct")]
    pub late_rate_critical_pct: f64,
    /// Late-delivery rate (in percent) below which delivery is excellent.
    #[serde(default = "default_late_rate_excellent_pct")]
    pub late_rate_excellent_pct: f64,
    /// Commodity price standard deviation (in quote currency) above which a
    /// hedging warning is raised.
    #[serde(default = "default_brent_volatility_threshold")]
    pub brent_volatility_threshold: f64,
}

/// Settings for the analytics API server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// How long a computed metrics report is served before being recomputed.
    #[serde(default = "default_metrics_cache_ttl_secs")]
    pub metrics_cache_ttl_secs: u64,
}

fn default_dataset_source() -> String {
    "data/source/DataCoSupplyChainDataset.csv".to_string()
}

fn default_bronze_dir() -> String {
    "data/bronze".to_string()
}

fn default_database_url() -> String {
    "sqlite:data/warehouse.db?mode=rwc".to_string()
}

fn default_symbol() -> String {
    "BZ=F".to_string()
}

fn default_market_base_url() -> String {
    "https://query1.finance.yahoo.com".to_string()
}

fn default_market_timeout_secs() -> u64 {
    10
}

fn default_margin_benchmark_pct() -> f64 {
    15.0
}

fn default_late_rate_critical_pct() -> f64 {
    10.0
}

fn default_late_rate_excellent_pct() -> f64 {
    5.0
}

fn default_brent_volatility_threshold() -> f64 {
    10.0
}

fn default_server_port() -> u16 {
    3000
}

fn default_metrics_cache_ttl_secs() -> u64 {
    3600
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dataset_source: default_dataset_source(),
            bronze_dir: default_bronze_dir(),
            database_url: default_database_url(),
        }
    }
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            base_url: default_market_base_url(),
            timeout_secs: default_market_timeout_secs(),
        }
    }
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            margin_benchmark_pct: default_margin_benchmark_pct(),
            late_rate_critical_pct: default_late_rate_critical_pct(),
            late_rate_excellent_pct: default_late_rate_excellent_pct(),
            brent_volatility_threshold: default_brent_volatility_threshold(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
            metrics_cache_ttl_secs: default_metrics_cache_ttl_secs(),
        }
    }
}
