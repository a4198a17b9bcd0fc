use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, DataConfig, InsightConfig, MarketDataConfig, ServerConfig};

/// Loads the application configuration from the `config.toml` file.
///
/// This function is the primary entry point for this crate. It reads the
/// configuration file, deserializes it into our strongly-typed `Config`
/// struct, validates it, and returns it. The file is optional: when absent,
/// every section falls back to its defaults.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from("config.toml")
}

/// Same as [`load_config`], but reads an explicit path (used by the CLI's
/// `--config` flag and by tests).
pub fn load_config_from(path: &str) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name(path).required(false))
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate().map_err(ConfigError::ValidationError)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn parse(toml: &str) -> Config {
        config::Config::builder()
            .add_source(config::File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize::<Config>()
            .unwrap()
    }

    #[test]
    fn empty_config_falls_back_to_defaults() {
        let config = parse("");
        assert_eq!(config.market_data.symbol, "BZ=F");
        assert_eq!(config.insights.margin_benchmark_pct, 15.0);
        assert_eq!(config.server.metrics_cache_ttl_secs, 3600);
        assert!(config.data.database_url.starts_with("sqlite:"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_section_keeps_unlisted_defaults() {
        let config = parse(
            r#"
            [insights]
            margin_benchmark_pct = 20.0
            "#,
        );
        assert_eq!(config.insights.margin_benchmark_pct, 20.0);
        assert_eq!(config.insights.late_rate_critical_pct, 10.0);
    }

    #[test]
    fn contradictory_late_rate_thresholds_fail_validation() {
        let config = parse(
            r#"
            [insights]
            late_rate_excellent_pct = 12.0
            late_rate_critical_pct = 10.0
            "#,
        );
        assert!(config.validate().is_err());
    }
}
