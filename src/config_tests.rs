//! Tests for configuration

#[cfg(test)]
mod tests {
    use super::super::config::*;
    use crate::client::TickInterval;
    use rust_decimal_macros::dec;
    use std::time::Duration;

    #[test]
    fn test_thresholds_default() {
        let thresholds = Thresholds::default();
        assert_eq!(thresholds.base_currency, "BTC");
        assert_eq!(thresholds.min_volume, dec!(200));
        assert_eq!(thresholds.pump_ratio, dec!(1.75));
        assert_eq!(thresholds.dump_ratio, dec!(0.75));
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.poll_interval(), Duration::from_secs(60));
        assert!(config.logo_dir.ends_with("bittrex_logos"));
        assert!(config.logo_dir.starts_with(std::env::temp_dir()));
        assert_eq!(config.notification.sound, "Basso");
        assert_eq!(config.notification.program, "terminal-notifier");
    }

    #[test]
    fn test_chart_config_default() {
        let config = ChartConfig::default();
        assert_eq!(config.interval, TickInterval::ThirtyMin);
        assert_eq!(config.samples, 48);
    }

    #[test]
    fn test_exchange_config_default() {
        let config = ExchangeConfig::default();
        assert_eq!(config.name, "Bittrex");
        assert_eq!(config.market_url, "https://bittrex.com/Market/Index?MarketName=");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.thresholds.min_volume, dec!(200));
        assert_eq!(config.poll_interval_secs, 60);
        assert_eq!(config.chart.samples, 48);
    }

    #[test]
    fn test_partial_thresholds() {
        let toml_str = r#"
poll_interval_secs = 5

[thresholds]
base_currency = "ETH"
pump_ratio = "1.2"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
        assert_eq!(config.thresholds.base_currency, "ETH");
        assert_eq!(config.thresholds.pump_ratio, dec!(1.2));
        // untouched fields keep their defaults
        assert_eq!(config.thresholds.dump_ratio, dec!(0.75));
        assert_eq!(config.thresholds.min_volume, dec!(200));
    }

    #[test]
    fn test_chart_interval_names() {
        let toml_str = r#"
interval = "fiveMin"
samples = 12
"#;
        let config: ChartConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.interval, TickInterval::FiveMin);
        assert_eq!(config.samples, 12);
        assert_eq!(config.width, 800);
    }
}
