use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub data: DataSettings,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataSettings {
    pub path: String,
    #[serde(default = "default_timestamp_column")]
    pub timestamp_column: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Options offered to the dashboard. The KPI core never reads these.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DashboardConfig {
    #[serde(default = "default_channels")]
    pub channels: Vec<String>,
    #[serde(default = "default_channel")]
    pub default_channel: String,
    #[serde(default = "default_granularity")]
    pub default_granularity: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            channels: default_channels(),
            default_channel: default_channel(),
            default_granularity: default_granularity(),
        }
    }
}

fn default_timestamp_column() -> String {
    "timestamp".to_string()
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_channels() -> Vec<String> {
    ["P0", "P1", "P2", "temperature", "humidity"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_channel() -> String {
    "P2".to_string()
}

fn default_granularity() -> String {
    "D".to_string()
}

/// Load `config/app.*`, overridable with `PARTICLE_KPI__SECTION__KEY` variables.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/app"))
        .add_source(config::Environment::with_prefix("PARTICLE_KPI").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> AppConfig {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_fill_missing_sections() {
        let config = parse(
            r#"
            [data]
            path = "data/sensor.csv"
            "#,
        );

        assert_eq!(config.data.path, "data/sensor.csv");
        assert_eq!(config.data.timestamp_column, "timestamp");
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.dashboard, DashboardConfig::default());
        assert_eq!(config.dashboard.channels.len(), 5);
    }

    #[test]
    fn test_explicit_values() {
        let config = parse(
            r#"
            [data]
            path = "readings.csv"
            timestamp_column = "time"

            [server]
            bind = "127.0.0.1:9000"

            [dashboard]
            channels = ["pm25", "pm10"]
            default_channel = "pm10"
            default_granularity = "W"
            "#,
        );

        assert_eq!(config.data.timestamp_column, "time");
        assert_eq!(config.server.bind, "127.0.0.1:9000");
        assert_eq!(config.dashboard.channels, vec!["pm25", "pm10"]);
        assert_eq!(config.dashboard.default_channel, "pm10");
        assert_eq!(config.dashboard.default_granularity, "W");
    }
}
