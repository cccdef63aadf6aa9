use crate::domain::precision::Tolerances;
use serde::Deserialize;

/// Upper bound for the stats window; two windows back must stay inside chrono's range.
const MAX_WINDOW_DAYS: i64 = 3650;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub precision: PrecisionSettings,
    pub dashboard: DashboardSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind_addr: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub path: String,
}

/// Tolerance bands for the precision score, same units as the corrections.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct PrecisionSettings {
    pub vn: f64,
    pub vf: f64,
    pub hn: f64,
    pub hf: f64,
}

impl PrecisionSettings {
    pub fn tolerances(&self) -> Tolerances {
        Tolerances {
            vn: self.vn,
            vf: self.vf,
            hn: self.hn,
            hf: self.hf,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    pub window_days: i64,
    pub recent_limit: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    #[serde(default)]
    pub json: bool,
}

impl AppConfig {
    fn validate(&self) -> anyhow::Result<()> {
        let p = &self.precision;
        for (name, value) in [("vn", p.vn), ("vf", p.vf), ("hn", p.hn), ("hf", p.hf)] {
            if !value.is_finite() || value <= 0.0 {
                anyhow::bail!("precision.{} must be a positive number, got {}", name, value);
            }
        }
        if !(1..=MAX_WINDOW_DAYS).contains(&self.dashboard.window_days) {
            anyhow::bail!(
                "dashboard.window_days must be between 1 and {}, got {}",
                MAX_WINDOW_DAYS,
                self.dashboard.window_days
            );
        }
        if self.dashboard.recent_limit == 0 {
            anyhow::bail!("dashboard.recent_limit must be at least 1");
        }
        if self.database.path.trim().is_empty() {
            anyhow::bail!("database.path cannot be empty");
        }
        Ok(())
    }
}

fn builder_with_defaults() -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    let defaults = Tolerances::default();
    Ok(config::Config::builder()
        .set_default("server.bind_addr", "0.0.0.0:4000")?
        .set_default("database.path", "alignment.db")?
        .set_default("precision.vn", defaults.vn)?
        .set_default("precision.vf", defaults.vf)?
        .set_default("precision.hn", defaults.hn)?
        .set_default("precision.hf", defaults.hf)?
        .set_default("dashboard.window_days", 7)?
        .set_default("dashboard.recent_limit", 5)?
        .set_default("logging.json", false)?)
}

/// Defaults, then `config/app.*` if present, then `ALIGNMENT__SECTION__KEY` variables.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = builder_with_defaults()?
        .add_source(config::File::with_name("config/app").required(false))
        .add_source(
            config::Environment::with_prefix("ALIGNMENT")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app_config: AppConfig = settings.try_deserialize()?;
    app_config.validate()?;
    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> anyhow::Result<AppConfig> {
        let settings = builder_with_defaults()?
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;
        let app_config: AppConfig = settings.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    #[test]
    fn test_defaults() {
        let config = from_toml("").unwrap();
        assert_eq!(config.server.bind_addr, "0.0.0.0:4000");
        assert_eq!(config.precision.tolerances(), Tolerances::default());
        assert_eq!(config.dashboard.window_days, 7);
        assert_eq!(config.dashboard.recent_limit, 5);
        assert!(!config.logging.json);
    }

    #[test]
    fn test_overrides() {
        let config = from_toml(
            r#"
            [database]
            path = ":memory:"

            [precision]
            hf = 200.0
            "#,
        )
        .unwrap();
        assert_eq!(config.database.path, ":memory:");
        assert_eq!(config.precision.hf, 200.0);
        assert_eq!(config.precision.vn, 10.0);
    }

    #[test]
    fn test_rejects_non_positive_tolerance() {
        let err = from_toml("[precision]\nvn = 0.0\n").unwrap_err();
        assert!(err.to_string().contains("precision.vn"));
    }

    #[test]
    fn test_rejects_zero_window() {
        assert!(from_toml("[dashboard]\nwindow_days = 0\n").is_err());
    }

    #[test]
    fn test_rejects_oversized_window() {
        let err = from_toml("[dashboard]\nwindow_days = 200000000\n").unwrap_err();
        assert!(err.to_string().contains("dashboard.window_days"));
        assert!(from_toml("[dashboard]\nwindow_days = 3650\n").is_ok());
    }
}
