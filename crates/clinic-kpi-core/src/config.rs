//! Layered configuration: built-in defaults, an optional TOML file, then
//! `CLINIC_KPI_*` environment variables.

use std::path::Path;

use anyhow::{bail, Context};
use serde::Deserialize;

use crate::kpi::{
    AggregatorSettings, DashboardSettings, DEFAULT_BASELINE_DAYS, DEFAULT_DASHBOARD_NAME,
    MAX_BASELINE_DAYS,
};

/// Environment variable prefix, e.g. `CLINIC_KPI_DATABASE_PATH`.
pub const ENV_PREFIX: &str = "CLINIC_KPI";

const DEFAULT_DATABASE_PATH: &str = "clinic_kpi.db";
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct KpiConfig {
    /// SQLite file holding the clinic records and KPI snapshots
    pub database_path: String,
    /// Name of the default dashboard
    pub dashboard_name: String,
    /// Length of the revenue-growth baseline window
    pub revenue_baseline_days: i64,
    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for KpiConfig {
    fn default() -> Self {
        Self {
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            dashboard_name: DEFAULT_DASHBOARD_NAME.to_string(),
            revenue_baseline_days: DEFAULT_BASELINE_DAYS,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl KpiConfig {
    /// Load configuration. A missing `path` file is not an error.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let mut builder = config::Config::builder()
            .set_default("database_path", defaults.database_path)?
            .set_default("dashboard_name", defaults.dashboard_name)?
            .set_default("revenue_baseline_days", defaults.revenue_baseline_days)?
            .set_default("log_filter", defaults.log_filter)?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let settings = builder
            .add_source(config::Environment::with_prefix(env_prefix).try_parsing(true))
            .build()
            .context("failed to read KPI configuration")?;

        let config: Self = settings
            .try_deserialize()
            .context("invalid KPI configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !(1..=MAX_BASELINE_DAYS).contains(&self.revenue_baseline_days) {
            bail!(
                "revenue_baseline_days must be between 1 and {}, got {}",
                MAX_BASELINE_DAYS,
                self.revenue_baseline_days
            );
        }
        if self.database_path.trim().is_empty() {
            bail!("database_path must not be empty");
        }
        Ok(())
    }

    /// Dashboard settings derived from this configuration.
    pub fn dashboard_settings(&self) -> DashboardSettings {
        DashboardSettings {
            default_name: self.dashboard_name.clone(),
            aggregator: AggregatorSettings {
                baseline_days: self.revenue_baseline_days,
            },
        }
    }
}
