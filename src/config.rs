//! Dashboard settings from defaults, an optional JSON file and the environment.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::analyzers::DEFAULT_TOP_ROUTES;

pub const DATA_SOURCE_VAR: &str = "RAILWAY_DATA_SOURCE";
pub const TOP_ROUTES_VAR: &str = "DASHBOARD_TOP_ROUTES";
pub const LOG_FILE_VAR: &str = "LOG_FILE_PATH";

/// Runtime settings for the dashboard.
///
/// Stored on disk as a JSON object; every field is optional:
/// ```json
/// {
///   "data_source": "https://example.org/railway.csv.gz",
///   "top_routes": 15
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_source: String,
    pub top_routes: usize,
    pub log_file_path: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_source: "data/railway_cleaned.csv".to_string(),
            top_routes: DEFAULT_TOP_ROUTES,
            log_file_path: "logs/railway_dashboard.log".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("reading config {path}"))?;
        let mut config: Self = serde_json::from_str(&content)
            .with_context(|| format!("parsing config {path}"))?;
        if !valid_top_routes(config.top_routes) {
            warn!(path, value = config.top_routes, "Ignoring invalid route limit");
            config.top_routes = DEFAULT_TOP_ROUTES;
        }
        Ok(config)
    }

    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Applies `RAILWAY_DATA_SOURCE`, `DASHBOARD_TOP_ROUTES` and `LOG_FILE_PATH`.
    ///
    /// An unparseable or zero route limit is ignored with a warning.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(source) = lookup(DATA_SOURCE_VAR).filter(|s| !s.is_empty()) {
            self.data_source = source;
        }

        if let Some(raw) = lookup(TOP_ROUTES_VAR) {
            match raw.trim().parse::<usize>() {
                Ok(n) if valid_top_routes(n) => self.top_routes = n,
                _ => warn!(var = TOP_ROUTES_VAR, value = %raw, "Ignoring invalid route limit"),
            }
        }

        if let Some(path) = lookup(LOG_FILE_VAR).filter(|s| !s.is_empty()) {
            self.log_file_path = path;
        }

        self
    }
}

/// Route limits must be positive.
fn valid_top_routes(n: usize) -> bool {
    n > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::env;
    use std::fs;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.top_routes, 10);
        assert_eq!(config.data_source, "data/railway_cleaned.csv");
        assert_eq!(config.log_file_path, "logs/railway_dashboard.log");
    }

    #[test]
    fn test_env_overrides() {
        let config = DashboardConfig::default().with_env_overrides(env_of(&[
            (DATA_SOURCE_VAR, "https://example.org/r.csv"),
            (TOP_ROUTES_VAR, " 5 "),
        ]));
        assert_eq!(config.data_source, "https://example.org/r.csv");
        assert_eq!(config.top_routes, 5);
        assert_eq!(config.log_file_path, "logs/railway_dashboard.log");
    }

    #[test]
    fn test_invalid_top_routes_keeps_previous() {
        for bad in ["0", "-3", "ten"] {
            let config =
                DashboardConfig::default().with_env_overrides(env_of(&[(TOP_ROUTES_VAR, bad)]));
            assert_eq!(config.top_routes, DEFAULT_TOP_ROUTES, "value {bad}");
        }
    }

    #[test]
    fn test_load_partial_json() {
        let path = env::temp_dir().join("railway_dashboard_test_config.json");
        fs::write(&path, r#"{ "top_routes": 3 }"#).unwrap();

        let config = DashboardConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.top_routes, 3);
        assert_eq!(config.data_source, DashboardConfig::default().data_source);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_zero_top_routes_falls_back_to_default() {
        let path = env::temp_dir().join("railway_dashboard_test_zero_routes.json");
        fs::write(&path, r#"{ "top_routes": 0 }"#).unwrap();

        let config = DashboardConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.top_routes, DEFAULT_TOP_ROUTES);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_missing_file_errors() {
        let path = env::temp_dir().join("railway_dashboard_no_such_config.json");
        let _ = fs::remove_file(&path);
        assert!(DashboardConfig::load(path.to_str().unwrap()).is_err());
    }
}
