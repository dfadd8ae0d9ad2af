//! Configuration types for the rotation engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Report type whose endpoint serves personnel rotation snapshots.
pub const ROTATION_REPORT: &str = "rotacion-personal";

fn default_concurrency_limit() -> usize {
    4
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

fn default_min_year() -> i32 {
    2020
}

fn default_max_year() -> i32 {
    2030
}

fn default_entity_set() -> String {
    "TResultSet".to_string()
}

fn default_reference_date_field() -> String {
    "Keydate".to_string()
}

/// Engine behaviour settings from `engine.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Maximum number of months fetched and computed at the same time.
    ///
    /// Each month fetches two snapshots concurrently, so the source can see
    /// up to twice this many requests in flight.
    #[serde(default = "default_concurrency_limit")]
    pub concurrency_limit: usize,
    /// Per-fetch timeout in seconds.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    /// Lowest year a caller may request.
    #[serde(default = "default_min_year")]
    pub min_year: i32,
    /// Highest year a caller may request.
    #[serde(default = "default_max_year")]
    pub max_year: i32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            concurrency_limit: default_concurrency_limit(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            min_year: default_min_year(),
            max_year: default_max_year(),
        }
    }
}

impl EngineSettings {
    /// Returns the per-fetch timeout.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Checks a requested year against the configured range.
    ///
    /// # Example
    ///
    /// ```
    /// use rotation_engine::config::EngineSettings;
    ///
    /// let settings = EngineSettings::default();
    /// assert!(settings.validate_year(2025).is_ok());
    /// assert!(settings.validate_year(2019).is_err());
    /// ```
    pub fn validate_year(&self, year: i32) -> EngineResult<()> {
        if year < self.min_year || year > self.max_year {
            return Err(EngineError::YearOutOfRange {
                year,
                min: self.min_year,
                max: self.max_year,
            });
        }
        Ok(())
    }
}

/// OData endpoint settings from `endpoints.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointsConfig {
    /// The report whose URL is used when an unknown report is requested.
    pub default_report: String,
    /// Map of report type to OData service base URL.
    pub reports: BTreeMap<String, String>,
    /// The entity set holding employee rows.
    #[serde(default = "default_entity_set")]
    pub entity_set: String,
    /// The entity property the snapshot reference date is filtered on.
    #[serde(default = "default_reference_date_field")]
    pub reference_date_field: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        let base = "http://localhost:8000/sap/opu/odata/sap";
        let reports = [
            (ROTATION_REPORT, "ZHCM_ROTACION_PERSONAL_SRV"),
            ("salarios-nomina", "ZHCM_DATOS_NOMINA_SRV"),
            ("resumen-organizacional", "ZHCM_RESUMEN_ORG_SRV"),
            ("busqueda-avanzada", "ZHCM_BUSQUEDA_SRV"),
        ]
        .into_iter()
        .map(|(report, service)| (report.to_string(), format!("{}/{}", base, service)))
        .collect();

        Self {
            default_report: ROTATION_REPORT.to_string(),
            reports,
            entity_set: default_entity_set(),
            reference_date_field: default_reference_date_field(),
        }
    }
}

/// The complete engine configuration.
///
/// This value is passed explicitly to whatever builds a snapshot fetcher or
/// a rotation service; there is no global instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    settings: EngineSettings,
    endpoints: EndpointsConfig,
}

impl EngineConfig {
    /// Creates a configuration from its parts, checking consistency.
    pub fn new(settings: EngineSettings, endpoints: EndpointsConfig) -> EngineResult<Self> {
        if settings.concurrency_limit == 0 {
            return Err(EngineError::InvalidConfig {
                message: "concurrency_limit must be at least 1".to_string(),
            });
        }
        if settings.fetch_timeout_secs == 0 {
            return Err(EngineError::InvalidConfig {
                message: "fetch_timeout_secs must be at least 1".to_string(),
            });
        }
        if settings.min_year > settings.max_year {
            return Err(EngineError::InvalidConfig {
                message: format!(
                    "min_year {} is greater than max_year {}",
                    settings.min_year, settings.max_year
                ),
            });
        }
        if !endpoints.reports.contains_key(&endpoints.default_report) {
            return Err(EngineError::InvalidConfig {
                message: format!(
                    "default_report '{}' has no endpoint",
                    endpoints.default_report
                ),
            });
        }

        Ok(Self {
            settings,
            endpoints,
        })
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Returns the endpoint settings.
    pub fn endpoints(&self) -> &EndpointsConfig {
        &self.endpoints
    }

    /// Returns the base URL for a report type.
    ///
    /// Unknown report types fall back to the default report's URL.
    ///
    /// # Example
    ///
    /// ```
    /// use rotation_engine::config::EngineConfig;
    ///
    /// let config = EngineConfig::default();
    /// assert_eq!(config.base_url("unknown"), config.base_url("rotacion-personal"));
    /// ```
    pub fn base_url(&self, report: &str) -> &str {
        self.endpoints
            .reports
            .get(report)
            .or_else(|| self.endpoints.reports.get(&self.endpoints.default_report))
            .map(String::as_str)
            .unwrap_or_default()
    }
}
