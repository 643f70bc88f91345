use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::logging::LogConfig;
use crate::utils::io;

/// File looked up in the project root when no `--config` is given.
pub const CONFIG_FILE: &str = "lbcicd.json";

/// Root configuration structure for lbcicd.json.
///
/// Every field falls back to the behaviour of a stock SQLcl + Liquibase
/// project, so an empty object (or no file at all) is a valid configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CicdConfig {
    #[serde(default = "default_sql_binary")]
    pub sql_binary: String,

    #[serde(default = "default_sql_args")]
    pub sql_args: Vec<String>,

    #[serde(default = "default_service_suffix")]
    pub service_suffix: String,

    #[serde(default = "default_admin_role")]
    pub admin_role: String,

    #[serde(default = "default_secret_file")]
    pub secret_file: String,

    #[serde(default = "default_error_markers")]
    pub error_markers: Vec<String>,

    #[serde(default = "default_apex_application_id")]
    pub apex_application_id: u32,

    #[serde(default = "default_apex_export_toggles")]
    pub apex_export_toggles: Vec<String>,

    #[serde(default = "default_schema_export_flags")]
    pub schema_export_flags: Vec<String>,

    #[serde(default = "default_rollback_count")]
    pub rollback_count: u32,

    #[serde(default)]
    pub log: LogConfig,
}

impl Default for CicdConfig {
    fn default() -> Self {
        Self {
            sql_binary: default_sql_binary(),
            sql_args: default_sql_args(),
            service_suffix: default_service_suffix(),
            admin_role: default_admin_role(),
            secret_file: default_secret_file(),
            error_markers: default_error_markers(),
            apex_application_id: default_apex_application_id(),
            apex_export_toggles: default_apex_export_toggles(),
            schema_export_flags: default_schema_export_flags(),
            rollback_count: default_rollback_count(),
            log: LogConfig::default(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_sql_binary() -> String {
    "sql".to_string()
}

fn default_sql_args() -> Vec<String> {
    vec!["/nolog".to_string()]
}

fn default_service_suffix() -> String {
    "_high".to_string()
}

fn default_admin_role() -> String {
    "ADMIN".to_string()
}

fn default_secret_file() -> String {
    ".secret".to_string()
}

fn default_error_markers() -> Vec<String> {
    [
        "Error Message",
        "ORA-",
        "SQL Error",
        "Validation Failed",
        "Unexpected internal error",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_apex_application_id() -> u32 {
    103
}

fn default_apex_export_toggles() -> Vec<String> {
    [
        "expaclassignments",
        "expirnotif",
        "exporiginalids",
        "exppubreports",
        "expsavedreports",
        "exptranslations",
        "skipexportdate",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_schema_export_flags() -> Vec<String> {
    ["-split", "-grants", "-runonchange", "-fail-on-error"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_rollback_count() -> u32 {
    999
}

// =============================================================================
// Loading functions
// =============================================================================

impl CicdConfig {
    fn validate(&self) -> Result<()> {
        if self.sql_binary.trim().is_empty() {
            return Err(Error::config_invalid_value(
                "sqlBinary",
                Some(self.sql_binary.clone()),
                "must not be empty",
            ));
        }
        if self.admin_role.trim().is_empty() {
            return Err(Error::config_invalid_value(
                "adminRole",
                Some(self.admin_role.clone()),
                "must not be empty",
            ));
        }
        if self.rollback_count == 0 {
            return Err(Error::config_invalid_value(
                "rollbackCount",
                Some("0".to_string()),
                "must be at least 1",
            ));
        }
        if self.error_markers.iter().any(|m| m.is_empty()) {
            return Err(Error::config_invalid_value(
                "errorMarkers",
                None,
                "empty marker would match every line",
            ));
        }
        Ok(())
    }
}

/// Load configuration for a run.
///
/// With an explicit path the file must exist. Without one, `lbcicd.json` in
/// `root` is used when present and built-in defaults otherwise.
pub fn load(root: &Path, explicit: Option<&Path>) -> Result<CicdConfig> {
    let path: PathBuf = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let candidate = root.join(CONFIG_FILE);
            if !candidate.exists() {
                return Ok(CicdConfig::default());
            }
            candidate
        }
    };

    let content = io::read_file(&path, &format!("read {}", path.display()))?;
    parse(&content, &path.display().to_string())
}

/// Parse and validate configuration text. `origin` names the source in errors.
pub fn parse(content: &str, origin: &str) -> Result<CicdConfig> {
    let config: CicdConfig =
        serde_json::from_str(content).map_err(|e| Error::config_invalid_json(origin, e))?;
    config.validate()?;
    Ok(config)
}
