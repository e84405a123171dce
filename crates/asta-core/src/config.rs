// Configuration loading and parsing (config/asta.toml).

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::draft::ledger::{BudgetLedger, DEFAULT_BIDS, DEFAULT_BID_STEPS, DEFAULT_TOTAL_BUDGET};
use crate::draft::preferences::PreferenceLists;
use crate::draft::roles::{Role, DEFAULT_ROLES};
use crate::draft::selection::Selection;
use crate::persist::DEFAULT_STORAGE_KEY;

/// Name of the config file inside `config/` and `defaults/`.
pub const CONFIG_FILE: &str = "asta.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub storage: StorageConfig,
    pub data_paths: DataPaths,
}

impl Config {
    /// Ledger enforcing this league's credit ceiling.
    pub fn ledger(&self) -> BudgetLedger {
        BudgetLedger::new(self.league.total_budget)
    }

    /// Fresh plan using this league's default bid curve and role order.
    pub fn default_selection(&self, candidates: PreferenceLists) -> Selection {
        Selection::with_defaults(candidates, &self.league.default_bids, &self.league.default_roles)
    }
}

// ---------------------------------------------------------------------------
// asta.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire asta.toml file.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    league: LeagueConfig,
    #[serde(default)]
    storage: StorageSection,
    data_paths: DataPaths,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub name: String,
    #[serde(default = "default_total_budget")]
    pub total_budget: u32,
    #[serde(default = "default_bid_steps")]
    pub bid_steps: Vec<u32>,
    #[serde(default = "default_bids")]
    pub default_bids: Vec<u32>,
    #[serde(default = "default_roles")]
    pub default_roles: Vec<Role>,
}

fn default_total_budget() -> u32 {
    DEFAULT_TOTAL_BUDGET
}

fn default_bid_steps() -> Vec<u32> {
    DEFAULT_BID_STEPS.to_vec()
}

fn default_bids() -> Vec<u32> {
    DEFAULT_BIDS.to_vec()
}

fn default_roles() -> Vec<Role> {
    DEFAULT_ROLES.to_vec()
}

#[derive(Debug, Clone, Deserialize)]
struct StorageSection {
    path: Option<String>,
    #[serde(default = "default_storage_key")]
    key: String,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            path: None,
            key: default_storage_key(),
        }
    }
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

/// Resolved local store settings.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub db_path: String,
    pub key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub pool: String,
    pub csv_dir: String,
    pub export_dir: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/asta.toml` relative to
/// `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let file: ConfigFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let db_path = match file.storage.path {
        Some(p) => p,
        None => default_db_path().display().to_string(),
    };

    let config = Config {
        league: file.league,
        storage: StorageConfig {
            db_path,
            key: file.storage.key,
        },
        data_paths: file.data_paths,
    };

    validate(&config)?;

    Ok(config)
}

/// Seed `config/asta.toml` from `defaults/asta.toml` when it does not exist
/// yet. Returns whether the file was created; an existing file is never
/// overwritten.
pub fn ensure_config_file(base_dir: &Path) -> Result<bool, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.is_file() {
        return Ok(false);
    }

    let source = base_dir.join("defaults").join(CONFIG_FILE);
    if !source.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "no config/{CONFIG_FILE} and no defaults/{CONFIG_FILE} in {}; \
                 run from the project root",
                base_dir.display()
            ),
        });
    }

    let copy_err = |e: std::io::Error| ConfigError::DefaultsCopyError {
        message: format!("failed to seed {}: {e}", target.display()),
    };
    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(copy_err)?;
    }
    std::fs::copy(&source, &target).map_err(copy_err)?;
    Ok(true)
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_file(&cwd)?;
    load_config_from(&cwd)
}

/// Store location when `storage.path` is not configured: `asta.db` in the
/// platform data directory, or the working directory when none is known.
pub fn default_db_path() -> PathBuf {
    directories::ProjectDirs::from("it", "asta", "asta")
        .map(|dirs| dirs.data_dir().join("asta.db"))
        .unwrap_or_else(|| PathBuf::from("asta.db"))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let league = &config.league;

    if league.total_budget == 0 {
        return Err(invalid("league.total_budget", "must be greater than 0"));
    }

    if league.bid_steps.is_empty() {
        return Err(invalid("league.bid_steps", "must list at least one step"));
    }
    if let Some(step) = league.bid_steps.iter().find(|&&s| s == 0) {
        return Err(invalid("league.bid_steps", format!("steps must be > 0, got {step}")));
    }

    if league.default_bids.is_empty() {
        return Err(invalid("league.default_bids", "must not be empty"));
    }
    if league.default_roles.len() != league.default_bids.len() {
        return Err(invalid(
            "league.default_roles",
            format!(
                "must have one role per bid ({} bids, {} roles)",
                league.default_bids.len(),
                league.default_roles.len()
            ),
        ));
    }
    if !BudgetLedger::is_monotonic(&league.default_bids) {
        return Err(invalid(
            "league.default_bids",
            "must run from highest to lowest",
        ));
    }
    let total = BudgetLedger::total(&league.default_bids);
    if total > i64::from(league.total_budget) {
        return Err(invalid(
            "league.default_bids",
            format!("total {total} exceeds the budget of {}", league.total_budget),
        ));
    }

    if config.storage.key.trim().is_empty() {
        return Err(invalid("storage.key", "must not be empty"));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SHIPPED_DEFAULTS: &str = include_str!("../../../defaults/asta.toml");

    /// Helper: a fresh temp project with `text` as config/asta.toml.
    fn project_with_config(name: &str, text: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("config").join(CONFIG_FILE), text).unwrap();
        tmp
    }

    fn expect_validation_error(name: &str, text: &str, expected_field: &str) {
        let tmp = project_with_config(name, text);
        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, expected_field),
            other => panic!("expected ValidationError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn load_shipped_defaults() {
        let tmp = project_with_config("asta_config_test_defaults", SHIPPED_DEFAULTS);
        let config = load_config_from(&tmp).expect("shipped defaults should load");

        assert_eq!(config.league.name, "Fantacalcio");
        assert_eq!(config.league.total_budget, 600);
        assert_eq!(config.league.bid_steps, vec![1, 10]);
        assert_eq!(config.league.default_bids, DEFAULT_BIDS.to_vec());
        assert_eq!(config.league.default_roles, DEFAULT_ROLES.to_vec());
        assert_eq!(config.storage.db_path, "asta.db");
        assert_eq!(config.storage.key, "fantacalcio-selection");
        assert_eq!(config.data_paths.pool, "data/players-data.json");
        assert_eq!(config.data_paths.export_dir, "exports");

        let plan = config.default_selection(PreferenceLists::default());
        assert_eq!(plan.remaining(&config.ledger()), 0);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn optional_fields_fall_back_to_builtin_defaults() {
        let text = r#"
[league]
name = "Minimal"

[data_paths]
pool = "pool.json"
csv_dir = "csv"
export_dir = "out"
"#;
        let tmp = project_with_config("asta_config_test_minimal", text);
        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.league.total_budget, DEFAULT_TOTAL_BUDGET);
        assert_eq!(config.league.default_bids.len(), 23);
        assert_eq!(config.storage.key, DEFAULT_STORAGE_KEY);
        assert!(config.storage.db_path.ends_with("asta.db"));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_budget() {
        let text = SHIPPED_DEFAULTS.replace("total_budget = 600", "total_budget = 0");
        expect_validation_error("asta_config_test_zero_budget", &text, "league.total_budget");
    }

    #[test]
    fn rejects_default_bids_over_budget() {
        let text = SHIPPED_DEFAULTS.replace("total_budget = 600", "total_budget = 500");
        expect_validation_error("asta_config_test_over_budget", &text, "league.default_bids");
    }

    #[test]
    fn rejects_unordered_default_bids() {
        let text = SHIPPED_DEFAULTS.replace("[100, 80,", "[80, 100,");
        expect_validation_error("asta_config_test_unordered", &text, "league.default_bids");
    }

    #[test]
    fn rejects_role_count_mismatch() {
        let text = SHIPPED_DEFAULTS.replace("default_roles = [\"A\", ", "default_roles = [");
        expect_validation_error("asta_config_test_role_count", &text, "league.default_roles");
    }

    #[test]
    fn rejects_zero_step() {
        let text = SHIPPED_DEFAULTS.replace("bid_steps = [1, 10]", "bid_steps = [0, 10]");
        expect_validation_error("asta_config_test_zero_step", &text, "league.bid_steps");
    }

    #[test]
    fn rejects_blank_storage_key() {
        let text = SHIPPED_DEFAULTS.replace(
            "key = \"fantacalcio-selection\"",
            "key = \"  \"",
        );
        expect_validation_error("asta_config_test_blank_key", &text, "storage.key");
    }

    #[test]
    fn parse_error_for_unknown_role_code() {
        let text = SHIPPED_DEFAULTS.replace("\"P\"", "\"X\"");
        let tmp = project_with_config("asta_config_test_bad_role", &text);
        let err = load_config_from(&tmp).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_for_missing_config() {
        let tmp = std::env::temp_dir().join("asta_config_test_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::FileNotFound { path } => assert!(path.ends_with(CONFIG_FILE)),
            other => panic!("expected FileNotFound, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn seeds_config_once_and_keeps_user_edits() {
        let tmp = std::env::temp_dir().join("asta_config_test_ensure");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::write(tmp.join("defaults").join(CONFIG_FILE), SHIPPED_DEFAULTS).unwrap();

        assert!(ensure_config_file(&tmp).unwrap());
        assert!(load_config_from(&tmp).is_ok());

        fs::write(tmp.join("config").join(CONFIG_FILE), "# custom\n").unwrap();
        assert!(!ensure_config_file(&tmp).unwrap());
        let content = fs::read_to_string(tmp.join("config").join(CONFIG_FILE)).unwrap();
        assert_eq!(content, "# custom\n");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn seeding_fails_without_defaults() {
        let tmp = std::env::temp_dir().join("asta_config_test_no_defaults");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        match ensure_config_file(&tmp) {
            Err(ConfigError::DefaultsCopyError { message }) => {
                assert!(message.contains("defaults/asta.toml"));
            }
            other => panic!("expected DefaultsCopyError, got: {other:?}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }
}
