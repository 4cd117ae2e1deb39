//! Configuration for doccheck.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (DOCCHECK_MAX_FILES, DOCCHECK_SEED)
//! 2. Config file (.doccheck/config.yaml, or an explicit path)
//! 3. Built-in defaults
//!
//! Config file discovery:
//! - Searches current directory and parents for .doccheck/config.yaml
//! - Falls back to ~/.doccheck/config.yaml

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::BillingRates;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

const CONFIG_DIR: &str = ".doccheck";
const CONFIG_FILE: &str = "config.yaml";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub intake: IntakeSettings,
    #[serde(default)]
    pub analysis: AnalysisSettings,
    #[serde(default)]
    pub billing: BillingRates,
    #[serde(default)]
    pub monitor: MonitorSettings,
    /// Seed for every random draw (unseeded when absent)
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Upload limits and the file acceptance policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeSettings {
    /// Maximum documents held at once (default: 5)
    #[serde(default = "default_max_files")]
    pub max_files: usize,

    /// Maximum size of a single file (default: 10MB)
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,

    /// Accepted extensions, without the dot
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,

    /// Accepted if the MIME type contains any of these
    #[serde(default = "default_allowed_mime_fragments")]
    pub allowed_mime_fragments: Vec<String>,
}

fn default_max_files() -> usize {
    5
}
fn default_max_file_bytes() -> u64 {
    10 * 1024 * 1024
} // 10MB
fn default_allowed_extensions() -> Vec<String> {
    ["txt", "pdf", "doc", "docx"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_allowed_mime_fragments() -> Vec<String> {
    vec!["text".to_string(), "pdf".to_string()]
}

impl IntakeSettings {
    pub fn validate(&self) -> Result<()> {
        if self.max_files == 0 {
            anyhow::bail!("intake.max_files must be at least 1");
        }
        if self.allowed_extensions.is_empty() && self.allowed_mime_fragments.is_empty() {
            anyhow::bail!("intake needs at least one allowed extension or MIME fragment");
        }
        Ok(())
    }
}

impl Default for IntakeSettings {
    fn default() -> Self {
        Self {
            max_files: default_max_files(),
            max_file_bytes: default_max_file_bytes(),
            allowed_extensions: default_allowed_extensions(),
            allowed_mime_fragments: default_allowed_mime_fragments(),
        }
    }
}

/// Simulated analysis timing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

fn default_min_delay_ms() -> u64 {
    3000
}
fn default_max_delay_ms() -> u64 {
    5000
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            min_delay_ms: default_min_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl AnalysisSettings {
    /// No delay at all
    pub fn immediate() -> Self {
        Self {
            min_delay_ms: 0,
            max_delay_ms: 0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_delay_ms < self.min_delay_ms {
            anyhow::bail!(
                "analysis.max_delay_ms ({}) is below min_delay_ms ({})",
                self.max_delay_ms,
                self.min_delay_ms
            );
        }
        Ok(())
    }
}

/// External update simulator timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorSettings {
    /// Seconds between ticks (default: 30)
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,

    /// Chance of an update per tick (default: 0.3)
    #[serde(default = "default_update_probability")]
    pub update_probability: f64,

    /// Delay before the update emitted on activation (default: 2000)
    #[serde(default = "default_activation_delay_ms")]
    pub activation_delay_ms: u64,

    /// Updates retained, most recent first (default: 5)
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_interval_seconds() -> u64 {
    30
}
fn default_update_probability() -> f64 {
    0.3
}
fn default_activation_delay_ms() -> u64 {
    2000
}
fn default_history_limit() -> usize {
    5
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            interval_seconds: default_interval_seconds(),
            update_probability: default_update_probability(),
            activation_delay_ms: default_activation_delay_ms(),
            history_limit: default_history_limit(),
        }
    }
}

impl MonitorSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }

    pub fn activation_delay(&self) -> Duration {
        Duration::from_millis(self.activation_delay_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.update_probability) {
            anyhow::bail!(
                "monitor.update_probability must be within [0, 1], got {}",
                self.update_probability
            );
        }
        if self.interval_seconds == 0 {
            anyhow::bail!("monitor.interval_seconds must be at least 1");
        }
        if self.history_limit == 0 {
            anyhow::bail!("monitor.history_limit must be at least 1");
        }
        Ok(())
    }
}

/// Everything a session needs, passed by value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub intake: IntakeSettings,
    pub analysis: AnalysisSettings,
    pub billing: BillingRates,
    pub monitor: MonitorSettings,
    pub seed: Option<u64>,
}

impl Settings {
    /// Check value ranges in every section
    pub fn validate(&self) -> Result<()> {
        self.intake.validate()?;
        self.analysis.validate()?;
        self.monitor.validate()
    }
}

impl From<ConfigFile> for Settings {
    fn from(file: ConfigFile) -> Self {
        Self {
            intake: file.intake,
            analysis: file.analysis,
            billing: file.billing,
            monitor: file.monitor,
            seed: file.seed,
        }
    }
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub settings: Settings,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(CONFIG_DIR).join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    let home_config = dirs::home_dir()?.join(CONFIG_DIR).join(CONFIG_FILE);
    home_config.exists().then_some(home_config)
}

/// Load and parse config file
pub fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Apply environment overrides read through `var`
fn apply_env<F>(settings: &mut Settings, var: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = var("DOCCHECK_MAX_FILES") {
        settings.intake.max_files = value
            .parse()
            .with_context(|| format!("Invalid DOCCHECK_MAX_FILES: {}", value))?;
    }
    if let Some(value) = var("DOCCHECK_SEED") {
        let seed: u64 = value
            .parse()
            .with_context(|| format!("Invalid DOCCHECK_SEED: {}", value))?;
        settings.seed = Some(seed);
    }
    Ok(())
}

/// Load configuration from all sources
pub fn load_config(explicit: Option<&Path>) -> Result<ResolvedConfig> {
    load_config_with(explicit, |key| std::env::var(key).ok())
}

/// Load configuration, reading environment overrides through `var`
pub fn load_config_with<F>(explicit: Option<&Path>, var: F) -> Result<ResolvedConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let config_file = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => find_config_file(),
    };

    let mut settings = match config_file {
        Some(ref path) => Settings::from(load_config_file(path)?),
        None => Settings::default(),
    };

    apply_env(&mut settings, var)?;
    settings.validate()?;

    Ok(ResolvedConfig {
        settings,
        config_file,
    })
}

/// Get the global configuration (loads once, then cached)
pub fn config(explicit: Option<&Path>) -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config(explicit).map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();

        assert_eq!(settings.intake.max_files, 5);
        assert_eq!(settings.analysis.min_delay_ms, 3000);
        assert_eq!(settings.analysis.max_delay_ms, 5000);
        assert_eq!(settings.billing.per_document, 5);
        assert_eq!(settings.billing.per_report, 15);
        assert_eq!(settings.monitor.interval_seconds, 30);
        assert_eq!(settings.monitor.history_limit, 5);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"
version: "1.0"
intake:
  max_files: 3
analysis:
  min_delay_ms: 10
  max_delay_ms: 20
monitor:
  update_probability: 1.0
seed: 7
"#
        )
        .unwrap();

        let settings = Settings::from(load_config_file(&config_path).unwrap());

        assert_eq!(settings.intake.max_files, 3);
        // Unspecified fields keep their defaults
        assert_eq!(settings.intake.allowed_extensions.len(), 4);
        assert_eq!(settings.analysis.max_delay_ms, 20);
        assert_eq!(settings.monitor.update_probability, 1.0);
        assert_eq!(settings.monitor.interval_seconds, 30);
        assert_eq!(settings.seed, Some(7));
    }

    #[test]
    fn test_validate_rejects_inverted_delay() {
        let mut settings = Settings::default();
        settings.analysis.max_delay_ms = 100;
        settings.analysis.min_delay_ms = 200;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_probability() {
        let mut settings = Settings::default();
        settings.monitor.update_probability = 1.5;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_max_files() {
        let mut settings = Settings::default();
        settings.intake.max_files = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_history_limit() {
        let mut settings = Settings::default();
        settings.monitor.history_limit = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut settings = Settings::default();
        settings.monitor.interval_seconds = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_allow_list() {
        let mut settings = Settings::default();
        settings.intake.allowed_extensions.clear();
        settings.intake.allowed_mime_fragments.clear();
        assert!(settings.validate().is_err());

        // Either list alone is enough
        settings.intake.allowed_mime_fragments.push("text".to_string());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_env_overrides_config_file() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.yaml");
        std::fs::write(&config_path, "intake:\n  max_files: 3\nseed: 1\n").unwrap();

        let env = |key: &str| match key {
            "DOCCHECK_MAX_FILES" => Some("4".to_string()),
            "DOCCHECK_SEED" => Some("99".to_string()),
            _ => None,
        };
        let resolved = load_config_with(Some(&config_path), env).unwrap();

        assert_eq!(resolved.settings.intake.max_files, 4);
        assert_eq!(resolved.settings.seed, Some(99));

        // Without overrides the file values stand
        let resolved = load_config_with(Some(&config_path), |_| None).unwrap();
        assert_eq!(resolved.settings.intake.max_files, 3);
        assert_eq!(resolved.settings.seed, Some(1));
    }

    #[test]
    fn test_env_override_is_validated() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.yaml");
        std::fs::write(&config_path, "intake:\n  max_files: 3\n").unwrap();

        let zero = |key: &str| (key == "DOCCHECK_MAX_FILES").then(|| "0".to_string());
        assert!(load_config_with(Some(&config_path), zero).is_err());

        let garbage = |key: &str| (key == "DOCCHECK_SEED").then(|| "abc".to_string());
        assert!(load_config_with(Some(&config_path), garbage).is_err());
    }

    #[test]
    fn test_explicit_path_is_used() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("custom.yaml");
        std::fs::write(&config_path, "billing:\n  per_report: 20\n").unwrap();

        let resolved = load_config_with(Some(&config_path), |_| None).unwrap();

        assert_eq!(resolved.config_file.as_deref(), Some(config_path.as_path()));
        assert_eq!(resolved.settings.billing.per_report, 20);
        assert_eq!(resolved.settings.billing.per_document, 5);
    }
}
