//! Reading-log configuration.
//!
//! Handles loading, validating, and merging `paper-log.toml`. Configuration
//! is layered: stock defaults are overridden by the optional config file at
//! the repository root, which is in turn overridden by command-line flags
//! (`--timezone` / `PAPERS_TZ`).
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [paths]
//! data = "data/papers.yml"     # Backing store (YAML list of entries)
//! readme = "README.md"         # Destination document with chart markers
//! assets_dir = "assets"        # Where chart images are written
//! export = "data/papers.json"  # Interchange export
//!
//! [markers]
//! start = "<!--CHART_START-->"
//! end = "<!--CHART_END-->"
//!
//! [activity]
//! timezone = "Asia/Tokyo"      # IANA name; omit for PAPERS_TZ / TZ / local
//! window_days = 365            # Trailing heatmap window, 1..=3660
//!
//! [recent]
//! limit = 10                   # Entries in the "Recently read" list
//!
//! [validation]
//! duplicate_key = "title-link" # or "title-date"
//! allowed_schemes = ["http", "https"]
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::aggregate::AggregateOptions;
use chrono::{Local, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Default config file name, looked up in the repository root.
pub const CONFIG_FILENAME: &str = "paper-log.toml";

/// Longest accepted activity window, about ten years.
pub const MAX_WINDOW_DAYS: u32 = 3660;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Unknown time zone '{0}' (expected an IANA name such as \"Asia/Tokyo\")")]
    UnknownTimezone(String),
}

/// Reading-log configuration loaded from `paper-log.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaperLogConfig {
    /// Input and output file locations, relative to the repository root.
    pub paths: PathsConfig,
    /// Sentinel lines delimiting the generated README region.
    pub markers: MarkersConfig,
    /// Activity heatmap settings.
    pub activity: ActivityConfig,
    /// Recent-list settings.
    pub recent: RecentConfig,
    /// Entry validation policy.
    pub validation: ValidationConfig,
}

impl PaperLogConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.activity.window_days == 0 {
            return Err(ConfigError::Validation(
                "activity.window_days must be at least 1".into(),
            ));
        }
        if self.activity.window_days > MAX_WINDOW_DAYS {
            return Err(ConfigError::Validation(format!(
                "activity.window_days must be at most {MAX_WINDOW_DAYS}"
            )));
        }
        if self.recent.limit == 0 {
            return Err(ConfigError::Validation(
                "recent.limit must be at least 1".into(),
            ));
        }
        if self.markers.start.trim().is_empty() || self.markers.end.trim().is_empty() {
            return Err(ConfigError::Validation(
                "markers.start and markers.end must not be empty".into(),
            ));
        }
        if self.markers.start.trim() == self.markers.end.trim() {
            return Err(ConfigError::Validation(
                "markers.start and markers.end must differ".into(),
            ));
        }
        if self.validation.allowed_schemes.is_empty() {
            return Err(ConfigError::Validation(
                "validation.allowed_schemes must not be empty".into(),
            ));
        }
        if let Some(name) = &self.activity.timezone {
            parse_timezone(name)?;
        }
        Ok(())
    }

    /// Aggregation parameters for a run whose local date is `today`.
    pub fn aggregate_options(&self, today: NaiveDate) -> AggregateOptions {
        AggregateOptions {
            today,
            window_days: self.activity.window_days,
            recent_limit: self.recent.limit,
        }
    }
}

/// File locations, all relative to the repository root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub data: PathBuf,
    pub readme: PathBuf,
    pub assets_dir: PathBuf,
    pub export: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data: PathBuf::from("data/papers.yml"),
            readme: PathBuf::from("README.md"),
            assets_dir: PathBuf::from("assets"),
            export: PathBuf::from("data/papers.json"),
        }
    }
}

/// The two literal marker lines the README splice looks for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkersConfig {
    pub start: String,
    pub end: String,
}

impl Default for MarkersConfig {
    fn default() -> Self {
        Self {
            start: "<!--CHART_START-->".to_string(),
            end: "<!--CHART_END-->".to_string(),
        }
    }
}

/// Activity heatmap settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ActivityConfig {
    /// IANA time zone used to decide what "today" is.
    /// When absent, `PAPERS_TZ` then `TZ` are consulted, then the system's
    /// local time zone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// Length of the trailing window in days, ending today. At most
    /// [`MAX_WINDOW_DAYS`].
    pub window_days: u32,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            timezone: None,
            window_days: 365,
        }
    }
}

/// Recent-list settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecentConfig {
    /// Number of entries shown, most recent first.
    pub limit: usize,
}

impl Default for RecentConfig {
    fn default() -> Self {
        Self { limit: 10 }
    }
}

/// Which fields identify a duplicate entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateKey {
    /// Same title and same link.
    #[default]
    TitleLink,
    /// Same title read on the same date.
    TitleDate,
}

/// Entry validation policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationConfig {
    pub duplicate_key: DuplicateKey,
    /// URL schemes accepted for `link`.
    pub allowed_schemes: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            duplicate_key: DuplicateKey::TitleLink,
            allowed_schemes: vec!["http".to_string(), "https".to_string()],
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(PaperLogConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Values supplied on the command line, applied on top of the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub timezone: Option<String>,
}

impl Overrides {
    fn to_toml(&self) -> Option<toml::Value> {
        let tz = self.timezone.as_ref()?;
        let mut activity = toml::map::Map::new();
        activity.insert("timezone".into(), toml::Value::String(tz.clone()));
        let mut root = toml::map::Map::new();
        root.insert("activity".into(), toml::Value::Table(activity));
        Some(toml::Value::Table(root))
    }
}

/// Merge the layers in order, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    layers: impl IntoIterator<Item = toml::Value>,
) -> Result<PaperLogConfig, ConfigError> {
    let merged = layers.into_iter().fold(base, merge_toml);
    let config: PaperLogConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the config for a repository.
///
/// `config_path` defaults to `paper-log.toml` in `root`. A missing file means
/// stock defaults; an unreadable or invalid one is an error.
pub fn load_config(
    root: &Path,
    config_path: Option<&Path>,
    overrides: &Overrides,
) -> Result<PaperLogConfig, ConfigError> {
    let path = match config_path {
        Some(p) => root.join(p),
        None => root.join(CONFIG_FILENAME),
    };
    let file_layer = load_raw_config(&path)?;
    let layers = file_layer.into_iter().chain(overrides.to_toml());
    resolve_config(stock_defaults_value(), layers)
}

// =============================================================================
// Time zone resolution
// =============================================================================

/// Parse an IANA time zone name.
pub fn parse_timezone(name: &str) -> Result<Tz, ConfigError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| ConfigError::UnknownTimezone(name.to_string()))
}

/// The time zone "today" is read in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Named(Tz),
    /// Whatever the system clock considers local.
    Local,
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Named(tz) => write!(f, "{tz}"),
            Zone::Local => write!(f, "local"),
        }
    }
}

/// Decide which time zone defines "today".
///
/// An explicit config/CLI value must be valid. The ambient `PAPERS_TZ` and
/// `TZ` values are consulted in that order; an unrecognized ambient value is
/// skipped with a warning. The system's local zone is the last resort.
pub fn resolve_timezone(
    explicit: Option<&str>,
    papers_tz: Option<&str>,
    tz: Option<&str>,
) -> Result<Zone, ConfigError> {
    if let Some(name) = explicit {
        return parse_timezone(name).map(Zone::Named);
    }
    for (var, value) in [("PAPERS_TZ", papers_tz), ("TZ", tz)] {
        let Some(name) = value.filter(|v| !v.trim().is_empty()) else {
            continue;
        };
        match parse_timezone(name) {
            Ok(zone) => return Ok(Zone::Named(zone)),
            Err(_) => warn!("ignoring {var}={name:?}: not an IANA time zone"),
        }
    }
    Ok(Zone::Local)
}

/// The time zone for this config, consulting the process environment.
pub fn effective_timezone(config: &PaperLogConfig) -> Result<Zone, ConfigError> {
    let papers_tz = std::env::var("PAPERS_TZ").ok();
    let tz = std::env::var("TZ").ok();
    resolve_timezone(
        config.activity.timezone.as_deref(),
        papers_tz.as_deref(),
        tz.as_deref(),
    )
}

/// Today's calendar date in `zone`.
pub fn today_in(zone: Zone) -> NaiveDate {
    match zone {
        Zone::Named(tz) => Utc::now().with_timezone(&tz).date_naive(),
        Zone::Local => Local::now().date_naive(),
    }
}

/// Returns a fully-commented stock `paper-log.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# paper-log configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# File locations (relative to the repository root)
# ---------------------------------------------------------------------------
[paths]
# The reading log: a YAML list of {title, category, date, link, note} entries.
data = "data/papers.yml"

# Document whose marker-delimited region is regenerated on every build.
readme = "README.md"

# Directory receiving category_stylish.svg and activity_heatmap.svg.
assets_dir = "assets"

# Machine-readable copy of the validated log.
export = "data/papers.json"

# ---------------------------------------------------------------------------
# README markers (each must sit alone on its own line)
# ---------------------------------------------------------------------------
[markers]
start = "<!--CHART_START-->"
end = "<!--CHART_END-->"

# ---------------------------------------------------------------------------
# Activity heatmap
# ---------------------------------------------------------------------------
[activity]
# IANA time zone deciding what "today" is. When omitted, the PAPERS_TZ and
# TZ environment variables are consulted, then the system's local time zone.
# timezone = "Asia/Tokyo"

# Length of the trailing window, in days, ending today (1 to 3660).
window_days = 365

# ---------------------------------------------------------------------------
# Recently read list
# ---------------------------------------------------------------------------
[recent]
limit = 10

# ---------------------------------------------------------------------------
# Validation
# ---------------------------------------------------------------------------
[validation]
# Which fields make two entries duplicates: "title-link" or "title-date".
duplicate_key = "title-link"

# URL schemes accepted for `link`.
allowed_schemes = ["http", "https"]
"##
}
