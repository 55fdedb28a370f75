use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::source::DateRange;

/// Top-level configuration for sitebeat.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Logging verbosity (debug, info, warn, error). Default: "info".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Page instrumentation configuration.
    #[serde(default)]
    pub tracker: TrackerConfig,

    /// Analytics snapshot source configuration.
    #[serde(default)]
    pub source: SourceConfig,
}

/// Page instrumentation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    /// Component name attached to lifecycle events.
    #[serde(default = "default_component_name")]
    pub component_name: String,

    /// Scroll depth threshold percentage. Default: 75.
    #[serde(default = "default_scroll_threshold")]
    pub scroll_threshold_percent: u32,

    /// Quiet period before region visibility is evaluated. Default: 100ms.
    #[serde(default = "default_debounce_quiet", with = "humantime_serde")]
    pub debounce_quiet: Duration,

    /// Declared page regions to watch for first visibility.
    #[serde(default)]
    pub sections: Vec<SectionConfig>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            component_name: default_component_name(),
            scroll_threshold_percent: default_scroll_threshold(),
            debounce_quiet: default_debounce_quiet(),
            sections: Vec::new(),
        }
    }
}

/// One declared page region.
#[derive(Debug, Clone, Deserialize)]
pub struct SectionConfig {
    /// Stable region identifier.
    pub id: String,

    /// Display name; falls back to the id when absent.
    #[serde(default)]
    pub name: Option<String>,
}

/// Analytics snapshot source configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Snapshot endpoint URL.
    #[serde(default)]
    pub endpoint: String,

    /// Request timeout. Default: 10s.
    #[serde(default = "default_source_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    /// Reporting window to request. Default: last7Days.
    #[serde(default)]
    pub date_range: DateRange,

    /// Ask the endpoint to skip its cache.
    #[serde(default)]
    pub bypass_cache: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            timeout: default_source_timeout(),
            date_range: DateRange::default(),
            bypass_cache: false,
        }
    }
}

impl Config {
    /// Load and validate configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;

        let cfg: Config = serde_yaml::from_str(&raw).context("parsing config YAML")?;
        cfg.validate()?;

        Ok(cfg)
    }

    /// Validate cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        let threshold = self.tracker.scroll_threshold_percent;
        if threshold == 0 || threshold > 100 {
            bail!("tracker.scroll_threshold_percent must be in 1..=100, got {threshold}");
        }

        if self.tracker.debounce_quiet.is_zero() {
            bail!("tracker.debounce_quiet must be > 0");
        }

        let mut seen = HashSet::new();
        for section in &self.tracker.sections {
            if section.id.is_empty() {
                bail!("tracker.sections entries must have a non-empty id");
            }
            if !seen.insert(section.id.as_str()) {
                bail!("duplicate tracker section id {:?}", section.id);
            }
        }

        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_component_name() -> String {
    "landing_page".to_string()
}

fn default_scroll_threshold() -> u32 {
    75
}

fn default_debounce_quiet() -> Duration {
    Duration::from_millis(100)
}

fn default_source_timeout() -> Duration {
    Duration::from_secs(10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_yaml() {
        let cfg: Config = serde_yaml::from_str("{}").expect("parse");
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.tracker.scroll_threshold_percent, 75);
        assert_eq!(cfg.tracker.debounce_quiet, Duration::from_millis(100));
        assert!(cfg.tracker.sections.is_empty());
        assert_eq!(cfg.source.timeout, Duration::from_secs(10));
        assert_eq!(cfg.source.date_range, DateRange::Last7Days);
        assert!(!cfg.source.bypass_cache);
        cfg.validate().expect("defaults are valid");
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
log_level: debug
tracker:
  component_name: home
  scroll_threshold_percent: 50
  debounce_quiet: 250ms
  sections:
    - id: hero
    - id: rooms
      name: Our Rooms
source:
  endpoint: "http://localhost:8788/analytics"
  timeout: 5s
  date_range: last30Days
  bypass_cache: true
"#;
        let cfg: Config = serde_yaml::from_str(yaml).expect("parse");
        cfg.validate().expect("valid");

        assert_eq!(cfg.tracker.component_name, "home");
        assert_eq!(cfg.tracker.scroll_threshold_percent, 50);
        assert_eq!(cfg.tracker.debounce_quiet, Duration::from_millis(250));
        assert_eq!(cfg.tracker.sections.len(), 2);
        assert_eq!(cfg.tracker.sections[1].name.as_deref(), Some("Our Rooms"));
        assert_eq!(cfg.source.date_range, DateRange::Last30Days);
        assert!(cfg.source.bypass_cache);
    }

    #[test]
    fn test_rejects_bad_threshold() {
        let cfg: Config =
            serde_yaml::from_str("tracker:\n  scroll_threshold_percent: 0\n").expect("parse");
        assert!(cfg.validate().is_err());

        let cfg: Config =
            serde_yaml::from_str("tracker:\n  scroll_threshold_percent: 120\n").expect("parse");
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_duplicate_section_ids() {
        let yaml = "tracker:\n  sections:\n    - id: hero\n    - id: hero\n";
        let cfg: Config = serde_yaml::from_str(yaml).expect("parse");
        let err = cfg.validate().expect_err("should fail");
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_rejects_zero_quiet_period() {
        let yaml = "tracker:\n  debounce_quiet: 0s\n";
        let cfg: Config = serde_yaml::from_str(yaml).expect("parse");
        assert!(cfg.validate().is_err());
    }
}
