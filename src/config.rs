//! Configuration types for schedule publishing.
//!
//! All pipeline behaviour is controlled through [`PublishConfig`], built via
//! its [`PublishConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share configs between the render and patch stages and to log
//! the exact settings a run used.

use crate::error::ScheduleError;
use serde::{Deserialize, Serialize};

/// The literal delimiter bounding the replaceable region of the target page.
///
/// The page must contain this string exactly twice; the span from the first
/// occurrence through the second (inclusive) is owned by the patcher.
pub const SCHEDULE_MARKER: &str =
    "<!------------------------------ Insert Schedule ------------------------------>";

/// Configuration for a schedule publish run.
///
/// Built via [`PublishConfig::builder()`] or using
/// [`PublishConfig::default()`].
///
/// # Example
/// ```rust
/// use schedule2html::PublishConfig;
///
/// let config = PublishConfig::builder()
///     .row_capacity(4)
///     .backup_cap(10)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Cards per `<div class="row">` block. Default: 4.
    ///
    /// A presentation constant of the target page's Bootstrap grid
    /// (`col-lg-3` → four columns per row). Changing the page layout means
    /// changing this once, here, not per call site.
    pub row_capacity: usize,

    /// Number of backups retained per target, including the one taken by the
    /// current run. Default: 10.
    ///
    /// Oldest backups beyond the cap are deleted before a new one is added.
    pub backup_cap: usize,

    /// Name of the backup directory created alongside the target. Default: `"backups"`.
    pub backup_dir: String,

    /// Region delimiter literal. Default: [`SCHEDULE_MARKER`].
    ///
    /// Start and end boundary are the same string; the target must contain
    /// it exactly twice for a patch to be valid.
    pub marker: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            row_capacity: 4,
            backup_cap: 10,
            backup_dir: "backups".to_string(),
            marker: SCHEDULE_MARKER.to_string(),
        }
    }
}

impl PublishConfig {
    /// Create a new builder for `PublishConfig`.
    pub fn builder() -> PublishConfigBuilder {
        PublishConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`PublishConfig`].
#[derive(Debug)]
pub struct PublishConfigBuilder {
    config: PublishConfig,
}

impl PublishConfigBuilder {
    pub fn row_capacity(mut self, n: usize) -> Self {
        self.config.row_capacity = n.max(1);
        self
    }

    pub fn backup_cap(mut self, n: usize) -> Self {
        self.config.backup_cap = n.max(1);
        self
    }

    pub fn backup_dir(mut self, name: impl Into<String>) -> Self {
        self.config.backup_dir = name.into();
        self
    }

    pub fn marker(mut self, marker: impl Into<String>) -> Self {
        self.config.marker = marker.into();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PublishConfig, ScheduleError> {
        let c = &self.config;
        if c.row_capacity == 0 {
            return Err(ScheduleError::InvalidConfig(
                "Row capacity must be ≥ 1".into(),
            ));
        }
        if c.backup_cap == 0 {
            return Err(ScheduleError::InvalidConfig(
                "Backup cap must be ≥ 1".into(),
            ));
        }
        if c.marker.trim().is_empty() {
            return Err(ScheduleError::InvalidConfig(
                "Marker must be a non-empty literal".into(),
            ));
        }
        if c.backup_dir.trim().is_empty() {
            return Err(ScheduleError::InvalidConfig(
                "Backup directory name must be non-empty".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = PublishConfig::default();
        assert_eq!(c.row_capacity, 4);
        assert_eq!(c.backup_cap, 10);
        assert_eq!(c.backup_dir, "backups");
        assert_eq!(c.marker, SCHEDULE_MARKER);
    }

    #[test]
    fn builder_clamps_capacities() {
        let c = PublishConfig::builder()
            .row_capacity(0)
            .backup_cap(0)
            .build()
            .unwrap();
        assert_eq!(c.row_capacity, 1);
        assert_eq!(c.backup_cap, 1);
    }

    #[test]
    fn builder_rejects_blank_marker() {
        let result = PublishConfig::builder().marker("   ").build();
        assert!(matches!(result, Err(ScheduleError::InvalidConfig(_))));
    }

    #[test]
    fn builder_rejects_blank_backup_dir() {
        let result = PublishConfig::builder().backup_dir("").build();
        assert!(matches!(result, Err(ScheduleError::InvalidConfig(_))));
    }
}
