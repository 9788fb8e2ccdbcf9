//! Store configuration.
//!
//! # Responsibility
//! - Carry the shared-storage key, local calendar offset and widget limit.
//! - Validate values before a store or widget loader is built from them.
//!
//! # Invariants
//! - `storage_key` is non-empty after trimming.
//! - `utc_offset_minutes` is within ±18h.
//! - `widget_limit` is at least 1.

use crate::calendar::DayCalendar;
use chrono::Local;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key shared by the host app and the widget.
pub const DEFAULT_STORAGE_KEY: &str = "memos";
/// Number of memos rendered by the widget.
pub const DEFAULT_WIDGET_LIMIT: usize = 6;

/// Configuration error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyStorageKey,
    OffsetOutOfRange(i32),
    ZeroWidgetLimit,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyStorageKey => write!(f, "storage key cannot be empty"),
            Self::OffsetOutOfRange(minutes) => {
                write!(f, "utc offset {minutes} minutes is outside ±18h")
            }
            Self::ZeroWidgetLimit => write!(f, "widget limit must be at least 1"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Key of the JSON blob in the shared key-value namespace.
    pub storage_key: String,
    /// Minutes east of UTC used for calendar-day comparisons.
    pub utc_offset_minutes: i32,
    /// Maximum widget entries.
    pub widget_limit: usize,
}

impl Default for StoreConfig {
    /// Uses the host's current local offset.
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            utc_offset_minutes: Local::now().offset().local_minus_utc() / 60,
            widget_limit: DEFAULT_WIDGET_LIMIT,
        }
    }
}

impl StoreConfig {
    /// Default configuration pinned to an explicit offset.
    pub fn with_offset_minutes(utc_offset_minutes: i32) -> Self {
        Self {
            utc_offset_minutes,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        if self.widget_limit == 0 {
            return Err(ConfigError::ZeroWidgetLimit);
        }
        self.calendar().map(|_| ())
    }

    pub fn calendar(&self) -> Result<DayCalendar, ConfigError> {
        DayCalendar::from_offset_minutes(self.utc_offset_minutes)
            .ok_or(ConfigError::OffsetOutOfRange(self.utc_offset_minutes))
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, StoreConfig, DEFAULT_STORAGE_KEY, DEFAULT_WIDGET_LIMIT};

    #[test]
    fn default_config_is_valid() {
        let config = StoreConfig::default();
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.widget_limit, DEFAULT_WIDGET_LIMIT);
        config.validate().expect("default config should validate");
    }

    #[test]
    fn validate_rejects_bad_values() {
        let empty_key = StoreConfig {
            storage_key: "  ".to_string(),
            ..StoreConfig::with_offset_minutes(0)
        };
        assert_eq!(empty_key.validate(), Err(ConfigError::EmptyStorageKey));

        let zero_limit = StoreConfig {
            widget_limit: 0,
            ..StoreConfig::with_offset_minutes(0)
        };
        assert_eq!(zero_limit.validate(), Err(ConfigError::ZeroWidgetLimit));

        let far_offset = StoreConfig::with_offset_minutes(20 * 60);
        assert_eq!(
            far_offset.validate(),
            Err(ConfigError::OffsetOutOfRange(20 * 60))
        );
    }
}
