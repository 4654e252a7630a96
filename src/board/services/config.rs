//! Tunable limits for board services.

use crate::board::domain::ProjectNameBounds;
use serde::{Deserialize, Serialize};

/// Configuration shared by the timer and board services.
///
/// # Examples
///
/// ```
/// use taskboard::board::services::BoardConfig;
///
/// let config = BoardConfig::default().with_max_write_attempts(2);
/// assert_eq!(config.max_write_attempts, 2);
/// assert_eq!(config.poll_interval_ms, 3000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Maximum task title length in characters.
    pub max_title_length: usize,
    /// Minimum project name length in characters.
    pub min_project_name_length: usize,
    /// Maximum project name length in characters.
    pub max_project_name_length: usize,
    /// Attempts made for a write before a conflict is surfaced.
    pub max_write_attempts: u32,
    /// Suggested client polling cadence in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            max_title_length: 200,
            min_project_name_length: 2,
            max_project_name_length: 200,
            max_write_attempts: 5,
            poll_interval_ms: 3000,
        }
    }
}

impl BoardConfig {
    /// Sets the maximum task title length.
    #[must_use]
    pub const fn with_max_title_length(mut self, max_title_length: usize) -> Self {
        self.max_title_length = max_title_length;
        self
    }

    /// Sets the project name length bounds.
    #[must_use]
    pub const fn with_project_name_length(mut self, min: usize, max: usize) -> Self {
        self.min_project_name_length = min;
        self.max_project_name_length = max;
        self
    }

    /// Sets the write attempt budget. Values below one are treated as one.
    #[must_use]
    pub const fn with_max_write_attempts(mut self, max_write_attempts: u32) -> Self {
        self.max_write_attempts = max_write_attempts;
        self
    }

    /// Sets the suggested polling cadence.
    #[must_use]
    pub const fn with_poll_interval_ms(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Returns the project name bounds.
    #[must_use]
    pub const fn project_name_bounds(&self) -> ProjectNameBounds {
        ProjectNameBounds {
            min: self.min_project_name_length,
            max: self.max_project_name_length,
        }
    }

    pub(crate) const fn attempts(&self) -> u32 {
        if self.max_write_attempts == 0 {
            1
        } else {
            self.max_write_attempts
        }
    }
}
