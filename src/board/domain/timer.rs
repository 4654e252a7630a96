//! Shared elapsed-time accounting for a single task.
//!
//! All participants share one interval. The first user to join opens it and
//! the last user to leave closes it, so overlapping work by several users is
//! counted once as wall-clock coverage rather than summed per person.

use super::{BoardDomainError, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of a user joining a task timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerStart {
    /// The user was the first participant and opened a new interval.
    Opened,
    /// The user joined an interval that was already running.
    Joined,
    /// The user was already active; nothing changed.
    AlreadyActive,
}

/// Result of a user leaving a task timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerStop {
    /// The user was the last participant; the interval was closed and its
    /// duration banked.
    Closed {
        /// Milliseconds added to the accumulated total.
        elapsed_ms: u64,
    },
    /// The user left while others keep the interval open.
    Left,
    /// The user was not active; nothing changed.
    NotActive,
}

/// Timer state shared by every participant of one task.
///
/// An interval is open exactly when at least one user is active.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTimer {
    active_user_ids: Vec<UserId>,
    last_start_at: Option<DateTime<Utc>>,
    accumulated_ms: u64,
}

impl TaskTimer {
    /// Creates an idle timer with nothing banked.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            active_user_ids: Vec::new(),
            last_start_at: None,
            accumulated_ms: 0,
        }
    }

    /// Reconstructs timer state from storage.
    ///
    /// Duplicate user ids are collapsed, keeping the first occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InconsistentTimer`] when the start
    /// timestamp is present without active users or missing while users are
    /// active.
    pub fn from_persisted(
        active_user_ids: Vec<UserId>,
        last_start_at: Option<DateTime<Utc>>,
        accumulated_ms: u64,
    ) -> Result<Self, BoardDomainError> {
        let mut unique: Vec<UserId> = Vec::with_capacity(active_user_ids.len());
        for user_id in active_user_ids {
            if !unique.contains(&user_id) {
                unique.push(user_id);
            }
        }

        if unique.is_empty() == last_start_at.is_some() {
            return Err(BoardDomainError::InconsistentTimer {
                active_users: unique.len(),
                has_open_interval: last_start_at.is_some(),
            });
        }

        Ok(Self {
            active_user_ids: unique,
            last_start_at,
            accumulated_ms,
        })
    }

    /// Returns the users currently working the task, in joining order.
    #[must_use]
    pub fn active_user_ids(&self) -> &[UserId] {
        &self.active_user_ids
    }

    /// Returns the start of the open interval, if any.
    #[must_use]
    pub const fn last_start_at(&self) -> Option<DateTime<Utc>> {
        self.last_start_at
    }

    /// Returns the total of all closed intervals in milliseconds.
    #[must_use]
    pub const fn accumulated_ms(&self) -> u64 {
        self.accumulated_ms
    }

    /// Returns `true` while an interval is open.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.last_start_at.is_some()
    }

    /// Returns `true` when the user is currently working the task.
    #[must_use]
    pub fn is_active(&self, user_id: &UserId) -> bool {
        self.active_user_ids.contains(user_id)
    }

    /// Adds a participant, opening an interval if nobody was active.
    pub fn start(&mut self, user_id: UserId, now: DateTime<Utc>) -> TimerStart {
        if self.is_active(&user_id) {
            return TimerStart::AlreadyActive;
        }

        let was_idle = self.active_user_ids.is_empty();
        self.active_user_ids.push(user_id);
        if was_idle {
            self.last_start_at = Some(now);
            TimerStart::Opened
        } else {
            TimerStart::Joined
        }
    }

    /// Removes a participant, closing the interval if they were the last one.
    ///
    /// A non-positive interval (the reader's clock is behind the stored start)
    /// banks nothing.
    pub fn stop(&mut self, user_id: &UserId, now: DateTime<Utc>) -> TimerStop {
        let Some(position) = self.active_user_ids.iter().position(|id| id == user_id) else {
            return TimerStop::NotActive;
        };
        self.active_user_ids.remove(position);
        if !self.active_user_ids.is_empty() {
            return TimerStop::Left;
        }

        let elapsed_ms = self
            .last_start_at
            .take()
            .map_or(0, |started| elapsed_between(started, now));
        self.accumulated_ms = self.accumulated_ms.saturating_add(elapsed_ms);
        TimerStop::Closed { elapsed_ms }
    }

    /// Returns the elapsed time to display at `now`: the banked total plus
    /// the running part of the open interval. Never persisted.
    #[must_use]
    pub fn displayed_ms(&self, now: DateTime<Utc>) -> u64 {
        displayed_ms(self.accumulated_ms, self.last_start_at, now)
    }
}

/// Computes displayed elapsed time from raw timer fields.
#[must_use]
pub fn displayed_ms(
    accumulated_ms: u64,
    last_start_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> u64 {
    last_start_at.map_or(accumulated_ms, |started| {
        accumulated_ms.saturating_add(elapsed_between(started, now))
    })
}

/// Milliseconds from `start` to `end`, clamped at zero.
fn elapsed_between(start: DateTime<Utc>, end: DateTime<Utc>) -> u64 {
    u64::try_from(end.signed_duration_since(start).num_milliseconds()).unwrap_or(0)
}
