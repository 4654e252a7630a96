//! Shared clock and user helpers for integration tests.


pub use clock::ManualClock;
use taskboard::board::domain::UserId;

/// Builds a user id, panicking on malformed test input.
pub fn user(name: &str) -> UserId {
    UserId::new(name).expect("valid user id")
}
