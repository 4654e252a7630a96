//! Shared task timers and ordered status columns.
//!
//! Tasks on a project board sit in one of three ordered columns (`todo`,
//! `in_progress`, `done`). Several users may work one task at once; its timer
//! follows the first-in/last-out rule, so overlapping work is counted once.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
