//! Port contracts for board persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by the board services.

pub mod project;
pub mod repository;

pub use project::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult};
pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
