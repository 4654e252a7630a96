//! `PostgreSQL` adapters for board persistence.

mod models;
mod project;
mod repository;
mod schema;

pub use project::PostgresProjectRepository;
pub use repository::{BoardPgPool, PostgresTaskRepository};
