//! In-memory adapters for tests and single-process embedding.

mod project;
mod task;

pub use project::InMemoryProjectRepository;
pub use task::InMemoryTaskRepository;
