//! Taskboard: shared task timers on an ordered project board.
//!
//! Tasks live in one of three columns (`todo`, `in_progress`, `done`) and
//! carry a timer that several people can run at once. Overlapping work is
//! counted once: the first person to start opens the interval and the last
//! person to stop closes it.
//!
//! # Architecture
//!
//! Taskboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence
//! - **Adapters**: In-memory and `PostgreSQL` implementations of the ports
//! - **Services**: Orchestration with optimistic-concurrency retries
//!
//! # Modules
//!
//! - [`board`]: Projects, tasks, shared timers, and column ordering

pub mod board;
