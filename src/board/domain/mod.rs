//! Domain model for shared task timers and ordered status columns.
//!
//! The domain keeps the two stateful rules of the board free of
//! infrastructure: the first-in/last-out shared interval in [`TaskTimer`] and
//! the gap-free column ordering planned by [`Board`].

mod column;
mod error;
mod ids;
mod project;
mod status;
mod task;
mod timer;
mod view;

pub use column::{Board, ColumnPlan};
pub use error::{BoardDomainError, ParseTaskStatusError};
pub use ids::{ProjectId, TaskId, TaskVersion, UserId};
pub use project::{PersistedProjectData, Project, ProjectNameBounds};
pub use status::TaskStatus;
pub use task::{PersistedTaskData, StartOutcome, Task, TaskDraft, TaskWrite};
pub use timer::{TaskTimer, TimerStart, TimerStop, displayed_ms};
pub use view::{BoardSnapshot, ColumnView, TaskView, format_elapsed};
