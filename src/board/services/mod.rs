//! Application services for shared timers and board columns.

mod board;
mod config;
mod error;
mod retry;
mod timer;

pub use board::{BoardService, CreateProjectRequest, CreateTaskRequest, MoveTaskRequest};
pub use config::BoardConfig;
pub use error::{BoardErrorKind, BoardServiceError, BoardServiceResult};
pub use timer::TimerService;
