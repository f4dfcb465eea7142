//! Assistant core logic: pure functions and in-memory bookkeeping

pub mod classifier;
pub mod context;
pub mod history;
pub mod prompt;
pub mod quality;
pub mod templates;

pub use classifier::classify;
pub use context::ContextLibrary;
pub use history::{CompletionHistory, PendingQueue, RunningStats, DEFAULT_HISTORY_LIMIT};
pub use templates::{derive_name, render};
