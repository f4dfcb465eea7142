//! Modding assistant library
//!
//! Turns natural-language requests into Fabric Java skeletons, either through
//! an external completion server or from built-in templates, and keeps a
//! file-backed log of past interactions.

pub mod error;
pub mod types;
pub mod traits;
pub mod settings;
pub mod core;
pub mod services;
pub mod engine;
pub mod cli;

// Re-export main types
pub use error::{AssistantError, AssistantResult};
pub use types::*;
pub use traits::*;
pub use settings::{FilePolicy, GenerationSettings, LearningSettings, ModelSettings, Settings};
pub use engine::{Engine, EngineState};
pub use services::*;
