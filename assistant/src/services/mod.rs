//! Assistant services: configuration, persistence, completion and output

pub mod config_defaults;
pub mod config_store;
pub mod interaction_log;
pub mod local_model;
pub mod output_writer;
pub mod storage;

#[cfg(test)]
pub mod tests;

pub use config_defaults::default_group;
pub use config_store::ConfigStore;
pub use interaction_log::{interaction_id, similarity, RealInteractionLog};
pub use local_model::LocalModelClient;
pub use output_writer::OutputWriter;
