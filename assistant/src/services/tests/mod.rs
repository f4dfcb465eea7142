//! Tests for assistant services
//!
//! File-backed services run against temporary directories; the completion
//! client runs against a local mock HTTP server.

pub mod output_writer;
