//! Shared utilities: error types and JSON file storage.

pub mod errors;
pub mod file_handler;
