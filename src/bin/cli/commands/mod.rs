//! Command handlers for the taskq CLI
//!
//! This module contains all command handler implementations, decomposed by command category.

pub mod config;
pub mod file;
pub mod task;

pub use config::handle_config_command;
pub use file::handle_file_command;
pub use task::handle_task_command;
