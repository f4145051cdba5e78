//! CLI module for the taskq CLI tool
//!
//! This module organizes all CLI-related functionality including
//! command structures and their handlers.

pub mod commands;

pub use commands::{handle_config_command, handle_file_command, handle_task_command};
