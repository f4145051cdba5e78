//! API Client Modules
//!
//! HTTP clients for communicating with the task service: submitting tasks to
//! named queues, polling for their results, and moving files in and out of
//! the service's file store.

pub mod task_client;

pub use task_client::{log_error_hook, ErrorHook, TaskClient};
