#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections

//! # Taskq Client Library
//!
//! Client for a queue-backed task service. A task is a JSON object posted to
//! `POST /submit_task` together with the name of the queue that should run it;
//! the service answers with an opaque `task_id`, and the task's result is
//! fetched from `GET /get_result/{task_id}` once a worker has produced it.
//!
//! ## Module Organization
//!
//! - [`api_clients`] - HTTP client for the task service
//! - [`types`] - Payloads, task identifiers and poll outcomes
//! - [`polling`] - Poll schedules with backoff and limits
//! - [`transport`] - Transport-agnostic service trait and submit-then-wait helpers
//! - [`config`] - Configuration management
//! - [`error`] - Structured error handling
//! - [`logging`] - Console logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use taskq_client::{ClientConfig, PollPolicy, TaskClient, TaskPayload};
//! use std::time::Duration;
//!
//! # async fn example() -> taskq_client::ClientResult<()> {
//! let client = TaskClient::new(ClientConfig::load()?)?;
//!
//! let task_id = client
//!     .try_submit_task(TaskPayload::new().with("text", "some text"), "string_queue")
//!     .await?;
//!
//! let policy = PollPolicy::exponential(Duration::from_millis(500), 2.0, Duration::from_secs(10))
//!     .with_max_wait(Duration::from_secs(120));
//! let body = client.wait_for_result(&task_id, &policy).await?;
//! println!("{}", body["result"]);
//! # Ok(())
//! # }
//! ```

pub mod api_clients;
pub mod config;
pub mod error;
pub mod logging;
pub mod polling;
pub mod transport;
pub mod types;

// Re-export commonly used types for convenience
pub use api_clients::{log_error_hook, ErrorHook, TaskClient};
pub use config::{ClientConfig, PollingConfig, ServiceConfig};
pub use error::{ClientError, ClientResult};
pub use polling::PollPolicy;
pub use transport::{poll_until_ready, submit_and_wait, TaskService};
pub use types::{PollOutcome, TaskId, TaskPayload};
