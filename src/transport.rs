//! # Task Service Abstraction
//!
//! Transport-agnostic interface over the submit/poll operations, so code that
//! drives tasks end to end (the CLI, embedding applications, tests) can run
//! against the HTTP client or a substitute.
//!
//! ```rust,no_run
//! use taskq_client::{submit_and_wait, PollPolicy, TaskClient, TaskPayload};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> taskq_client::ClientResult<()> {
//! let client = TaskClient::from_base_url("http://localhost:5000")?;
//! let payload = TaskPayload::new().with("value", 5);
//!
//! let (task_id, body) = submit_and_wait(
//!     &client,
//!     payload,
//!     "math_queue",
//!     &PollPolicy::default(),
//!     &CancellationToken::new(),
//! )
//! .await?;
//! println!("{task_id}: {body}");
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use serde_json::Value;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::api_clients::TaskClient;
use crate::error::{ClientError, ClientResult};
use crate::polling::PollPolicy;
use crate::types::{PollOutcome, TaskId, TaskPayload};

/// Common interface for task services regardless of transport.
#[async_trait]
pub trait TaskService: Send + Sync {
    /// Get the endpoint for debugging/logging.
    fn endpoint(&self) -> &str;

    /// Submit a payload to the named queue.
    async fn submit(&self, payload: TaskPayload, queue_name: &str) -> ClientResult<TaskId>;

    /// Ask once for the result of a task.
    async fn poll(&self, task_id: &TaskId) -> ClientResult<PollOutcome>;
}

#[async_trait]
impl TaskService for TaskClient {
    fn endpoint(&self) -> &str {
        self.base_url()
    }

    async fn submit(&self, payload: TaskPayload, queue_name: &str) -> ClientResult<TaskId> {
        self.try_submit_task(payload, queue_name).await
    }

    async fn poll(&self, task_id: &TaskId) -> ClientResult<PollOutcome> {
        self.poll_once(task_id).await
    }
}

/// Poll `service` until the task's result is ready, the policy gives up, or `cancel` fires
///
/// Returns the response body containing `result`. Recoverable errors (see
/// [`ClientError::is_recoverable`]) are passed to `on_recoverable` and polling
/// continues; any other error is returned.
pub async fn poll_until_ready<S, F>(
    service: &S,
    task_id: &TaskId,
    policy: &PollPolicy,
    cancel: &CancellationToken,
    on_recoverable: F,
) -> ClientResult<Value>
where
    S: TaskService + ?Sized,
    F: Fn(&ClientError),
{
    let started = Instant::now();
    let deadline = policy.max_wait.and_then(|max_wait| started.checked_add(max_wait));
    let operation = format!("get_result {}", task_id);
    let mut attempt: u32 = 0;

    loop {
        attempt = attempt.saturating_add(1);

        let outcome = tokio::select! {
            _ = cancel.cancelled() => return Err(ClientError::Cancelled { operation }),
            _ = wait_until(deadline) => {
                return Err(ClientError::Timeout { operation, attempts: attempt });
            }
            outcome = service.poll(task_id) => outcome,
        };

        match outcome {
            Ok(PollOutcome::Ready(body)) => {
                info!(
                    task_id = %task_id,
                    attempts = attempt,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Task result available"
                );
                return Ok(body);
            }
            Ok(PollOutcome::Pending(_)) => {
                debug!(task_id = %task_id, attempt = attempt, "Task result not ready yet");
            }
            Err(e) if e.is_recoverable() => on_recoverable(&e),
            Err(e) => {
                error!(task_id = %task_id, attempt = attempt, error = %e, "Polling aborted");
                return Err(e);
            }
        }

        if policy.attempts_exhausted(attempt) {
            return Err(ClientError::Timeout {
                operation,
                attempts: attempt,
            });
        }

        let delay = policy.delay_for(attempt);
        if policy.max_wait.is_some_and(|max_wait| {
            started
                .elapsed()
                .checked_add(delay)
                .map_or(true, |next_poll| next_poll > max_wait)
        }) {
            return Err(ClientError::Timeout {
                operation,
                attempts: attempt,
            });
        }

        tokio::select! {
            _ = cancel.cancelled() => return Err(ClientError::Cancelled { operation }),
            _ = tokio::time::sleep(delay) => {}
        }
    }
}

/// Resolves at `deadline`, or never when there is none
async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Submit a task and poll for its result according to `policy`
///
/// Returns the task id together with the response body containing `result`.
/// Recoverable poll errors are logged and polling continues.
pub async fn submit_and_wait<S>(
    service: &S,
    payload: TaskPayload,
    queue_name: &str,
    policy: &PollPolicy,
    cancel: &CancellationToken,
) -> ClientResult<(TaskId, Value)>
where
    S: TaskService + ?Sized,
{
    let task_id = service.submit(payload, queue_name).await?;
    debug!(endpoint = service.endpoint(), task_id = %task_id, queue = queue_name, "Waiting for task result");

    let body = poll_until_ready(service, &task_id, policy, cancel, |e| {
        warn!(task_id = %task_id, error = %e, "Poll failed, retrying");
    })
    .await?;

    Ok((task_id, body))
}
