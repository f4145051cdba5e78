//! # Task Service Client
//!
//! HTTP client for the task service. Submits payloads to named queues via
//! `POST /submit_task` and polls `GET /get_result/{task_id}` until the task's
//! result is available.
//!
//! Two contracts are offered over the same requests:
//!
//! - **Best-effort**: [`TaskClient::submit_task`] and [`TaskClient::get_result`]
//!   never return an error. Failures are handed to the client's [`ErrorHook`]
//!   (which logs them by default) and a default value is returned: an empty
//!   [`TaskId`] or `Value::Null`. Waiting polls at a fixed interval forever.
//! - **Typed**: [`TaskClient::try_submit_task`], [`TaskClient::poll_once`],
//!   [`TaskClient::fetch_result`] and [`TaskClient::wait_for_result`] return
//!   [`ClientResult`] and honour a [`PollPolicy`] with attempt/time limits,
//!   backoff and cancellation.

use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::polling::PollPolicy;
use crate::types::{has_result, PollOutcome, TaskId, TaskPayload, RESULT_KEY, TASK_ID_KEY};

const FILE_URL_KEY: &str = "file_url";

/// Callback receiving errors that the best-effort operations swallow
pub type ErrorHook = Arc<dyn Fn(&ClientError) + Send + Sync>;

/// The default [`ErrorHook`]: log the error at `error` level
pub fn log_error_hook() -> ErrorHook {
    Arc::new(|err: &ClientError| {
        error!(error = %err, recoverable = err.is_recoverable(), "Task service request failed");
    })
}

/// HTTP client for the task service
///
/// Holds one connection pool for its whole lifetime; clones share it.
///
/// # Examples
///
/// ```rust,no_run
/// use taskq_client::{TaskClient, TaskPayload};
///
/// # async fn example() -> taskq_client::ClientResult<()> {
/// let client = TaskClient::from_base_url("http://localhost:5000")?;
///
/// let payload = TaskPayload::new().with("key1", "value1").with("key2", "value2");
/// let task_id = client.submit_task(payload, "my_queue").await;
///
/// let result = client.get_result(&task_id, true).await;
/// println!("Result: {}", result);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TaskClient {
    client: Client,
    config: ClientConfig,
    error_hook: ErrorHook,
}

impl std::fmt::Debug for TaskClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskClient")
            .field("base_url", &self.config.service.base_url)
            .field("timeout_ms", &self.config.service.timeout_ms)
            .field("poll_interval_ms", &self.config.polling.interval_ms)
            .finish()
    }
}

impl TaskClient {
    /// Create a new task client with the given configuration
    ///
    /// The base URL is kept exactly as given; request URLs are formed by
    /// appending the endpoint path to it.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.service.timeout_ms))
            .user_agent(format!("taskq-client/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::config_error(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            base_url = %config.service.base_url,
            timeout_ms = config.service.timeout_ms,
            poll_interval_ms = config.polling.interval_ms,
            "Created task service client"
        );

        Ok(Self {
            client,
            config,
            error_hook: log_error_hook(),
        })
    }

    /// Create a client with default settings for the given base URL
    pub fn from_base_url(base_url: impl Into<String>) -> ClientResult<Self> {
        Self::new(ClientConfig::with_base_url(base_url))
    }

    /// Replace the hook that receives errors swallowed by best-effort operations
    #[must_use]
    pub fn with_error_hook(mut self, hook: ErrorHook) -> Self {
        self.error_hook = hook;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.service.base_url
    }

    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.config.service.timeout_ms
    }

    /// Fixed interval used by [`TaskClient::get_result`] when waiting
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.config.polling.interval()
    }

    /// Poll policy built from the client's polling configuration
    #[must_use]
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy::from(&self.config.polling)
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.service.base_url, path)
    }

    fn report(&self, err: &ClientError) {
        (self.error_hook)(err);
    }

    // ===================================================================================
    // SUBMISSION
    // ===================================================================================

    /// Submit a task, returning an empty id on any failure
    ///
    /// POST /submit_task
    ///
    /// Sets `payload["queue"] = queue_name` (overwriting any existing value)
    /// and posts the payload as JSON. The `task_id` of the response body is
    /// returned. Transport failures, non-JSON bodies and a missing `task_id`
    /// are passed to the error hook and yield `TaskId::default()`. The HTTP
    /// status is not inspected.
    pub async fn submit_task(&self, payload: TaskPayload, queue_name: &str) -> TaskId {
        match self.submit_ignoring_status(payload, queue_name).await {
            Ok(task_id) => task_id,
            Err(e) => {
                self.report(&e);
                TaskId::default()
            }
        }
    }

    async fn submit_ignoring_status(
        &self,
        payload: TaskPayload,
        queue_name: &str,
    ) -> ClientResult<TaskId> {
        let (_, text) = self.send_submission(payload, queue_name).await?;
        Self::parse_submission(&text, queue_name)
    }

    /// Submit a task, reporting every failure to the caller
    ///
    /// POST /submit_task
    pub async fn try_submit_task(
        &self,
        payload: TaskPayload,
        queue_name: &str,
    ) -> ClientResult<TaskId> {
        let (status, text) = self.send_submission(payload, queue_name).await?;

        if !status.is_success() {
            error!(status = %status, error = %text, queue = queue_name, "Task submission rejected");
            return Err(ClientError::api_error(status.as_u16(), text));
        }

        Self::parse_submission(&text, queue_name)
    }

    fn parse_submission(text: &str, queue_name: &str) -> ClientResult<TaskId> {
        let body: Value = serde_json::from_str(text)?;
        let task_id =
            TaskId::from_response(&body).ok_or_else(|| ClientError::missing_field(TASK_ID_KEY))?;

        info!(task_id = %task_id, queue = queue_name, "Task submitted");
        Ok(task_id)
    }

    async fn send_submission(
        &self,
        mut payload: TaskPayload,
        queue_name: &str,
    ) -> ClientResult<(StatusCode, String)> {
        payload.set_queue(queue_name);
        let url = self.endpoint("/submit_task");

        debug!(url = %url, queue = queue_name, "Submitting task to service");

        let response = self.client.post(&url).json(&payload).send().await?;
        let status = response.status();
        let text = response.text().await?;

        debug!(status = %status, body = %text, "Received submission response");
        Ok((status, text))
    }

    // ===================================================================================
    // RESULTS
    // ===================================================================================

    /// Fetch a task result, returning `Value::Null` on any failure
    ///
    /// GET /get_result/{task_id}
    ///
    /// With `wait == false` exactly one request is made and its parsed body is
    /// returned unchanged, whatever the status; it may lack a `result` key.
    ///
    /// With `wait == true` the request is repeated at the configured fixed
    /// interval until a body containing `result` arrives, and that body is
    /// returned. There is no limit: failures of any kind are passed to the
    /// error hook and treated as "not ready yet". Drop the future to stop
    /// waiting, or use [`TaskClient::wait_for_result_with_cancel`].
    pub async fn get_result(&self, task_id: &TaskId, wait: bool) -> Value {
        if !wait {
            return match self.get_result_body(task_id).await {
                Ok(body) => body,
                Err(e) => {
                    self.report(&e);
                    Value::Null
                }
            };
        }

        let interval = self.poll_interval();
        let mut attempt: u64 = 0;
        loop {
            attempt = attempt.saturating_add(1);
            match self.get_result_body(task_id).await {
                Ok(body) if has_result(&body) => {
                    info!(task_id = %task_id, attempts = attempt, "Task result available");
                    return body;
                }
                Ok(_) => {
                    debug!(task_id = %task_id, attempt = attempt, "Task result not ready yet");
                }
                Err(e) => self.report(&e),
            }
            tokio::time::sleep(interval).await;
        }
    }

    async fn get_result_body(&self, task_id: &TaskId) -> ClientResult<Value> {
        let (_, text) = self.request_result(task_id).await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn request_result(&self, task_id: &TaskId) -> ClientResult<(StatusCode, String)> {
        let url = self.endpoint(&format!("/get_result/{}", task_id));

        debug!(url = %url, task_id = %task_id, "Requesting task result");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let text = response.text().await?;
        Ok((status, text))
    }

    /// Make one result request and classify the body
    ///
    /// GET /get_result/{task_id}
    ///
    /// A 2xx or 404 response must carry a JSON body, which is `Ready` when it
    /// contains `result` and `Pending` otherwise. The service answers 404
    /// while a task is still running. Any other status is an `ApiError`.
    pub async fn poll_once(&self, task_id: &TaskId) -> ClientResult<PollOutcome> {
        let (status, text) = self.request_result(task_id).await?;

        if status.is_success() || status == StatusCode::NOT_FOUND {
            let body: Value = serde_json::from_str(&text)?;
            Ok(PollOutcome::from_body(body))
        } else {
            Err(ClientError::api_error(status.as_u16(), text))
        }
    }

    /// Fetch the `result` value of a task once, without waiting
    ///
    /// Returns `MissingField` when the task has no result yet.
    pub async fn fetch_result(&self, task_id: &TaskId) -> ClientResult<Value> {
        match self.poll_once(task_id).await? {
            PollOutcome::Ready(mut body) => Ok(body
                .get_mut(RESULT_KEY)
                .map(Value::take)
                .unwrap_or(Value::Null)),
            PollOutcome::Pending(_) => Err(ClientError::missing_field(RESULT_KEY)),
        }
    }

    /// Poll until the result is ready or the policy gives up
    ///
    /// Returns the full response body containing `result`.
    pub async fn wait_for_result(
        &self,
        task_id: &TaskId,
        policy: &PollPolicy,
    ) -> ClientResult<Value> {
        self.wait_for_result_with_cancel(task_id, policy, &CancellationToken::new())
            .await
    }

    /// Poll until the result is ready, the policy gives up, or `cancel` fires
    ///
    /// Recoverable errors (see [`ClientError::is_recoverable`]) are passed to
    /// the error hook and polling continues; any other error is returned.
    pub async fn wait_for_result_with_cancel(
        &self,
        task_id: &TaskId,
        policy: &PollPolicy,
        cancel: &CancellationToken,
    ) -> ClientResult<Value> {
        crate::transport::poll_until_ready(self, task_id, policy, cancel, |e| self.report(e)).await
    }

    // ===================================================================================
    // FILES
    // ===================================================================================

    /// Upload a file to the service's file store
    ///
    /// POST /upload_file (multipart, field `file`)
    ///
    /// Returns the `file_url` the service assigned; tasks refer to files by it.
    pub async fn upload_file(&self, path: &Path) -> ClientResult<String> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let url = self.endpoint("/upload_file");

        debug!(url = %url, file = %path.display(), size = bytes.len(), "Uploading file");

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self.client.post(&url).multipart(form).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status != StatusCode::CREATED {
            error!(status = %status, error = %text, "File upload failed");
            return Err(ClientError::api_error(status.as_u16(), text));
        }

        let body: Value = serde_json::from_str(&text)?;
        let file_url = body
            .get(FILE_URL_KEY)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ClientError::missing_field(FILE_URL_KEY))?;

        info!(file_url = %file_url, "File uploaded");
        Ok(file_url)
    }

    /// Download a file from the service's file store and write it to `destination`
    ///
    /// GET /get_file?file_url=...
    pub async fn get_file(&self, file_url: &str, destination: &Path) -> ClientResult<Vec<u8>> {
        let url = self.endpoint("/get_file");

        debug!(url = %url, file_url = file_url, "Downloading file");

        let response = self
            .client
            .get(&url)
            .query(&[(FILE_URL_KEY, file_url)])
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %error_text, "File download failed");
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        let bytes = response.bytes().await?.to_vec();
        tokio::fs::write(destination, &bytes).await?;

        info!(
            file_url = file_url,
            destination = %destination.display(),
            size = bytes.len(),
            "File downloaded"
        );
        Ok(bytes)
    }
}
