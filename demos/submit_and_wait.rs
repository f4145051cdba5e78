//! Submit a two-key task to `my_queue` and block until its result arrives.
//!
//! ```bash
//! cargo run --example submit_and_wait
//! ```

use taskq_client::{TaskClient, TaskPayload};

#[tokio::main]
async fn main() -> taskq_client::ClientResult<()> {
    taskq_client::logging::init_console_only();

    let client = TaskClient::from_base_url("http://localhost:5000")?;

    let payload = TaskPayload::new()
        .with("key1", "value1")
        .with("key2", "value2");

    let task_id = client.submit_task(payload, "my_queue").await;
    let result = client.get_result(&task_id, true).await;

    println!("Result: {}", result);
    Ok(())
}
