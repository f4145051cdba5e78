//! Task command handlers for the taskq CLI

use std::time::Duration;

use taskq_client::{
    submit_and_wait, ClientConfig, ClientError, ClientResult, PollOutcome, TaskClient, TaskId,
    TaskPayload,
};
use tokio_util::sync::CancellationToken;

use crate::TaskCommands;

pub async fn handle_task_command(cmd: TaskCommands, config: &ClientConfig) -> ClientResult<()> {
    let client = TaskClient::new(config.clone())?;

    match cmd {
        TaskCommands::Submit { queue, input, wait } => {
            let value: serde_json::Value = serde_json::from_str(&input)
                .map_err(|e| ClientError::InvalidInput(format!("Invalid JSON input: {}", e)))?;
            let payload = TaskPayload::try_from(value)?;

            println!("Submitting task to queue: {}", queue);

            if wait {
                let cancel = cancel_on_ctrl_c();
                match submit_and_wait(&client, payload, &queue, &client.poll_policy(), &cancel)
                    .await
                {
                    Ok((task_id, body)) => {
                        println!("✓ Task completed");
                        println!("  Task ID: {}", task_id);
                        print_json("  Result", &body["result"]);
                    }
                    Err(e) => {
                        eprintln!("✗ Task did not complete: {}", e);
                        return Err(e);
                    }
                }
            } else {
                match client.try_submit_task(payload, &queue).await {
                    Ok(task_id) => {
                        println!("✓ Task submitted");
                        println!("  Task ID: {}", task_id);
                    }
                    Err(e) => {
                        eprintln!("✗ Failed to submit task: {}", e);
                        return Err(e);
                    }
                }
            }
        }
        TaskCommands::Result {
            task_id,
            wait,
            max_attempts,
            max_wait_ms,
        } => {
            let task_id = TaskId::from(task_id);

            if wait {
                let mut policy = client.poll_policy();
                if let Some(max_attempts) = max_attempts {
                    policy = policy.with_max_attempts(max_attempts);
                }
                if let Some(max_wait_ms) = max_wait_ms {
                    policy = policy.with_max_wait(Duration::from_millis(max_wait_ms));
                }

                println!("Waiting for result of task: {}", task_id);
                let cancel = cancel_on_ctrl_c();
                match client
                    .wait_for_result_with_cancel(&task_id, &policy, &cancel)
                    .await
                {
                    Ok(body) => {
                        println!("✓ Result available");
                        print_json("  Result", &body["result"]);
                    }
                    Err(e) => {
                        eprintln!("✗ No result: {}", e);
                        return Err(e);
                    }
                }
            } else {
                match client.poll_once(&task_id).await {
                    Ok(PollOutcome::Ready(body)) => {
                        println!("✓ Result available");
                        print_json("  Result", &body["result"]);
                    }
                    Ok(PollOutcome::Pending(body)) => {
                        println!("… Task {} result not found or not ready yet", task_id);
                        print_json("  Response", &body);
                    }
                    Err(e) => {
                        eprintln!("✗ Failed to get result: {}", e);
                        return Err(e);
                    }
                }
            }
        }
    }

    Ok(())
}

fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });
    cancel
}

fn print_json(label: &str, value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(pretty) => println!("{}: {}", label, pretty),
        Err(_) => println!("{}: {}", label, value),
    }
}
