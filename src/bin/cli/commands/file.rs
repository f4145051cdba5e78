//! File command handlers for the taskq CLI

use std::path::Path;

use taskq_client::{ClientConfig, ClientResult, TaskClient};

use crate::FileCommands;

pub async fn handle_file_command(cmd: FileCommands, config: &ClientConfig) -> ClientResult<()> {
    let client = TaskClient::new(config.clone())?;

    match cmd {
        FileCommands::Upload { path } => {
            println!("Uploading file: {}", path);

            match client.upload_file(Path::new(&path)).await {
                Ok(file_url) => {
                    println!("✓ File uploaded");
                    println!("  File URL: {}", file_url);
                }
                Err(e) => {
                    eprintln!("✗ Failed to upload file: {}", e);
                    return Err(e);
                }
            }
        }
        FileCommands::Download {
            file_url,
            destination,
        } => {
            println!("Downloading {} to {}", file_url, destination);

            match client.get_file(&file_url, Path::new(&destination)).await {
                Ok(bytes) => {
                    println!("✓ File downloaded ({} bytes)", bytes.len());
                }
                Err(e) => {
                    eprintln!("✗ Failed to download file: {}", e);
                    return Err(e);
                }
            }
        }
    }

    Ok(())
}
