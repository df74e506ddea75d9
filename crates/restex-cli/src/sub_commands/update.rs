use anyhow::Result;
use clap::Args;
use restex_http_client::{HttpClient, Outcome};
use serde_json::json;

use crate::render::render_outcome;

#[derive(Args)]
pub struct UpdateSubCommand {
    /// Identifier of the todo to update
    #[arg(short, long, default_value = "1")]
    id: u32,
    /// New title
    #[arg(short, long, default_value = "Updated Todo")]
    title: String,
    /// Mark the todo as completed
    #[arg(short, long)]
    completed: bool,
    /// Replace the whole todo (PUT) instead of patching it
    #[arg(long)]
    replace: bool,
}

pub async fn update(client: &HttpClient, sub_command_args: &UpdateSubCommand) -> Result<()> {
    let path = format!("/todos/{}", sub_command_args.id);
    let body = json!({
        "title": sub_command_args.title,
        "completed": sub_command_args.completed,
    });

    // PUT overwrites the whole resource; PATCH applies the fields given.
    let request = if sub_command_args.replace {
        client.put(&path).json(&body)
    } else {
        client.patch(&path).json(&body)
    };

    match request.send().await {
        Ok(response) => println!("{}", render_outcome(&Outcome::Success(response))),
        Err(err) => tracing::error!("todo update failed: {}", err),
    }

    Ok(())
}
