use anyhow::Result;
use clap::Args;
use restex_http_client::{HttpClient, Outcome};
use serde_json::json;

use crate::render::render_outcome;

#[derive(Args)]
pub struct CreateSubCommand {
    /// Title of the new todo
    #[arg(short, long, default_value = "New Todo")]
    title: String,
    /// Mark the todo as already completed
    #[arg(short, long)]
    completed: bool,
}

pub async fn create(client: &HttpClient, sub_command_args: &CreateSubCommand) -> Result<()> {
    let body = json!({
        "title": sub_command_args.title,
        "completed": sub_command_args.completed,
    });

    match client.post("/todos").json(&body).send().await {
        Ok(response) => println!("{}", render_outcome(&Outcome::Success(response))),
        Err(err) => tracing::error!("todo create failed: {}", err),
    }

    Ok(())
}
