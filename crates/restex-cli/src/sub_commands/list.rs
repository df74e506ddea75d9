use std::time::Duration;

use anyhow::Result;
use clap::Args;
use restex_http_client::{HttpClient, Outcome};

use crate::render::render_outcome;

#[derive(Args)]
pub struct ListSubCommand {
    /// Maximum number of todos to fetch
    #[arg(short, long, default_value = "5")]
    limit: u32,
    /// Per-request timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
}

pub async fn list(client: &HttpClient, sub_command_args: &ListSubCommand) -> Result<()> {
    let mut request = client
        .get("/todos")
        .query("_limit", sub_command_args.limit.to_string());
    if let Some(ms) = sub_command_args.timeout_ms {
        request = request.timeout(Duration::from_millis(ms));
    }

    match request.send().await {
        Ok(response) => println!("{}", render_outcome(&Outcome::Success(response))),
        Err(err) => tracing::error!("todos fetch failed: {}", err),
    }

    Ok(())
}
