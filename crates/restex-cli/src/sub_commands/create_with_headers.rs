use anyhow::{anyhow, Result};
use clap::Args;
use restex_http_client::{HttpClient, Outcome};
use serde_json::json;

use crate::render::render_outcome;

#[derive(Args)]
pub struct CreateWithHeadersSubCommand {
    /// Title of the new todo
    #[arg(short, long, default_value = "New Todo")]
    title: String,
    /// Extra header as key=value; repeatable. Wins over defaults on collision.
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    headers: Vec<(String, String)>,
}

fn parse_header(raw: &str) -> Result<(String, String)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected key=value, got {}", raw))?;
    Ok((key.trim().to_string(), value.trim().to_string()))
}

pub async fn create_with_headers(
    client: &HttpClient,
    sub_command_args: &CreateWithHeadersSubCommand,
) -> Result<()> {
    let body = json!({
        "title": sub_command_args.title,
        "completed": false,
    });

    let mut request = client.post("/todos").json(&body);
    for (key, value) in &sub_command_args.headers {
        request = request.header(key, value);
    }

    match request.send().await {
        Ok(response) => println!("{}", render_outcome(&Outcome::Success(response))),
        Err(err) => tracing::error!("todo create failed: {}", err),
    }

    Ok(())
}
