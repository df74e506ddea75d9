use anyhow::Result;
use clap::Args;
use restex_http_client::HttpClient;
use serde_json::{json, Value};

use crate::render::render_outcome;

#[derive(Args)]
pub struct TransformSubCommand {
    /// Title sent in the request and upper-cased in the response
    #[arg(short, long, default_value = "Oh hey there bud")]
    title: String,
}

pub async fn transform(client: &HttpClient, sub_command_args: &TransformSubCommand) -> Result<()> {
    let body = json!({ "title": sub_command_args.title });

    // The custom transform is appended after the default chain, so it sees
    // the already-parsed JSON body.
    let outcome = client
        .post("/todos")
        .json(&body)
        .transform(|mut body| {
            if let Some(title) = body.get_mut("title") {
                if let Some(text) = title.as_str() {
                    *title = Value::String(text.to_uppercase());
                }
            }
            body
        })
        .outcome()
        .await;

    println!("{}", render_outcome(&outcome));

    Ok(())
}
