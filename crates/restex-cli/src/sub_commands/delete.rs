use anyhow::Result;
use clap::Args;
use restex_http_client::{HttpClient, Outcome};

use crate::render::render_outcome;

#[derive(Args)]
pub struct DeleteSubCommand {
    /// Identifier of the todo to delete
    #[arg(short, long, default_value = "1")]
    id: u32,
}

pub async fn delete(client: &HttpClient, sub_command_args: &DeleteSubCommand) -> Result<()> {
    let path = format!("/todos/{}", sub_command_args.id);

    match client.delete(&path).send().await {
        Ok(response) => println!("{}", render_outcome(&Outcome::Success(response))),
        Err(err) => tracing::error!("todo delete failed: {}", err),
    }

    Ok(())
}
