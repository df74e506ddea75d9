use anyhow::Result;
use clap::{Args, ValueEnum};
use restex_http_client::{HttpClient, Outcome};

use crate::render::render_outcome;

#[derive(Args)]
pub struct InstanceSubCommand {
    /// Collection to list through the instance client
    #[arg(value_enum)]
    resource: Resource,
}

#[derive(Clone, Copy, ValueEnum)]
enum Resource {
    Comments,
    Todos,
    Posts,
}

impl Resource {
    fn path(self) -> &'static str {
        match self {
            Resource::Comments => "/comments",
            Resource::Todos => "/todos",
            Resource::Posts => "/posts",
        }
    }
}

pub async fn instance(client: &HttpClient, sub_command_args: &InstanceSubCommand) -> Result<()> {
    match client.get(sub_command_args.resource.path()).send().await {
        Ok(response) => println!("{}", render_outcome(&Outcome::Success(response))),
        Err(err) => tracing::error!("instance fetch failed: {}", err),
    }

    Ok(())
}
