use anyhow::Result;
use clap::Args;
use restex_http_client::{HttpClient, HttpError, HttpResponse, Outcome};

use crate::render::render_outcome;

#[derive(Args)]
pub struct BatchSubCommand {
    /// Maximum number of todos to fetch
    #[arg(long, default_value = "5")]
    todos_limit: u32,
    /// Maximum number of posts to fetch
    #[arg(long, default_value = "5")]
    posts_limit: u32,
}

pub async fn batch(client: &HttpClient, sub_command_args: &BatchSubCommand) -> Result<()> {
    let todos_fut = client
        .get("/todos")
        .query("_limit", sub_command_args.todos_limit.to_string())
        .send();
    let posts_fut = client
        .get("/posts")
        .query("_limit", sub_command_args.posts_limit.to_string())
        .send();

    // Both fetches are in flight before either is awaited; the continuation
    // runs only once both have settled.
    let (todos, posts) = futures::join!(todos_fut, posts_fut);

    if let Some(rendered) = select_batch_output(todos, posts) {
        println!("{}", rendered);
    }

    Ok(())
}

/// Settle both results into the displayed text.
///
/// Only the posts result is displayed. The todos result is fetched and then
/// dropped on purpose; it only shows up in the logs.
fn select_batch_output(
    todos: Result<HttpResponse, HttpError>,
    posts: Result<HttpResponse, HttpError>,
) -> Option<String> {
    match todos {
        Ok(response) => tracing::debug!("todos fetch settled with status {}", response.status()),
        Err(err) => tracing::debug!("todos fetch failed: {}", err),
    }

    match posts {
        Ok(response) => Some(render_outcome(&Outcome::Success(response))),
        Err(err) => {
            tracing::error!("posts fetch failed: {}", err);
            None
        }
    }
}
