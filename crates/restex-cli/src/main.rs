//! restex: exercise a REST API from the command line
//!
//! Each subcommand issues one logical request (or one fixed concurrent
//! batch) against the configured API and prints the settled outcome. Request
//! failures are rendered or logged, never turned into a process failure.

use anyhow::Result;
use clap::{Parser, Subcommand};
use restex_http_client::{HttpClient, LoggingInterceptor};
use tracing::Level;
use tracing_subscriber::EnvFilter;
use url::Url;

mod render;
mod sub_commands;

const DEFAULT_API_URL: &str = "https://jsonplaceholder.typicode.com";

/// CLI for exercising a REST API surface
#[derive(Parser)]
#[command(name = "restex")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Base URL of the API to exercise
    #[arg(short = 'u', long, default_value = DEFAULT_API_URL)]
    api_url: Url,
    /// Token sent as the X-Auth-Token default header on every request
    #[arg(short, long)]
    auth_token: Option<String>,
    /// Logging level
    #[arg(short, long, default_value = "error")]
    log_level: Level,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a limited page of todos
    List(sub_commands::list::ListSubCommand),
    /// Create a todo
    Create(sub_commands::create::CreateSubCommand),
    /// Patch (or fully replace) a todo
    Update(sub_commands::update::UpdateSubCommand),
    /// Delete a todo
    Delete(sub_commands::delete::DeleteSubCommand),
    /// Fetch todos and posts concurrently
    Batch(sub_commands::batch::BatchSubCommand),
    /// Create a todo with extra per-request headers
    CreateWithHeaders(sub_commands::create_with_headers::CreateWithHeadersSubCommand),
    /// Create a todo and upper-case the title in the response
    Transform(sub_commands::transform::TransformSubCommand),
    /// Request a missing resource and walk the error taxonomy
    ErrorDemo,
    /// Issue a request and cancel it mid-flight
    CancelDemo(sub_commands::cancel_demo::CancelDemoSubCommand),
    /// List a collection through a pre-configured client instance
    Instance(sub_commands::instance::InstanceSubCommand),
}

/// Build the default client and the pre-configured instance client.
///
/// Both carry the process-wide default headers; the instance shares the
/// fixed base URL but has its own (empty) interceptor chain.
fn build_clients(
    api_url: &Url,
    auth_token: Option<&str>,
) -> Result<(HttpClient, HttpClient), restex_http_client::HttpError> {
    let mut builder = HttpClient::builder()
        .base_url(api_url.clone())
        .interceptor(LoggingInterceptor);
    if let Some(token) = auth_token {
        builder = builder.default_header("X-Auth-Token", token);
    }
    let client = builder.build()?;

    let mut instance_builder = HttpClient::builder().base_url(api_url.clone());
    if let Some(token) = auth_token {
        instance_builder = instance_builder.default_header("X-Auth-Token", token);
    }
    let instance = instance_builder.build()?;

    Ok((client, instance))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    let env_filter = EnvFilter::new(args.log_level.to_string());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    // Process-wide defaults, snapshotted once. Per-request overrides merge
    // over these at dispatch time.
    let (client, instance) = build_clients(&args.api_url, args.auth_token.as_deref())?;

    match &args.command {
        Commands::List(sub_command_args) => {
            sub_commands::list::list(&client, sub_command_args).await
        }
        Commands::Create(sub_command_args) => {
            sub_commands::create::create(&client, sub_command_args).await
        }
        Commands::Update(sub_command_args) => {
            sub_commands::update::update(&client, sub_command_args).await
        }
        Commands::Delete(sub_command_args) => {
            sub_commands::delete::delete(&client, sub_command_args).await
        }
        Commands::Batch(sub_command_args) => {
            sub_commands::batch::batch(&client, sub_command_args).await
        }
        Commands::CreateWithHeaders(sub_command_args) => {
            sub_commands::create_with_headers::create_with_headers(&client, sub_command_args)
                .await
        }
        Commands::Transform(sub_command_args) => {
            sub_commands::transform::transform(&client, sub_command_args).await
        }
        Commands::ErrorDemo => sub_commands::error_demo::error_demo(&client).await,
        Commands::CancelDemo(sub_command_args) => {
            sub_commands::cancel_demo::cancel_demo(&client, sub_command_args).await
        }
        Commands::Instance(sub_command_args) => {
            sub_commands::instance::instance(&instance, sub_command_args).await
        }
    }
}
