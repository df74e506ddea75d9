use anyhow::Result;
use clap::Args;
use restex_http_client::{CancelHandle, HttpClient, Outcome};

use crate::render::render_outcome;

#[derive(Args)]
pub struct CancelDemoSubCommand {
    /// Let the request run instead of cancelling it
    #[arg(long)]
    keep: bool,
    /// Reason recorded with the cancellation signal
    #[arg(long, default_value = "I canceled it")]
    reason: String,
}

pub async fn cancel_demo(
    client: &HttpClient,
    sub_command_args: &CancelDemoSubCommand,
) -> Result<()> {
    let handle = CancelHandle::new();
    let request = client.get("/todos").cancel_handle(&handle);

    // Signal before awaiting, so the cancellation races the dispatch. If the
    // response has already settled by the time the signal lands, it wins.
    if !sub_command_args.keep {
        handle.cancel(sub_command_args.reason.clone());
    }

    let outcome = request.outcome().await;
    if let Outcome::Cancelled(reason) = &outcome {
        tracing::warn!("request cancelled: {}", reason);
    }
    println!("{}", render_outcome(&outcome));

    Ok(())
}
