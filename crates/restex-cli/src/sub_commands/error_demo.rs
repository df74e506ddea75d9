use anyhow::Result;
use restex_http_client::{HttpClient, HttpError, Outcome};

use crate::render::render_outcome;

/// Request a path that does not exist and branch on the error taxonomy.
///
/// Nothing escapes this function: every branch logs its own fields and the
/// process carries on.
pub async fn error_demo(client: &HttpClient) -> Result<()> {
    match client.get("/todosssss").query("_limit", "5").send().await {
        Ok(response) => println!("{}", render_outcome(&Outcome::Success(response))),
        Err(HttpError::Status {
            status,
            headers,
            body,
        }) => {
            tracing::error!("server responded with status {}", status);
            tracing::error!("response headers: {:?}", headers);
            tracing::error!("response body: {}", body);
        }
        Err(HttpError::NoResponse { request, detail }) => {
            tracing::error!(
                "no response for {} {}: {}",
                request.method,
                request.url,
                detail
            );
        }
        Err(err) => {
            tracing::error!("request never left: {}", err);
        }
    }

    Ok(())
}
