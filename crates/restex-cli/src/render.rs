//! Outcome rendering
//!
//! Pure serialization from a settled [`Outcome`] to display text, kept apart
//! from the subcommand wiring so it can be tested without any request.

use restex_http_client::{HttpError, HttpResponse, Outcome};
use serde_json::Value;

/// Render a settled outcome as display text
pub fn render_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Success(response) => render_success(response),
        Outcome::Failure(err) => render_failure(err),
        Outcome::Cancelled(reason) => format!("Cancelled: {}\n", reason),
    }
}

/// Success renders exactly four sections, in this order
fn render_success(response: &HttpResponse) -> String {
    let mut out = String::new();
    out.push_str(&format!("Status: {}\n", response.status()));
    out.push_str(&section("Headers", &to_value(response.headers())));
    out.push_str(&section("Body", response.body()));
    out.push_str(&section("Config", &to_value(response.request())));
    out
}

fn render_failure(err: &HttpError) -> String {
    match err {
        HttpError::Status {
            status,
            headers,
            body,
        } => {
            let mut out = String::new();
            out.push_str(&format!("Error: server responded {}\n", status));
            out.push_str(&section("Headers", &to_value(headers)));
            out.push_str(&section("Body", body));
            out
        }
        HttpError::NoResponse { request, detail } => {
            let mut out = String::new();
            out.push_str(&format!("Error: no response received ({})\n", detail));
            out.push_str(&section("Request", &to_value(request)));
            out
        }
        other => format!("Error: {}\n", other),
    }
}

fn section(title: &str, value: &Value) -> String {
    format!("\n{}:\n{}\n", title, pretty(value))
}

fn to_value<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
