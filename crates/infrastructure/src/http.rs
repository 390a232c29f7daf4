//! Shared HTTP response checks for the remote-service clients.

use domain::SyncError;
use reqwest::{Response, StatusCode};

/// Check a response for the common error conditions.
///
/// Returns the response unchanged on success. A 429, or a 403 with an
/// exhausted `x-ratelimit-remaining` quota, maps to the distinguished
/// rate-limit error; any other non-success status maps to a generic host
/// error carrying the response body for diagnosis.
pub async fn check_response(context: &str, resp: Response) -> Result<Response, SyncError> {
    let status = resp.status();

    if status == StatusCode::TOO_MANY_REQUESTS
        || (status == StatusCode::FORBIDDEN && rate_limit_exhausted(&resp))
    {
        return Err(SyncError::RateLimit {
            message: format!("[{context}] {status}"),
        });
    }

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(SyncError::Host {
            context: context.to_string(),
            message: format!("{status}: {body}"),
        });
    }

    Ok(resp)
}

fn rate_limit_exhausted(resp: &Response) -> bool {
    resp.headers()
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "0")
}

/// Map a transport-level failure (connect, timeout, body read) to a host
/// error with context.
pub fn transport_error(context: &str, err: reqwest::Error) -> SyncError {
    SyncError::Host {
        context: context.to_string(),
        message: err.to_string(),
    }
}
