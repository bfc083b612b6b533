use crate::shared::Result;
use std::time::Duration;

/// Longest response body kept in an error, in characters
const MAX_ERROR_BODY_CHARS: usize = 2000;

/// Builds the single HTTP client shared by both systems.
///
/// `reqwest::Client` pools connections internally and is cheap to clone,
/// so every adapter and every concurrent task uses clones of this one.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    let version = env!("CARGO_PKG_VERSION");
    let user_agent = format!("dtrack-dojo-sync/{}", version);
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Removes trailing slashes so paths can be appended with `format!`.
pub(crate) fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Extracts status and (truncated) body from a failed response
pub(crate) async fn failure_parts(response: reqwest::Response) -> (u16, String) {
    let status = response.status().as_u16();
    let body = match response.text().await {
        Ok(text) => truncate_body(&text),
        Err(e) => format!("<unreadable response body: {}>", e),
    };
    (status, body)
}

pub(crate) fn truncate_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_ERROR_BODY_CHARS {
        return trimmed.to_string();
    }
    let mut truncated: String = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
    truncated.push_str("… (truncated)");
    truncated
}
