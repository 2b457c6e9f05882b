//! Utility functions and helpers.

pub mod http;

use url::Url;

use crate::error::Result;

/// Build the URL of a Bot API method: `<base>/bot<token>/<method>`.
pub fn bot_method_url(api_base: &str, token: &str, method: &str) -> Result<Url> {
    let base = Url::parse(api_base.trim_end_matches('/'))?;
    Ok(base.join(&format!("/bot{token}/{method}"))?)
}

/// Current Unix time in seconds.
pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}
