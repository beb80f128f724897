//! HTTP client factory for the provider APIs

use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the `reqwest::Client` shared by the model catalogs.
pub fn build_http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .user_agent(concat!("promptdeck/", env!("CARGO_PKG_VERSION")))
        .build()
}
