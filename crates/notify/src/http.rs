use {leadflow_config::HttpConfig, std::time::Duration};

use crate::error::Result;

/// Shared outbound client: one connection pool, bounded per-request timeout.
pub fn build_client(config: &HttpConfig) -> Result<reqwest::Client> {
    let timeout = Duration::from_secs(config.timeout_secs.max(1));
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .user_agent(concat!("leadflow/", env!("CARGO_PKG_VERSION")))
        .build()?)
}
