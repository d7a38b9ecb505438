use {
    leadflow_channels::{Error, Result},
    reqwest::{Client, RequestBuilder},
    serde::Serialize,
};

/// Longest response excerpt kept in a rejection detail.
const DETAIL_LIMIT: usize = 200;

/// POST `body` as JSON and map the response onto a channel result.
pub(crate) async fn post_json<B: Serialize + ?Sized>(
    http: &Client,
    url: &str,
    bearer: Option<&str>,
    body: &B,
) -> Result<()> {
    let mut request: RequestBuilder = http.post(url).json(body);
    if let Some(key) = bearer {
        request = request.bearer_auth(key);
    }

    // Webhook URLs embed their secret in the path.
    let resp = request
        .send()
        .await
        .map_err(|e| Error::network("webhook POST", e.without_url()))?;

    let status = resp.status();
    if status.is_success() {
        return Ok(());
    }
    let body = resp.text().await.unwrap_or_default();
    let detail: String = body.trim().chars().take(DETAIL_LIMIT).collect();
    Err(Error::rejected(Some(status.as_u16()), detail))
}
