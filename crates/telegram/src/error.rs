use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The request never got a response (connect, TLS, timeout).
    #[error("bot API request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered `ok: false`, or with a non-success HTTP status.
    #[error("bot API rejected {method}{}: {description}", status_suffix(.status))]
    Api {
        method: String,
        status: Option<u16>,
        description: String,
    },

    /// The response body was not the expected JSON.
    #[error("malformed bot API response for {method}: {source}")]
    Decode {
        method: String,
        status: Option<u16>,
        #[source]
        source: serde_json::Error,
    },
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

impl From<Error> for leadflow_channels::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Http(e) => Self::network("bot API request", e),
            Error::Api {
                status,
                description,
                ..
            } => Self::rejected(status, description),
            Error::Decode { status, source, .. } => Self::rejected(status, source.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
