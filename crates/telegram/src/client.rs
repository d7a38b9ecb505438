use {
    leadflow_channels::ParseMode,
    reqwest::{Client, RequestBuilder},
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize, de::DeserializeOwned},
    tracing::debug,
};

use crate::error::{Error, Result};

/// Identity of the bot, as returned by `getMe`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotUser {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<ParseMode>,
}

/// Every bot API response is wrapped in this envelope.
#[derive(Debug, Deserialize)]
struct ApiReply<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

/// Minimal Bot API client. Cheap to build per call; the `reqwest::Client`
/// carries the connection pool and timeout.
#[derive(Clone)]
pub struct BotApiClient {
    http: Client,
    api_base: String,
    token: Secret<String>,
}

impl std::fmt::Debug for BotApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotApiClient")
            .field("api_base", &self.api_base)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl BotApiClient {
    pub fn new(http: Client, api_base: impl Into<String>, token: Secret<String>) -> Self {
        let api_base: String = api_base.into();
        Self {
            http,
            api_base: api_base.trim_end_matches('/').to_owned(),
            token,
        }
    }

    /// Client for the configured bot, or `None` when no usable token is set.
    pub fn from_config(http: Client, config: &leadflow_config::TelegramConfig) -> Option<Self> {
        let token = leadflow_config::meaningful(
            config.bot_token.as_ref().map(|t| t.expose_secret().as_str()),
        )?;
        Some(Self::new(
            http,
            config.api_base.clone(),
            Secret::new(token.to_owned()),
        ))
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_base, self.token.expose_secret())
    }

    /// Send a text message to `chat_id`. Without a parse mode the text is
    /// shown verbatim, so `<` and `&` need no escaping.
    pub async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        parse_mode: Option<ParseMode>,
    ) -> Result<()> {
        let body = SendMessageRequest {
            chat_id,
            text,
            parse_mode,
        };
        let request = self.http.post(self.method_url("sendMessage")).json(&body);
        self.call::<serde_json::Value>("sendMessage", request).await?;
        debug!(chat_id, "bot API message sent");
        Ok(())
    }

    /// Fetch the bot identity; doubles as a credential check.
    pub async fn get_me(&self) -> Result<BotUser> {
        let request = self.http.get(self.method_url("getMe"));
        self.call("getMe", request)
            .await?
            .ok_or_else(|| Error::Api {
                method: "getMe".into(),
                status: None,
                description: "missing result".into(),
            })
    }

    /// Fetch pending updates (messages users sent to the bot), starting at `offset`.
    pub async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<serde_json::Value>> {
        let request = self
            .http
            .get(self.method_url("getUpdates"))
            .query(&[("offset", offset.unwrap_or(0))]);
        Ok(self.call("getUpdates", request).await?.unwrap_or_default())
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        request: RequestBuilder,
    ) -> Result<Option<T>> {
        // Errors carry the request URL, which embeds the token.
        let resp = request.send().await.map_err(|e| Error::Http(e.without_url()))?;
        let status = resp.status();
        let http_status = (!status.is_success()).then_some(status.as_u16());
        let bytes = resp.bytes().await.map_err(|e| Error::Http(e.without_url()))?;

        let reply: ApiReply<T> =
            serde_json::from_slice(&bytes).map_err(|source| Error::Decode {
                method: method.into(),
                status: http_status,
                source,
            })?;

        if reply.ok && http_status.is_none() {
            Ok(reply.result)
        } else {
            Err(Error::Api {
                method: method.into(),
                status: http_status,
                description: reply.description.unwrap_or_else(|| "ok=false".into()),
            })
        }
    }
}

/// Deep link to the bot chat, e.g. `https://t.me/HairyPet_bot`.
#[must_use]
pub fn bot_link(username: &str) -> Option<String> {
    let name = username.trim().trim_start_matches('@');
    (!name.is_empty()).then(|| format!("https://t.me/{name}"))
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    #[rstest]
    #[case("@HairyPet_bot", Some("https://t.me/HairyPet_bot"))]
    #[case("HairyPet_bot", Some("https://t.me/HairyPet_bot"))]
    #[case("  ", None)]
    #[case("@", None)]
    fn deep_links(#[case] username: &str, #[case] expected: Option<&str>) {
        assert_eq!(bot_link(username).as_deref(), expected);
    }

    #[test]
    fn debug_hides_token() {
        let client = BotApiClient::new(
            Client::new(),
            "https://api.telegram.org/",
            Secret::new("123:SECRET".into()),
        );
        assert!(!format!("{client:?}").contains("SECRET"));
        assert_eq!(
            client.method_url("getMe"),
            "https://api.telegram.org/bot123:SECRET/getMe"
        );
    }

    #[test]
    fn from_config_requires_token() {
        let mut cfg = leadflow_config::TelegramConfig::default();
        assert!(BotApiClient::from_config(Client::new(), &cfg).is_none());
        cfg.bot_token = Some(Secret::new("${LEADFLOW_TELEGRAM_BOT_TOKEN}".into()));
        assert!(BotApiClient::from_config(Client::new(), &cfg).is_none());
        cfg.bot_token = Some(Secret::new("1:A".into()));
        assert!(BotApiClient::from_config(Client::new(), &cfg).is_some());
    }
}
