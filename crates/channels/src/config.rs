use {
    leadflow_config::meaningful,
    secrecy::{ExposeSecret, Secret},
    serde::Serialize,
    std::fmt,
};

/// Delivery mechanism of a channel.
///
/// Both webhook kinds are plain HTTPS POSTs; they differ in payload shape and
/// auth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChannelKind {
    /// Bot API `sendMessage` to a fixed chat.
    BotApi,
    /// Chat webhook taking `{"embeds": [...]}`.
    EmbedWebhook,
    /// Workflow-automation webhook taking `{event, data, timestamp}`.
    AutomationWebhook,
}

impl ChannelKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BotApi => "bot-api",
            Self::EmbedWebhook => "embed-webhook",
            Self::AutomationWebhook => "automation-webhook",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One configured delivery channel. Immutable after construction.
#[derive(Clone)]
pub struct ChannelConfig {
    /// Registry key, e.g. `"telegram"`.
    pub name: String,
    pub kind: ChannelKind,
    /// Webhook URL, or the bot API base URL for [`ChannelKind::BotApi`].
    pub endpoint: Option<String>,
    /// Bot token or bearer key.
    pub credential: Option<Secret<String>>,
    /// Target chat for [`ChannelKind::BotApi`].
    pub recipient: Option<String>,
    /// Why the channel is disabled, `None` when enabled.
    disabled_reason: Option<String>,
}

impl fmt::Debug for ChannelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelConfig")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("endpoint", &self.endpoint)
            .field("credential", &self.credential.as_ref().map(|_| "[REDACTED]"))
            .field("recipient", &self.recipient)
            .field("disabled_reason", &self.disabled_reason)
            .finish()
    }
}

impl ChannelConfig {
    /// Bot API channel; enabled iff base URL, token and chat id are all present.
    pub fn bot_api(
        name: impl Into<String>,
        api_base: Option<&str>,
        token: Option<&str>,
        chat_id: Option<&str>,
    ) -> Self {
        let endpoint = meaningful(api_base).map(|b| b.trim_end_matches('/').to_owned());
        let token = meaningful(token);
        let chat_id = meaningful(chat_id);

        let mut missing = Vec::new();
        match endpoint.as_deref() {
            None => missing.push("api base URL"),
            Some(base) if !is_http_url(base) => missing.push("valid api base URL"),
            Some(_) => {},
        }
        if token.is_none() {
            missing.push("bot token");
        }
        if chat_id.is_none() {
            missing.push("chat id");
        }

        Self {
            name: name.into(),
            kind: ChannelKind::BotApi,
            endpoint,
            credential: token.map(|t| Secret::new(t.to_owned())),
            recipient: chat_id.map(str::to_owned),
            disabled_reason: missing_reason(&missing),
        }
    }

    /// Embed webhook channel; enabled iff the URL is a usable http(s) URL.
    pub fn embed_webhook(name: impl Into<String>, url: Option<&str>) -> Self {
        Self::webhook(name.into(), ChannelKind::EmbedWebhook, url, None)
    }

    /// Automation webhook channel; the bearer key is optional.
    pub fn automation_webhook(
        name: impl Into<String>,
        url: Option<&str>,
        api_key: Option<&str>,
    ) -> Self {
        Self::webhook(name.into(), ChannelKind::AutomationWebhook, url, api_key)
    }

    fn webhook(name: String, kind: ChannelKind, url: Option<&str>, key: Option<&str>) -> Self {
        let endpoint = meaningful(url).map(str::to_owned);
        let disabled_reason = match endpoint.as_deref() {
            None => Some("missing webhook URL".to_owned()),
            Some(url) if !is_http_url(url) => Some("invalid webhook URL".to_owned()),
            Some(_) => None,
        };
        Self {
            name,
            kind,
            endpoint,
            credential: meaningful(key).map(|k| Secret::new(k.to_owned())),
            recipient: None,
            disabled_reason,
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.disabled_reason.is_none()
    }

    #[must_use]
    pub fn disabled_reason(&self) -> Option<&str> {
        self.disabled_reason.as_deref()
    }

    /// Endpoint, credential and recipient of an enabled channel.
    ///
    /// Returns [`crate::Error::NotConfigured`] for disabled channels, so a
    /// transport can short-circuit before touching the network.
    pub fn ensure_enabled(&self) -> crate::Result<EnabledChannel<'_>> {
        match (&self.disabled_reason, &self.endpoint) {
            (None, Some(endpoint)) => Ok(EnabledChannel {
                endpoint,
                credential: self.credential.as_ref().map(|c| c.expose_secret().as_str()),
                recipient: self.recipient.as_deref(),
            }),
            _ => Err(crate::Error::not_configured(&self.name)),
        }
    }
}

/// Borrowed view of an enabled channel's connection details.
#[derive(Debug, Clone, Copy)]
pub struct EnabledChannel<'a> {
    pub endpoint: &'a str,
    pub credential: Option<&'a str>,
    pub recipient: Option<&'a str>,
}

fn missing_reason(missing: &[&str]) -> Option<String> {
    (!missing.is_empty()).then(|| format!("missing {}", missing.join(", ")))
}

fn is_http_url(raw: &str) -> bool {
    url::Url::parse(raw).is_ok_and(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
}
