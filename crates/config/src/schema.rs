//! Config schema types (channels, outbound HTTP, utility server).
use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
    std::net::SocketAddr,
};

/// Default bot API base URL.
pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Default outbound request timeout in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadflowConfig {
    pub telegram: TelegramConfig,
    pub discord: DiscordConfig,
    pub automation: AutomationConfig,
    pub http: HttpConfig,
    pub server: ServerConfig,
}

/// Bot API channel settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Bot token issued by @BotFather.
    #[serde(
        serialize_with = "serialize_option_secret",
        skip_serializing_if = "Option::is_none"
    )]
    pub bot_token: Option<Secret<String>>,
    /// Public bot username, with or without the leading `@`.
    pub bot_username: Option<String>,
    /// Chat that receives operator notifications.
    pub chat_id: Option<String>,
    /// Bot API base URL, overridable for tests and self-hosted API servers.
    pub api_base: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            bot_username: None,
            chat_id: None,
            api_base: DEFAULT_TELEGRAM_API_BASE.into(),
        }
    }
}

/// Embed webhook channel settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    pub webhook_url: Option<String>,
}

/// Workflow-automation webhook settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomationConfig {
    pub webhook_url: Option<String>,
    /// Sent as `Authorization: Bearer <key>` when present.
    #[serde(
        serialize_with = "serialize_option_secret",
        skip_serializing_if = "Option::is_none"
    )]
    pub api_key: Option<Secret<String>>,
}

/// Outbound HTTP settings shared by every transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

/// Utility server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to, without a port. Defaults to "0.0.0.0".
    pub bind: String,
    /// Port to listen on. Defaults to 8080.
    pub port: u16,
    /// Name reported by `GET /status`.
    pub service_name: String,
    /// Public URL reported by `GET /status`, if any.
    pub public_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 8080,
            service_name: "Hairy Utils".into(),
            public_url: None,
        }
    }
}

impl ServerConfig {
    /// Set the bind host from `host` or `host:port`. A port suffix also
    /// replaces [`ServerConfig::port`].
    pub fn set_bind(&mut self, value: &str) {
        let value = value.trim();
        if let Ok(addr) = value.parse::<SocketAddr>() {
            self.bind = addr.ip().to_string();
            self.port = addr.port();
            return;
        }
        match value.rsplit_once(':') {
            // A bare IPv6 host has more than one colon and no port.
            Some((host, port)) if !host.contains(':') && !host.is_empty() => {
                if let Ok(port) = port.parse::<u16>() {
                    self.bind = host.to_owned();
                    self.port = port;
                    return;
                }
                self.bind = value.to_owned();
            },
            _ => self.bind = value.to_owned(),
        }
    }
}

fn serialize_option_secret<S: serde::Serializer>(
    secret: &Option<Secret<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(s) => serializer.serialize_some(s.expose_secret()),
        None => serializer.serialize_none(),
    }
}
