//! `LEADFLOW_*` environment overrides and placeholder detection.

use {secrecy::Secret, tracing::warn};

use crate::schema::LeadflowConfig;

pub const TELEGRAM_BOT_TOKEN: &str = "LEADFLOW_TELEGRAM_BOT_TOKEN";
pub const TELEGRAM_BOT_USERNAME: &str = "LEADFLOW_TELEGRAM_BOT_USERNAME";
pub const TELEGRAM_CHAT_ID: &str = "LEADFLOW_TELEGRAM_CHAT_ID";
pub const TELEGRAM_API_BASE: &str = "LEADFLOW_TELEGRAM_API_BASE";
pub const DISCORD_WEBHOOK_URL: &str = "LEADFLOW_DISCORD_WEBHOOK_URL";
pub const AUTOMATION_WEBHOOK_URL: &str = "LEADFLOW_AUTOMATION_WEBHOOK_URL";
pub const AUTOMATION_API_KEY: &str = "LEADFLOW_AUTOMATION_API_KEY";
pub const HTTP_TIMEOUT_SECS: &str = "LEADFLOW_HTTP_TIMEOUT_SECS";
pub const BIND: &str = "LEADFLOW_BIND";
/// Port of the utility server; the unprefixed name is kept for existing deployments.
pub const UTILS_PORT: &str = "UTILS_PORT";
pub const PUBLIC_URL: &str = "LEADFLOW_PUBLIC_URL";

/// Return the trimmed value if it carries real content.
///
/// Empty strings, whitespace, unresolved `${VAR}` placeholders and
/// `<angle-bracket>` placeholders count as missing.
#[must_use]
pub fn meaningful(value: Option<&str>) -> Option<&str> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    if value.contains("${") {
        return None;
    }
    if value.starts_with('<') && value.ends_with('>') {
        return None;
    }
    Some(value)
}

/// Overlay `LEADFLOW_*` variables from the process environment.
pub fn apply_env_overrides(config: &mut LeadflowConfig) {
    apply_env_overrides_with(config, |name| std::env::var(name).ok());
}

/// Overlay environment variables resolved through `lookup`.
///
/// Only meaningful values override; a blank variable never erases a value from
/// the config file.
pub fn apply_env_overrides_with(
    config: &mut LeadflowConfig,
    lookup: impl Fn(&str) -> Option<String>,
) {
    let get = |name: &str| {
        let raw = lookup(name)?;
        meaningful(Some(&raw)).map(str::to_owned)
    };

    if let Some(token) = get(TELEGRAM_BOT_TOKEN) {
        config.telegram.bot_token = Some(Secret::new(token));
    }
    if let Some(username) = get(TELEGRAM_BOT_USERNAME) {
        config.telegram.bot_username = Some(username);
    }
    if let Some(chat_id) = get(TELEGRAM_CHAT_ID) {
        config.telegram.chat_id = Some(chat_id);
    }
    if let Some(api_base) = get(TELEGRAM_API_BASE) {
        config.telegram.api_base = api_base;
    }
    if let Some(url) = get(DISCORD_WEBHOOK_URL) {
        config.discord.webhook_url = Some(url);
    }
    if let Some(url) = get(AUTOMATION_WEBHOOK_URL) {
        config.automation.webhook_url = Some(url);
    }
    if let Some(key) = get(AUTOMATION_API_KEY) {
        config.automation.api_key = Some(Secret::new(key));
    }
    if let Some(raw) = get(HTTP_TIMEOUT_SECS) {
        match raw.parse::<u64>() {
            Ok(secs) if secs > 0 => config.http.timeout_secs = secs,
            _ => warn!(var = HTTP_TIMEOUT_SECS, value = %raw, "ignoring invalid timeout"),
        }
    }
    if let Some(bind) = get(BIND) {
        config.server.set_bind(&bind);
    }
    if let Some(raw) = get(UTILS_PORT) {
        match raw.parse::<u16>() {
            Ok(port) => config.server.port = port,
            Err(_) => warn!(var = UTILS_PORT, value = %raw, "ignoring invalid port"),
        }
    }
    if let Some(url) = get(PUBLIC_URL) {
        config.server.public_url = Some(url);
    }
}
