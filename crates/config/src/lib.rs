//! Configuration loading, env substitution, and env-var overrides.
//!
//! Config file: `leadflow.toml` or `leadflow.json`, searched in `./` then
//! `~/.config/leadflow/`. The file is optional; every setting can come from
//! `LEADFLOW_*` environment variables, which take precedence.
//!
//! Supports `${ENV_VAR}` substitution in all string values. Secrets never have
//! built-in defaults: a missing token or URL stays `None` and the matching
//! channel is reported as not configured.

pub mod env;
pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;

pub use {
    env::{apply_env_overrides, apply_env_overrides_with, meaningful},
    error::{Error, Result},
    loader::{config_dir, load, load_config},
    schema::{
        AutomationConfig, DiscordConfig, HttpConfig, LeadflowConfig, ServerConfig, TelegramConfig,
    },
};
