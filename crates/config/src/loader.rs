use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{
    env::apply_env_overrides,
    env_subst::expand_env,
    error::{Error, Result},
    schema::LeadflowConfig,
};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["leadflow.toml", "leadflow.json"];

/// Load config from the given path (TOML or JSON) with `${VAR}` substitution.
pub fn load_config(path: &Path) -> Result<LeadflowConfig> {
    let raw = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let expanded = expand_env(&raw);
    for var in &expanded.unresolved {
        warn!(
            path = %path.display(),
            var = %var,
            "config references an unset variable; settings using it stay disabled"
        );
    }
    parse_config(&expanded.text, path)
}

/// Load the effective configuration.
///
/// With an explicit `path` the file must load; otherwise standard locations
/// are searched and a broken file falls back to defaults. Environment
/// overrides are applied last in both cases.
pub fn load(path: Option<&Path>) -> Result<LeadflowConfig> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => discover(),
    };
    // Files may spell the bind address as `host:port`.
    let bind = std::mem::take(&mut config.server.bind);
    config.server.set_bind(&bind);
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Search `./leadflow.{toml,json}`, then `~/.config/leadflow/`. A missing or
/// broken file yields the defaults.
fn discover() -> LeadflowConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    LeadflowConfig::default()
}

/// Find the first config file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    let dir = config_dir()?;
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

/// Returns the user-global config directory (`~/.config/leadflow/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "leadflow").map(|d| d.config_dir().to_path_buf())
}

fn parse_config(raw: &str, path: &Path) -> Result<LeadflowConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => toml::from_str(raw).map_err(|e| Error::toml(path, e)),
        "json" => serde_json::from_str(raw).map_err(|e| Error::json(path, e)),
        _ => Err(Error::UnsupportedFormat { ext: ext.into() }),
    }
}
