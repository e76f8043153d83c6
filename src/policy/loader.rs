use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use crate::domain::RulesConfig;
use crate::rules::RuleSet;

/// Errors that can occur while reading a rules configuration.
///
/// These never escape to compliance callers; loading degrades to the
/// default rule set instead.
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read a rules configuration, format chosen by file extension
/// (`.yml`/`.yaml` parse as YAML, anything else as JSON).
pub fn read_rules_config(path: impl AsRef<Path>) -> Result<RulesConfig, PolicyError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yml") | Some("yaml")
    );

    let config = if is_yaml {
        serde_yaml::from_str(&content)?
    } else {
        serde_json::from_str(&content)?
    };

    Ok(config)
}

/// Load a rules configuration, degrading to None on any failure.
///
/// A missing or malformed file is an expected condition (the caller
/// falls back to `RuleSet::default_set()`), so it is logged and
/// swallowed rather than surfaced.
pub fn load_rules_config(path: impl AsRef<Path>) -> Option<RulesConfig> {
    let path = path.as_ref();
    match read_rules_config(path) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Rules config unavailable, using defaults");
            None
        }
    }
}

/// Resolve the configuration for one compliance run.
///
/// Precedence: client policy overlay (when a client is given and an
/// overlay applies), then the rules config file. None means no source
/// produced a configuration and the default set applies. Resolution
/// happens fresh per run; nothing is cached.
pub fn resolve_rules_config(
    rules_path: Option<&Path>,
    policy_dir: Option<&Path>,
    client_id: Option<&str>,
) -> Option<RulesConfig> {
    if let (Some(dir), Some(client)) = (policy_dir, client_id) {
        if let Some(cfg) = super::overlay::load_for_client(dir, Some(client)) {
            return Some(cfg);
        }
    }

    rules_path.and_then(load_rules_config)
}

/// Resolve the active rule set for one compliance run, falling back
/// to the built-in default set when no configuration source loads.
pub fn effective_ruleset(
    rules_path: Option<&Path>,
    policy_dir: Option<&Path>,
    client_id: Option<&str>,
) -> RuleSet {
    match resolve_rules_config(rules_path, policy_dir, client_id) {
        Some(cfg) => RuleSet::from_config(&cfg),
        None => RuleSet::default_set(),
    }
}
