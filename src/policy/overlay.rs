use serde_yaml::Value;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::domain::RulesConfig;

/// Recursively merge `overlay` into `base`. Nested mappings merge
/// key-by-key; everything else is replaced, overlay wins.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match overlay {
        Value::Mapping(overlay_map) => {
            if let Value::Mapping(base_map) = base {
                for (key, value) in overlay_map {
                    match base_map.get_mut(&key) {
                        Some(existing) if existing.is_mapping() && value.is_mapping() => {
                            deep_merge(existing, value);
                        }
                        _ => {
                            base_map.insert(key, value);
                        }
                    }
                }
            } else {
                *base = Value::Mapping(overlay_map);
            }
        }
        other => *base = other,
    }
}

/// Load a YAML mapping, treating anything else (missing file, parse
/// failure, non-mapping document) as absent.
fn load_yaml_mapping(path: &Path) -> Option<Value> {
    let content = fs::read_to_string(path).ok()?;
    match serde_yaml::from_str::<Value>(&content) {
        Ok(value) if value.is_mapping() => Some(value),
        Ok(_) => None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Skipping unparseable policy file");
            None
        }
    }
}

/// Does this overlay document claim the given client?
///
/// Overlays declare their audience via `applies_if.client_id_in`;
/// comparison is trimmed and case-insensitive.
fn applies_to(overlay: &Value, client_id: &str) -> bool {
    let client = client_id.trim().to_uppercase();
    overlay
        .get("applies_if")
        .and_then(|a| a.get("client_id_in"))
        .and_then(Value::as_sequence)
        .map(|ids| {
            ids.iter()
                .filter_map(Value::as_str)
                .any(|id| id.trim().to_uppercase() == client)
        })
        .unwrap_or(false)
}

/// Load the effective rules configuration for a client.
///
/// Starts from `_base.yml` in the policy directory, then merges every
/// overlay file (lexicographic order, for determinism) whose
/// `applies_if` list names the client. Returns None when nothing
/// loads, so the caller can fall through to the next config source.
pub fn load_for_client(dir: &Path, client_id: Option<&str>) -> Option<RulesConfig> {
    let mut merged = load_yaml_mapping(&dir.join("_base.yml"));

    if let Some(client) = client_id {
        let mut overlay_paths: Vec<_> = fs::read_dir(dir)
            .into_iter()
            .flatten()
            .flatten()
            .map(|e| e.path())
            .filter(|p| {
                matches!(p.extension().and_then(|e| e.to_str()), Some("yml") | Some("yaml"))
                    && p.file_name().and_then(|n| n.to_str()) != Some("_base.yml")
            })
            .collect();
        overlay_paths.sort();

        for path in overlay_paths {
            let Some(overlay) = load_yaml_mapping(&path) else {
                continue;
            };
            if !applies_to(&overlay, client) {
                continue;
            }
            match &mut merged {
                Some(base) => deep_merge(base, overlay),
                None => merged = Some(overlay),
            }
        }
    }

    let value = merged?;
    match serde_yaml::from_value(value) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "Merged policy did not parse as rules config");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_file(dir: &Path, name: &str, content: &str) {
        let mut f = fs::File::create(dir.join(name)).unwrap();
        write!(f, "{content}").unwrap();
    }

    #[test]
    fn test_deep_merge_nested_maps() {
        let mut base: Value = serde_yaml::from_str(
            r#"
rules:
  daily_hours_cap:
    max_hours: 12.0
  travel_time:
    enabled: true
"#,
        )
        .unwrap();
        let overlay: Value = serde_yaml::from_str(
            r#"
rules:
  daily_hours_cap:
    max_hours: 8.0
"#,
        )
        .unwrap();

        deep_merge(&mut base, overlay);

        let cap = &base["rules"]["daily_hours_cap"]["max_hours"];
        assert_eq!(cap.as_f64(), Some(8.0));
        // Untouched siblings survive the merge
        assert_eq!(base["rules"]["travel_time"]["enabled"].as_bool(), Some(true));
    }

    #[test]
    fn test_overlay_applies_by_client_id() {
        let dir = tempdir().unwrap();
        write_file(
            dir.path(),
            "_base.yml",
            "rules:\n  daily_hours_cap:\n    max_hours: 12.0\n",
        );
        write_file(
            dir.path(),
            "endurance.yml",
            "applies_if:\n  client_id_in: [\"ACME\"]\nrules:\n  daily_hours_cap:\n    max_hours: 8.0\n",
        );

        let config = load_for_client(dir.path(), Some("acme")).unwrap();
        assert_eq!(config.rules.daily_hours_cap.max_hours, Some(8.0));

        let config = load_for_client(dir.path(), Some("OTHER")).unwrap();
        assert_eq!(config.rules.daily_hours_cap.max_hours, Some(12.0));
    }

    #[test]
    fn test_no_client_returns_base_only() {
        let dir = tempdir().unwrap();
        write_file(
            dir.path(),
            "_base.yml",
            "rules:\n  description_length:\n    min_chars: 30\n",
        );
        write_file(
            dir.path(),
            "strict.yml",
            "applies_if:\n  client_id_in: [\"ACME\"]\nrules:\n  description_length:\n    min_chars: 50\n",
        );

        let config = load_for_client(dir.path(), None).unwrap();
        assert_eq!(config.rules.description_length.min_chars, Some(30));
    }

    #[test]
    fn test_empty_dir_returns_none() {
        let dir = tempdir().unwrap();
        assert!(load_for_client(dir.path(), Some("ACME")).is_none());
    }

    #[test]
    fn test_overlay_without_base() {
        let dir = tempdir().unwrap();
        write_file(
            dir.path(),
            "strict.yml",
            "applies_if:\n  client_id_in: [\"ACME\"]\nrules:\n  daily_hours_cap:\n    max_hours: 6.0\n",
        );

        let config = load_for_client(dir.path(), Some("ACME")).unwrap();
        assert_eq!(config.rules.daily_hours_cap.max_hours, Some(6.0));
    }
}
