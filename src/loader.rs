//! Config loading: YAML parsing, `!include` resolution, profile merging.
//!
//! Loading happens in stages on the raw YAML value tree, and only the final
//! tree is deserialized into typed [`Config`] records:
//!
//! 1. parse the file,
//! 2. inline every `!include path` node, resolved relative to the file that
//!    contains it,
//! 3. expand `${NAME}` placeholders in string scalars,
//! 4. optionally merge a global profile underneath the main config,
//! 5. deserialize.
//!
//! ```yaml
//! profile: Default
//! tabs:
//!   servers: !include tabs/servers.yml
//! ```

use std::path::{Path, PathBuf};

use serde_yaml_ng::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::{Result, TermweaveError};
use crate::interpolate;

/// Config file looked for in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG: &str = "termweave.yml";

/// Default config path: `termweave.yml` in the current directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG)
}

/// Load a config file into typed records.
pub fn load_config(path: &Path) -> Result<Config> {
    into_config(load_value(path)?)
}

/// Load a config file into a raw YAML value, with includes inlined and
/// environment placeholders expanded.
pub fn load_value(path: &Path) -> Result<Value> {
    if !path.is_file() {
        return Err(TermweaveError::ConfigNotFound(path.to_path_buf()));
    }

    let contents = std::fs::read_to_string(path)?;
    let value: Value = serde_yaml_ng::from_str(&contents)?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let value = resolve_includes(value, base_dir)?;

    debug!("loaded config from {}", path.display());
    Ok(interpolate::expand_value(value))
}

/// Deserialize a resolved YAML value into [`Config`].
pub fn into_config(value: Value) -> Result<Config> {
    Ok(serde_yaml_ng::from_value(value)?)
}

/// Inline every `!include` node in a value tree.
///
/// Relative include paths resolve against the directory of the file that
/// references them, so nested includes each carry their own base.
fn resolve_includes(value: Value, base_dir: &Path) -> Result<Value> {
    match value {
        Value::Tagged(tagged) if tagged.tag == "!include" => {
            let Value::String(target) = tagged.value else {
                return Err(TermweaveError::InvalidInclude);
            };
            let target = if Path::new(&target).is_absolute() {
                PathBuf::from(target)
            } else {
                base_dir.join(target)
            };
            if !target.is_file() {
                return Err(TermweaveError::IncludeNotFound(target));
            }

            debug!("inlining include {}", target.display());
            let contents = std::fs::read_to_string(&target)?;
            let nested: Value = serde_yaml_ng::from_str(&contents)?;
            let nested_dir = target.parent().unwrap_or_else(|| Path::new("."));
            resolve_includes(nested, nested_dir)
        }
        Value::Sequence(seq) => Ok(Value::Sequence(
            seq.into_iter()
                .map(|v| resolve_includes(v, base_dir))
                .collect::<Result<_>>()?,
        )),
        Value::Mapping(map) => Ok(Value::Mapping(
            map.into_iter()
                .map(|(k, v)| Ok((k, resolve_includes(v, base_dir)?)))
                .collect::<Result<_>>()?,
        )),
        other => Ok(other),
    }
}

/// Merge a global profile underneath the main config.
///
/// Top-level keys missing from the main config are copied from the profile;
/// keys that are mappings on both sides are merged one level deep with the
/// main config winning. Everything else keeps the main config's value.
pub fn merge_profile(main: Value, profile: Value) -> Value {
    let mut main = match main {
        Value::Mapping(map) => map,
        other => return other,
    };
    let profile = match profile {
        Value::Mapping(map) => map,
        _ => return Value::Mapping(main),
    };

    for (key, profile_value) in profile {
        if !main.contains_key(&key) {
            main.insert(key, profile_value);
            continue;
        }
        if let (Some(Value::Mapping(existing)), Value::Mapping(profile_map)) =
            (main.get_mut(&key), profile_value)
        {
            for (inner_key, inner_value) in profile_map {
                if !existing.contains_key(&inner_key) {
                    existing.insert(inner_key, inner_value);
                }
            }
        }
    }

    Value::Mapping(main)
}
