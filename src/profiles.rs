//! Global profile store.
//!
//! Saved configurations live as `<name>.yml` under `~/.termweave/profiles`
//! and can be pulled in on any run with `--profile <name>`. Listing reads
//! the optional `metadata` block for a display name and description.

use std::path::{Path, PathBuf};

use serde_yaml_ng::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::{Result, TermweaveError};
use crate::loader;

/// A directory of saved profile configs.
pub struct ProfileStore {
    dir: PathBuf,
}

/// One saved profile, as shown by `--list-global`.
#[derive(Debug, PartialEq)]
pub struct ProfileEntry {
    /// File stem, the name used with `--profile`.
    pub name: String,
    /// `metadata.name` when present, otherwise the file stem.
    pub display_name: String,
    pub description: Option<String>,
}

impl ProfileStore {
    /// The default store at `~/.termweave/profiles`.
    pub fn open_default() -> Result<Self> {
        let home = dirs::home_dir().ok_or(TermweaveError::NoHomeDir)?;
        Ok(Self::at(home.join(".termweave").join("profiles")))
    }

    pub fn at(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Profile names are file stems, so they are restricted to
    /// `[A-Za-z0-9_-]`.
    pub fn validate_name(name: &str) -> Result<()> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if valid {
            Ok(())
        } else {
            Err(TermweaveError::InvalidProfileName(name.to_string()))
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.yml"))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path(name).is_file()
    }

    /// Copy a config file into the store under the given name.
    /// Overwrite confirmation is the caller's concern.
    pub fn save(&self, config_path: &Path, name: &str) -> Result<()> {
        Self::validate_name(name)?;
        if !config_path.is_file() {
            return Err(TermweaveError::ConfigNotFound(config_path.to_path_buf()));
        }

        std::fs::create_dir_all(&self.dir)?;
        std::fs::copy(config_path, self.path(name))?;
        debug!("saved profile '{name}'");
        Ok(())
    }

    /// Load a profile's raw YAML value, includes and placeholders resolved.
    pub fn load(&self, name: &str) -> Result<Value> {
        Self::validate_name(name)?;
        let path = self.path(name);
        if !path.is_file() {
            return Err(TermweaveError::ProfileNotFound(path));
        }
        loader::load_value(&path)
    }

    /// All saved profiles, sorted by name. Profiles that fail to parse are
    /// still listed under their file stem.
    pub fn list(&self) -> Result<Vec<ProfileEntry>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for dir_entry in std::fs::read_dir(&self.dir)? {
            let path = dir_entry?.path();
            let Some(name) = path
                .file_name()
                .and_then(|f| f.to_str())
                .and_then(|f| f.strip_suffix(".yml"))
            else {
                continue;
            };

            let metadata = std::fs::read_to_string(&path)
                .ok()
                .and_then(|contents| serde_yaml_ng::from_str::<Config>(&contents).ok())
                .and_then(|config| config.metadata);

            let (display_name, description) = match metadata {
                Some(m) => (m.name.unwrap_or_else(|| name.to_string()), m.description),
                None => (name.to_string(), None),
            };

            entries.push(ProfileEntry {
                name: name.to_string(),
                display_name,
                description,
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}
