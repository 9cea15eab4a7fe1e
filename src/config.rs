//! Configuration types for termweave.
//!
//! This module defines the data structures that map to the YAML
//! configuration format:
//!
//! ```yaml
//! profile: Default
//! tabs:
//!   servers:
//!     title: Servers
//!     root: ~/src/myproject
//!     panes:
//!       - position: 1/1
//!         title: api
//!         badge: { text: api, theme: success }
//!         commands:
//!           - cargo watch -x run
//!       - position: 2/1
//!         title: web
//!         commands:
//!           - npm run dev
//! ```
//!
//! All optional fields have documented defaults; validation happens at the
//! load boundary, not inside the rendering code.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Top-level configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// iTerm2 profile used for new windows, tabs, and splits.
    /// Defaults to `"Default"` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Optional metadata, used only by the global profile listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,

    /// Tab configurations, keyed by tab id. Order is significant: the first
    /// tab reuses the window's current tab instead of creating a new one.
    #[serde(default)]
    pub tabs: Tabs,
}

impl Config {
    /// Profile name to use, falling back to iTerm2's `Default`.
    pub fn profile_name(&self) -> &str {
        self.profile.as_deref().unwrap_or("Default")
    }
}

/// Listing metadata carried by saved global profiles.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Ordered tab map.
///
/// YAML mappings lose their order through `BTreeMap`, but tab order is
/// load-bearing here, so this wraps a `Vec<(id, TabConfig)>` with a custom
/// map visitor.
#[derive(Debug, Clone, Default)]
pub struct Tabs(pub Vec<(String, TabConfig)>);

impl Tabs {
    pub fn iter(&self) -> impl Iterator<Item = &(String, TabConfig)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for Tabs {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TabsVisitor;

        impl<'de> Visitor<'de> for TabsVisitor {
            type Value = Tabs;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of tab id to tab config")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Tabs, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut tabs = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((id, tab)) = map.next_entry::<String, TabConfig>()? {
                    tabs.push((id, tab));
                }
                Ok(Tabs(tabs))
            }
        }

        deserializer.deserialize_map(TabsVisitor)
    }
}

impl Serialize for Tabs {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (id, tab) in &self.0 {
            map.serialize_entry(id, tab)?;
        }
        map.end()
    }
}

/// A single tab: a titled group of panes sharing an optional root directory.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TabConfig {
    /// Tab title. Required for `reuse` matching.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Directory panes fall back to when they set no working directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,

    /// Reuse an existing tab with the same title instead of creating one.
    #[serde(default)]
    pub reuse: bool,

    /// Pane descriptors. A tab with no panes is skipped entirely.
    #[serde(default)]
    pub panes: Vec<PaneConfig>,
}

/// A single pane within a tab.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaneConfig {
    /// Layout address, `"column/row/column-in-row"` with trailing
    /// components defaulting to 1.
    #[serde(default = "default_position")]
    pub position: String,

    /// Session display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Per-pane root directory, weaker than `working_directory`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,

    /// Directory to `cd` into before any command runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,

    /// iTerm2 profile override for this pane only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// iTerm2 color preset name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Badge text, plain or themed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<Badge>,

    /// Commands sent to the pane in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<String>,

    /// Seconds to sleep before every command send (including the first).
    #[serde(default, skip_serializing_if = "is_zero")]
    pub command_delay: u64,

    /// Text typed after the last command without executing it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,

    /// Positions of panes this pane depends on. Checked against the
    /// rendered sessions before command dispatch; not an ordering gate.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,

    /// Tool hooks: tool name to tool-specific configuration.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tools: BTreeMap<String, serde_yaml_ng::Value>,

    /// Whether this pane takes focus once the tab is rendered.
    /// The last pane with `focus: true` wins.
    #[serde(default)]
    pub focus: bool,
}

impl Default for PaneConfig {
    fn default() -> Self {
        Self {
            position: default_position(),
            title: None,
            root: None,
            working_directory: None,
            profile: None,
            color: None,
            badge: None,
            commands: Vec::new(),
            command_delay: 0,
            prompt: None,
            depends_on: Vec::new(),
            tools: BTreeMap::new(),
            focus: false,
        }
    }
}

impl PaneConfig {
    /// Effective working directory: `working_directory`, then the pane
    /// `root`, then the tab `root`.
    pub fn working_dir(&self, tab_root: Option<&str>) -> Option<String> {
        self.working_directory
            .clone()
            .or_else(|| self.root.clone())
            .or_else(|| tab_root.map(str::to_string))
    }
}

fn default_position() -> String {
    "1/1/1".to_string()
}

fn is_zero(n: &u64) -> bool {
    *n == 0
}

/// Badge field that accepts either a bare string or a `{text, theme}` map.
///
/// ```yaml
/// badge: build
/// # or
/// badge: { text: build, theme: success }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Badge {
    /// Plain badge text, styled with the default theme.
    Text(String),
    /// Badge text with an explicit theme name.
    Themed {
        text: String,
        #[serde(default = "default_theme")]
        theme: String,
    },
}

fn default_theme() -> String {
    "default".to_string()
}
