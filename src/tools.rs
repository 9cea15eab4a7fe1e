//! Development tool integrations.
//!
//! Panes can declare tool hooks (`tools:` in the config) that contribute
//! setup commands ahead of the pane's own command list. Each integration
//! exposes exactly two capabilities: availability and command generation.
//! Everything else about a tool stays behind that seam.
//!
//! ```yaml
//! panes:
//!   - position: 1/1
//!     tools:
//!       git:
//!         clone: git@github.com:me/project.git
//!         checkout: develop
//!       docker:
//!         compose: up -d
//! ```

use std::collections::BTreeMap;

use serde_yaml_ng::Value;
use tracing::{debug, warn};

/// A tool hook: availability check plus command generation.
pub trait ToolIntegration: Send + Sync {
    /// Whether the tool's binary is usable on this system.
    fn is_available(&self) -> bool;

    /// Produce the commands this tool contributes for the given
    /// configuration and working directory.
    fn generate_commands(&self, config: &Value, working_dir: Option<&str>) -> Vec<String>;
}

/// Check whether an executable exists on `PATH`.
fn command_exists(name: &str) -> bool {
    let Some(paths) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&paths).any(|dir| {
        let candidate = dir.join(name);
        candidate.is_file()
    })
}

fn get_str<'a>(config: &'a Value, key: &str) -> Option<&'a str> {
    config.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn get_bool(config: &Value, key: &str) -> bool {
    config.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn get_seq<'a>(config: &'a Value, key: &str) -> impl Iterator<Item = &'a str> {
    config
        .get(key)
        .and_then(Value::as_sequence)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
}

/// Git hooks: clone, checkout, pull, and repo-local config.
pub struct GitTool;

impl ToolIntegration for GitTool {
    fn is_available(&self) -> bool {
        command_exists("git")
    }

    fn generate_commands(&self, config: &Value, _working_dir: Option<&str>) -> Vec<String> {
        let mut commands = Vec::new();

        if let Some(repo) = get_str(config, "clone") {
            let mut cmd = format!("git clone {repo}");
            if let Some(target) = get_str(config, "target_dir") {
                cmd.push(' ');
                cmd.push_str(target);
            }
            commands.push(cmd);
        }

        if let Some(branch) = get_str(config, "checkout") {
            commands.push(format!("git checkout {branch}"));
        }

        if get_bool(config, "pull") {
            commands.push("git pull".to_string());
        }

        if let Some(entries) = config.get("config").and_then(Value::as_mapping) {
            for (key, value) in entries {
                if let (Some(key), Some(value)) = (key.as_str(), value.as_str()) {
                    commands.push(format!("git config {key} '{value}'"));
                }
            }
        }

        commands
    }
}

/// Docker hooks: compose, run, and build.
pub struct DockerTool;

impl ToolIntegration for DockerTool {
    fn is_available(&self) -> bool {
        command_exists("docker")
    }

    fn generate_commands(&self, config: &Value, _working_dir: Option<&str>) -> Vec<String> {
        let mut commands = Vec::new();

        if let Some(action) = get_str(config, "compose") {
            let mut cmd = "docker-compose".to_string();
            if let Some(file) = get_str(config, "compose_file") {
                cmd.push_str(&format!(" -f {file}"));
            }
            cmd.push(' ');
            cmd.push_str(action);
            commands.push(cmd);
        }

        if let Some(run) = config.get("run")
            && let Some(image) = get_str(run, "image")
        {
            let mut cmd = "docker run".to_string();
            if get_bool(run, "detach") {
                cmd.push_str(" -d");
            }
            if get_bool(run, "interactive") {
                cmd.push_str(" -it");
            }
            for port in get_seq(run, "ports") {
                cmd.push_str(&format!(" -p {port}"));
            }
            for volume in get_seq(run, "volumes") {
                cmd.push_str(&format!(" -v {volume}"));
            }
            if let Some(env) = run.get("env").and_then(Value::as_mapping) {
                for (key, value) in env {
                    if let (Some(key), Some(value)) = (key.as_str(), value.as_str()) {
                        cmd.push_str(&format!(" -e {key}={value}"));
                    }
                }
            }
            cmd.push(' ');
            cmd.push_str(image);
            if let Some(inner) = get_str(run, "command") {
                cmd.push(' ');
                cmd.push_str(inner);
            }
            commands.push(cmd);
        }

        if let Some(build) = config.get("build")
            && let Some(tag) = get_str(build, "tag")
        {
            let mut cmd = format!("docker build -t {tag}");
            if let Some(dockerfile) = get_str(build, "dockerfile") {
                cmd.push_str(&format!(" -f {dockerfile}"));
            }
            cmd.push(' ');
            cmd.push_str(get_str(build, "context").unwrap_or("."));
            commands.push(cmd);
        }

        commands
    }
}

/// VS Code hooks: open the working directory and files, install extensions.
pub struct VsCodeTool;

impl VsCodeTool {
    fn binary(&self) -> &'static str {
        if command_exists("code") { "code" } else { "code-insiders" }
    }
}

impl ToolIntegration for VsCodeTool {
    fn is_available(&self) -> bool {
        command_exists("code") || command_exists("code-insiders")
    }

    fn generate_commands(&self, config: &Value, working_dir: Option<&str>) -> Vec<String> {
        let code = self.binary();
        let mut commands = Vec::new();

        for extension in get_seq(config, "extensions") {
            commands.push(format!("{code} --install-extension {extension}"));
        }

        let mut open = code.to_string();
        if let Some(dir) = working_dir {
            open.push(' ');
            open.push_str(dir);
        }
        for file in get_seq(config, "files") {
            open.push(' ');
            open.push_str(file);
        }
        if get_bool(config, "new_window") {
            open.push_str(" --new-window");
        }
        commands.push(open);

        commands
    }
}

/// Registry of tool integrations, keyed by the name used in pane configs.
pub struct ToolsCoordinator {
    tools: BTreeMap<String, Box<dyn ToolIntegration>>,
}

impl ToolsCoordinator {
    /// Empty registry, for tests that inject their own tools.
    pub fn empty() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Registry with the built-in integrations.
    pub fn builtin() -> Self {
        Self::empty()
            .with_tool("git", GitTool)
            .with_tool("docker", DockerTool)
            .with_tool("vscode", VsCodeTool)
    }

    /// Register (or replace) a tool under a name.
    pub fn with_tool(mut self, name: &str, tool: impl ToolIntegration + 'static) -> Self {
        self.tools.insert(name.to_string(), Box::new(tool));
        self
    }

    /// `(name, available)` pairs for every registered tool, sorted by name.
    pub fn availability(&self) -> Vec<(&str, bool)> {
        self.tools
            .iter()
            .map(|(name, tool)| (name.as_str(), tool.is_available()))
            .collect()
    }

    /// Generate the commands contributed by a pane's tool hooks.
    ///
    /// Unknown or unavailable tools contribute nothing beyond a warning;
    /// a misconfigured hook never aborts the pane.
    pub fn process_hooks(
        &self,
        hooks: &BTreeMap<String, Value>,
        working_dir: Option<&str>,
    ) -> Vec<String> {
        let mut commands = Vec::new();

        for (name, config) in hooks {
            let Some(tool) = self.tools.get(name) else {
                warn!("unknown tool '{name}' in pane config");
                continue;
            };
            if !tool.is_available() {
                warn!("tool '{name}' is not available on this system");
                continue;
            }
            let generated = tool.generate_commands(config, working_dir);
            debug!("tool '{name}' contributed {} command(s)", generated.len());
            commands.extend(generated);
        }

        commands
    }
}

impl Default for ToolsCoordinator {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// A tool with fixed availability and output, for dispatch tests.
    pub(crate) struct FixedTool {
        pub available: bool,
        pub commands: Vec<String>,
    }

    impl ToolIntegration for FixedTool {
        fn is_available(&self) -> bool {
            self.available
        }

        fn generate_commands(&self, _config: &Value, _working_dir: Option<&str>) -> Vec<String> {
            self.commands.clone()
        }
    }
}
