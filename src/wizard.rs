//! Interactive configuration wizard.
//!
//! Walks through profile, tabs, panes, badges, dependencies, commands, and
//! tool hooks with plain line-based prompts, then writes the resulting
//! config as YAML. Input and output are injected so tests can drive the
//! wizard with a scripted transcript.

use std::io::{BufRead, BufReader, Stdin, Stdout, Write};
use std::path::PathBuf;

use serde_yaml_ng::{Mapping, Value};

use crate::config::{Badge, Config, PaneConfig, TabConfig, Tabs};
use crate::error::Result;
use crate::loader::DEFAULT_CONFIG;
use crate::theme::BadgeThemes;

pub struct Wizard<R, W> {
    input: R,
    output: W,
    themes: BadgeThemes,
}

impl Wizard<BufReader<Stdin>, Stdout> {
    pub fn from_terminal() -> Self {
        Self::new(BufReader::new(std::io::stdin()), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> Wizard<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            themes: BadgeThemes::builtin(),
        }
    }

    /// Run the full wizard and write the config file.
    pub fn run(&mut self) -> Result<(PathBuf, Config)> {
        writeln!(self.output, "termweave configuration wizard")?;
        writeln!(self.output, "==============================")?;

        let mut config = Config {
            profile: Some(self.ask_or("Default iTerm2 profile to use", "Default")?),
            ..Config::default()
        };

        let tab_count = self.ask_count("Number of tabs to configure")?;
        let mut tabs = Vec::with_capacity(tab_count as usize);
        for i in 1..=tab_count {
            let id = self.ask(&format!("Tab {i} id"))?;
            let tab = self.configure_tab(&id)?;
            tabs.push((id, tab));
        }
        config.tabs = Tabs(tabs);

        let path = PathBuf::from(self.ask_or("Save configuration to", DEFAULT_CONFIG)?);
        let yaml = serde_yaml_ng::to_string(&config)?;
        std::fs::write(&path, yaml)?;
        writeln!(self.output, "Configuration saved to {}", path.display())?;

        Ok((path, config))
    }

    fn configure_tab(&mut self, id: &str) -> Result<TabConfig> {
        let title = self.ask_optional(&format!("Title for tab '{id}' [optional]"))?;
        let root = self.ask_optional(&format!("Root directory for tab '{id}' [optional]"))?;
        let reuse = self.ask_yes_no("Reuse existing tab with same title?")?;

        let pane_count = self.ask_count(&format!("Number of panes for tab '{id}'"))?;
        let mut panes = Vec::with_capacity(pane_count as usize);
        for j in 0..pane_count {
            panes.push(self.configure_pane(j)?);
        }

        Ok(TabConfig {
            title,
            root,
            reuse,
            panes,
        })
    }

    fn configure_pane(&mut self, index: u32) -> Result<PaneConfig> {
        let n = index + 1;
        let mut pane = PaneConfig {
            position: self.ask_or(&format!("Position for pane {n} (e.g. '1/1', '1/2')"), "1/1")?,
            title: self.ask_optional(&format!("Title for pane {n} [optional]"))?,
            ..PaneConfig::default()
        };

        if let Some(text) = self.ask_optional(&format!("Badge for pane {n} [optional]"))? {
            let themes = self.themes.names().collect::<Vec<_>>().join("/");
            let theme = self.ask_or(&format!("Badge theme ({themes})"), "default")?;
            pane.badge = Some(if self.themes.color(&theme).is_some() {
                Badge::Themed { text, theme }
            } else {
                Badge::Text(text)
            });
        }

        pane.working_directory =
            self.ask_optional(&format!("Working directory for pane {n} [optional]"))?;
        pane.profile = self.ask_optional(&format!("Profile for pane {n} [optional]"))?;

        if index > 0 && self.ask_yes_no("Does this pane depend on other panes?")? {
            loop {
                let position = self.ask("Position of dependency (empty to finish)")?;
                if position.is_empty() {
                    break;
                }
                pane.depends_on.push(position);
            }
        }

        writeln!(self.output, "Commands for pane {n} (empty line to finish):")?;
        loop {
            let command = self.ask(">")?;
            if command.is_empty() {
                break;
            }
            pane.commands.push(command);
        }

        pane.tools = self.configure_tools()?;
        Ok(pane)
    }

    fn configure_tools(&mut self) -> Result<std::collections::BTreeMap<String, Value>> {
        let mut tools = std::collections::BTreeMap::new();
        if !self.ask_yes_no("Configure tool integrations?")? {
            return Ok(tools);
        }

        if self.ask_yes_no("Configure Git integration?")? {
            let mut git = Mapping::new();
            if let Some(repo) = self.ask_optional("Repository to clone [optional]")? {
                git.insert("clone".into(), repo.into());
            }
            if let Some(branch) = self.ask_optional("Branch to checkout [optional]")? {
                git.insert("checkout".into(), branch.into());
            }
            if self.ask_yes_no("Pull updates?")? {
                git.insert("pull".into(), true.into());
            }
            if !git.is_empty() {
                tools.insert("git".to_string(), Value::Mapping(git));
            }
        }

        if self.ask_yes_no("Configure Docker integration?")? {
            let mut docker = Mapping::new();
            if let Some(action) = self.ask_optional("docker-compose command (e.g. 'up -d') [optional]")? {
                docker.insert("compose".into(), action.into());
            }
            if let Some(image) = self.ask_optional("Image for docker run [optional]")? {
                let mut run = Mapping::new();
                run.insert("image".into(), image.into());
                run.insert("detach".into(), self.ask_yes_no("Run in detached mode?")?.into());
                docker.insert("run".into(), Value::Mapping(run));
            }
            if !docker.is_empty() {
                tools.insert("docker".to_string(), Value::Mapping(docker));
            }
        }

        if self.ask_yes_no("Configure VS Code integration?")? {
            let mut vscode = Mapping::new();
            if let Some(files) = self.ask_optional("Files to open (space-separated) [optional]")? {
                let files: Vec<Value> = files.split_whitespace().map(Value::from).collect();
                vscode.insert("files".into(), Value::Sequence(files));
            }
            vscode.insert(
                "new_window".into(),
                self.ask_yes_no("Open in new window?")?.into(),
            );
            tools.insert("vscode".to_string(), Value::Mapping(vscode));
        }

        Ok(tools)
    }

    /// Prompt and read one trimmed line. EOF reads as an empty answer.
    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}: ")?;
        self.output.flush()?;
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    fn ask_or(&mut self, prompt: &str, default: &str) -> Result<String> {
        let answer = self.ask(&format!("{prompt} [{default}]"))?;
        Ok(if answer.is_empty() {
            default.to_string()
        } else {
            answer
        })
    }

    fn ask_optional(&mut self, prompt: &str) -> Result<Option<String>> {
        let answer = self.ask(prompt)?;
        Ok((!answer.is_empty()).then_some(answer))
    }

    fn ask_yes_no(&mut self, prompt: &str) -> Result<bool> {
        let answer = self.ask(&format!("{prompt} (y/n) [n]"))?;
        Ok(answer.eq_ignore_ascii_case("y"))
    }

    fn ask_count(&mut self, prompt: &str) -> Result<u32> {
        loop {
            let answer = self.ask(prompt)?;
            match answer.parse() {
                Ok(count) => return Ok(count),
                Err(_) => writeln!(self.output, "Please enter a number.")?,
            }
        }
    }
}
