//! Top-level orchestration.
//!
//! [`run`] dispatches the CLI's mutually exclusive modes (tools check,
//! wizard, profile listing and saving) and otherwise loads the
//! configuration and applies it: acquire a window, then spawn one task per
//! tab. Tabs render concurrently; one tab failing is logged and never
//! cancels its siblings.

use std::io::Write as _;
use std::path::Path;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::cli::Cli;
use crate::config::{Config, TabConfig};
use crate::error::Result;
use crate::iterm::{ItermControl, OsascriptRunner, TabId, TermControl};
use crate::loader;
use crate::profiles::ProfileStore;
use crate::renderer::{SessionMap, SplitRenderer};
use crate::theme::BadgeThemes;
use crate::tools::ToolsCoordinator;
use crate::wizard::Wizard;

/// Entry point called from `main` after argument parsing.
pub async fn run(cli: Cli) -> Result<()> {
    if cli.tools_check {
        return tools_check();
    }
    if cli.wizard {
        return run_wizard();
    }
    if cli.list_global {
        return list_profiles();
    }
    if let Some(name) = &cli.save_global {
        let store = ProfileStore::open_default()?;
        return save_with_confirmation(&store, &cli.config_path(), name);
    }

    let config = load_configuration(&cli)?;
    let app = App::new(Arc::new(ItermControl::new(OsascriptRunner::default())));
    app.apply(config, cli.new_window, cli.dry_run).await
}

/// Load the effective configuration, honoring `--profile`.
///
/// A loaded profile merges underneath the config file; when the config file
/// does not exist the profile alone is used.
fn load_configuration(cli: &Cli) -> Result<Config> {
    let config_path = cli.config_path();

    let profile_value = match &cli.profile {
        Some(name) => {
            let value = ProfileStore::open_default()?.load(name)?;
            info!("loaded profile '{name}'");
            Some(value)
        }
        None => None,
    };

    if let Some(profile_value) = &profile_value
        && !config_path.is_file()
    {
        return loader::into_config(profile_value.clone());
    }

    let mut value = loader::load_value(&config_path)?;
    if let Some(profile_value) = profile_value {
        value = loader::merge_profile(value, profile_value);
    }
    loader::into_config(value)
}

/// Applies a loaded configuration against a [`TermControl`] backend.
pub struct App<C: TermControl + 'static> {
    control: Arc<C>,
    themes: BadgeThemes,
    tools: Arc<ToolsCoordinator>,
}

impl<C: TermControl + 'static> App<C> {
    pub fn new(control: Arc<C>) -> Self {
        Self {
            control,
            themes: BadgeThemes::builtin(),
            tools: Arc::new(ToolsCoordinator::builtin()),
        }
    }

    /// Render every configured tab. The first tab reuses the window's
    /// current tab; the rest get their own.
    pub async fn apply(&self, config: Config, new_window: bool, dry_run: bool) -> Result<()> {
        let profile = config.profile_name().to_string();

        if config.tabs.is_empty() {
            info!("no tabs configured, nothing to do");
            return Ok(());
        }

        if dry_run {
            info!("dry run: would use profile '{profile}'");
            for (id, tab) in config.tabs.iter() {
                info!(
                    "dry run: would configure tab '{id}' with {} pane(s)",
                    tab.panes.len()
                );
            }
            return Ok(());
        }

        let window = self.control.ensure_window(new_window, &profile).await?;

        let mut set = JoinSet::new();
        for (index, (id, tab)) in config.tabs.0.into_iter().enumerate() {
            let control = Arc::clone(&self.control);
            let tools = Arc::clone(&self.tools);
            let themes = self.themes.clone();
            let window = window.clone();
            let profile = profile.clone();
            let first = index == 0;

            set.spawn(async move {
                let result = render_tab(
                    control.as_ref(),
                    &themes,
                    &tools,
                    &window,
                    &profile,
                    &id,
                    &tab,
                    first,
                )
                .await;
                (id, result)
            });
        }

        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((id, Ok(sessions))) => {
                    debug!("tab '{id}' rendered {} session(s)", sessions.len());
                }
                Ok((id, Err(e))) => error!("error in tab '{id}': {e}"),
                Err(e) => error!("tab task failed: {e}"),
            }
        }

        Ok(())
    }
}

/// Render one tab: acquire its tab and initial session, then hand the pane
/// list to the split renderer.
#[allow(clippy::too_many_arguments)]
async fn render_tab<C: TermControl + ?Sized>(
    control: &C,
    themes: &BadgeThemes,
    tools: &ToolsCoordinator,
    window: &str,
    profile: &str,
    id: &str,
    tab: &TabConfig,
    first: bool,
) -> Result<SessionMap> {
    if tab.panes.is_empty() {
        debug!("tab '{id}' has no panes, skipping");
        return Ok(SessionMap::new());
    }

    let tab_id = if first {
        control.current_tab(window).await?
    } else {
        acquire_tab(control, window, tab, profile).await?
    };

    if let Some(title) = &tab.title {
        control.set_tab_title(&tab_id, title).await?;
    }

    let initial = control.current_session(&tab_id).await?;
    let renderer = SplitRenderer::new(control, themes, tools, profile, false);
    renderer.render(initial, &tab.panes, tab.root.as_deref()).await
}

/// Find a reusable tab by title, or create a new one.
async fn acquire_tab<C: TermControl + ?Sized>(
    control: &C,
    window: &str,
    tab: &TabConfig,
    profile: &str,
) -> Result<TabId> {
    if tab.reuse
        && let Some(title) = &tab.title
    {
        if let Some(existing) = control.find_tab_by_title(window, title).await? {
            debug!("reusing existing tab '{title}'");
            return Ok(existing);
        }
    }
    control.create_tab(window, profile).await
}

fn tools_check() -> Result<()> {
    println!("Checking available development tools:");
    for (name, available) in ToolsCoordinator::builtin().availability() {
        let status = if available { "available" } else { "not available" };
        println!("  {name:<10} {status}");
    }
    Ok(())
}

fn run_wizard() -> Result<()> {
    let (path, _config) = Wizard::from_terminal().run()?;

    if confirm("Save this configuration as a global profile?")? {
        let name = prompt("Profile name")?;
        let store = ProfileStore::open_default()?;
        save_with_confirmation(&store, &path, &name)?;
    }

    println!("Run 'termweave' to apply this configuration.");
    Ok(())
}

fn list_profiles() -> Result<()> {
    let entries = ProfileStore::open_default()?.list()?;
    if entries.is_empty() {
        println!("No global profiles found.");
        return Ok(());
    }

    println!("Available global profiles:");
    for entry in entries {
        println!("  {:<20} {}", entry.name, entry.display_name);
        if let Some(description) = entry.description {
            println!("  {:<20} {description}", "");
        }
    }
    Ok(())
}

/// Save a config as a global profile, asking before overwriting.
fn save_with_confirmation(store: &ProfileStore, config_path: &Path, name: &str) -> Result<()> {
    ProfileStore::validate_name(name)?;

    if store.exists(name)
        && !confirm(&format!("Profile '{name}' already exists. Overwrite?"))?
    {
        println!("Operation cancelled.");
        return Ok(());
    }

    store.save(config_path, name)?;
    println!("Configuration saved to global profile: {name}");
    Ok(())
}

fn prompt(message: &str) -> Result<String> {
    print!("{message}: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn confirm(message: &str) -> Result<bool> {
    Ok(prompt(&format!("{message} (y/n)"))?.eq_ignore_ascii_case("y"))
}
