//! Command dispatch into a rendered session.
//!
//! Sends are fire-and-forget text injection: no output is captured and no
//! exit codes are awaited. Order within one pane is strict:
//!
//! 1. `cd <working dir>` when one resolves,
//! 2. commands contributed by tool hooks,
//! 3. the pane's own commands,
//! 4. the optional `prompt`, typed but not executed.
//!
//! When `command_delay` is positive the dispatcher sleeps that many seconds
//! before every command send, including the first.

use std::time::Duration;

use tracing::debug;

use crate::config::PaneConfig;
use crate::error::Result;
use crate::iterm::TermControl;
use crate::tools::ToolsCoordinator;

/// Send a pane's commands to its session.
pub async fn dispatch<C: TermControl + ?Sized>(
    control: &C,
    session: &str,
    pane: &PaneConfig,
    tab_root: Option<&str>,
    tools: &ToolsCoordinator,
) -> Result<()> {
    let working_dir = pane.working_dir(tab_root);

    if let Some(dir) = &working_dir {
        control.send_text(session, &format!("cd {dir}\n")).await?;
    }

    let mut queue = tools.process_hooks(&pane.tools, working_dir.as_deref());
    queue.extend(pane.commands.iter().cloned());

    debug!(
        position = %pane.position,
        commands = queue.len(),
        "dispatching commands"
    );

    for command in &queue {
        if pane.command_delay > 0 {
            tokio::time::sleep(Duration::from_secs(pane.command_delay)).await;
        }
        control.send_text(session, &format!("{command}\n")).await?;
    }

    if let Some(prompt) = &pane.prompt {
        control.send_text(session, prompt).await?;
    }

    Ok(())
}
