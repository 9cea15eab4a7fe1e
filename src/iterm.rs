//! iTerm2 scripting boundary.
//!
//! The core only depends on [`TermControl`], a narrow capability trait over
//! the window/tab/session operations the renderer needs. Every method is a
//! genuine suspension point: calls cross the process boundary to iTerm2 and
//! must not block the event loop, since tab tasks interleave on a
//! single-threaded runtime. The real backend, [`ItermControl`], drives
//! iTerm2 two ways:
//!
//! - structural operations (windows, tabs, splits, select) go through
//!   AppleScript via `osascript`;
//! - appearance operations (profile, color preset, badge) are iTerm2
//!   proprietary OSC 1337 control sequences, emitted by running `printf`
//!   inside the target session.
//!
//! Script execution sits behind [`ScriptRunner`] so tests can inject a mock
//! instead of spawning processes.
//!
//! Tab titles: iTerm2's AppleScript dictionary has no tab title property,
//! so titles are read and written through the tab's active session name,
//! which is what the tab bar surfaces by default.

use std::future::Future;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::error::{Result, TermweaveError};
use crate::theme::Rgb;

/// Opaque window identifier (iTerm2 window id).
pub type WindowId = String;
/// Opaque tab identifier (`"<window id>:<tab index>"`).
pub type TabId = String;
/// Opaque session identifier (iTerm2 unique session id).
pub type SessionId = String;

/// Operations the layout engine needs from the terminal application.
///
/// All handles are owned by the external iTerm2 process; this side holds
/// only identifiers, never the resources themselves. Methods return `Send`
/// futures because tab tasks run under a spawned `JoinSet`.
pub trait TermControl: Send + Sync {
    /// Get the current window, creating one when none exists or when
    /// `new_window` is set. Activates the application.
    fn ensure_window(
        &self,
        new_window: bool,
        profile: &str,
    ) -> impl Future<Output = Result<WindowId>> + Send;

    /// The currently selected tab of a window.
    fn current_tab(&self, window: &str) -> impl Future<Output = Result<TabId>> + Send;

    /// Find a tab whose title matches, for `reuse: true` tabs.
    fn find_tab_by_title(
        &self,
        window: &str,
        title: &str,
    ) -> impl Future<Output = Result<Option<TabId>>> + Send;

    /// Create a new tab; it becomes the window's current tab.
    fn create_tab(
        &self,
        window: &str,
        profile: &str,
    ) -> impl Future<Output = Result<TabId>> + Send;

    /// Set a tab's title.
    fn set_tab_title(&self, tab: &str, title: &str) -> impl Future<Output = Result<()>> + Send;

    /// The active session of a tab.
    fn current_session(&self, tab: &str) -> impl Future<Output = Result<SessionId>> + Send;

    /// Split a session, producing a new sibling session.
    fn split_session(
        &self,
        session: &str,
        vertical: bool,
        profile: &str,
    ) -> impl Future<Output = Result<SessionId>> + Send;

    /// Set a session's display name.
    fn set_session_name(
        &self,
        session: &str,
        name: &str,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Switch a live session to a different profile.
    fn set_session_profile(
        &self,
        session: &str,
        profile: &str,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Apply a named color preset to a session.
    fn set_color_preset(
        &self,
        session: &str,
        preset: &str,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Set badge text and, optionally, its foreground color.
    fn set_badge(
        &self,
        session: &str,
        text: &str,
        color: Option<Rgb>,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Inject text into a session. A trailing newline executes the line;
    /// without one the text is only typed.
    fn send_text(&self, session: &str, text: &str) -> impl Future<Output = Result<()>> + Send;

    /// Give a session keyboard focus.
    fn activate_session(&self, session: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Executes AppleScript sources. Enables mock injection for testing.
pub trait ScriptRunner: Send + Sync {
    fn run(&self, script: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Real script runner using `osascript`.
pub struct OsascriptRunner {
    bin: String,
}

impl OsascriptRunner {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }
}

impl Default for OsascriptRunner {
    fn default() -> Self {
        Self::new("osascript")
    }
}

impl ScriptRunner for OsascriptRunner {
    async fn run(&self, script: &str) -> Result<String> {
        let output = tokio::process::Command::new(&self.bin)
            .args(["-e", script])
            .output()
            .await
            .map_err(|e| TermweaveError::Terminal(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TermweaveError::Terminal(format!(
                "osascript exit code {}: {}",
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// iTerm2 backend over a [`ScriptRunner`].
pub struct ItermControl<R: ScriptRunner> {
    runner: R,
}

impl<R: ScriptRunner> ItermControl<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    /// Wrap a body in a search for the session with the given unique id.
    /// Session ids are stable but sessions are not addressable by id
    /// directly, so the script walks the window/tab tree.
    fn session_script(session: &str, body: &str) -> String {
        format!(
            concat!(
                "tell application \"iTerm2\"\n",
                "  repeat with w in windows\n",
                "    repeat with t in tabs of w\n",
                "      repeat with s in sessions of t\n",
                "        if id of s is \"{id}\" then\n",
                "          tell s\n",
                "            {body}\n",
                "          end tell\n",
                "        end if\n",
                "      end repeat\n",
                "    end repeat\n",
                "  end repeat\n",
                "end tell"
            ),
            id = quote(session),
            body = body,
        )
    }

    /// Emit an iTerm2 OSC 1337 control sequence by running `printf` inside
    /// the session's shell.
    async fn send_control_sequence(&self, session: &str, payload: &str) -> Result<()> {
        let command = format!(
            "printf '\\033]1337;%s\\007' '{}'\n",
            payload.replace('\'', r"'\''")
        );
        self.send_text(session, &command).await
    }
}

/// Escape a string for inclusion in an AppleScript string literal.
fn quote(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Split a `"<window>:<index>"` tab id into its parts.
fn tab_parts(tab: &str) -> Result<(&str, &str)> {
    tab.split_once(':')
        .ok_or_else(|| TermweaveError::Terminal(format!("malformed tab id: {tab}")))
}

impl<R: ScriptRunner> TermControl for ItermControl<R> {
    async fn ensure_window(&self, new_window: bool, profile: &str) -> Result<WindowId> {
        let create = if new_window {
            format!("create window with profile \"{}\"", quote(profile))
        } else {
            format!(
                concat!(
                    "if (count of windows) is 0 then\n",
                    "    create window with profile \"{}\"\n",
                    "  end if"
                ),
                quote(profile)
            )
        };
        let script = format!(
            "tell application \"iTerm2\"\n  activate\n  {create}\n  return id of current window\nend tell"
        );
        self.runner.run(&script).await
    }

    async fn current_tab(&self, window: &str) -> Result<TabId> {
        let script = format!(
            "tell application \"iTerm2\" to return index of current tab of window id {window}"
        );
        let index = self.runner.run(&script).await?;
        Ok(format!("{window}:{index}"))
    }

    async fn find_tab_by_title(&self, window: &str, title: &str) -> Result<Option<TabId>> {
        let script = format!(
            concat!(
                "tell application \"iTerm2\"\n",
                "  tell window id {window}\n",
                "    repeat with i from 1 to count of tabs\n",
                "      if name of current session of tab i is \"{title}\" then\n",
                "        return i\n",
                "      end if\n",
                "    end repeat\n",
                "  end tell\n",
                "  return \"\"\n",
                "end tell"
            ),
            window = window,
            title = quote(title),
        );
        let index = self.runner.run(&script).await?;
        if index.is_empty() {
            Ok(None)
        } else {
            Ok(Some(format!("{window}:{index}")))
        }
    }

    async fn create_tab(&self, window: &str, profile: &str) -> Result<TabId> {
        let script = format!(
            concat!(
                "tell application \"iTerm2\"\n",
                "  tell window id {window}\n",
                "    create tab with profile \"{profile}\"\n",
                "    return index of current tab\n",
                "  end tell\n",
                "end tell"
            ),
            window = window,
            profile = quote(profile),
        );
        let index = self.runner.run(&script).await?;
        Ok(format!("{window}:{index}"))
    }

    async fn set_tab_title(&self, tab: &str, title: &str) -> Result<()> {
        let (window, index) = tab_parts(tab)?;
        let script = format!(
            "tell application \"iTerm2\" to tell current session of tab {index} of window id {window} to set name to \"{}\"",
            quote(title)
        );
        self.runner.run(&script).await.map(|_| ())
    }

    async fn current_session(&self, tab: &str) -> Result<SessionId> {
        let (window, index) = tab_parts(tab)?;
        let script = format!(
            "tell application \"iTerm2\" to return id of current session of tab {index} of window id {window}"
        );
        self.runner.run(&script).await
    }

    async fn split_session(&self, session: &str, vertical: bool, profile: &str) -> Result<SessionId> {
        let direction = if vertical { "vertically" } else { "horizontally" };
        let body = format!(
            "return id of (split {direction} with profile \"{}\")",
            quote(profile)
        );
        let id = self.runner.run(&Self::session_script(session, &body)).await?;
        if id.is_empty() {
            return Err(TermweaveError::Terminal(format!(
                "split produced no session (parent {session} not found?)"
            )));
        }
        Ok(id)
    }

    async fn set_session_name(&self, session: &str, name: &str) -> Result<()> {
        let body = format!("set name to \"{}\"", quote(name));
        self.runner
            .run(&Self::session_script(session, &body))
            .await
            .map(|_| ())
    }

    async fn set_session_profile(&self, session: &str, profile: &str) -> Result<()> {
        self.send_control_sequence(session, &format!("SetProfile={profile}"))
            .await
    }

    async fn set_color_preset(&self, session: &str, preset: &str) -> Result<()> {
        self.send_control_sequence(session, &format!("SetColors=preset={preset}"))
            .await
    }

    async fn set_badge(&self, session: &str, text: &str, color: Option<Rgb>) -> Result<()> {
        let encoded = BASE64.encode(text.as_bytes());
        self.send_control_sequence(session, &format!("SetBadgeFormat={encoded}"))
            .await?;
        if let Some(rgb) = color {
            self.send_control_sequence(session, &format!("SetColors=badge={}", rgb.to_hex()))
                .await?;
        }
        Ok(())
    }

    async fn send_text(&self, session: &str, text: &str) -> Result<()> {
        // A trailing newline means "execute"; AppleScript's `write text`
        // appends one unless told otherwise.
        let body = match text.strip_suffix('\n') {
            Some(line) => format!("write text \"{}\"", quote(line)),
            None => format!("write text \"{}\" newline NO", quote(text)),
        };
        self.runner
            .run(&Self::session_script(session, &body))
            .await
            .map(|_| ())
    }

    async fn activate_session(&self, session: &str) -> Result<()> {
        self.runner
            .run(&Self::session_script(session, "select"))
            .await
            .map(|_| ())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    struct CapturingRunner {
        scripts: std::sync::Mutex<Vec<String>>,
        reply: String,
    }

    impl CapturingRunner {
        fn new(reply: &str) -> Self {
            Self {
                scripts: std::sync::Mutex::new(Vec::new()),
                reply: reply.to_string(),
            }
        }

        fn scripts(&self) -> Vec<String> {
            self.scripts.lock().unwrap().clone()
        }
    }

    impl ScriptRunner for &CapturingRunner {
        async fn run(&self, script: &str) -> Result<String> {
            self.scripts.lock().unwrap().push(script.to_string());
            Ok(self.reply.clone())
        }
    }

    #[test]
    fn default_runner_uses_osascript() {
        let runner = OsascriptRunner::default();
        assert_eq!(runner.bin, "osascript");
    }

    #[test]
    fn quote_escapes_applescript_specials() {
        assert_eq!(quote(r#"say "hi" \ bye"#), r#"say \"hi\" \\ bye"#);
    }

    #[tokio::test]
    async fn split_script_targets_session_by_id() {
        let runner = CapturingRunner::new("s-new");
        let control = ItermControl::new(&runner);

        let id = control.split_session("s-parent", true, "Default").await.unwrap();
        assert_eq!(id, "s-new");

        let scripts = runner.scripts();
        assert_eq!(scripts.len(), 1);
        assert!(scripts[0].contains("if id of s is \"s-parent\""));
        assert!(scripts[0].contains("split vertically with profile \"Default\""));
    }

    #[tokio::test]
    async fn horizontal_split_uses_horizontal_direction() {
        let runner = CapturingRunner::new("s-new");
        let control = ItermControl::new(&runner);
        control.split_session("s0", false, "Default").await.unwrap();
        assert!(runner.scripts()[0].contains("split horizontally"));
    }

    #[tokio::test]
    async fn send_text_distinguishes_execute_from_type() {
        let runner = CapturingRunner::new("");
        let control = ItermControl::new(&runner);

        control.send_text("s0", "echo hi\n").await.unwrap();
        control.send_text("s0", "partial").await.unwrap();

        let scripts = runner.scripts();
        assert!(scripts[0].contains("write text \"echo hi\"\n"));
        assert!(!scripts[0].contains("newline NO"));
        assert!(scripts[1].contains("write text \"partial\" newline NO"));
    }

    #[tokio::test]
    async fn badge_emits_osc_1337_with_base64_payload() {
        let runner = CapturingRunner::new("");
        let control = ItermControl::new(&runner);

        control
            .set_badge("s0", "build", Some(Rgb(76, 175, 80)))
            .await
            .unwrap();

        let scripts = runner.scripts();
        assert_eq!(scripts.len(), 2);
        // "build" in base64
        assert!(scripts[0].contains("SetBadgeFormat=YnVpbGQ="));
        assert!(scripts[1].contains("SetColors=badge=4caf50"));
    }

    #[tokio::test]
    async fn find_tab_returns_none_on_empty_reply() {
        let runner = CapturingRunner::new("");
        let control = ItermControl::new(&runner);
        assert_eq!(control.find_tab_by_title("123", "Dev").await.unwrap(), None);
    }

    #[tokio::test]
    async fn tab_ids_carry_window_and_index() {
        let runner = CapturingRunner::new("2");
        let control = ItermControl::new(&runner);
        assert_eq!(control.current_tab("57").await.unwrap(), "57:2");
        assert_eq!(control.create_tab("57", "Default").await.unwrap(), "57:2");
    }
}
