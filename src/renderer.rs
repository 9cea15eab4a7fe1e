//! Split rendering: turning a [`LayoutIndex`] into live sessions.
//!
//! A tab starts with exactly one pre-existing session, bound to position
//! `1/1/1`. Every other pane must be reached by splitting an
//! already-materialized session, so rendering runs three strictly ordered
//! passes:
//!
//! 1. main columns — column 1 reuses the initial session, each further
//!    column splits vertically off the previous column's anchor;
//! 2. rows within each column — horizontal splits chained off the previous
//!    row;
//! 3. columns within each row — vertical splits chained off the previous
//!    slot.
//!
//! The chaining invariant (every pane splits from its previous sibling,
//! never from a fixed anchor) lives in [`parent_of`], a pure function over
//! positions. A pane whose parent was never materialized is skipped with a
//! warning; rendering always continues with the remaining positions and
//! returns whatever session map was built.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::commands;
use crate::config::{Badge, PaneConfig};
use crate::error::Result;
use crate::iterm::{SessionId, TermControl};
use crate::layout::LayoutIndex;
use crate::position::Position;
use crate::theme::BadgeThemes;
use crate::tools::ToolsCoordinator;

/// Normalized position string to live session id, for one rendered tab.
pub type SessionMap = HashMap<String, SessionId>;

/// Where a pane splits from, and in which direction.
///
/// - slot `s > 1` splits vertically from slot `s - 1` of the same row,
/// - row `r > 1` splits horizontally from row `r - 1`'s first slot,
/// - column `c > 1` splits vertically from column `c - 1`'s anchor,
/// - `1/1/1` is the root and has no parent.
pub fn parent_of(position: Position) -> Option<(Position, bool)> {
    if position.slot > 1 {
        Some((
            Position::new(position.column, position.row, position.slot - 1),
            true,
        ))
    } else if position.row > 1 {
        Some((Position::new(position.column, position.row - 1, 1), false))
    } else if position.column > 1 {
        Some((Position::new(position.column - 1, 1, 1), true))
    } else {
        None
    }
}

/// Renders one tab's panes against a [`TermControl`] backend.
pub struct SplitRenderer<'a, C: TermControl + ?Sized> {
    control: &'a C,
    themes: &'a BadgeThemes,
    tools: &'a ToolsCoordinator,
    profile: &'a str,
    dry_run: bool,
}

impl<'a, C: TermControl + ?Sized> SplitRenderer<'a, C> {
    pub fn new(
        control: &'a C,
        themes: &'a BadgeThemes,
        tools: &'a ToolsCoordinator,
        profile: &'a str,
        dry_run: bool,
    ) -> Self {
        Self {
            control,
            themes,
            tools,
            profile,
            dry_run,
        }
    }

    /// Render a tab's panes, starting from its pre-existing session.
    ///
    /// Local defects (bad parent, failed split, failed configure) are
    /// logged and skipped. The returned map holds every position that was
    /// materialized, including the initial session at `1/1/1`.
    pub async fn render(
        &self,
        initial: SessionId,
        panes: &[PaneConfig],
        tab_root: Option<&str>,
    ) -> Result<SessionMap> {
        if self.dry_run {
            info!("dry run: would render {} pane(s)", panes.len());
            return Ok(SessionMap::new());
        }

        let index = LayoutIndex::build(panes);
        let mut sessions = SessionMap::new();
        sessions.insert(Position::new(1, 1, 1).to_string(), initial.clone());
        let mut focus = initial.clone();

        // Pass 1: main columns. Column 1 already exists; apply its settings
        // in place. When its pane is absent the placeholder session still
        // serves as a split parent.
        if let Some(pane) = index.pane(1, 1, 1) {
            if let Some(profile) = &pane.profile
                && profile != self.profile
            {
                if let Err(e) = self.control.set_session_profile(&initial, profile).await {
                    warn!("failed to switch profile for pane 1/1/1: {e}");
                }
            }
            if let Err(e) = self.configure(&initial, pane, &sessions, tab_root).await {
                warn!("failed to configure pane 1/1/1: {e}");
            }
            if pane.focus {
                focus = initial.clone();
            }
        }

        let columns: Vec<u32> = index.columns().collect();
        for &column in columns.iter().filter(|&&c| c > 1) {
            let position = Position::new(column, 1, 1);
            if let Some(pane) = index.pane(column, 1, 1) {
                self.attach(&mut sessions, position, pane, tab_root, &mut focus)
                    .await;
            }
        }

        // Pass 2: rows within each column, chained off the previous row.
        for &column in &columns {
            let rows: Vec<u32> = index.rows(column).filter(|&r| r > 1).collect();
            for row in rows {
                let position = Position::new(column, row, 1);
                if let Some(pane) = index.pane(column, row, 1) {
                    self.attach(&mut sessions, position, pane, tab_root, &mut focus)
                        .await;
                }
            }
        }

        // Pass 3: columns within each row, chained off the previous slot.
        for &column in &columns {
            let rows: Vec<u32> = index.rows(column).collect();
            for row in rows {
                let slots: Vec<u32> = index.slots(column, row).filter(|&s| s > 1).collect();
                for slot in slots {
                    let position = Position::new(column, row, slot);
                    if let Some(pane) = index.pane(column, row, slot) {
                        self.attach(&mut sessions, position, pane, tab_root, &mut focus)
                            .await;
                    }
                }
            }
        }

        debug!("rendered {} session(s)", sessions.len());

        if let Err(e) = self.control.activate_session(&focus).await {
            warn!("failed to focus session: {e}");
        }

        Ok(sessions)
    }

    /// Split a pane's parent session and configure the new session.
    /// A missing parent or a failed split skips the pane.
    async fn attach(
        &self,
        sessions: &mut SessionMap,
        position: Position,
        pane: &PaneConfig,
        tab_root: Option<&str>,
        focus: &mut SessionId,
    ) {
        let Some((parent, vertical)) = parent_of(position) else {
            return;
        };

        let parent_key = parent.to_string();
        let Some(parent_session) = sessions.get(&parent_key).cloned() else {
            warn!("parent session not found for {parent_key}, skipping {position}");
            return;
        };

        let profile = pane.profile.as_deref().unwrap_or(self.profile);
        let session = match self
            .control
            .split_session(&parent_session, vertical, profile)
            .await
        {
            Ok(session) => session,
            Err(e) => {
                warn!("failed to split {parent_key} for {position}: {e}");
                return;
            }
        };

        let key = position.to_string();
        sessions.insert(key.clone(), session.clone());

        if let Err(e) = self.configure(&session, pane, &*sessions, tab_root).await {
            warn!("failed to configure pane {key}: {e}");
        }
        if pane.focus {
            *focus = session;
        }
    }

    /// Apply a pane's settings and dispatch its commands, in the fixed
    /// order: title, color preset, badge, dependency check, commands.
    async fn configure(
        &self,
        session: &SessionId,
        pane: &PaneConfig,
        sessions: &SessionMap,
        tab_root: Option<&str>,
    ) -> Result<()> {
        if let Some(title) = &pane.title {
            self.control.set_session_name(session, title).await?;
        }
        if let Some(preset) = &pane.color {
            self.control.set_color_preset(session, preset).await?;
        }
        if let Some(badge) = &pane.badge {
            self.apply_badge(session, badge).await?;
        }

        self.check_dependencies(pane, sessions);

        commands::dispatch(self.control, session, pane, tab_root, self.tools).await
    }

    /// Set badge text, colored through the theme table. Unknown themes pass
    /// the text through without color styling.
    async fn apply_badge(&self, session: &str, badge: &Badge) -> Result<()> {
        let (text, theme) = match badge {
            Badge::Text(text) => (text.as_str(), "default"),
            Badge::Themed { text, theme } => (text.as_str(), theme.as_str()),
        };

        let color = self.themes.color(theme);
        if color.is_none() {
            debug!("unknown badge theme '{theme}', applying text without color");
        }

        self.control.set_badge(session, text, color).await
    }

    /// `depends_on` is declarative: dependencies are verified against the
    /// sessions materialized so far, not enforced as an ordering gate.
    fn check_dependencies(&self, pane: &PaneConfig, sessions: &SessionMap) {
        for dependency in &pane.depends_on {
            match Position::parse(dependency) {
                Ok(position) => {
                    if !sessions.contains_key(&position.to_string()) {
                        warn!(
                            "pane {} depends on {position}, which has no session",
                            pane.position
                        );
                    }
                }
                Err(e) => warn!("pane {}: bad dependency: {e}", pane.position),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iterm::testing::{Op, RecordingControl};
    use crate::theme::Rgb;

    fn pane(position: &str) -> PaneConfig {
        PaneConfig {
            position: position.to_string(),
            ..Default::default()
        }
    }

    fn renderer<'a>(
        control: &'a RecordingControl,
        themes: &'a BadgeThemes,
        tools: &'a ToolsCoordinator,
    ) -> SplitRenderer<'a, RecordingControl> {
        SplitRenderer::new(control, themes, tools, "Default", false)
    }

    async fn render(control: &RecordingControl, panes: &[PaneConfig]) -> SessionMap {
        let themes = BadgeThemes::builtin();
        let tools = ToolsCoordinator::empty();
        renderer(control, &themes, &tools)
            .render("s0".to_string(), panes, None)
            .await
            .unwrap()
    }

    #[test]
    fn parent_lookup_walks_the_chain() {
        assert_eq!(parent_of(Position::new(1, 1, 1)), None);
        assert_eq!(
            parent_of(Position::new(3, 1, 1)),
            Some((Position::new(2, 1, 1), true))
        );
        assert_eq!(
            parent_of(Position::new(2, 3, 1)),
            Some((Position::new(2, 2, 1), false))
        );
        assert_eq!(
            parent_of(Position::new(2, 3, 4)),
            Some((Position::new(2, 3, 3), true))
        );
    }

    #[tokio::test]
    async fn second_column_is_one_vertical_split() {
        let control = RecordingControl::new();
        let sessions = render(&control, &[pane("1/1/1"), pane("2/1/1")]).await;

        assert_eq!(sessions.len(), 2);
        assert_eq!(
            control.splits(),
            [Op::Split {
                parent: "s0".into(),
                vertical: true,
                profile: "Default".into(),
            }]
        );
    }

    #[tokio::test]
    async fn second_row_is_one_horizontal_split() {
        let control = RecordingControl::new();
        let sessions = render(&control, &[pane("1/1/1"), pane("1/2/1")]).await;

        assert_eq!(sessions.len(), 2);
        assert_eq!(
            control.splits(),
            [Op::Split {
                parent: "s0".into(),
                vertical: false,
                profile: "Default".into(),
            }]
        );
    }

    #[tokio::test]
    async fn columns_chain_off_the_previous_column() {
        let control = RecordingControl::new();
        let sessions = render(&control, &[pane("1/1/1"), pane("2/1/1"), pane("3/1/1")]).await;

        assert_eq!(sessions.len(), 3);
        let splits = control.splits();
        assert_eq!(splits.len(), 2);
        // Column 3 splits from column 2's new session, not from s0.
        assert_eq!(
            splits[1],
            Op::Split {
                parent: sessions["2/1/1"].clone(),
                vertical: true,
                profile: "Default".into(),
            }
        );
    }

    #[tokio::test]
    async fn unresolvable_parent_is_skipped() {
        let control = RecordingControl::new();
        let sessions = render(&control, &[pane("1/1/1"), pane("1/3/1"), pane("2/1/1")]).await;

        // 1/3/1 has no 1/2/1 parent; everything else still renders.
        assert_eq!(sessions.len(), 2);
        assert!(sessions.contains_key("1/1/1"));
        assert!(sessions.contains_key("2/1/1"));
        assert!(!sessions.contains_key("1/3/1"));
        assert_eq!(control.splits().len(), 1);
    }

    #[tokio::test]
    async fn deep_layout_materializes_all_levels() {
        let control = RecordingControl::new();
        let sessions = render(
            &control,
            &[pane("1/1/1"), pane("2/1/1"), pane("2/2/1"), pane("2/2/2")],
        )
        .await;

        assert_eq!(sessions.len(), 4);
        let splits = control.splits();
        assert_eq!(splits.len(), 3);
        // Slot 2/2/2 splits vertically from 2/2/1.
        assert_eq!(
            splits[2],
            Op::Split {
                parent: sessions["2/2/1"].clone(),
                vertical: true,
                profile: "Default".into(),
            }
        );
    }

    #[tokio::test]
    async fn dry_run_issues_no_calls_and_returns_empty_map() {
        let control = RecordingControl::new();
        let themes = BadgeThemes::builtin();
        let tools = ToolsCoordinator::empty();
        let renderer = SplitRenderer::new(&control, &themes, &tools, "Default", true);

        let sessions = renderer
            .render(
                "s0".to_string(),
                &[pane("1/1/1"), pane("2/1/1"), pane("3/1/1")],
                None,
            )
            .await
            .unwrap();

        assert!(sessions.is_empty());
        assert!(control.ops().is_empty());
    }

    #[tokio::test]
    async fn plain_badge_gets_default_theme_color() {
        let control = RecordingControl::new();
        let mut first = pane("1/1/1");
        first.badge = Some(Badge::Text("build".into()));
        render(&control, &[first]).await;

        assert!(control.ops().contains(&Op::SetBadge {
            session: "s0".into(),
            text: "build".into(),
            color: Some(Rgb(213, 194, 194)),
        }));
    }

    #[tokio::test]
    async fn themed_badge_gets_theme_color() {
        let control = RecordingControl::new();
        let mut first = pane("1/1/1");
        first.badge = Some(Badge::Themed {
            text: "build".into(),
            theme: "success".into(),
        });
        render(&control, &[first]).await;

        assert!(control.ops().contains(&Op::SetBadge {
            session: "s0".into(),
            text: "build".into(),
            color: Some(Rgb(76, 175, 80)),
        }));
    }

    #[tokio::test]
    async fn unknown_badge_theme_applies_text_without_color() {
        let control = RecordingControl::new();
        let mut first = pane("1/1/1");
        first.badge = Some(Badge::Themed {
            text: "build".into(),
            theme: "bogus".into(),
        });
        render(&control, &[first]).await;

        assert!(control.ops().contains(&Op::SetBadge {
            session: "s0".into(),
            text: "build".into(),
            color: None,
        }));
    }

    #[tokio::test]
    async fn last_focus_pane_wins() {
        let control = RecordingControl::new();
        let mut second = pane("2/1/1");
        second.focus = true;
        let sessions = render(&control, &[pane("1/1/1"), second, pane("3/1/1")]).await;

        let ops = control.ops();
        assert_eq!(
            ops.last(),
            Some(&Op::Activate {
                session: sessions["2/1/1"].clone()
            })
        );
    }

    #[tokio::test]
    async fn initial_session_keeps_focus_by_default() {
        let control = RecordingControl::new();
        render(&control, &[pane("1/1/1"), pane("2/1/1")]).await;

        assert_eq!(
            control.ops().last(),
            Some(&Op::Activate {
                session: "s0".into()
            })
        );
    }

    #[tokio::test]
    async fn first_pane_settings_apply_in_place() {
        let control = RecordingControl::new();
        let mut first = pane("1/1/1");
        first.title = Some("api".into());
        first.profile = Some("Hotkey".into());
        render(&control, &[first]).await;

        let ops = control.ops();
        assert!(ops.contains(&Op::SetProfile {
            session: "s0".into(),
            profile: "Hotkey".into(),
        }));
        assert!(ops.contains(&Op::SetName {
            session: "s0".into(),
            name: "api".into(),
        }));
        // No splits for a single pane.
        assert!(control.splits().is_empty());
    }

    #[tokio::test]
    async fn pane_profile_override_is_used_for_its_split() {
        let control = RecordingControl::new();
        let mut second = pane("2/1/1");
        second.profile = Some("Worker".into());
        render(&control, &[pane("1/1/1"), second]).await;

        assert_eq!(
            control.splits(),
            [Op::Split {
                parent: "s0".into(),
                vertical: true,
                profile: "Worker".into(),
            }]
        );
    }

    #[tokio::test]
    async fn failed_split_is_skipped_and_rendering_continues() {
        let control = RecordingControl::new().fail_split_call(1);
        let sessions = render(&control, &[pane("1/1/1"), pane("2/1/1"), pane("1/2/1")]).await;

        // Column 2's split failed; the row below column 1 still renders.
        assert_eq!(sessions.len(), 2);
        assert!(sessions.contains_key("1/1/1"));
        assert!(sessions.contains_key("1/2/1"));
        assert!(!sessions.contains_key("2/1/1"));
        assert_eq!(control.splits().len(), 2);
    }

    #[tokio::test]
    async fn configure_failure_keeps_the_session_and_continues() {
        let control = RecordingControl::new().fail_color_presets();
        let mut second = pane("2/1/1");
        second.color = Some("Solarized Dark".into());
        let mut third = pane("3/1/1");
        third.commands = vec!["echo ok".into()];
        let sessions = render(&control, &[pane("1/1/1"), second, third]).await;

        // The bad preset only loses 2/1/1's remaining configuration; its
        // session stays in the map and later panes are unaffected.
        assert_eq!(sessions.len(), 3);
        let target = sessions["3/1/1"].clone();
        assert!(control.ops().contains(&Op::SendText {
            session: target,
            text: "echo ok\n".into(),
        }));
    }

    #[tokio::test]
    async fn commands_run_in_the_rendered_session() {
        let control = RecordingControl::new();
        let mut second = pane("2/1/1");
        second.commands = vec!["npm run dev".into()];
        let sessions = render(&control, &[pane("1/1/1"), second]).await;

        let target = sessions["2/1/1"].clone();
        assert!(control.ops().contains(&Op::SendText {
            session: target,
            text: "npm run dev\n".into(),
        }));
    }
}
