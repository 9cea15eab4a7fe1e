//! # Termweave
//!
//! An iTerm2 layout orchestrator that builds tabs and split panes from YAML
//! configuration.
//!
//! Termweave automates the reconstruction of terminal workspaces. Describe
//! your tabs, pane positions, working directories, and startup commands in a
//! config file, then bring the whole layout up with a single command.
//!
//! ## Features
//!
//! - **Positional splits**: Panes are addressed as `column/row/column-in-row`
//!   and materialized through chained vertical and horizontal splits
//! - **Badges and colors**: Themed iTerm2 badges and color presets per pane
//! - **Tool hooks**: git, docker, and VS Code integrations contribute setup
//!   commands ahead of a pane's own command list
//! - **Global profiles**: Save configs under `~/.termweave/profiles` and run
//!   them from anywhere with `--profile`
//! - **Includes and interpolation**: `!include` composition and `${NAME}`
//!   environment expansion inside the YAML
//!
//! ## Quick Example
//!
//! ```yaml
//! # ./termweave.yml
//!
//! profile: Default
//! tabs:
//!   servers:
//!     title: Servers
//!     root: ~/src/myproject
//!     panes:
//!       - position: 1/1
//!         badge: { text: api, theme: success }
//!         commands: [cargo watch -x run]
//!       - position: 2/1
//!         commands: [npm run dev]
//! ```
//!
//! ## Architecture
//!
//! The crate is organized into these modules:
//!
//! - [`config`]: YAML configuration records and defaults
//! - [`cli`]: Command-line argument parsing with clap
//! - [`loader`]: Config loading, `!include` resolution, profile merging
//! - [`interpolate`]: `${NAME}` environment-variable expansion
//! - [`position`]: Positional pane addresses
//! - [`layout`]: Grouping panes into a column/row/slot index
//! - [`renderer`]: Turning a layout index into live split sessions
//! - [`commands`]: Command dispatch into rendered sessions
//! - [`theme`]: Badge theme table
//! - [`iterm`]: The iTerm2 scripting boundary
//! - [`tools`]: Development tool hooks
//! - [`profiles`]: Global profile store
//! - [`wizard`]: Interactive config creation
//! - [`app`]: Top-level orchestration
//! - [`error`]: Error types

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod interpolate;
pub mod iterm;
pub mod layout;
pub mod loader;
pub mod position;
pub mod profiles;
pub mod renderer;
pub mod theme;
pub mod tools;
pub mod wizard;

pub use config::{Badge, Config, PaneConfig, TabConfig, Tabs};
pub use error::{Result, TermweaveError};
