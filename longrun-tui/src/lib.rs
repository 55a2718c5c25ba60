//! Terminal front end for the chat session: a ratatui actor plus the tasks
//! that feed it key events, render ticks and session views.
mod command;
mod feeders;
mod input;
mod keys;
mod styles;
mod transcript;
mod tui;
mod view;

pub use feeders::spawn_tui_feeders;
pub use tui::{Landing, TuiActor, TuiMsg};
