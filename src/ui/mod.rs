//! UI rendering module for Coindash
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod dashboard;
pub mod help_overlay;

pub use dashboard::render_dashboard;
pub use help_overlay::render as render_help_overlay;

use ratatui::Frame;

use crate::app::App;

/// Renders the UI based on the current application state
pub fn render(frame: &mut Frame, app: &App) {
    render_dashboard(frame, app);
    if app.show_help {
        render_help_overlay(frame);
    }
}
