//! Application state management for Coindash
//!
//! This module contains the dashboard state: the current asset list, the search
//! query, and the load lifecycle (Idle, Loading, Ready, Error). Keyboard input and
//! load results drive every transition.

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::DashboardConfig;
use crate::data::{build_view, AssetRecord, ViewOptions};
use crate::refresh::{LoadKind, RefreshMessage};

/// Load lifecycle of the dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing requested yet
    Idle,
    /// Initial load or manual refresh in flight
    Loading,
    /// Data present
    Ready,
    /// Last load failed; carries the user-facing message
    Error(String),
}

/// Main application struct managing state and data
pub struct App {
    /// Current load state
    pub state: LoadState,
    /// Full upstream list from the last successful load
    pub records: Vec<AssetRecord>,
    /// Current search text
    pub query: String,
    /// Timestamp of last successful load
    pub last_refresh: Option<DateTime<Local>>,
    /// Flag indicating a refresh has been requested
    pub refresh_requested: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Advances on each tick; drives the loading animation
    pub spinner_frame: usize,
    view_options: ViewOptions,
    keep_data_on_error: bool,
}

impl App {
    /// Creates a new App in the Idle state
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            state: LoadState::Idle,
            records: Vec::new(),
            query: String::new(),
            last_refresh: None,
            refresh_requested: false,
            show_help: false,
            should_quit: false,
            spinner_frame: 0,
            view_options: config.view_options(),
            keep_data_on_error: config.keep_data_on_error,
        }
    }

    /// The assets to display for the current query
    pub fn visible_assets(&self) -> Vec<AssetRecord> {
        build_view(&self.records, &self.query, &self.view_options)
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    /// Enters Loading; returns false if a load is already in flight
    pub fn begin_load(&mut self) -> bool {
        if self.is_loading() {
            return false;
        }
        self.state = LoadState::Loading;
        true
    }

    /// Consumes a pending refresh request, entering Loading if one should start
    pub fn take_refresh_request(&mut self) -> bool {
        if !std::mem::take(&mut self.refresh_requested) {
            return false;
        }
        self.begin_load()
    }

    /// Applies the result of a load
    ///
    /// Success replaces the list wholesale. Failure moves to Error and, unless
    /// configured to keep it, drops the previous list. A failed manual refresh
    /// is worded as such so it reads differently from a failed startup load.
    pub fn apply_refresh(&mut self, message: RefreshMessage) {
        match message {
            RefreshMessage::Completed { records, .. } => {
                self.records = records;
                self.last_refresh = Some(Local::now());
                self.state = LoadState::Ready;
            }
            RefreshMessage::Failed { kind, message } => {
                if !self.keep_data_on_error {
                    self.records.clear();
                }
                let message = match kind {
                    LoadKind::Initial => message,
                    LoadKind::Manual => format!("Refresh failed. {}", message),
                };
                self.state = LoadState::Error(message);
            }
        }
    }

    /// Advances the loading animation
    pub fn tick(&mut self) {
        if self.is_loading() {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - Printable characters: edit the search query
    /// - `Backspace`: delete the last query character
    /// - `Esc`: close help, else clear the query, else quit
    /// - `Ctrl-r` / `F5`: refresh from upstream
    /// - `Enter`: retry after an error, or when nothing is shown for an empty query
    /// - `?` (empty query) / `F1`: toggle help
    /// - `Ctrl-c`: quit
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && key_event.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        // Help overlay intercepts all other keys when shown
        if self.show_help {
            if matches!(
                key_event.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::F(1)
            ) {
                self.show_help = false;
            }
            return;
        }

        match key_event.code {
            KeyCode::Char('r') if ctrl => {
                self.refresh_requested = true;
            }
            KeyCode::F(5) => {
                self.refresh_requested = true;
            }
            KeyCode::F(1) => {
                self.show_help = true;
            }
            KeyCode::Char('?') if self.query.is_empty() => {
                self.show_help = true;
            }
            KeyCode::Char(c) if !ctrl => {
                self.query.push(c);
            }
            KeyCode::Backspace => {
                self.query.pop();
            }
            KeyCode::Esc => {
                if self.query.is_empty() {
                    self.should_quit = true;
                } else {
                    self.query.clear();
                }
            }
            KeyCode::Enter => {
                let nothing_shown = self.query.is_empty() && self.visible_assets().is_empty();
                if matches!(self.state, LoadState::Error(_)) || nothing_shown {
                    self.refresh_requested = true;
                }
            }
            _ => {}
        }
    }
}
