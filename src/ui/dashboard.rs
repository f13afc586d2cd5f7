//! Dashboard screen rendering
//!
//! Renders the header, search bar, error banner, and one card per visible asset.
//! While the first load is in flight, placeholder cards are drawn instead.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, LoadState};
use crate::data::format::{format_change, format_market_cap, format_price, ChangeDirection};
use crate::data::AssetRecord;

/// Height of one asset card including borders
const CARD_HEIGHT: u16 = 5;

/// Number of placeholder cards shown while loading
const SKELETON_CARDS: usize = 5;

/// Frames for the refresh spinner
const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

/// Renders the complete dashboard
pub fn render_dashboard(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let error_height = if matches!(app.state, LoadState::Error(_)) { 4 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(error_height),
            Constraint::Min(CARD_HEIGHT),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, app, chunks[0]);
    render_search(frame, app, chunks[1]);
    if let LoadState::Error(message) = &app.state {
        render_error(frame, message, chunks[2]);
    }

    let visible = app.visible_assets();
    if app.is_loading() && app.records.is_empty() {
        render_skeletons(frame, app, chunks[3]);
    } else if visible.is_empty() {
        render_empty(frame, app, chunks[3]);
    } else {
        render_cards(frame, &visible, chunks[3]);
    }

    render_footer(frame, chunks[4]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let status = if app.is_loading() {
        Span::styled(
            format!("{} Refreshing...", SPINNER[app.spinner_frame % SPINNER.len()]),
            Style::default().fg(Color::Yellow),
        )
    } else if let Some(last) = app.last_refresh {
        Span::styled(
            format!("Updated {}", last.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::raw("")
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(
                "Crypto Dashboard",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            status,
        ]),
        Line::from(Span::styled(
            "Live prices for tracked cryptocurrencies",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_search(frame: &mut Frame, app: &App, area: Rect) {
    let content = if app.query.is_empty() {
        Span::styled("Search cryptocurrency...", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(app.query.clone())
    };

    let search = Paragraph::new(Line::from(content)).block(
        Block::default()
            .title(" Search ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray)),
    );
    frame.render_widget(search, area);
}

fn render_error(frame: &mut Frame, message: &str, area: Rect) {
    let lines = vec![
        Line::from("Failed to fetch cryptocurrency data. Please try again later."),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let banner = Paragraph::new(lines).block(
        Block::default()
            .title(" Error ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );
    frame.render_widget(banner, area);
}

/// Splits `area` into as many card rows as fit
fn card_slots(area: Rect, count: usize) -> Vec<Rect> {
    let fit = (area.height / CARD_HEIGHT) as usize;
    let shown = count.min(fit);
    let mut constraints = vec![Constraint::Length(CARD_HEIGHT); shown];
    constraints.push(Constraint::Min(0));

    Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area)
        .iter()
        .take(shown)
        .copied()
        .collect()
}

fn render_cards(frame: &mut Frame, assets: &[AssetRecord], area: Rect) {
    for (asset, slot) in assets.iter().zip(card_slots(area, assets.len())) {
        frame.render_widget(asset_card(asset), slot);
    }
}

fn asset_card(asset: &AssetRecord) -> Paragraph<'static> {
    let (change, direction) = format_change(asset);
    let (arrow, color) = match direction {
        Some(ChangeDirection::Up) => ("\u{25B2} ", Color::Green),
        Some(ChangeDirection::Down) => ("\u{25BC} ", Color::Red),
        None => ("", Color::Gray),
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(
                format_price(asset),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("   "),
            Span::styled(format!("{}{}", arrow, change), Style::default().fg(color)),
            Span::styled(" 24h", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(Span::styled(
            format!("Market Cap: {}", format_market_cap(asset)),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            format!("Rank #{}", asset.rank),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let title = format!(" {} {} ", asset.name, asset.symbol.to_uppercase());
    Paragraph::new(lines).block(
        Block::default()
            .title(Span::styled(title, Style::default().fg(Color::Cyan)))
            .borders(Borders::ALL),
    )
}

fn render_skeletons(frame: &mut Frame, app: &App, area: Rect) {
    // Shift the shading each frame so the placeholders pulse
    let shade = if app.spinner_frame % 2 == 0 {
        Color::DarkGray
    } else {
        Color::Gray
    };
    for slot in card_slots(area, SKELETON_CARDS) {
        let bar_width = slot.width.saturating_sub(4) as usize;
        let lines = vec![
            Line::from(Span::styled("\u{2591}".repeat(bar_width / 2), Style::default().fg(shade))),
            Line::from(Span::styled("\u{2591}".repeat(bar_width / 3), Style::default().fg(shade))),
            Line::from(Span::styled("\u{2591}".repeat(bar_width / 4), Style::default().fg(shade))),
        ];
        let card = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(card, slot);
    }
}

fn render_empty(frame: &mut Frame, app: &App, area: Rect) {
    let lines = if app.query.is_empty() {
        vec![
            Line::from("No cryptocurrency data available"),
            Line::from(Span::styled(
                "Press Enter to try refreshing",
                Style::default().fg(Color::DarkGray),
            )),
        ]
    } else {
        vec![
            Line::from(format!("No cryptocurrencies found matching {}", app.query)),
            Line::from(Span::styled(
                "Press Esc to clear search",
                Style::default().fg(Color::DarkGray),
            )),
        ]
    };

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(Span::styled(
        "type to search \u{2022} Ctrl-r refresh \u{2022} ? help \u{2022} Esc quit",
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(footer, area);
}
