use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::state::{AppState, StatusKind};

const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

fn spinner(state: &AppState) -> &'static str {
    let ticks = state
        .request_started
        .map(|t| t.elapsed().as_millis() / 250)
        .unwrap_or(0);
    SPINNER[(ticks % SPINNER.len() as u128) as usize]
}

fn render_centered(f: &mut Frame, area: Rect, lines: Vec<Line>) {
    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

pub fn draw_uploading(f: &mut Frame, area: Rect, state: &AppState) {
    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            format!("Selected: {}", state.file_name()),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} Uploading...", spinner(state)),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
    ];
    render_centered(f, area, lines);
}

pub fn draw_ready(f: &mut Frame, area: Rect, state: &AppState) {
    let material_line = state
        .material
        .as_ref()
        .map(|m| format!("Material {}", m.id))
        .unwrap_or_default();

    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            state.file_name(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(material_line, Style::default().fg(Color::DarkGray))),
        Line::from(""),
        Line::from("Press [g] to generate questions."),
        Line::from(""),
        Line::from(Span::styled(
            "[g] Generate   [u] Upload again   [q] Quit",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];
    render_centered(f, area, lines);
}

pub fn draw_generating(f: &mut Frame, area: Rect, state: &AppState) {
    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            state.file_name(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} Generating questions... {}s", spinner(state), state.elapsed_secs()),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "This can take a minute for long documents.",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];
    render_centered(f, area, lines);
}

pub fn draw_failed(f: &mut Frame, area: Rect, state: &AppState) {
    let message = state
        .status
        .as_ref()
        .filter(|s| s.kind == StatusKind::Error)
        .map(|s| s.text.clone())
        .unwrap_or_else(|| "Something went wrong.".to_string());

    let hint = if state.material.is_some() {
        "[g] Generate again   [u] Upload again   [q] Quit"
    } else {
        "[u] Upload again   [q] Quit"
    };

    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "✗  Request Failed",
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(message),
        Line::from(""),
        Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))),
        Line::from(""),
    ];
    render_centered(f, area, lines);
}
