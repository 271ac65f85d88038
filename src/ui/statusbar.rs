use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::state::{AppState, StatusKind};

pub fn draw_statusbar(f: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = vec![Span::raw(" ")];

    if let Some(status) = &state.status {
        let color = match status.kind {
            StatusKind::Success => Color::Green,
            StatusKind::Error => Color::Red,
            StatusKind::Info => Color::White,
        };
        spans.push(Span::styled(status.text.clone(), Style::default().fg(color)));
        spans.push(Span::raw("   "));
    }

    if let Some(path) = &state.exported_to {
        spans.push(Span::styled(
            format!("saved {}", path.display()),
            Style::default().fg(Color::DarkGray),
        ));
        spans.push(Span::raw("   "));
    }

    spans.push(Span::styled("[?] help", Style::default().fg(Color::DarkGray)));

    let widget =
        Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Rgb(30, 30, 30)));
    f.render_widget(widget, area);
}
