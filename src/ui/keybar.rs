use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::state::{AppState, Screen};

pub fn bindings_for(state: &AppState) -> Vec<(&'static str, &'static str)> {
    match state.screen {
        Screen::Quiz if state.session.is_complete() => vec![
            ("s", "score"),
            ("arrows", "prev/next"),
            ("?", "help"),
            ("q", "quit"),
        ],
        Screen::Quiz => vec![
            ("a-d", "answer"),
            ("j/k", "move"),
            ("Enter", "pick"),
            ("arrows", "prev/next"),
            ("?", "help"),
            ("q", "quit"),
        ],
        Screen::Results => vec![
            ("arrows", "review"),
            ("n", "try another quiz"),
            ("e", "export"),
            ("q", "quit"),
        ],
        Screen::Ready => vec![("g", "generate"), ("u", "re-upload"), ("q", "quit")],
        Screen::Failed => vec![("u", "upload"), ("g", "generate"), ("q", "quit")],
        Screen::Uploading | Screen::Generating => vec![("q", "quit")],
    }
}

pub fn draw_keybar(f: &mut Frame, area: Rect, state: &AppState) {
    let mut spans: Vec<Span> = vec![Span::raw(" ")];
    for (i, (key, action)) in bindings_for(state).iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("   "));
        }
        spans.push(Span::styled(
            key.to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!(" {}", action)));
    }

    let widget =
        Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Rgb(20, 20, 20)));
    f.render_widget(widget, area);
}
