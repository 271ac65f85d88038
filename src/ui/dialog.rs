use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::state::{AppState, Dialog};

pub fn draw_dialog(f: &mut Frame, area: Rect, state: &AppState) {
    let Some(dialog) = state.top_dialog() else {
        return;
    };

    match dialog {
        Dialog::ConfirmQuit => draw_confirm_quit(f, area, state),
        Dialog::Help => draw_help(f, area),
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn draw_confirm_quit(f: &mut Frame, area: Rect, state: &AppState) {
    let remaining = state
        .session
        .total()
        .saturating_sub(state.session.answered_count());
    let detail = if state.session.is_scored() || state.session.total() == 0 {
        "   Nothing will be kept.".to_string()
    } else {
        format!("   {} questions are unanswered.", remaining)
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Quit?",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(detail),
        Line::from(""),
        Line::from(vec![
            Span::styled("   [Enter] Confirm", Style::default().fg(Color::Green)),
            Span::raw("    "),
            Span::styled("[Esc] Cancel", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(""),
    ];

    let rect = centered_rect(40, lines.len() as u16 + 2, area);
    f.render_widget(Clear, rect);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    f.render_widget(Paragraph::new(lines).block(block), rect);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Key Bindings",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("   arrows     Previous/Next question"),
        Line::from("   a-d, 1-4   Answer (first answer is final)"),
        Line::from("   j/k        Move option cursor"),
        Line::from("   Enter      Answer with option under cursor"),
        Line::from("   s          Score (all questions answered)"),
        Line::from("   n          Try another quiz"),
        Line::from("   e          Export scored report"),
        Line::from("   g          Generate questions"),
        Line::from("   u          Upload the file again"),
        Line::from("   q, Ctrl+Q  Quit"),
        Line::from("   ?          This help"),
        Line::from(""),
        Line::from(Span::styled(
            "        [Esc] Close",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];

    let rect = centered_rect(50, lines.len() as u16 + 2, area);
    f.render_widget(Clear, rect);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(Paragraph::new(lines).block(block), rect);
}
