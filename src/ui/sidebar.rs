use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::model::Mcq;
use crate::state::{AppState, QuestionStatus};

pub fn draw_sidebar(f: &mut Frame, area: Rect, state: &AppState) {
    let mut lines: Vec<Line> = Vec::new();
    let current = state.current_question;

    for (qi, question) in state.session.questions().iter().enumerate() {
        let status = state.question_status(qi);
        let (icon, color) = match status {
            QuestionStatus::Unanswered => ("○", Color::White),
            QuestionStatus::Answered => ("◐", Color::LightBlue),
            QuestionStatus::Correct => ("✓", Color::Green),
            QuestionStatus::Incorrect => ("✗", Color::Red),
        };

        let is_current = qi == current;
        let style = if is_current {
            Style::default()
                .fg(Color::White)
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let picked = state
            .session
            .answer(qi)
            .and_then(|a| question.option_index(a))
            .map(|i| format!("  {}", Mcq::option_letter(i)))
            .unwrap_or_default();

        lines.push(Line::from(vec![
            Span::styled(if is_current { " ▸ " } else { "   " }.to_string(), style),
            Span::styled(format!("{} ", icon), style.fg(color)),
            Span::styled(format!("Question {}", qi + 1), style),
            Span::styled(picked, style.fg(Color::DarkGray)),
        ]));
    }

    let block = Block::default()
        .borders(Borders::RIGHT)
        .title(format!(" {} Questions ", state.session.total()))
        .title_style(Style::default().add_modifier(Modifier::BOLD));

    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// Map a click row inside the sidebar to a question index.
pub fn question_at_row(state: &AppState, area: Rect, row: u16) -> Option<usize> {
    // First row is the block title
    let rel = row.checked_sub(area.y + 1)? as usize;
    (rel < state.session.total()).then_some(rel)
}
