use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::model::ScoreClass;
use crate::state::AppState;

pub fn class_color(class: ScoreClass) -> Color {
    match class {
        ScoreClass::Excellent => Color::Green,
        ScoreClass::Good => Color::LightBlue,
        ScoreClass::Average => Color::Yellow,
        ScoreClass::NeedsImprovement => Color::Red,
    }
}

pub fn draw_score(f: &mut Frame, area: Rect, state: &AppState) {
    let Some(report) = state.session.report() else {
        return;
    };
    let color = class_color(report.class);

    let lines = vec![
        Line::from(Span::styled(
            "Quiz Results",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "Your Score: {}/{} ({}%)",
                report.score,
                report.total,
                format_percentage(report.percentage)
            ),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            report.feedback_message(),
            Style::default().fg(color),
        )),
        Line::from(""),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", report.class.as_str()))
        .border_style(Style::default().fg(color));
    let widget = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center);
    f.render_widget(widget, area);
}

/// Whole percentages print without a fraction, like "80".
pub fn format_percentage(percentage: f64) -> String {
    if percentage.fract() == 0.0 {
        format!("{}", percentage as i64)
    } else {
        format!("{:.1}", percentage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(80.0), "80");
        assert_eq!(format_percentage(0.0), "0");
        assert_eq!(format_percentage(200.0 / 3.0), "66.7");
    }
}
