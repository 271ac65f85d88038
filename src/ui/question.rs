use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};
use ratatui::Frame;

use crate::model::Mcq;
use crate::state::AppState;
use crate::ui::markdown::markdown_to_lines;

/// Maps content lines to clickable options for mouse handling.
pub struct QuestionHitMap {
    /// (first_content_line, option_index) for each option.
    pub option_lines: Vec<(usize, usize)>,
    /// First line after the last option.
    pub options_end: usize,
}

impl QuestionHitMap {
    pub fn option_at(&self, content_line: usize) -> Option<usize> {
        if content_line >= self.options_end {
            return None;
        }
        self.option_lines
            .iter()
            .rev()
            .find(|(start, _)| content_line >= *start)
            .map(|&(_, idx)| idx)
    }
}

pub fn compute_hit_map(state: &AppState, area: Rect) -> Option<QuestionHitMap> {
    let question = state.current_question()?;
    let (_, hit_map) = build_lines(state, question, area.width);
    Some(hit_map)
}

/// The scroll offset the question panel actually shows in `area`.
///
/// `question_scroll` may run past the end of the content (PageDown has no
/// notion of panel height); drawing and click hit-testing both go through
/// this so a click lands on the line that is on screen.
pub fn visible_scroll(state: &AppState, area: Rect) -> usize {
    let Some(question) = state.current_question() else {
        return 0;
    };
    let (lines, _) = build_lines(state, question, area.width);
    clamp_scroll(state.question_scroll, lines.len(), area.height)
}

fn clamp_scroll(scroll: usize, content_lines: usize, height: u16) -> usize {
    scroll.min(content_lines.saturating_sub(height as usize))
}

/// Wrap a styled Line at `width`, preserving span styles across breaks.
fn wrap_styled_line(line: Line<'static>, width: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return vec![line];
    }

    let total_width: usize = line.spans.iter().map(|s| s.content.chars().count()).sum();
    if total_width <= width {
        return vec![line];
    }

    let mut chars: Vec<(char, Style)> = Vec::new();
    for span in &line.spans {
        for c in span.content.chars() {
            chars.push((c, span.style));
        }
    }

    let mut result: Vec<Line<'static>> = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        if chars.len() - pos <= width {
            result.push(styled_chars_to_line(&chars[pos..]));
            break;
        }

        let chunk_end = pos + width;
        let break_at = if chars[chunk_end].0 == ' ' {
            chunk_end
        } else if let Some(sp) = chars[pos..chunk_end].iter().rposition(|(c, _)| *c == ' ') {
            if sp > 0 { pos + sp } else { chunk_end }
        } else {
            chunk_end
        };

        result.push(styled_chars_to_line(&chars[pos..break_at]));
        pos = break_at;
        if pos < chars.len() && chars[pos].0 == ' ' {
            pos += 1;
        }
    }

    if result.is_empty() {
        result.push(Line::from(""));
    }

    result
}

/// Rebuild a Line from (char, style) pairs, grouping runs of one style into a span.
fn styled_chars_to_line(chars: &[(char, Style)]) -> Line<'static> {
    if chars.is_empty() {
        return Line::from("");
    }

    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut current_text = String::new();
    let mut current_style = chars[0].1;

    for &(c, style) in chars {
        if style != current_style && !current_text.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut current_text), current_style));
        }
        current_style = style;
        current_text.push(c);
    }
    if !current_text.is_empty() {
        spans.push(Span::styled(current_text, current_style));
    }

    Line::from(spans)
}

/// Wrap text to fit within `width` columns, breaking at word boundaries.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }
    let mut result = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            result.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        result.push(current);
    }
    if result.is_empty() {
        result.push(String::new());
    }
    result
}

fn indent_wrapped(lines: &mut Vec<Line<'static>>, source: Vec<Line<'static>>, width: usize) {
    for line in source {
        if line.width() == 0 {
            lines.push(line);
            continue;
        }
        for wline in wrap_styled_line(line, width) {
            lines.push(Line::from(
                std::iter::once(Span::raw("  "))
                    .chain(wline.spans)
                    .collect::<Vec<_>>(),
            ));
        }
    }
}

fn build_lines(
    state: &AppState,
    question: &Mcq,
    width: u16,
) -> (Vec<Line<'static>>, QuestionHitMap) {
    let qidx = state.current_question;
    let total = state.session.total();
    let answer = state.session.answer(qidx);
    let result = state.session.report().and_then(|r| r.result_for(qidx));
    let scored = result.is_some();
    let wrap_width = (width as usize).saturating_sub(4);

    let mut lines: Vec<Line<'static>> = Vec::new();

    lines.push(Line::from(Span::styled(
        format!("  Question {} of {}:", qidx + 1, total),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    indent_wrapped(&mut lines, markdown_to_lines(&question.question), wrap_width);
    if lines.last().is_some_and(|l| l.width() > 0) {
        lines.push(Line::from(""));
    }

    let mut option_lines = Vec::new();
    for (i, option) in question.options.iter().enumerate() {
        option_lines.push((lines.len(), i));

        let is_selected = answer == Some(option.as_str());
        let is_correct = *option == question.correct_answer;
        let is_cursor = !scored && answer.is_none() && i == state.option_cursor;

        let radio = if is_selected { "(●)" } else { "( )" };
        let marker = if is_cursor { "▸" } else { " " };
        let style = if scored && is_correct {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else if scored && is_selected {
            Style::default().fg(Color::Red)
        } else if is_selected {
            Style::default().fg(Color::LightBlue).add_modifier(Modifier::BOLD)
        } else if answer.is_some() {
            Style::default().fg(Color::DarkGray)
        } else if is_cursor {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let prefix = format!(" {}{} {}. ", marker, radio, Mcq::option_letter(i));
        let prefix_len = prefix.chars().count();
        let text_width = (width as usize).saturating_sub(prefix_len + 2);
        for (li, wline) in wrap_text(option, text_width).into_iter().enumerate() {
            let lead = if li == 0 {
                Span::styled(prefix.clone(), style)
            } else {
                Span::raw(" ".repeat(prefix_len))
            };
            lines.push(Line::from(vec![lead, Span::styled(wline, style)]));
        }
    }
    let options_end = lines.len();

    if let Some(result) = result {
        lines.push(Line::from(""));
        let verdict = if result.is_correct {
            Span::styled(
                "  ✓ Correct",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(
                format!("  ✗ Incorrect. Answer: {}", result.correct_answer),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )
        };
        lines.push(Line::from(verdict));

        if !question.explanation.trim().is_empty() {
            lines.push(Line::from(""));
            let explanation: Vec<Line<'static>> = markdown_to_lines(&question.explanation)
                .into_iter()
                .map(|l| l.style(Style::default().fg(Color::Yellow)))
                .collect();
            indent_wrapped(&mut lines, explanation, wrap_width);
        }
    } else if answer.is_some() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  Answer locked in.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    if let Some(check) = state.server_checks.get(&qidx) {
        if scored {
            let text = if check.correct {
                "  Server agrees: correct"
            } else {
                "  Server recorded: incorrect"
            };
            lines.push(Line::from(Span::styled(
                text,
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    (
        lines,
        QuestionHitMap {
            option_lines,
            options_end,
        },
    )
}

pub fn draw_question(f: &mut Frame, area: Rect, state: &AppState) {
    let Some(question) = state.current_question() else {
        let p = Paragraph::new("No questions").block(Block::default().borders(Borders::ALL));
        f.render_widget(p, area);
        return;
    };

    let (lines, _) = build_lines(state, question, area.width);

    let total_content_lines = lines.len();
    let visible_height = area.height as usize;
    let scroll = clamp_scroll(state.question_scroll, total_content_lines, area.height);
    let display_lines: Vec<Line> = lines.into_iter().skip(scroll).collect();

    f.render_widget(Paragraph::new(display_lines), area);

    if total_content_lines > visible_height {
        let mut scrollbar_state = ScrollbarState::new(total_content_lines)
            .position(scroll)
            .viewport_content_length(visible_height);
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
        f.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
    }
}
