use ratatui::layout::{Constraint, Layout, Rect};

/// Width of the question list; fits "▸ ✓ Question 5  B".
pub const SIDEBAR_WIDTH: u16 = 24;
const SCORE_BOX_HEIGHT: u16 = 7;

pub struct QuizLayout {
    pub titlebar: Rect,
    /// Everything between the title and status bars. Single-panel screens
    /// (upload, generate, failure) draw here.
    pub body: Rect,
    pub sidebar: Rect,
    pub main: Rect,
    pub statusbar: Rect,
    pub keybar: Rect,
}

pub fn compute_layout(area: Rect) -> QuizLayout {
    let [titlebar, body, statusbar, keybar] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(5),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    let [sidebar, main] =
        Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)]).areas(body);

    QuizLayout {
        titlebar,
        body,
        sidebar,
        main,
        statusbar,
        keybar,
    }
}

/// Split the main panel into the score box and the question review below it.
pub fn split_results(main: Rect) -> (Rect, Rect) {
    let [score, review] =
        Layout::vertical([Constraint::Length(SCORE_BOX_HEIGHT), Constraint::Min(3)]).areas(main);
    (score, review)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bars_take_one_row_each() {
        let layout = compute_layout(Rect::new(0, 0, 100, 30));
        assert_eq!(layout.titlebar.height, 1);
        assert_eq!(layout.statusbar.y, 28);
        assert_eq!(layout.keybar.y, 29);
        assert_eq!(layout.body.height, 27);
        assert_eq!(layout.sidebar.width, SIDEBAR_WIDTH);
        assert_eq!(layout.main.x, SIDEBAR_WIDTH);
        assert_eq!(layout.main.width, 100 - SIDEBAR_WIDTH);
    }

    #[test]
    fn test_results_split() {
        let (score, review) = split_results(Rect::new(24, 1, 76, 27));
        assert_eq!(score.height, SCORE_BOX_HEIGHT);
        assert_eq!(review.y, 1 + SCORE_BOX_HEIGHT);
        assert_eq!(review.height, 27 - SCORE_BOX_HEIGHT);
    }
}
