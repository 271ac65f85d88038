pub mod dialog;
pub mod keybar;
pub mod layout;
pub mod markdown;
pub mod progress;
pub mod question;
pub mod result;
pub mod sidebar;
pub mod statusbar;
pub mod titlebar;

use ratatui::layout::Rect;
use ratatui::Frame;

use crate::state::{AppState, Screen};

pub fn draw(f: &mut Frame, state: &AppState) {
    let area = f.area();

    match state.screen {
        Screen::Uploading => draw_framed(f, area, state, progress::draw_uploading),
        Screen::Ready => draw_framed(f, area, state, progress::draw_ready),
        Screen::Generating => draw_framed(f, area, state, progress::draw_generating),
        Screen::Failed => draw_framed(f, area, state, progress::draw_failed),
        Screen::Quiz => draw_working(f, area, state),
        Screen::Results => draw_results(f, area, state),
    }

    if state.has_dialog() {
        dialog::draw_dialog(f, area, state);
    }
}

/// Single-panel screens keep the status and key bars.
fn draw_framed(
    f: &mut Frame,
    area: Rect,
    state: &AppState,
    body: fn(&mut Frame, Rect, &AppState),
) {
    let layout = layout::compute_layout(area);
    titlebar::draw_titlebar(f, layout.titlebar, state);
    body(f, layout.body, state);
    statusbar::draw_statusbar(f, layout.statusbar, state);
    keybar::draw_keybar(f, layout.keybar, state);
}

fn draw_working(f: &mut Frame, area: Rect, state: &AppState) {
    let layout = layout::compute_layout(area);

    titlebar::draw_titlebar(f, layout.titlebar, state);
    sidebar::draw_sidebar(f, layout.sidebar, state);
    question::draw_question(f, layout.main, state);
    statusbar::draw_statusbar(f, layout.statusbar, state);
    keybar::draw_keybar(f, layout.keybar, state);
}

fn draw_results(f: &mut Frame, area: Rect, state: &AppState) {
    let layout = layout::compute_layout(area);
    let (score_area, review_area) = layout::split_results(layout.main);

    titlebar::draw_titlebar(f, layout.titlebar, state);
    sidebar::draw_sidebar(f, layout.sidebar, state);
    result::draw_score(f, score_area, state);
    question::draw_question(f, review_area, state);
    statusbar::draw_statusbar(f, layout.statusbar, state);
    keybar::draw_keybar(f, layout.keybar, state);
}

/// Area the question text is drawn into on the current screen.
pub fn question_area(state: &AppState, area: Rect) -> Rect {
    let layout = layout::compute_layout(area);
    match state.screen {
        Screen::Results => layout::split_results(layout.main).1,
        _ => layout.main,
    }
}
