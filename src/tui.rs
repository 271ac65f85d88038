use std::io;
use std::sync::mpsc;
use std::time::Duration;

use ratatui::crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::Rect;
use ratatui::prelude::CrosstermBackend;
use ratatui::Terminal;
use tracing::{debug, info, warn};

use crate::client::QuizClient;
use crate::error::Result;
use crate::export::{self, ScoredAttempt};
use crate::state::*;
use crate::ui::question;
use crate::worker::{self, AnswerReport, NetEvent};

/// What the UI loop needs besides its state: a client for new requests and
/// the channel workers report back on.
pub struct Runtime {
    pub client: QuizClient,
    pub tx: mpsc::Sender<NetEvent>,
}

impl Runtime {
    fn upload(&self, state: &mut AppState) {
        if state.begin_upload() {
            worker::spawn_upload(self.client.clone(), state.source_path.clone(), self.tx.clone());
        }
    }

    fn generate(&self, state: &mut AppState) {
        if let Some(material_id) = state.begin_generate() {
            worker::spawn_generate(self.client.clone(), material_id, self.tx.clone());
        }
    }

    fn report(&self, state: &AppState, question_index: usize, answer: String) {
        let (Some(user_id), Some(material)) = (&state.user_id, &state.material) else {
            return;
        };
        let report = AnswerReport {
            attempt: state.attempt,
            material_id: material.id.clone(),
            user_id: user_id.clone(),
            question_index,
            answer,
        };
        worker::spawn_report(self.client.clone(), report, self.tx.clone());
    }
}

pub fn run_tui(
    mut state: AppState,
    runtime: Runtime,
    rx: mpsc::Receiver<NetEvent>,
) -> Result<AppState> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    runtime.upload(&mut state);
    let result = main_loop(&mut terminal, &mut state, &runtime, &rx);

    // Restore terminal
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture).ok();
    terminal.show_cursor().ok();

    result.map(|()| state)
}

fn main_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    runtime: &Runtime,
    rx: &mpsc::Receiver<NetEvent>,
) -> Result<()> {
    loop {
        terminal.draw(|f| crate::ui::draw(f, state))?;

        if state.should_quit {
            break;
        }

        // Poll for input events
        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key(key, state, runtime);
                }
                Event::Mouse(mouse) => {
                    let size = terminal.size()?;
                    handle_mouse(mouse, state, Rect::new(0, 0, size.width, size.height), runtime);
                }
                _ => {}
            }
        }

        while let Ok(ev) = rx.try_recv() {
            handle_net(ev, state);
        }
    }

    Ok(())
}

pub fn handle_net(event: NetEvent, state: &mut AppState) {
    match event {
        NetEvent::Uploaded(material) => state.on_uploaded(material),
        NetEvent::UploadFailed(e) => state.on_upload_failed(&e),
        NetEvent::Generated(generated) => state.on_generated(generated),
        NetEvent::GenerateFailed(e) => state.on_generate_failed(&e),
        NetEvent::AnswerReported {
            attempt,
            question_index,
            check,
        } => {
            debug!(question_index, correct = check.correct, "server checked answer");
            state.on_answer_checked(attempt, question_index, check);
        }
        NetEvent::ReportFailed { .. } => {}
    }
}

pub fn handle_key(key: KeyEvent, state: &mut AppState, runtime: &Runtime) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if state.has_dialog() {
        handle_dialog_key(key, state);
        return;
    }

    if ctrl && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }
    if key.code == KeyCode::Char('q') || (ctrl && key.code == KeyCode::Char('q')) {
        request_quit(state);
        return;
    }
    if key.code == KeyCode::Char('?') {
        state.push_dialog(Dialog::Help);
        return;
    }

    match state.screen {
        Screen::Uploading | Screen::Generating => {}
        Screen::Ready | Screen::Failed => match key.code {
            KeyCode::Char('g') | KeyCode::Enter => runtime.generate(state),
            KeyCode::Char('u') => runtime.upload(state),
            _ => {}
        },
        Screen::Quiz => {
            if let Some((qidx, answer)) = handle_quiz_key(key, state) {
                runtime.report(state, qidx, answer);
            }
        }
        Screen::Results => handle_results_key(key, state),
    }
}

fn request_quit(state: &mut AppState) {
    if state.screen == Screen::Quiz && state.session.answered_count() > 0 {
        state.push_dialog(Dialog::ConfirmQuit);
    } else {
        state.should_quit = true;
    }
}

/// Returns (question, answer) when a new answer was recorded.
fn handle_quiz_key(key: KeyEvent, state: &mut AppState) -> Option<(usize, String)> {
    let options = state.option_count();
    let pick = match key.code {
        KeyCode::Up | KeyCode::Left => {
            state.navigate_prev();
            None
        }
        KeyCode::Down | KeyCode::Right => {
            state.navigate_next();
            None
        }
        KeyCode::Char('k') => {
            state.option_cursor = state.option_cursor.saturating_sub(1);
            None
        }
        KeyCode::Char('j') => {
            if state.option_cursor + 1 < options {
                state.option_cursor += 1;
            }
            None
        }
        KeyCode::Enter | KeyCode::Char(' ') => Some(state.option_cursor),
        KeyCode::Char('s') => {
            score_and_export(state);
            None
        }
        KeyCode::Char(c @ 'a'..='d') => Some((c as u8 - b'a') as usize),
        KeyCode::Char(c @ '1'..='9') => Some((c as u8 - b'1') as usize),
        KeyCode::PageUp => {
            state.question_scroll = state.question_scroll.saturating_sub(5);
            None
        }
        KeyCode::PageDown => {
            state.question_scroll += 5;
            None
        }
        _ => None,
    }?;

    if pick >= options {
        return None;
    }
    let qidx = state.current_question;
    let answer = state.select_option(pick)?;

    // Move on to the next unanswered question
    if let Some(next) = (0..state.session.total()).find(|&i| state.session.answer(i).is_none()) {
        state.navigate_to(next);
    }
    Some((qidx, answer))
}

fn handle_results_key(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Up | KeyCode::Left => state.navigate_prev(),
        KeyCode::Down | KeyCode::Right => state.navigate_next(),
        KeyCode::PageUp => state.question_scroll = state.question_scroll.saturating_sub(5),
        KeyCode::PageDown => state.question_scroll += 5,
        KeyCode::Char('n') => {
            info!("starting another quiz");
            state.try_another();
        }
        KeyCode::Char('e') => export_results(state),
        _ => {}
    }
}

fn score_and_export(state: &mut AppState) {
    if state.score().is_some() && state.export_path.is_some() {
        export_results(state);
    }
}

fn export_results(state: &mut AppState) {
    let (Some(report), Some(material)) = (state.session.report(), state.material.as_ref()) else {
        return;
    };
    let started = state.started_at.unwrap_or_else(chrono::Utc::now);
    let scored = state.scored_at.unwrap_or_else(chrono::Utc::now);
    let attempt = ScoredAttempt::build(material, &state.session, report, started, scored);

    let path = state
        .export_path
        .clone()
        .unwrap_or_else(|| default_export_path(state));
    match export::write_report(&path, &attempt) {
        Ok(()) => state.exported_to = Some(path),
        Err(e) => {
            warn!(error = %e, "export failed");
            state.set_status(format!("Error exporting report: {}", e), StatusKind::Error);
        }
    }
}

fn default_export_path(state: &AppState) -> std::path::PathBuf {
    let stem = state
        .source_path
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    std::path::PathBuf::from(format!("{}-quiz.yaml", stem))
}

fn handle_dialog_key(key: KeyEvent, state: &mut AppState) {
    match state.top_dialog().cloned() {
        Some(Dialog::ConfirmQuit) => match key.code {
            KeyCode::Enter | KeyCode::Char('y') => {
                state.pop_dialog();
                state.should_quit = true;
            }
            KeyCode::Esc | KeyCode::Char('n') => {
                state.pop_dialog();
            }
            _ => {}
        },
        Some(Dialog::Help) => match key.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Enter => {
                state.pop_dialog();
            }
            _ => {}
        },
        None => {}
    }
}

fn handle_mouse(mouse: MouseEvent, state: &mut AppState, size: Rect, runtime: &Runtime) {
    if !matches!(state.screen, Screen::Quiz | Screen::Results) || state.has_dialog() {
        return;
    }

    let layout = crate::ui::layout::compute_layout(size);
    let main = crate::ui::question_area(state, size);
    let in_rect =
        |r: Rect, x: u16, y: u16| x >= r.x && x < r.x + r.width && y >= r.y && y < r.y + r.height;

    // Drop any overshoot from PageDown so offsets match what is drawn
    state.question_scroll = question::visible_scroll(state, main);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let (x, y) = (mouse.column, mouse.row);
            if in_rect(layout.sidebar, x, y) {
                if let Some(idx) = crate::ui::sidebar::question_at_row(state, layout.sidebar, y) {
                    state.navigate_to(idx);
                }
            } else if in_rect(main, x, y) && state.screen == Screen::Quiz {
                let content_line = (y - main.y) as usize + state.question_scroll;
                let picked = question::compute_hit_map(state, main)
                    .and_then(|hit| hit.option_at(content_line));
                if let Some(option_idx) = picked {
                    let qidx = state.current_question;
                    if let Some(answer) = state.select_option(option_idx) {
                        runtime.report(state, qidx, answer);
                    }
                }
            }
        }
        MouseEventKind::ScrollUp => {
            state.question_scroll = state.question_scroll.saturating_sub(1);
        }
        MouseEventKind::ScrollDown => {
            state.question_scroll += 1;
            state.question_scroll = question::visible_scroll(state, main);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::model::{AnswerCheck, Mcq};
    use std::path::PathBuf;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn runtime() -> (Runtime, mpsc::Receiver<NetEvent>) {
        runtime_at(&Config::default().server_url)
    }

    fn runtime_at(server_url: &str) -> (Runtime, mpsc::Receiver<NetEvent>) {
        let (tx, rx) = mpsc::channel();
        let config = Config {
            server_url: server_url.to_string(),
            ..Config::default()
        };
        let client = QuizClient::new(&config).unwrap();
        (Runtime { client, tx }, rx)
    }

    fn mcqs(correct: &[&str]) -> Vec<Mcq> {
        correct
            .iter()
            .enumerate()
            .map(|(i, c)| Mcq {
                question: format!("Question {}", i + 1),
                options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
                correct_answer: c.to_string(),
                explanation: String::new(),
            })
            .collect()
    }

    fn quiz_state(correct: &[&str]) -> AppState {
        let mut state = AppState::new(PathBuf::from("notes.pdf"));
        state.load_questions(mcqs(correct)).unwrap();
        state
    }

    #[test]
    fn test_letter_keys_answer_and_advance() {
        let (rt, _rx) = runtime();
        let mut state = quiz_state(&["A", "B", "C"]);

        handle_key(key(KeyCode::Char('a')), &mut state, &rt);
        assert_eq!(state.session.answer(0), Some("A"));
        assert_eq!(state.current_question, 1);

        handle_key(key(KeyCode::Char('2')), &mut state, &rt);
        assert_eq!(state.session.answer(1), Some("B"));
        assert_eq!(state.current_question, 2);
    }

    #[test]
    fn test_answered_question_cannot_change() {
        let (rt, _rx) = runtime();
        let mut state = quiz_state(&["A", "B"]);

        handle_key(key(KeyCode::Char('c')), &mut state, &rt);
        handle_key(key(KeyCode::Up), &mut state, &rt);
        handle_key(key(KeyCode::Char('a')), &mut state, &rt);
        assert_eq!(state.session.answer(0), Some("C"));
        assert_eq!(state.session.answered_count(), 1);
    }

    #[test]
    fn test_out_of_range_letter_is_ignored() {
        let (rt, _rx) = runtime();
        let mut state = AppState::new(PathBuf::from("notes.pdf"));
        state
            .load_questions(vec![Mcq {
                question: "True or false?".into(),
                options: vec!["True".into(), "False".into()],
                correct_answer: "True".into(),
                explanation: String::new(),
            }])
            .unwrap();

        handle_key(key(KeyCode::Char('d')), &mut state, &rt);
        assert_eq!(state.session.answered_count(), 0);
    }

    #[test]
    fn test_score_key_then_try_another() {
        let (rt, _rx) = runtime();
        let mut state = quiz_state(&["A", "B"]);

        handle_key(key(KeyCode::Char('s')), &mut state, &rt);
        assert_eq!(state.screen, Screen::Quiz);

        handle_key(key(KeyCode::Char('a')), &mut state, &rt);
        handle_key(key(KeyCode::Char('a')), &mut state, &rt);
        handle_key(key(KeyCode::Char('s')), &mut state, &rt);
        assert_eq!(state.screen, Screen::Results);
        assert_eq!(state.session.report().unwrap().score, 1);

        handle_key(key(KeyCode::Char('n')), &mut state, &rt);
        assert_eq!(state.session.total(), 0);
    }

    #[test]
    fn test_quit_asks_while_in_progress() {
        let (rt, _rx) = runtime();
        let mut state = quiz_state(&["A", "B"]);
        handle_key(key(KeyCode::Char('a')), &mut state, &rt);
        handle_key(key(KeyCode::Char('q')), &mut state, &rt);
        assert_eq!(state.top_dialog(), Some(&Dialog::ConfirmQuit));
        assert!(!state.should_quit);

        handle_key(key(KeyCode::Enter), &mut state, &rt);
        assert!(state.should_quit);
    }

    #[test]
    fn test_enter_uses_option_cursor() {
        let (rt, _rx) = runtime();
        let mut state = quiz_state(&["D"]);
        handle_key(key(KeyCode::Char('j')), &mut state, &rt);
        handle_key(key(KeyCode::Char('j')), &mut state, &rt);
        handle_key(key(KeyCode::Enter), &mut state, &rt);
        assert_eq!(state.session.answer(0), Some("C"));
    }

    #[test]
    fn test_export_writes_report() {
        let (rt, _rx) = runtime();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.yaml");

        let mut state = quiz_state(&["A"]);
        state.material = Some(crate::model::Material {
            id: "m-1".into(),
            file_name: "notes.pdf".into(),
            server_path: "uploaded_data/m-1.pdf".into(),
            sha256: "sha256:00".into(),
        });
        state.export_path = Some(path.clone());

        handle_key(key(KeyCode::Char('a')), &mut state, &rt);
        handle_key(key(KeyCode::Char('s')), &mut state, &rt);
        assert_eq!(state.exported_to.as_ref(), Some(&path));
        assert!(path.exists());
    }

    #[test]
    fn test_net_events_drive_screens() {
        let mut state = AppState::new(PathBuf::from("notes.pdf"));
        state.begin_upload();
        handle_net(NetEvent::UploadFailed(crate::error::ClientError::NotPdf), &mut state);
        assert_eq!(state.screen, Screen::Failed);
        assert!(!state.is_busy());
    }

    #[test]
    fn test_click_after_page_down_hits_drawn_line() {
        let (rt, _rx) = runtime();
        let mut state = quiz_state(&["A"]);
        let size = Rect::new(0, 0, 80, 24);
        let main = crate::ui::question_area(&state, size);

        // The whole question fits, so PageDown scrolls nothing on screen
        handle_key(key(KeyCode::PageDown), &mut state, &rt);
        handle_mouse(click(main.x + 2, main.y), &mut state, size, &rt);
        assert_eq!(state.session.answer(0), None);
        assert_eq!(state.question_scroll, 0);

        // header, blank, body, blank, A, B
        handle_mouse(click(main.x + 2, main.y + 5), &mut state, size, &rt);
        assert_eq!(state.session.answer(0), Some("B"));
    }

    #[test]
    fn test_scroll_wheel_stops_at_content_end() {
        let (rt, _rx) = runtime();
        let mut state = quiz_state(&["A"]);
        let size = Rect::new(0, 0, 80, 24);
        let wheel = MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 40,
            row: 5,
            modifiers: KeyModifiers::NONE,
        };
        for _ in 0..10 {
            handle_mouse(wheel, &mut state, size, &rt);
        }
        assert_eq!(state.question_scroll, 0);
    }

    #[test]
    fn test_report_from_previous_attempt_is_ignored() {
        let mut state = quiz_state(&["A"]);
        let previous = state.attempt;
        state.select_option(0);
        state.score();
        state.try_another();
        state.load_questions(mcqs(&["B"])).unwrap();

        let check = AnswerCheck {
            correct: true,
            explanation: String::new(),
            correct_answer: "A".into(),
        };
        handle_net(
            NetEvent::AnswerReported {
                attempt: previous,
                question_index: 0,
                check: check.clone(),
            },
            &mut state,
        );
        assert!(state.server_checks.is_empty());

        handle_net(
            NetEvent::AnswerReported {
                attempt: state.attempt,
                question_index: 0,
                check,
            },
            &mut state,
        );
        assert!(state.server_checks.contains_key(&0));
    }

    #[test]
    fn test_upload_reply_reaches_ready_screen() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/upload_pdf/")
            .with_header("content-type", "application/json")
            .with_body(r#"{"material_id": "m-9", "file_path": "uploads/notes.pdf"}"#)
            .create();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let (rt, rx) = runtime_at(&server.url());
        let mut state = AppState::new(path);
        rt.upload(&mut state);
        assert_eq!(state.screen, Screen::Uploading);

        let event = rx.recv_timeout(Duration::from_secs(10)).unwrap();
        handle_net(event, &mut state);
        assert_eq!(state.screen, Screen::Ready);
        assert_eq!(state.material.as_ref().map(|m| m.id.as_str()), Some("m-9"));
    }

    #[test]
    fn test_generate_failure_reaches_failed_screen() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/generate_mcqs/m-9")
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(r#"{"detail": "Error generating MCQs"}"#)
            .create();

        let (rt, rx) = runtime_at(&server.url());
        let mut state = AppState::new(PathBuf::from("notes.pdf"));
        state.on_uploaded(crate::model::Material {
            id: "m-9".into(),
            file_name: "notes.pdf".into(),
            server_path: String::new(),
            sha256: String::new(),
        });
        rt.generate(&mut state);
        assert_eq!(state.screen, Screen::Generating);

        let event = rx.recv_timeout(Duration::from_secs(10)).unwrap();
        assert!(matches!(event, NetEvent::GenerateFailed(_)));
        handle_net(event, &mut state);
        assert_eq!(state.screen, Screen::Failed);
        assert_eq!(state.status.as_ref().unwrap().text, "Error generating MCQs");
    }
}
