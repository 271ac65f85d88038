use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::{ClientError, SessionError};
use crate::model::{AnswerCheck, GenerateResponse, Material, Mcq, ScoreReport};
use crate::session::{QuizSession, SelectOutcome};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Screen {
    Uploading,
    Ready,
    Generating,
    Quiz,
    Results,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Dialog {
    ConfirmQuit,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuestionStatus {
    Unanswered,
    Answered,
    Correct,
    Incorrect,
}

#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    pub session: QuizSession,
    pub source_path: PathBuf,
    pub material: Option<Material>,
    pub user_id: Option<String>,
    pub export_path: Option<PathBuf>,
    pub current_question: usize,
    pub option_cursor: usize,
    pub question_scroll: usize,
    pub status: Option<StatusMessage>,
    pub dialog_stack: Vec<Dialog>,
    pub request_started: Option<Instant>,
    pub started_at: Option<DateTime<Utc>>,
    pub scored_at: Option<DateTime<Utc>>,
    pub server_checks: BTreeMap<usize, AnswerCheck>,
    /// Bumped whenever a question set is loaded or discarded. Answer reports
    /// carry it so a late reply from an earlier attempt is dropped.
    pub attempt: u64,
    pub exported_to: Option<PathBuf>,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(source_path: PathBuf) -> Self {
        Self {
            screen: Screen::Uploading,
            session: QuizSession::new(),
            source_path,
            material: None,
            user_id: None,
            export_path: None,
            current_question: 0,
            option_cursor: 0,
            question_scroll: 0,
            status: None,
            dialog_stack: Vec::new(),
            request_started: None,
            started_at: None,
            scored_at: None,
            server_checks: BTreeMap::new(),
            attempt: 0,
            exported_to: None,
            should_quit: false,
        }
    }

    pub fn file_name(&self) -> String {
        self.source_path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }

    pub fn set_status(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    /// True while an upload or generation request is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self.screen, Screen::Uploading | Screen::Generating)
            && self.request_started.is_some()
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.request_started
            .map(|t| t.elapsed().as_secs())
            .unwrap_or(0)
    }

    /// Returns false when a request is already in flight.
    pub fn begin_upload(&mut self) -> bool {
        if self.is_busy() {
            return false;
        }
        self.screen = Screen::Uploading;
        self.material = None;
        self.request_started = Some(Instant::now());
        self.set_status(format!("Selected: {}", self.file_name()), StatusKind::Info);
        true
    }

    pub fn on_uploaded(&mut self, material: Material) {
        info!(material_id = %material.id, "material ready");
        self.material = Some(material);
        self.request_started = None;
        self.screen = Screen::Ready;
        self.set_status("File uploaded successfully!", StatusKind::Success);
    }

    pub fn on_upload_failed(&mut self, err: &ClientError) {
        self.request_started = None;
        self.screen = Screen::Failed;
        self.set_status(failure_message("Error uploading file", err), StatusKind::Error);
    }

    /// Returns the material id to generate for, or None when generation
    /// cannot start (nothing uploaded yet, or a request is in flight).
    pub fn begin_generate(&mut self) -> Option<String> {
        if self.is_busy() {
            return None;
        }
        let material_id = self.material.as_ref()?.id.clone();
        self.screen = Screen::Generating;
        self.request_started = Some(Instant::now());
        Some(material_id)
    }

    pub fn on_generated(&mut self, generated: GenerateResponse) {
        self.request_started = None;
        let announced = generated.num_questions;
        match self.load_questions(generated.mcqs) {
            Ok(()) => {
                self.set_status(format!("Generated {} questions", announced), StatusKind::Success);
            }
            Err(e) => {
                warn!(error = %e, "generation returned no usable questions");
                self.screen = Screen::Failed;
                self.set_status("Error generating MCQs", StatusKind::Error);
            }
        }
    }

    pub fn on_generate_failed(&mut self, err: &ClientError) {
        self.request_started = None;
        self.screen = Screen::Failed;
        self.set_status(failure_message("Error generating MCQs", err), StatusKind::Error);
    }

    pub fn load_questions(&mut self, mcqs: Vec<Mcq>) -> Result<(), SessionError> {
        self.session.load_questions(mcqs)?;
        self.attempt += 1;
        self.screen = Screen::Quiz;
        self.current_question = 0;
        self.option_cursor = 0;
        self.question_scroll = 0;
        self.server_checks.clear();
        self.exported_to = None;
        self.started_at = Some(Utc::now());
        self.scored_at = None;
        Ok(())
    }

    pub fn current_question(&self) -> Option<&Mcq> {
        self.session.question(self.current_question)
    }

    /// Record option `option_idx` for the current question. Returns the
    /// recorded text when this call set the answer.
    pub fn select_option(&mut self, option_idx: usize) -> Option<String> {
        let qidx = self.current_question;
        match self.session.select_option(qidx, option_idx) {
            Ok(SelectOutcome::Recorded) => {
                self.option_cursor = option_idx;
                if self.session.is_complete() {
                    self.set_status(
                        "All questions answered. Press [s] for your score.",
                        StatusKind::Info,
                    );
                }
                self.session.answer(qidx).map(str::to_string)
            }
            Ok(SelectOutcome::AlreadyAnswered) => None,
            Err(e) => {
                warn!(question = qidx, option = option_idx, error = %e, "selection rejected");
                None
            }
        }
    }

    pub fn score(&mut self) -> Option<ScoreReport> {
        match self.session.compute_score() {
            Ok(report) => {
                self.scored_at = Some(Utc::now());
                self.screen = Screen::Results;
                Some(report)
            }
            Err(SessionError::Incomplete { answered, total }) => {
                self.set_status(
                    format!("Answer all questions first ({} of {} answered)", answered, total),
                    StatusKind::Info,
                );
                None
            }
            Err(e) => {
                warn!(error = %e, "scoring rejected");
                None
            }
        }
    }

    /// Discard the attempt wholesale and go back to generation for the same material.
    pub fn try_another(&mut self) {
        self.session.reset();
        self.attempt += 1;
        self.current_question = 0;
        self.option_cursor = 0;
        self.question_scroll = 0;
        self.server_checks.clear();
        self.exported_to = None;
        self.started_at = None;
        self.scored_at = None;
        self.screen = if self.material.is_some() {
            Screen::Ready
        } else {
            Screen::Failed
        };
        self.status = None;
    }

    pub fn on_answer_checked(&mut self, attempt: u64, question_index: usize, check: AnswerCheck) {
        if attempt != self.attempt {
            debug!(
                attempt,
                current = self.attempt,
                question_index,
                "dropping stale answer check"
            );
            return;
        }
        self.server_checks.insert(question_index, check);
    }

    pub fn question_status(&self, idx: usize) -> QuestionStatus {
        if let Some(result) = self.session.report().and_then(|r| r.result_for(idx)) {
            return if result.is_correct {
                QuestionStatus::Correct
            } else {
                QuestionStatus::Incorrect
            };
        }
        if self.session.answer(idx).is_some() {
            QuestionStatus::Answered
        } else {
            QuestionStatus::Unanswered
        }
    }

    pub fn navigate_to(&mut self, idx: usize) {
        if idx < self.session.total() {
            self.current_question = idx;
            self.question_scroll = 0;
            self.option_cursor = self
                .current_question()
                .zip(self.session.answer(idx))
                .and_then(|(q, a)| q.option_index(a))
                .unwrap_or(0);
        }
    }

    pub fn navigate_prev(&mut self) {
        if self.current_question > 0 {
            self.navigate_to(self.current_question - 1);
        }
    }

    pub fn navigate_next(&mut self) {
        if self.current_question + 1 < self.session.total() {
            self.navigate_to(self.current_question + 1);
        }
    }

    pub fn option_count(&self) -> usize {
        self.current_question().map_or(0, |q| q.options.len())
    }

    pub fn has_dialog(&self) -> bool {
        !self.dialog_stack.is_empty()
    }

    pub fn top_dialog(&self) -> Option<&Dialog> {
        self.dialog_stack.last()
    }

    pub fn push_dialog(&mut self, dialog: Dialog) {
        self.dialog_stack.push(dialog);
    }

    pub fn pop_dialog(&mut self) -> Option<Dialog> {
        self.dialog_stack.pop()
    }
}

/// Transport failures carry their error text; a response missing its
/// payload gets the bare prefix.
pub fn failure_message(prefix: &str, err: &ClientError) -> String {
    match err {
        ClientError::MissingField { .. } => prefix.to_string(),
        other => format!("{}: {}", prefix, other),
    }
}
