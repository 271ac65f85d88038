//! Answer collection and scoring for a single quiz attempt.
//!
//! A session moves `Empty -> Active -> Complete -> Scored`. The first answer
//! recorded for a question is final, and scoring is only possible once every
//! loaded question has an answer.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::error::SessionError;
use crate::model::{Feedback, Mcq, QuestionResult, ScoreClass, ScoreReport};

/// Questions shown per attempt; anything beyond this is dropped on load.
pub const MAX_QUESTIONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    Active,
    Complete,
    Scored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Recorded,
    /// The question already had an answer; nothing changed.
    AlreadyAnswered,
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    state: SessionState,
    questions: Vec<Mcq>,
    answers: BTreeMap<usize, String>,
    answered_count: usize,
    report: Option<ScoreReport>,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Empty,
            questions: Vec::new(),
            answers: BTreeMap::new(),
            answered_count: 0,
            report: None,
        }
    }

    pub fn load_questions(&mut self, mcqs: Vec<Mcq>) -> Result<(), SessionError> {
        if mcqs.is_empty() {
            warn!("refusing to load an empty question set");
            return Err(SessionError::NoQuestions);
        }

        let received = mcqs.len();
        self.questions = mcqs.into_iter().take(MAX_QUESTIONS).collect();
        self.answers.clear();
        self.answered_count = 0;
        self.report = None;
        self.state = SessionState::Active;

        info!(received, loaded = self.questions.len(), "quiz session loaded");
        Ok(())
    }

    pub fn select_answer(
        &mut self,
        question_index: usize,
        option: &str,
    ) -> Result<SelectOutcome, SessionError> {
        match self.state {
            SessionState::Empty => return Err(SessionError::NotLoaded),
            SessionState::Scored => return Err(SessionError::AlreadyScored),
            SessionState::Active | SessionState::Complete => {}
        }

        let total = self.questions.len();
        let question = self
            .questions
            .get(question_index)
            .ok_or(SessionError::QuestionOutOfRange {
                index: question_index,
                total,
            })?;

        if self.answers.contains_key(&question_index) {
            debug!(question_index, "answer already recorded, ignoring");
            return Ok(SelectOutcome::AlreadyAnswered);
        }

        if question.option_index(option).is_none() {
            return Err(SessionError::UnknownOption {
                index: question_index,
                option: option.to_string(),
            });
        }

        self.answers.insert(question_index, option.to_string());
        self.answered_count += 1;
        debug!(question_index, answered = self.answered_count, total, "answer recorded");

        if self.answered_count == total {
            self.state = SessionState::Complete;
            info!(total, "all questions answered");
        }
        Ok(SelectOutcome::Recorded)
    }

    /// Select by option position (A = 0) instead of option text.
    pub fn select_option(
        &mut self,
        question_index: usize,
        option_index: usize,
    ) -> Result<SelectOutcome, SessionError> {
        let option = self
            .questions
            .get(question_index)
            .and_then(|q| q.options.get(option_index))
            .cloned()
            .ok_or_else(|| {
                if self.state == SessionState::Empty {
                    SessionError::NotLoaded
                } else if question_index >= self.questions.len() {
                    SessionError::QuestionOutOfRange {
                        index: question_index,
                        total: self.questions.len(),
                    }
                } else {
                    SessionError::UnknownOption {
                        index: question_index,
                        option: format!("#{}", option_index),
                    }
                }
            })?;
        self.select_answer(question_index, &option)
    }

    pub fn compute_score(&mut self) -> Result<ScoreReport, SessionError> {
        match self.state {
            SessionState::Empty => return Err(SessionError::NotLoaded),
            SessionState::Scored => return Err(SessionError::AlreadyScored),
            SessionState::Active => {
                return Err(SessionError::Incomplete {
                    answered: self.answered_count,
                    total: self.questions.len(),
                })
            }
            SessionState::Complete => {}
        }

        let results: Vec<QuestionResult> = self
            .questions
            .iter()
            .enumerate()
            .map(|(idx, q)| {
                let user_answer = self.answers.get(&idx).cloned().unwrap_or_default();
                QuestionResult {
                    question_index: idx,
                    is_correct: user_answer == q.correct_answer,
                    user_answer,
                    correct_answer: q.correct_answer.clone(),
                }
            })
            .collect();

        let score = results.iter().filter(|r| r.is_correct).count();
        let total = self.questions.len();
        let percentage = percentage(score, total);

        let report = ScoreReport {
            score,
            total,
            percentage,
            feedback: Feedback::from_percentage(percentage),
            class: ScoreClass::from_percentage(percentage),
            results,
        };

        self.state = SessionState::Scored;
        self.report = Some(report.clone());
        info!(score, total, percentage, class = report.class.as_str(), "quiz scored");
        Ok(report)
    }

    /// Throw the whole attempt away.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn questions(&self) -> &[Mcq] {
        &self.questions
    }

    pub fn question(&self, idx: usize) -> Option<&Mcq> {
        self.questions.get(idx)
    }

    pub fn answer(&self, question_index: usize) -> Option<&str> {
        self.answers.get(&question_index).map(String::as_str)
    }

    pub fn answers(&self) -> &BTreeMap<usize, String> {
        &self.answers
    }

    pub fn answered_count(&self) -> usize {
        self.answered_count
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Complete
    }

    pub fn is_scored(&self) -> bool {
        self.state == SessionState::Scored
    }

    pub fn report(&self) -> Option<&ScoreReport> {
        self.report.as_ref()
    }
}

/// Multiply before dividing so five-question quizzes land on exact multiples of 20.
pub fn percentage(score: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (score as f64 * 100.0) / total as f64
}
