use serde::{Deserialize, Serialize};

/// A single multiple-choice question as returned by the generation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mcq {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: String,
}

impl Mcq {
    /// Display letter for an option position (A, B, C, ...).
    pub fn option_letter(idx: usize) -> char {
        (b'A' + (idx % 26) as u8) as char
    }

    pub fn option_index(&self, option: &str) -> Option<usize> {
        self.options.iter().position(|o| o == option)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub material_id: String,
    #[serde(default)]
    pub file_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub mcqs: Vec<Mcq>,
    #[serde(default)]
    pub num_questions: usize,
    #[serde(default)]
    pub material_id: Option<String>,
}

/// Server-side verdict for a reported answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerCheck {
    pub correct: bool,
    #[serde(default)]
    pub explanation: String,
    pub correct_answer: String,
}

/// The uploaded document, as the client knows it after a successful upload.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub id: String,
    pub file_name: String,
    pub server_path: String,
    pub sha256: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoreClass {
    Excellent,
    Good,
    Average,
    NeedsImprovement,
}

impl ScoreClass {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 80.0 {
            ScoreClass::Excellent
        } else if percentage >= 60.0 {
            ScoreClass::Good
        } else if percentage >= 40.0 {
            ScoreClass::Average
        } else {
            ScoreClass::NeedsImprovement
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreClass::Excellent => "excellent",
            ScoreClass::Good => "good",
            ScoreClass::Average => "average",
            ScoreClass::NeedsImprovement => "needs-improvement",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    Perfect,
    Great,
    Good,
    KeepPracticing,
}

impl Feedback {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage == 100.0 {
            Feedback::Perfect
        } else if percentage >= 80.0 {
            Feedback::Great
        } else if percentage >= 60.0 {
            Feedback::Good
        } else {
            Feedback::KeepPracticing
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Feedback::Perfect => "Excellent! Perfect score!",
            Feedback::Great => "Great job! Very good performance!",
            Feedback::Good => "Good effort! Keep practicing!",
            Feedback::KeepPracticing => "Keep practicing! You can improve!",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question_index: usize,
    pub user_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub score: usize,
    pub total: usize,
    pub percentage: f64,
    pub feedback: Feedback,
    pub class: ScoreClass,
    pub results: Vec<QuestionResult>,
}

impl ScoreReport {
    pub fn feedback_message(&self) -> &'static str {
        self.feedback.message()
    }

    pub fn result_for(&self, question_index: usize) -> Option<&QuestionResult> {
        self.results
            .iter()
            .find(|r| r.question_index == question_index)
    }
}
