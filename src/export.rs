use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::error::Error;
use crate::model::{Material, ScoreReport};
use crate::session::QuizSession;

#[derive(Debug, Clone, Serialize)]
pub struct ScoredAttempt {
    pub quiz: AttemptInfo,
    pub score: ScoreSummary,
    pub questions: Vec<QuestionEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttemptInfo {
    pub source: String,
    pub source_hash: String,
    pub material_id: String,
    pub started_at: String,
    pub scored_at: String,
    pub duration: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreSummary {
    pub score: usize,
    pub total: usize,
    pub percentage: f64,
    pub feedback: String,
    pub class: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionEntry {
    pub number: usize,
    pub question: String,
    pub answer: String,
    pub correct_answer: String,
    pub correct: bool,
    pub explanation: String,
}

impl ScoredAttempt {
    pub fn build(
        material: &Material,
        session: &QuizSession,
        report: &ScoreReport,
        started_at: DateTime<Utc>,
        scored_at: DateTime<Utc>,
    ) -> Self {
        let questions = report
            .results
            .iter()
            .filter_map(|r| {
                let q = session.question(r.question_index)?;
                Some(QuestionEntry {
                    number: r.question_index + 1,
                    question: q.question.clone(),
                    answer: r.user_answer.clone(),
                    correct_answer: r.correct_answer.clone(),
                    correct: r.is_correct,
                    explanation: q.explanation.clone(),
                })
            })
            .collect();

        Self {
            quiz: AttemptInfo {
                source: material.file_name.clone(),
                source_hash: material.sha256.clone(),
                material_id: material.id.clone(),
                started_at: started_at.to_rfc3339(),
                scored_at: scored_at.to_rfc3339(),
                duration: format_duration((scored_at - started_at).num_seconds()),
            },
            score: ScoreSummary {
                score: report.score,
                total: report.total,
                percentage: report.percentage,
                feedback: report.feedback_message().to_string(),
                class: report.class.as_str().to_string(),
            },
            questions,
        }
    }
}

pub fn write_report(path: &Path, attempt: &ScoredAttempt) -> Result<(), Error> {
    let yaml = serde_yaml::to_string(attempt).map_err(|e| Error::Export {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    atomic_write(path, &yaml)?;
    info!(path = %path.display(), "report exported");
    Ok(())
}

fn atomic_write(path: &Path, content: &str) -> Result<(), Error> {
    let tmp = path.with_extension("tmp");
    let fail = |e: std::io::Error| Error::Export {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(fail)?;
    }
    fs::write(&tmp, content).map_err(fail)?;
    fs::rename(&tmp, path).map_err(fail)?;
    Ok(())
}

pub fn format_duration(total_secs: i64) -> String {
    if total_secs <= 0 {
        return "0m 0s".to_string();
    }
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else {
        format!("{}m {}s", minutes, seconds)
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

pub fn compute_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("sha256:{}", hex_encode(&hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Mcq;
    use chrono::Duration;

    fn scored_session() -> (QuizSession, ScoreReport) {
        let mut session = QuizSession::new();
        session
            .load_questions(vec![
                Mcq {
                    question: "What does `fork` return in the child?".into(),
                    options: vec!["0".into(), "-1".into(), "pid".into(), "1".into()],
                    correct_answer: "0".into(),
                    explanation: "The child sees zero.".into(),
                },
                Mcq {
                    question: "Which signal cannot be caught?".into(),
                    options: vec!["SIGINT".into(), "SIGKILL".into()],
                    correct_answer: "SIGKILL".into(),
                    explanation: String::new(),
                },
            ])
            .unwrap();
        session.select_answer(0, "0").unwrap();
        session.select_answer(1, "SIGINT").unwrap();
        let report = session.compute_score().unwrap();
        (session, report)
    }

    fn material() -> Material {
        Material {
            id: "7f1c".into(),
            file_name: "os-notes.pdf".into(),
            server_path: "uploaded_data/7f1c.pdf".into(),
            sha256: compute_hash(b"%PDF-1.4"),
        }
    }

    #[test]
    fn test_write_report() {
        let (session, report) = scored_session();
        let started = Utc::now();
        let attempt = ScoredAttempt::build(
            &material(),
            &session,
            &report,
            started,
            started + Duration::seconds(125),
        );

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("attempt.yaml");
        write_report(&path, &attempt).unwrap();

        let yaml = fs::read_to_string(&path).unwrap();
        assert!(yaml.contains("source: os-notes.pdf"));
        assert!(yaml.contains("duration: 2m 5s"));
        assert!(yaml.contains("score: 1"));
        assert!(yaml.contains("percentage: 50.0"));
        assert!(yaml.contains("class: average"));
        assert!(yaml.contains("Keep practicing! You can improve!"));
        assert!(yaml.contains("answer: SIGINT"));
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_compute_hash_format() {
        let hash = compute_hash(b"");
        assert_eq!(
            hash,
            "sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0m 0s");
        assert_eq!(format_duration(59), "0m 59s");
        assert_eq!(format_duration(3725), "1h 2m 5s");
    }
}
