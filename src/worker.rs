//! Network calls run off the UI thread; results come back as [`NetEvent`]s.

use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use tracing::{error, warn};

use crate::client::QuizClient;
use crate::error::ClientError;
use crate::model::{AnswerCheck, GenerateResponse, Material};

#[derive(Debug)]
pub enum NetEvent {
    Uploaded(Material),
    UploadFailed(ClientError),
    Generated(GenerateResponse),
    GenerateFailed(ClientError),
    AnswerReported {
        attempt: u64,
        question_index: usize,
        check: AnswerCheck,
    },
    ReportFailed {
        attempt: u64,
        question_index: usize,
        error: ClientError,
    },
}

/// One answer to report to the server.
#[derive(Debug, Clone)]
pub struct AnswerReport {
    pub attempt: u64,
    pub material_id: String,
    pub user_id: String,
    pub question_index: usize,
    pub answer: String,
}

pub fn spawn_upload(client: QuizClient, path: PathBuf, tx: mpsc::Sender<NetEvent>) {
    thread::spawn(move || {
        let event = match client.upload_material(&path) {
            Ok(material) => NetEvent::Uploaded(material),
            Err(e) => {
                error!(path = %path.display(), error = %e, "upload failed");
                NetEvent::UploadFailed(e)
            }
        };
        let _ = tx.send(event);
    });
}

pub fn spawn_generate(client: QuizClient, material_id: String, tx: mpsc::Sender<NetEvent>) {
    thread::spawn(move || {
        let event = match client.generate_mcqs(&material_id) {
            Ok(generated) => NetEvent::Generated(generated),
            Err(e) => {
                error!(material_id, error = %e, "generation failed");
                NetEvent::GenerateFailed(e)
            }
        };
        let _ = tx.send(event);
    });
}

/// Fire-and-forget report of one answer; the outcome never feeds back into scoring.
/// The attempt number comes back in the event so replies to an abandoned quiz can be dropped.
pub fn spawn_report(client: QuizClient, report: AnswerReport, tx: mpsc::Sender<NetEvent>) {
    thread::spawn(move || {
        let AnswerReport {
            attempt,
            material_id,
            user_id,
            question_index,
            answer,
        } = report;
        let event = match client.submit_answer(&material_id, question_index, &user_id, &answer) {
            Ok(check) => NetEvent::AnswerReported {
                attempt,
                question_index,
                check,
            },
            Err(error) => {
                warn!(question_index, error = %error, "answer report failed");
                NetEvent::ReportFailed {
                    attempt,
                    question_index,
                    error,
                }
            }
        };
        let _ = tx.send(event);
    });
}
