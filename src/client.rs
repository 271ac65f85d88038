//! Blocking HTTP client for the quiz server.

use std::fs;
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::ClientError;
use crate::export::compute_hash;
use crate::model::{AnswerCheck, GenerateResponse, Material, UploadResponse};

#[derive(Debug, Clone)]
pub struct QuizClient {
    http: Client,
    base_url: String,
    generate_timeout: Duration,
}

impl QuizClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("mcquiz/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: config.server_url.trim_end_matches('/').to_string(),
            generate_timeout: config.generate_timeout(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Upload a PDF and describe the resulting material.
    pub fn upload_material(&self, path: &Path) -> Result<Material, ClientError> {
        let file_name = pdf_file_name(path)?;
        let bytes = fs::read(path).map_err(|source| ClientError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let sha256 = compute_hash(&bytes);

        let uploaded = self.upload_bytes(&file_name, bytes)?;
        Ok(Material {
            id: uploaded.material_id,
            file_name,
            server_path: uploaded.file_path,
            sha256,
        })
    }

    pub fn upload_bytes(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse, ClientError> {
        if !file_name.ends_with(".pdf") {
            return Err(ClientError::NotPdf);
        }

        info!(file_name, size = bytes.len(), "uploading material");
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")?;
        let form = Form::new().part("file", part);

        let resp = self
            .http
            .post(self.url("/upload_pdf/"))
            .multipart(form)
            .send()?;
        let body = read_json(resp)?;

        let uploaded: UploadResponse = require_field(body, "material_id")?;
        info!(material_id = %uploaded.material_id, "material uploaded");
        Ok(uploaded)
    }

    pub fn generate_mcqs(&self, material_id: &str) -> Result<GenerateResponse, ClientError> {
        info!(material_id, "requesting question generation");
        let resp = self
            .http
            .post(self.url(&format!("/generate_mcqs/{}", material_id)))
            .header(CONTENT_TYPE, "application/json")
            .timeout(self.generate_timeout)
            .send()?;
        let body = read_json(resp)?;

        let generated: GenerateResponse = require_field(body, "mcqs")?;
        info!(
            material_id,
            returned = generated.mcqs.len(),
            num_questions = generated.num_questions,
            "questions generated"
        );
        Ok(generated)
    }

    pub fn submit_answer(
        &self,
        material_id: &str,
        question_id: usize,
        user_id: &str,
        answer: &str,
    ) -> Result<AnswerCheck, ClientError> {
        let question_id = question_id.to_string();
        let resp = self
            .http
            .post(self.url("/submit_answer"))
            .query(&[
                ("material_id", material_id),
                ("question_id", question_id.as_str()),
                ("user_id", user_id),
                ("answer", answer),
            ])
            .send()?;
        let body = read_json(resp)?;
        require_field(body, "correct")
    }

    pub fn user_stats(&self, user_id: &str) -> Result<Value, ClientError> {
        let resp = self
            .http
            .get(self.url(&format!("/user_stats/{}", user_id)))
            .send()?;
        read_json(resp)
    }
}

fn pdf_file_name(path: &Path) -> Result<String, ClientError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    if !name.ends_with(".pdf") {
        return Err(ClientError::NotPdf);
    }
    Ok(name)
}

/// The server signals failure by omitting fields rather than by status code,
/// so the body is parsed regardless of status.
fn read_json(resp: reqwest::blocking::Response) -> Result<Value, ClientError> {
    let status = resp.status();
    let text = resp.text()?;
    debug!(%status, bytes = text.len(), "response received");
    Ok(serde_json::from_str(&text)?)
}

fn require_field<T: DeserializeOwned>(
    body: Value,
    field: &'static str,
) -> Result<T, ClientError> {
    if body.get(field).map_or(true, Value::is_null) {
        let detail = body.get("detail").map(|d| match d {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        });
        warn!(field, detail = detail.as_deref().unwrap_or(""), "response is missing field");
        return Err(ClientError::MissingField { field, detail });
    }
    Ok(serde_json::from_value(body)?)
}
