use std::fs;

use mcquiz::client::QuizClient;
use mcquiz::config::Config;
use mcquiz::error::ClientError;
use mockito::{Matcher, Server, ServerGuard};
use pretty_assertions::assert_eq;
use serde_json::json;

fn client_for(server: &ServerGuard) -> QuizClient {
    let config = Config {
        server_url: server.url(),
        ..Config::default()
    };
    QuizClient::new(&config).unwrap()
}

fn fixture_body() -> String {
    fs::read_to_string("fixtures/sample_mcqs.json").expect("Cannot read fixture")
}

#[test]
fn test_upload_returns_material() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/upload_pdf/")
        .match_header(
            "content-type",
            Matcher::Regex("multipart/form-data".to_string()),
        )
        .match_body(Matcher::Regex(r#"name="file"; filename="lecture.pdf""#.to_string()))
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "status": "success",
                "material_id": "m-42",
                "file_path": "uploads/lecture.pdf"
            })
            .to_string(),
        )
        .create();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lecture.pdf");
    fs::write(&path, b"%PDF-1.4 fake").unwrap();

    let material = client_for(&server).upload_material(&path).unwrap();
    mock.assert();
    assert_eq!(material.id, "m-42");
    assert_eq!(material.file_name, "lecture.pdf");
    assert_eq!(material.server_path, "uploads/lecture.pdf");
    assert!(material.sha256.starts_with("sha256:"));
}

#[test]
fn test_upload_without_material_id_fails() {
    let mut server = Server::new();
    server
        .mock("POST", "/upload_pdf/")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(json!({"detail": "Only PDF files are allowed"}).to_string())
        .create();

    let err = client_for(&server)
        .upload_bytes("lecture.pdf", b"%PDF".to_vec())
        .unwrap_err();
    match err {
        ClientError::MissingField { field, detail } => {
            assert_eq!(field, "material_id");
            assert_eq!(detail.as_deref(), Some("Only PDF files are allowed"));
        }
        other => panic!("Expected MissingField, got {:?}", other),
    }
}

#[test]
fn test_non_pdf_never_reaches_server() {
    let mut server = Server::new();
    let mock = server.mock("POST", "/upload_pdf/").expect(0).create();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    fs::write(&path, "plain text").unwrap();

    let err = client_for(&server).upload_material(&path).unwrap_err();
    assert!(matches!(err, ClientError::NotPdf));
    assert_eq!(err.to_string(), "Only PDF files are allowed");
    mock.assert();
}

#[test]
fn test_missing_file_is_io_error() {
    let server = Server::new();
    let err = client_for(&server)
        .upload_material(std::path::Path::new("/nonexistent/lecture.pdf"))
        .unwrap_err();
    assert!(matches!(err, ClientError::Io { .. }));
}

#[test]
fn test_generate_returns_questions() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/generate_mcqs/m-42")
        .match_header("content-type", "application/json")
        .with_header("content-type", "application/json")
        .with_body(fixture_body())
        .create();

    let generated = client_for(&server).generate_mcqs("m-42").unwrap();
    mock.assert();
    assert_eq!(generated.mcqs.len(), 6);
    assert_eq!(generated.num_questions, 6);
    assert_eq!(generated.mcqs[0].correct_answer, "fork");
    assert_eq!(generated.mcqs[2].options.len(), 4);
}

#[test]
fn test_generate_without_mcqs_fails() {
    let mut server = Server::new();
    server
        .mock("POST", "/generate_mcqs/missing")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(json!({"detail": "Material not found"}).to_string())
        .create();

    let err = client_for(&server).generate_mcqs("missing").unwrap_err();
    assert!(matches!(err, ClientError::MissingField { field: "mcqs", .. }));
    assert!(!err.is_transport());
}

#[test]
fn test_non_json_body_is_decode_error() {
    let mut server = Server::new();
    server
        .mock("POST", "/generate_mcqs/m-1")
        .with_status(502)
        .with_body("<html>Bad Gateway</html>")
        .create();

    let err = client_for(&server).generate_mcqs("m-1").unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));
}

#[test]
fn test_unreachable_server_is_transport_error() {
    let config = Config {
        server_url: "http://127.0.0.1:9".to_string(),
        request_timeout_secs: 2,
        ..Config::default()
    };
    let client = QuizClient::new(&config).unwrap();
    let err = client.upload_bytes("lecture.pdf", b"%PDF".to_vec()).unwrap_err();
    assert!(err.is_transport());
}

#[test]
fn test_submit_answer_sends_query() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/submit_answer")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("material_id".into(), "m-42".into()),
            Matcher::UrlEncoded("question_id".into(), "2".into()),
            Matcher::UrlEncoded("user_id".into(), "alice".into()),
            Matcher::UrlEncoded("answer".into(), "SIGKILL".into()),
        ]))
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "correct": true,
                "explanation": "SIGKILL and SIGSTOP cannot be handled.",
                "correct_answer": "SIGKILL"
            })
            .to_string(),
        )
        .create();

    let check = client_for(&server)
        .submit_answer("m-42", 2, "alice", "SIGKILL")
        .unwrap();
    mock.assert();
    assert!(check.correct);
    assert_eq!(check.correct_answer, "SIGKILL");
}

#[test]
fn test_user_stats_passes_body_through() {
    let mut server = Server::new();
    server
        .mock("GET", "/user_stats/alice")
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "total_questions_answered": 10,
                "correct_answers": 7,
                "accuracy": 70.0
            })
            .to_string(),
        )
        .create();

    let stats = client_for(&server).user_stats("alice").unwrap();
    assert_eq!(stats["correct_answers"], 7);
    assert_eq!(stats["accuracy"], 70.0);
}
