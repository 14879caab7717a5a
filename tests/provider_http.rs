//! Integration tests for the HTTP model provider against a local server

#![cfg(feature = "remote")]

use std::io::Read;
use std::sync::mpsc;

use word2pic::ai::{ArkClient, ModelProvider};
use word2pic::{ApiConfig, Error};

/// A request as seen by the test server
struct Seen {
    path: String,
    auth: Option<String>,
    body: serde_json::Value,
}

/// Serve exactly one request with `status` / `body`, reporting what arrived
fn serve_once(status: u16, body: &'static str) -> (String, mpsc::Receiver<Seen>) {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr();
    let (tx, rx) = mpsc::channel();

    std::thread::spawn(move || {
        if let Ok(mut request) = server.recv() {
            let auth = request
                .headers()
                .iter()
                .find(|h| h.field.equiv("Authorization"))
                .map(|h| h.value.as_str().to_string());
            let mut raw = String::new();
            let _ = request.as_reader().read_to_string(&mut raw);
            let seen = Seen {
                path: request.url().to_string(),
                auth,
                body: serde_json::from_str(&raw).unwrap_or(serde_json::Value::Null),
            };
            let response = tiny_http::Response::from_string(body)
                .with_status_code(status)
                .with_header(
                    "Content-Type: application/json"
                        .parse::<tiny_http::Header>()
                        .unwrap(),
                );
            let _ = request.respond(response);
            let _ = tx.send(seen);
        }
    });

    (format!("http://{}", addr), rx)
}

fn client_for(base: &str) -> ArkClient {
    ArkClient::new(ApiConfig {
        chat_endpoint: format!("{}/chat/completions", base),
        image_endpoint: format!("{}/images/generations", base),
        api_key: Some("test-token".into()),
        timeout_ms: 5000,
        ..Default::default()
    })
    .expect("client")
}

#[test]
fn summarize_posts_chat_request_and_reads_content() {
    let (base, seen) = serve_once(
        200,
        r#"{"choices":[{"message":{"role":"assistant","content":"短小的总结"}}]}"#,
    );
    let summary = client_for(&base).summarize("  一段很长的文字  ").unwrap();
    assert_eq!(summary, "短小的总结");

    let req = seen.recv().unwrap();
    assert_eq!(req.path, "/chat/completions");
    assert_eq!(req.auth.as_deref(), Some("Bearer test-token"));
    assert_eq!(req.body["messages"][0]["role"], "user");
    assert_eq!(req.body["messages"][0]["content"][0]["type"], "text");
    let text = req.body["messages"][0]["content"][0]["text"].as_str().unwrap();
    assert!(text.ends_with("\n\n一段很长的文字"), "{:?}", text);
}

#[test]
fn summarize_with_wrong_shape_is_malformed() {
    let (base, _seen) = serve_once(200, r#"{"choices":[]}"#);
    let err = client_for(&base).summarize("text").unwrap_err();
    assert!(matches!(err, Error::MalformedResponse(_)), "{:?}", err);
    assert!(err.is_remote_failure());
}

#[test]
fn non_json_body_is_malformed() {
    let (base, _seen) = serve_once(200, "<html>gateway</html>");
    let err = client_for(&base).generate_image("a cat").unwrap_err();
    assert!(matches!(err, Error::MalformedResponse(_)), "{:?}", err);
}

#[test]
fn server_error_reports_status() {
    let (base, _seen) = serve_once(503, r#"{"error":"busy"}"#);
    let err = client_for(&base).summarize("text").unwrap_err();
    assert!(matches!(err, Error::ApiError { status: 503 }), "{:?}", err);
}

#[test]
fn generate_image_returns_first_url() {
    let (base, seen) = serve_once(
        200,
        r#"{"data":[{"url":"https://cdn.example/a.png"},{"url":"https://cdn.example/b.png"}]}"#,
    );
    let url = client_for(&base).generate_image("sunset over the sea").unwrap();
    assert_eq!(url, "https://cdn.example/a.png");

    let req = seen.recv().unwrap();
    assert_eq!(req.path, "/images/generations");
    assert_eq!(req.body["prompt"], "sunset over the sea");
    assert_eq!(req.body["response_format"], "url");
}

#[test]
fn unreachable_server_is_network_error() {
    // Bind then drop to get a port nothing listens on
    let port = {
        let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        l.local_addr().unwrap().port()
    };
    let err = client_for(&format!("http://127.0.0.1:{}", port))
        .summarize("text")
        .unwrap_err();
    assert!(matches!(err, Error::NetworkError(_)), "{:?}", err);
}
