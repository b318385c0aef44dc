use persona_ai::{
    backends::groq::Groq,
    chat::ChatMessage,
    completion::CompletionProvider,
    error::{PersonaError, TransportError},
    mode::Mode,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion_body(text: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": text },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15 }
    })
}

fn client(server: &MockServer, key: &str) -> Groq {
    Groq::new(key, Some(server.uri()), None, None, None, Some(5)).expect("valid test config")
}

#[tokio::test]
async fn test_groq_sends_system_prompt_then_history() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer gsk_test"))
        .and(body_partial_json(json!({
            "model": "llama-3.1-8b-instant",
            "stream": false,
            "messages": [
                { "role": "system", "content": Mode::Study.system_prompt() },
                { "role": "assistant", "content": "Welcome" },
                { "role": "user", "content": "Explain recursion" }
            ]
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion_body("A function calling itself.")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let llm = client(&server, "gsk_test");
    let history = vec![
        ChatMessage::assistant().content("Welcome").build(),
        ChatMessage::user().content("Explain recursion").build(),
    ];
    let reply = llm
        .complete(Mode::Study.system_prompt(), &history)
        .await
        .expect("completion succeeds");
    assert_eq!(reply, "A function calling itself.");
}

#[tokio::test]
async fn test_groq_unauthorized_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"error":"invalid api key"}"#))
        .mount(&server)
        .await;

    let err = client(&server, "bad")
        .complete_once("sys", "hi")
        .await
        .unwrap_err();
    assert!(
        matches!(err, PersonaError::Transport(TransportError::Auth(_))),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn test_groq_rate_limit_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server, "gsk_test")
        .complete_once("sys", "hi")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PersonaError::Transport(TransportError::RateLimited(_))
    ));
}

#[tokio::test]
async fn test_groq_server_error_keeps_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let err = client(&server, "gsk_test")
        .complete_once("sys", "hi")
        .await
        .unwrap_err();
    match err {
        PersonaError::Transport(TransportError::Status { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "overloaded");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_groq_malformed_body_is_response_format_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client(&server, "gsk_test")
        .complete_once("sys", "hi")
        .await
        .unwrap_err();
    match err {
        PersonaError::Transport(TransportError::ResponseFormat { raw_response, .. }) => {
            assert_eq!(raw_response, "not json");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_groq_missing_content_is_response_format_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let err = client(&server, "gsk_test")
        .complete_once("sys", "hi")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PersonaError::Transport(TransportError::ResponseFormat { .. })
    ));
}

#[tokio::test]
async fn test_groq_empty_key_never_calls_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("unused")))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server, "").complete_once("sys", "hi").await.unwrap_err();
    assert!(matches!(
        err,
        PersonaError::Transport(TransportError::Auth(_))
    ));
}

#[tokio::test]
async fn test_groq_unreachable_host_is_http_error() {
    // Port 9 (discard) on localhost is closed in test environments
    let llm = Groq::new("gsk_test", Some("http://127.0.0.1:9/v1".into()), None, None, None, Some(2))
        .expect("valid config");
    let err = llm.complete_once("sys", "hi").await.unwrap_err();
    assert!(matches!(err, PersonaError::Transport(TransportError::Http(_))));
}
