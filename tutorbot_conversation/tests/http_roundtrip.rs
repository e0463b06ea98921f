//! End-to-end rounds through `HttpQueryClient` and a mocked backend.

use serde_json::json;
use tutorbot_conversation::{ERROR_NOTICE, SessionConfig, SessionController};
use tutorbot_core::SharedSelection;
use tutorbot_providers::HttpQueryClient;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mount(
    server: &MockServer,
    page: &SharedSelection,
) -> SessionController<HttpQueryClient, SharedSelection> {
    SessionController::new(
        HttpQueryClient::new(server.uri()),
        page.clone(),
        SessionConfig::default().with_start_open(true),
    )
}

#[tokio::test]
async fn test_answer_with_sources_lands_in_log() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/query"))
        .and(body_partial_json(json!({
            "question": "What is a humanoid robot?",
            "selected_text": null
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "A humanoid robot is...",
            "sources": [{"chapter": "Chapter 1", "section": "1.1", "score": 0.93}],
            "context_used": "..."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = SharedSelection::new();
    let mut session = mount(&server, &page);
    assert!(session.ask("What is a humanoid robot?").await);

    let reply = session.store().last().expect("reply");
    assert_eq!(reply.content, "A humanoid robot is...");
    assert_eq!(reply.sources()[0].chapter, "Chapter 1");
    assert_eq!(reply.sources()[0].extra.get("section"), Some(&json!("1.1")));
}

#[tokio::test]
async fn test_selection_is_forwarded() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/query"))
        .and(body_partial_json(json!({
            "question": "Explain this",
            "selected_text": "torque control"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "It commands joint torques directly.",
            "sources": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = SharedSelection::new();
    page.select("torque control");
    let mut session = mount(&server, &page);
    assert!(session.ask("Explain this").await);

    let reply = session.store().last().expect("reply");
    assert!(!reply.is_error);
    assert!(reply.sources().is_empty());
}

#[tokio::test]
async fn test_server_error_keeps_widget_usable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/query"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let page = SharedSelection::new();
    let mut session = mount(&server, &page);
    assert!(session.ask("What is a humanoid robot?").await);

    assert_eq!(session.store().len(), 3);
    let notice = session.store().last().expect("notice");
    assert!(notice.is_error);
    assert_eq!(notice.content, ERROR_NOTICE);
    assert!(!session.state().is_busy());
    assert!(session.state().is_open());

    Mock::given(method("POST"))
        .and(path("/api/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "Back online."
        })))
        .mount(&server)
        .await;

    assert!(session.ask("Try again").await);
    assert_eq!(session.store().len(), 5);
    assert!(!session.store().last().expect("reply").is_error);
}
