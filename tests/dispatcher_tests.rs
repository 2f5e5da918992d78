//! Dispatcher tests: update text in, Bot API calls out


use serde_json::json;
use test_helpers::{method_path, test_bot_context, text_update};
use webhook_bot::bot::start_message;
use webhook_bot::telegram::{Update, User};
use webhook_bot::CommandDispatcher;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn update_from(value: serde_json::Value) -> Update {
    serde_json::from_value(value).expect("valid update")
}

fn ada() -> User {
    User {
        id: 4242,
        is_bot: false,
        first_name: "Ada".to_string(),
        last_name: Some("Lovelace".to_string()),
        username: Some("ada".to_string()),
        language_code: Some("en".to_string()),
    }
}

#[tokio::test]
async fn test_start_replies_with_template() {
    let server = MockServer::start().await;
    let ctx = test_bot_context(&server.uri());
    let expected_text = start_message(&ctx.localization, Some(&ada()));

    Mock::given(method("POST"))
        .and(path(method_path("sendMessage")))
        .and(body_json(json!({"chat_id": 555, "text": expected_text})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = CommandDispatcher::default();
    let matched = dispatcher
        .dispatch(&ctx, &update_from(text_update("/start", 555)))
        .await
        .unwrap();
    assert_eq!(matched, Some("/start"));
}

#[tokio::test]
async fn test_command_anywhere_in_text_matches() {
    let server = MockServer::start().await;
    let ctx = test_bot_context(&server.uri());

    Mock::given(method("POST"))
        .and(path(method_path("sendMessage")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let matched = CommandDispatcher::default()
        .dispatch(&ctx, &update_from(text_update("hello /start world", 555)))
        .await
        .unwrap();
    assert_eq!(matched, Some("/start"));
}

#[tokio::test]
async fn test_unknown_command_makes_no_call() {
    let server = MockServer::start().await;
    let ctx = test_bot_context(&server.uri());

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let matched = CommandDispatcher::default()
        .dispatch(&ctx, &update_from(text_update("/unknown", 555)))
        .await
        .unwrap();
    assert_eq!(matched, None);
}

#[tokio::test]
async fn test_update_without_message_is_ignored() {
    let server = MockServer::start().await;
    let ctx = test_bot_context(&server.uri());

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dispatcher = CommandDispatcher::default();
    let no_message = update_from(json!({"update_id": 1}));
    assert_eq!(dispatcher.dispatch(&ctx, &no_message).await.unwrap(), None);

    let no_text = update_from(json!({
        "update_id": 2,
        "message": {"message_id": 1, "chat": {"id": 5, "type": "private"}}
    }));
    assert_eq!(dispatcher.dispatch(&ctx, &no_text).await.unwrap(), None);
}

#[tokio::test]
async fn test_platform_rejection_is_not_a_dispatch_error() {
    let server = MockServer::start().await;
    let ctx = test_bot_context(&server.uri());

    Mock::given(method("POST"))
        .and(path(method_path("sendMessage")))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"ok": false})))
        .expect(1)
        .mount(&server)
        .await;

    let result = CommandDispatcher::default()
        .dispatch(&ctx, &update_from(text_update("/start", 555)))
        .await;
    assert!(result.is_ok());
}
