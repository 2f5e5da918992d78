//! Outbound client tests against a mock Bot API server


use serde_json::json;
use test_helpers::{method_path, test_api_client};
use webhook_bot::telegram::{
    build_inline_result, Keyboard, KeyboardButton, MediaType, ParseMode, SendOptions,
};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn expect_call(server: &MockServer, api_method: &str, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path(method_path(api_method)))
        .and(body_json(body))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_send_message_minimal_body() {
    let server = MockServer::start().await;
    expect_call(&server, "sendMessage", json!({"chat_id": 42, "text": "hello"})).await;

    let client = test_api_client(&server.uri());
    let response = client
        .send_message(42, "hello", &SendOptions::new())
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_send_message_with_markup_and_parse_mode() {
    let server = MockServer::start().await;
    expect_call(
        &server,
        "sendMessage",
        json!({
            "chat_id": 42,
            "text": "*menu*",
            "parse_mode": "MarkdownV2",
            "reply_markup": {
                "inline_keyboard": [
                    [{"text": "A", "callback_data": "a"}, {"text": "B", "callback_data": "b"}],
                    [{"text": "C", "callback_data": "c"}]
                ]
            }
        }),
    )
    .await;

    let keyboard = Keyboard::new(
        vec![
            KeyboardButton::new("A", "a"),
            KeyboardButton::new("B", "b"),
            KeyboardButton::new("C", "c"),
        ],
        2,
    )
    .unwrap();
    let options = SendOptions::new()
        .parse_mode(ParseMode::MarkdownV2)
        .keyboard(keyboard);

    let client = test_api_client(&server.uri());
    client.send_message(42, "*menu*", &options).await.unwrap();
}

#[tokio::test]
async fn test_edit_message_text() {
    let server = MockServer::start().await;
    expect_call(
        &server,
        "editMessageText",
        json!({"chat_id": 42, "message_id": 7, "text": "updated", "parse_mode": "HTML"}),
    )
    .await;

    let client = test_api_client(&server.uri());
    client
        .edit_message_text(42, 7, "updated", &SendOptions::new().parse_mode(ParseMode::Html))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_media_operations_use_kind_specific_fields() {
    let server = MockServer::start().await;
    expect_call(&server, "sendPhoto", json!({"chat_id": 1, "photo": "P", "caption": "pic"})).await;
    expect_call(&server, "sendVideo", json!({"chat_id": 1, "video": "V"})).await;
    expect_call(
        &server,
        "sendAnimation",
        json!({"chat_id": 1, "animation": "G", "caption": "_gif_", "parse_mode": "Markdown"}),
    )
    .await;
    expect_call(&server, "sendVoice", json!({"chat_id": 1, "voice": "O"})).await;
    expect_call(&server, "sendVideoNote", json!({"chat_id": 1, "video_note": "N"})).await;
    expect_call(&server, "sendDocument", json!({"chat_id": 1, "document": "D"})).await;

    let client = test_api_client(&server.uri());
    let none = SendOptions::new();
    client.send_photo(1, "P", Some("pic"), &none).await.unwrap();
    client.send_video(1, "V", None, &none).await.unwrap();
    client
        .send_animation(1, "G", Some("_gif_"), &SendOptions::new().parse_mode(ParseMode::Markdown))
        .await
        .unwrap();
    client.send_voice(1, "O", None, &none).await.unwrap();
    client.send_video_note(1, "N", None, &none).await.unwrap();
    client.send_document(1, "D", None, &none).await.unwrap();
}

#[tokio::test]
async fn test_error_status_is_returned_not_raised() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(method_path("sendMessage")))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"ok": false, "description": "Bad Request: chat not found"})),
        )
        .mount(&server)
        .await;

    let client = test_api_client(&server.uri());
    let response = client
        .send_message(1, "hello", &SendOptions::new())
        .await
        .expect("non-success status should not be an error");

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["ok"], false);
}

#[tokio::test]
async fn test_transport_failure_is_network_error() {
    // Nothing listens on port 9 of localhost in the test environment
    let client = test_api_client("http://127.0.0.1:9");
    let err = client
        .send_message(1, "hello", &SendOptions::new())
        .await
        .unwrap_err();

    assert!(err.to_string().starts_with("[NETWORK]"));
    assert!(!err.to_string().contains(test_helpers::TEST_TOKEN));
}

#[tokio::test]
async fn test_answer_inline_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(method_path("answerInlineQuery")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let result = build_inline_result(
        "mpeg4_gif",
        "https://example.com/a.mp4",
        "Clip",
        Some("caption"),
        None,
    )
    .unwrap();
    assert_eq!(result.media_type(), MediaType::Mpeg4Gif);

    let client = test_api_client(&server.uri());
    client
        .answer_inline_query("query-1", std::slice::from_ref(&result))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["inline_query_id"], "query-1");
    assert_eq!(body["results"][0]["type"], "mpeg4_gif");
    assert_eq!(body["results"][0]["mpeg4_url"], "https://example.com/a.mp4");
    assert_eq!(body["results"][0]["id"], result.id());
}
