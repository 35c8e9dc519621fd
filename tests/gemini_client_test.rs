//! 增强客户端的 HTTP 行为测试
//!
//! 用 wiremock 模拟 `generateContent` 端点

use serde_json::json;
use wiremock::{
    matchers::{body_partial_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

use manga_enhance::{
    Config, EnhanceError, EnhancementClient, GeminiClient, ImagePayload, ProcessingOptions,
    Quality,
};

const ENDPOINT: &str = "/v1beta/models/gemini-2.5-flash-image:generateContent";

fn config_for(server: &MockServer) -> Config {
    Config {
        api_key: Some("test-key".to_string()),
        api_base_url: format!("{}/v1beta", server.uri()),
        ..Config::default()
    }
}

fn page() -> ImagePayload {
    ImagePayload::from_bytes("image/jpeg", b"original page")
}

#[tokio::test]
async fn test_returns_first_inline_image() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{
                "parts": [
                    { "inlineData": { "mimeType": "image/jpeg", "data": page().data } }
                ]
            }],
            "generationConfig": { "imageConfig": { "imageSize": "2K" } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "Here is the colorized page." },
                    { "inlineData": { "mimeType": "image/png", "data": "Y29sb3JlZA==" } }
                ]},
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::new(&config_for(&server)).unwrap();
    let options = ProcessingOptions {
        quality: Quality::High,
        ..Default::default()
    };

    let result = client.enhance(&page(), &options).await.unwrap();

    assert_eq!(result.to_data_uri(), "data:image/png;base64,Y29sb3JlZA==");
    assert_eq!(result.decode().unwrap(), b"colored");
}

#[tokio::test]
async fn test_prompt_embeds_target_language() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [
                { "inlineData": { "mimeType": "image/png", "data": "AAAA" } }
            ]}}]
        })))
        .mount(&server)
        .await;

    let client = GeminiClient::new(&config_for(&server)).unwrap();
    let options = ProcessingOptions {
        colorize: false,
        translate: true,
        target_language: "French".to_string(),
        quality: Quality::Standard,
    };
    client.enhance(&page(), &options).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let parts = body["contents"][0]["parts"].as_array().unwrap();
    assert_eq!(parts.len(), 2);

    let text = parts[1]["text"].as_str().unwrap();
    assert!(text.contains("French"));
    assert!(!text.contains("Colorize"));
    assert_eq!(text.lines().count(), 3);
}

#[tokio::test]
async fn test_text_only_response_is_non_image_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [
                { "text": "I can't help with that." }
            ]}}]
        })))
        .mount(&server)
        .await;

    let client = GeminiClient::new(&config_for(&server)).unwrap();
    let err = client
        .enhance(&page(), &ProcessingOptions::default())
        .await
        .unwrap_err();

    match err {
        EnhanceError::NonImageResponse { text } => assert_eq!(text, "I can't help with that."),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_candidates_is_no_candidates_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [],
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .mount(&server)
        .await;

    let client = GeminiClient::new(&config_for(&server)).unwrap();
    let err = client
        .enhance(&page(), &ProcessingOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, EnhanceError::NoCandidates));
}

#[tokio::test]
async fn test_http_error_carries_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(
            ResponseTemplate::new(429).set_body_string(r#"{"error":{"message":"quota exceeded"}}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::new(&config_for(&server)).unwrap();
    let err = client
        .enhance(&page(), &ProcessingOptions::default())
        .await
        .unwrap_err();

    match err {
        EnhanceError::Api { status, body } => {
            assert_eq!(status, 429);
            assert!(body.contains("quota exceeded"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_success_status_with_non_json_body_is_invalid_payload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>upstream proxy</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::new(&config_for(&server)).unwrap();
    let err = client
        .enhance(&page(), &ProcessingOptions::default())
        .await
        .unwrap_err();

    match err {
        EnhanceError::InvalidPayload(message) => assert!(message.contains("upstream proxy")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let server = MockServer::start().await;
    let config = config_for(&server);
    drop(server);

    let client = GeminiClient::new(&config).unwrap();
    let err = client
        .enhance(&page(), &ProcessingOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, EnhanceError::Transport { .. }));
}

#[tokio::test]
#[ignore] // 需要真实的 GEMINI_API_KEY：cargo test -- --ignored
async fn test_live_colorize_single_page() {
    dotenvy::dotenv().ok();
    let config = Config::from_env();
    let client = GeminiClient::new(&config).expect("缺少 GEMINI_API_KEY");

    let path = std::env::var("LIVE_TEST_IMAGE").unwrap_or_else(|_| "page.jpg".to_string());
    let bytes = std::fs::read(&path).expect("读取测试图片失败");

    let result = client
        .enhance(
            &ImagePayload::from_bytes("image/jpeg", &bytes),
            &ProcessingOptions::default(),
        )
        .await
        .expect("增强失败");

    assert!(result.mime_type.starts_with("image/"));
    assert!(!result.decode().unwrap().is_empty());
}
