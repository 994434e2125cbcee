mod harness;

use conduit_mcp::LIST_MODELS;
use harness::config::{ConfigBuilder, test_key, wrong_key};
use harness::mock_api::MockApi;
use harness::session::{McpSession, is_error, text};
use serde_json::json;

#[tokio::test]
async fn default_prefix_filters_models() {
    let mock = MockApi::start().await.unwrap();
    let config = ConfigBuilder::new().with_upstream(&mock.base_url()).build();
    let session = McpSession::start(&config, &test_key()).await.unwrap();

    let result = session.call(LIST_MODELS, json!({})).await;

    assert!(!is_error(&result));
    assert_eq!(text(&result), "gpt-5, gpt-5-mini, gpt-5-nano");
    assert_eq!(mock.model_list_count(), 1);

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn explicit_prefix_wins_over_configured_default() {
    let mock = MockApi::start().await.unwrap();
    let config = ConfigBuilder::new()
        .with_upstream(&mock.base_url())
        .with_models_prefix("o")
        .build();
    let session = McpSession::start(&config, &test_key()).await.unwrap();

    assert_eq!(text(&session.call(LIST_MODELS, json!({})).await), "o3");
    assert_eq!(text(&session.call(LIST_MODELS, json!({"prefix": "gpt-4"})).await), "gpt-4o");

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn no_match_reports_sentinel() {
    let mock = MockApi::start().await.unwrap();
    let config = ConfigBuilder::new().with_upstream(&mock.base_url()).build();
    let session = McpSession::start(&config, &test_key()).await.unwrap();

    let result = session.call(LIST_MODELS, json!({"prefix": "claude"})).await;

    assert!(!is_error(&result));
    assert_eq!(text(&result), "No models found with prefix \"claude\"");

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn rejected_key_is_wrapped() {
    let mock = MockApi::start().await.unwrap();
    let config = ConfigBuilder::new().with_upstream(&mock.base_url()).build();
    let session = McpSession::start(&config, &wrong_key()).await.unwrap();

    let result = session.call(LIST_MODELS, json!({})).await;

    assert!(is_error(&result));
    let message = text(&result);
    assert!(message.starts_with(
        "upstream_error: Incorrect API key provided [status=401 code=invalid_api_key type=invalid_request_error]"
    ));
    assert!(message.contains("details={"));
    assert!(message.contains("\"code\":\"invalid_api_key\""));

    session.shutdown().await.unwrap();
}
