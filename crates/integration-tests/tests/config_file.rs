mod harness;

use std::io::Write as _;

use conduit_config::{ApiKey, ApiKeySource, Config};
use conduit_mcp::GENERATE_TEXT;
use harness::mock_api::{MockApi, TEST_KEY};
use harness::session::{McpSession, is_error, text};
use serde_json::json;

#[tokio::test]
async fn config_file_drives_the_bridge() {
    let mock = MockApi::start().await.unwrap();

    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    write!(
        file,
        r#"
[upstream]
base_url = "{base_url}"
api_key = "{TEST_KEY}"

[defaults]
model = "gpt-5-mini"
reasoning_effort = "low"
web_search = false

[validation]
unknown_fields = "strict"
"#,
        base_url = mock.base_url(),
    )
    .unwrap();

    let loaded = Config::discover(Some(file.path())).unwrap();
    let api_key = ApiKey::resolve(&loaded);
    assert_eq!(api_key.source(), &ApiKeySource::ConfigFile(file.path().to_path_buf()));

    let session = McpSession::start(&loaded.config, &api_key).await.unwrap();

    let result = session.call(GENERATE_TEXT, json!({"prompt": "hi"})).await;
    assert!(!is_error(&result), "{}", text(&result));
    assert_eq!(
        mock.last_request().unwrap(),
        json!({"model": "gpt-5-mini", "input": "hi", "reasoning": {"effort": "low"}})
    );

    let result = session.call(GENERATE_TEXT, json!({"prompt": "hi", "seed": 1})).await;
    assert!(is_error(&result));

    session.shutdown().await.unwrap();
}
