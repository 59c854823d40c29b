use anyhow::Result;
use httpmock::prelude::*;
use path_suggest::{
    ConfigProvider, PathSuggestionRequest, PathSuggestionService, ProviderClient, TomlConfig,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const GEMINI_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

fn gemini_config(base_url: &str, timeout_seconds: u64) -> Result<TomlConfig> {
    let config = TomlConfig::from_toml_str(&format!(
        r#"
[provider]
kind = "gemini"
base_url = "{}"
api_key = "integration-key"
timeout_seconds = {}
"#,
        base_url, timeout_seconds
    ))?;
    Ok(config)
}

fn gemini_reply(answer: serde_json::Value) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": answer.to_string() }] },
            "finishReason": "STOP"
        }]
    })
}

fn service_for(config: &TomlConfig) -> Result<PathSuggestionService<ProviderClient>> {
    let provider = ProviderClient::from_config(config)?;
    Ok(PathSuggestionService::with_timeout(
        provider,
        config.request_timeout(),
    ))
}

/// 資料科學家情境：provider 回傳三筆建議，原樣傳回
#[tokio::test]
async fn test_data_scientist_scenario_end_to_end() -> Result<()> {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(GEMINI_PATH)
                .header("x-goog-api-key", "integration-key")
                .body_contains("User Goals: become a data scientist")
                .body_contains("Trending Skills: Python, data analysis, machine learning");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(gemini_reply(json!({
                    "suggestedLearningPaths": [
                        "Intro to Python for Data Science",
                        "Statistics Fundamentals",
                        "Machine Learning Basics"
                    ]
                })));
        })
        .await;

    let config = gemini_config(&server.base_url(), 10)?;
    let service = service_for(&config)?;

    let response = service
        .suggest(&PathSuggestionRequest::new(
            "become a data scientist",
            "Python, data analysis, machine learning",
        ))
        .await?;

    api_mock.assert_async().await;
    assert_eq!(
        response.suggested_learning_paths,
        vec![
            "Intro to Python for Data Science",
            "Statistics Fundamentals",
            "Machine Learning Basics"
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_empty_goals_make_no_network_call() -> Result<()> {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200)
                .json_body(gemini_reply(json!({"suggestedLearningPaths": ["x"]})));
        })
        .await;

    let config = gemini_config(&server.base_url(), 10)?;
    let service = service_for(&config)?;

    let err = service
        .suggest(&PathSuggestionRequest::new("", ""))
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(err.field(), Some("userGoals"));
    assert_eq!(api_mock.hits_async().await, 0);
    Ok(())
}

#[tokio::test]
async fn test_empty_suggestion_list_is_success() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GEMINI_PATH);
            then.status(200)
                .json_body(gemini_reply(json!({"suggestedLearningPaths": []})));
        })
        .await;

    let config = gemini_config(&server.base_url(), 10)?;
    let response = service_for(&config)?
        .suggest(&PathSuggestionRequest::new("learn UX design principles", ""))
        .await?;

    assert!(response.suggested_learning_paths.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_non_string_element_is_provider_error() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GEMINI_PATH);
            then.status(200).json_body(gemini_reply(
                json!({"suggestedLearningPaths": ["Rust Basics", {"title": "Async"}]}),
            ));
        })
        .await;

    let config = gemini_config(&server.base_url(), 10)?;
    let err = service_for(&config)?
        .suggest(&PathSuggestionRequest::new("learn systems programming", "Rust"))
        .await
        .unwrap_err();

    assert!(err.is_provider());
    assert_eq!(err.exit_code(), 2);
    Ok(())
}

#[tokio::test]
async fn test_missing_field_is_provider_error() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GEMINI_PATH);
            then.status(200)
                .json_body(gemini_reply(json!({"learningPaths": ["Rust Basics"]})));
        })
        .await;

    let config = gemini_config(&server.base_url(), 10)?;
    let err = service_for(&config)?
        .suggest(&PathSuggestionRequest::new("learn systems programming", "Rust"))
        .await
        .unwrap_err();

    assert!(err.is_provider());
    Ok(())
}

#[tokio::test]
async fn test_slow_provider_hits_timeout() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GEMINI_PATH);
            then.status(200)
                .delay(Duration::from_secs(3))
                .json_body(gemini_reply(json!({"suggestedLearningPaths": ["late"]})));
        })
        .await;

    let config = gemini_config(&server.base_url(), 1)?;
    let err = service_for(&config)?
        .suggest(&PathSuggestionRequest::new("learn Kubernetes operations", ""))
        .await
        .unwrap_err();

    assert!(err.is_provider());
    Ok(())
}

#[tokio::test]
async fn test_suggest_value_from_json_request() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path(GEMINI_PATH)
                .body_contains("Trending Skills: React");
            then.status(200)
                .json_body(gemini_reply(json!({"suggestedLearningPaths": ["Frontend Foundations"]})));
        })
        .await;

    let config = gemini_config(&server.base_url(), 10)?;
    let response = service_for(&config)?
        .suggest_value(&json!({
            "userGoals": "become a full-stack web developer",
            "trendingSkills": "React"
        }))
        .await?;

    assert_eq!(response.suggested_learning_paths, vec!["Frontend Foundations"]);
    Ok(())
}

#[tokio::test]
async fn test_openai_compatible_provider_end_to_end() -> Result<()> {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("authorization", "Bearer integration-key")
                .body_contains("\"model\":\"local-model\"");
            then.status(200).json_body(json!({
                "choices": [{
                    "message": {
                        "role": "assistant",
                        "content": json!({"suggestedLearningPaths": ["Cloud Computing 101"]}).to_string()
                    }
                }]
            }));
        })
        .await;

    let config = TomlConfig::from_toml_str(&format!(
        r#"
[provider]
kind = "openai"
base_url = "{}"
model = "local-model"
api_key = "integration-key"
"#,
        server.base_url()
    ))?;

    let response = service_for(&config)?
        .suggest(&PathSuggestionRequest::new("move into cloud engineering", "AWS"))
        .await?;

    api_mock.assert_async().await;
    assert_eq!(response.suggested_learning_paths, vec!["Cloud Computing 101"]);
    Ok(())
}

#[tokio::test]
async fn test_concurrent_requests_share_one_service() -> Result<()> {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(POST).path(GEMINI_PATH);
            then.status(200)
                .json_body(gemini_reply(json!({"suggestedLearningPaths": ["Shared Path"]})));
        })
        .await;

    let config = gemini_config(&server.base_url(), 10)?;
    let service = Arc::new(service_for(&config)?);

    let mut handles = Vec::new();
    for i in 0..5 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            service
                .suggest(&PathSuggestionRequest::new(format!("goal number {}", i), ""))
                .await
        }));
    }

    for handle in handles {
        let response = handle.await??;
        assert_eq!(response.suggested_learning_paths, vec!["Shared Path"]);
    }
    assert_eq!(api_mock.hits_async().await, 5);
    Ok(())
}
