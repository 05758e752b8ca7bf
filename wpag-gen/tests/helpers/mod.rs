//! Test Helper Utilities
//!
//! Shared mock-server setup for wpag-gen integration tests

#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wpag_gen::services::{CompletionClient, CompletionSettings, Credentials, WordPressClient};

pub const POSTS_PATH: &str = "/wp-json/wp/v2/posts";
pub const TAGS_PATH: &str = "/wp-json/wp/v2/tags";
pub const COMPLETIONS_PATH: &str = "/chat/completions";

/// `editor:pass` as sent in the Basic auth header
pub const BASIC_AUTH: &str = "Basic ZWRpdG9yOnBhc3M=";

pub fn wp_client(server: &MockServer) -> WordPressClient {
    WordPressClient::with_rate_limit(&server.uri(), Credentials::new("editor", "pass"), 1000)
        .unwrap()
}

pub fn completion_client(server: &MockServer) -> CompletionClient {
    CompletionClient::new(CompletionSettings {
        api_key: "sk-test-key".to_string(),
        model: "gpt-test".to_string(),
        base_url: server.uri(),
        temperature: 0.7,
        max_tokens: 1200,
    })
    .unwrap()
}

pub fn post_json(id: u64, title: &str) -> Value {
    json!({
        "id": id,
        "title": { "rendered": title },
        "content": { "rendered": "<p>body</p>" },
        "tags": [],
        "categories": [2],
        "date": "2024-05-01T10:00:00",
        "status": "publish"
    })
}

pub fn posts_page(titles: &[&str], first_id: u64) -> Value {
    Value::Array(
        titles
            .iter()
            .enumerate()
            .map(|(i, t)| post_json(first_id + i as u64, t))
            .collect(),
    )
}

pub fn completion_json(content: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": content }, "finish_reason": "stop" }
        ]
    })
}

/// Serve `titles` on page 1 and an out-of-range error on page 2
pub async fn mount_existing_titles(server: &MockServer, titles: &[&str]) {
    Mock::given(method("GET"))
        .and(path(POSTS_PATH))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(posts_page(titles, 1)))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(POSTS_PATH))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": "rest_post_invalid_page_number",
            "message": "The page number requested is larger than the number of pages available.",
            "data": { "status": 400 }
        })))
        .mount(server)
        .await;
}
