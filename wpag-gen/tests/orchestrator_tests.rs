//! End-to-end generation runs against mock WordPress and completion servers

mod helpers;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use helpers::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use wpag_common::PeriodKey;
use wpag_gen::license::{Edition, LicenseManager};
use wpag_gen::{
    DenialReason, GenError, GenerationOrchestrator, PostStatus, PublishOptions, RunOutcome,
    RunRequest, Technology,
};

fn orchestrator(server: &MockServer, edition: Edition, root: &Path) -> GenerationOrchestrator {
    GenerationOrchestrator::new(
        wp_client(server),
        Arc::new(completion_client(server)),
        LicenseManager::open(edition, root),
        PublishOptions {
            post_status: PostStatus::Draft,
            publish_delay: Duration::ZERO,
            category_override: None,
        },
    )
}

fn seed_usage(root: &Path, edition: Edition, count: u32) {
    let file = root.join(format!("usage_{}.json", edition.as_str()));
    let mut body = BTreeMap::new();
    body.insert(PeriodKey::current().to_string(), count);
    std::fs::write(file, serde_json::to_string_pretty(&body).unwrap()).unwrap();
}

fn recorded_usage(root: &Path, edition: Edition) -> Option<u64> {
    let file = root.join(format!("usage_{}.json", edition.as_str()));
    let raw = std::fs::read_to_string(file).ok()?;
    let value: serde_json::Value = serde_json::from_str(&raw).ok()?;
    value[PeriodKey::current().as_str()].as_u64()
}

async fn mount_completion(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_json("## 概要\n\n本文です。\n\n```python\nprint(1)\n```")),
        )
        .mount(server)
        .await;
}

async fn mount_create_post(server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path(POSTS_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_json(post_json(101, "created")))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_run_filters_generates_publishes_and_records() {
    let server = MockServer::start().await;
    let root = TempDir::new().unwrap();

    mount_existing_titles(&server, &["Pandas で大量データを効率的に処理する方法"]).await;
    mount_completion(&server).await;

    Mock::given(method("POST"))
        .and(path(POSTS_PATH))
        .and(body_partial_json(json!({ "status": "draft", "categories": [7] })))
        .respond_with(ResponseTemplate::new(201).set_body_json(post_json(101, "created")))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(TAGS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let mut orch = orchestrator(&server, Edition::Standard, root.path());
    let outcome = orch
        .run(RunRequest {
            technology: Technology::Python,
            count: 2,
            topics: vec![
                "Pandas で大量データを効率的に処理する方法".to_string(),
                "Python の型ヒント入門ガイド".to_string(),
                "asyncio で並行処理を書く基本".to_string(),
                "python の型ヒント入門ガイド".to_string(),
            ],
        })
        .await
        .unwrap();

    let RunOutcome::Completed(summary) = outcome else {
        panic!("expected completed run, got {:?}", outcome);
    };
    assert_eq!(summary.candidates, 4);
    assert_eq!(summary.skipped_duplicates, 2);
    assert_eq!(summary.attempted, 2);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.post_ids, vec![101, 101]);

    assert_eq!(recorded_usage(root.path(), Edition::Standard), Some(2));
    assert_eq!(orch.license().get_usage_stats().current_usage, 2);
}

#[tokio::test]
async fn test_technology_denial_makes_no_requests() {
    let server = MockServer::start().await;
    let root = TempDir::new().unwrap();

    let mut orch = orchestrator(&server, Edition::Entry, root.path());
    let outcome = orch
        .run(RunRequest {
            technology: Technology::Python,
            count: 1,
            topics: vec![],
        })
        .await
        .unwrap();

    assert_eq!(
        outcome,
        RunOutcome::Denied(DenialReason::TechnologyNotLicensed(Technology::Python))
    );
    assert!(server.received_requests().await.unwrap().is_empty());
    assert_eq!(recorded_usage(root.path(), Edition::Entry), None);
}

#[tokio::test]
async fn test_quota_denial_is_all_or_nothing() {
    let server = MockServer::start().await;
    let root = TempDir::new().unwrap();
    seed_usage(root.path(), Edition::Entry, 49);

    let mut orch = orchestrator(&server, Edition::Entry, root.path());
    let outcome = orch
        .run(RunRequest {
            technology: Technology::WordPress,
            count: 2,
            topics: vec![],
        })
        .await
        .unwrap();

    assert_eq!(
        outcome,
        RunOutcome::Denied(DenialReason::QuotaExceeded {
            requested: 2,
            remaining: 1
        })
    );
    assert!(server.received_requests().await.unwrap().is_empty());
    assert_eq!(recorded_usage(root.path(), Edition::Entry), Some(49));
}

#[tokio::test]
async fn test_technology_without_generator_is_config_error() {
    let server = MockServer::start().await;
    let root = TempDir::new().unwrap();

    let mut orch = orchestrator(&server, Edition::Pro, root.path());
    let result = orch
        .run(RunRequest {
            technology: Technology::Sql,
            count: 1,
            topics: vec![],
        })
        .await;

    assert!(matches!(result, Err(GenError::Config(_))));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_blank_topic_is_rejected() {
    let server = MockServer::start().await;
    let root = TempDir::new().unwrap();

    let mut orch = orchestrator(&server, Edition::Pro, root.path());
    let result = orch
        .run(RunRequest {
            technology: Technology::React,
            count: 1,
            topics: vec!["Valid topic here".to_string(), "   ".to_string()],
        })
        .await;

    assert!(matches!(result, Err(GenError::InvalidInput(_))));
}

#[tokio::test]
async fn test_pro_edition_attaches_tags() {
    let server = MockServer::start().await;
    let root = TempDir::new().unwrap();

    mount_existing_titles(&server, &[]).await;
    mount_completion(&server).await;

    Mock::given(method("GET"))
        .and(path(TAGS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(TAGS_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 5, "name": "tag" })))
        .expect(4)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(POSTS_PATH))
        .and(body_partial_json(json!({ "categories": [8], "tags": [5, 5, 5, 5] })))
        .respond_with(ResponseTemplate::new(201).set_body_json(post_json(202, "created")))
        .expect(1)
        .mount(&server)
        .await;

    let mut orch = orchestrator(&server, Edition::Pro, root.path());
    let outcome = orch
        .run(RunRequest {
            technology: Technology::React,
            count: 1,
            topics: vec!["React のエラーハンドリング設計パターン".to_string()],
        })
        .await
        .unwrap();

    let RunOutcome::Completed(summary) = outcome else {
        panic!("expected completed run, got {:?}", outcome);
    };
    assert_eq!(summary.post_ids, vec![202]);
    assert_eq!(recorded_usage(root.path(), Edition::Pro), Some(1));
}

#[tokio::test]
async fn test_publish_failures_are_counted_not_recorded() {
    let server = MockServer::start().await;
    let root = TempDir::new().unwrap();

    mount_existing_titles(&server, &[]).await;
    mount_completion(&server).await;
    mount_create_post(&server, 500).await;

    let mut orch = orchestrator(&server, Edition::Entry, root.path());
    let outcome = orch
        .run(RunRequest {
            technology: Technology::WordPress,
            count: 2,
            topics: vec![
                "WordPressのマルチサイト運用入門".to_string(),
                "WordPressのバックアップ戦略まとめ".to_string(),
            ],
        })
        .await
        .unwrap();

    let RunOutcome::Completed(summary) = outcome else {
        panic!("expected completed run, got {:?}", outcome);
    };
    assert_eq!(summary.attempted, 2);
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.succeeded, 0);
    assert_eq!(recorded_usage(root.path(), Edition::Entry), None);
}

#[tokio::test]
async fn test_all_candidates_duplicate() {
    let server = MockServer::start().await;
    let root = TempDir::new().unwrap();

    mount_existing_titles(&server, &["Vue Router 4 でルートガードとナビゲーション制御"]).await;

    let mut orch = orchestrator(&server, Edition::Standard, root.path());
    let outcome = orch
        .run(RunRequest {
            technology: Technology::Vue,
            count: 1,
            topics: vec!["vue router 4 でルートガードとナビゲーション制御".to_string()],
        })
        .await
        .unwrap();

    let RunOutcome::Completed(summary) = outcome else {
        panic!("expected completed run, got {:?}", outcome);
    };
    assert_eq!(summary.skipped_duplicates, 1);
    assert_eq!(summary.attempted, 0);
    assert_eq!(recorded_usage(root.path(), Edition::Standard), None);
}

/// Answers post creation while noting the usage already on disk
struct UsageAtPublish {
    root: PathBuf,
    edition: Edition,
    seen: Arc<Mutex<Vec<Option<u64>>>>,
}

impl Respond for UsageAtPublish {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let mut seen = self.seen.lock().unwrap();
        seen.push(recorded_usage(&self.root, self.edition));
        let id = 300 + seen.len() as u64;
        ResponseTemplate::new(201).set_body_json(post_json(id, "created"))
    }
}

#[tokio::test]
async fn test_usage_is_recorded_after_each_publish() {
    let server = MockServer::start().await;
    let root = TempDir::new().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));

    mount_existing_titles(&server, &[]).await;
    mount_completion(&server).await;
    Mock::given(method("POST"))
        .and(path(POSTS_PATH))
        .respond_with(UsageAtPublish {
            root: root.path().to_path_buf(),
            edition: Edition::Entry,
            seen: Arc::clone(&seen),
        })
        .expect(3)
        .mount(&server)
        .await;

    let mut orch = orchestrator(&server, Edition::Entry, root.path());
    let outcome = orch
        .run(RunRequest {
            technology: Technology::WordPress,
            count: 3,
            topics: vec![
                "WordPressのマルチサイト運用入門".to_string(),
                "WordPressのバックアップ戦略まとめ".to_string(),
                "WordPressの画像最適化テクニック".to_string(),
            ],
        })
        .await
        .unwrap();

    assert!(matches!(outcome, RunOutcome::Completed(ref s) if s.succeeded == 3));
    // Each publish already sees the articles before it on disk
    assert_eq!(*seen.lock().unwrap(), vec![None, Some(1), Some(2)]);
    assert_eq!(recorded_usage(root.path(), Edition::Entry), Some(3));
}
