use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use twister_core::{StoryTree, Twist, TwistId};
use twister_error::{
    TransportError, TransportErrorKind, TwisterErrorKind, TwisterResult, ValidationErrorKind,
};
use twister_publish::{PublishingApi, Story3Client, UploadReceipt, Uploader};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Story(String),
    Twist { parent: String, title: String },
    Publish(String),
}

/// Records every call and hands out hash ids derived from titles.
#[derive(Debug, Default)]
struct RecordingApi {
    calls: Mutex<Vec<Call>>,
    fail_on_title: Option<String>,
}

impl RecordingApi {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PublishingApi for RecordingApi {
    async fn create_story(&self, twist: &Twist) -> TwisterResult<String> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Story(twist.title.clone()));
        Ok(format!("h-{}", twist.title))
    }

    async fn create_twist(&self, parent_hash_id: &str, twist: &Twist) -> TwisterResult<String> {
        if self.fail_on_title.as_deref() == Some(twist.title.as_str()) {
            return Err(TransportError::from_status(500, "boom").into());
        }
        self.calls.lock().unwrap().push(Call::Twist {
            parent: parent_hash_id.to_string(),
            title: twist.title.clone(),
        });
        Ok(format!("h-{}", twist.title))
    }

    async fn publish_twist(&self, hash_id: &str) -> TwisterResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Publish(hash_id.to_string()));
        Ok(())
    }
}

fn tree(ids: &[&str]) -> StoryTree {
    let tree = StoryTree::new();
    for id in ids {
        tree.insert(
            TwistId::parse(*id).unwrap(),
            Twist::new(format!("t{}", id), format!("body {}", id)),
        );
    }
    tree
}

#[tokio::test]
async fn test_upload_walks_parents_first() {
    let api = Arc::new(RecordingApi::default());
    let uploader = Uploader::new(api.clone());

    let receipt = uploader
        .upload(&tree(&["01", "0", "010", "00"]))
        .await
        .unwrap();

    assert_eq!(
        api.calls(),
        vec![
            Call::Story("t0".to_string()),
            Call::Twist {
                parent: "h-t0".to_string(),
                title: "t00".to_string()
            },
            Call::Twist {
                parent: "h-t0".to_string(),
                title: "t01".to_string()
            },
            Call::Twist {
                parent: "h-t01".to_string(),
                title: "t010".to_string()
            },
        ]
    );
    assert_eq!(receipt.len(), 4);
    assert_eq!(receipt.story_hash_id(), Some("h-t0"));
    assert_eq!(
        receipt.hash_id(&TwistId::parse("010").unwrap()),
        Some("h-t010")
    );
}

#[tokio::test]
async fn test_orphans_are_rejected_before_any_call() {
    let api = Arc::new(RecordingApi::default());
    let uploader = Uploader::new(api.clone());

    let err = uploader.upload(&tree(&["0", "012"])).await.unwrap_err();

    match err.kind() {
        TwisterErrorKind::Validation(e) => {
            assert_eq!(e.kind(), &ValidationErrorKind::OrphanTwist("012".to_string()))
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_tree_files_have_a_single_story_root() {
    let second_root = r#"{
        "0": {"title": "t0", "body": "b0"},
        "1": {"title": "t1", "body": "b1"},
        "00": {"title": "t00", "body": "b00"}
    }"#;
    assert!(serde_json::from_str::<StoryTree>(second_root).is_err());

    let single_root = r#"{
        "0": {"title": "t0", "body": "b0"},
        "00": {"title": "t00", "body": "b00"}
    }"#;
    let tree: StoryTree = serde_json::from_str(single_root).unwrap();
    let api = Arc::new(RecordingApi::default());
    Uploader::new(api.clone()).upload(&tree).await.unwrap();

    let stories = api
        .calls()
        .into_iter()
        .filter(|call| matches!(call, Call::Story(_)))
        .count();
    assert_eq!(stories, 1);
}

#[tokio::test]
async fn test_remote_failure_stops_the_walk() {
    let api = Arc::new(RecordingApi {
        fail_on_title: Some("t00".to_string()),
        ..Default::default()
    });
    let uploader = Uploader::new(api.clone());

    let err = uploader
        .upload(&tree(&["0", "00", "01"]))
        .await
        .unwrap_err();

    assert!(err.is_retryable());
    assert_eq!(api.calls(), vec![Call::Story("t0".to_string())]);
}

#[tokio::test]
async fn test_publish_follows_receipt_order() {
    let api = Arc::new(RecordingApi::default());
    let uploader = Uploader::new(api.clone());

    let receipt: UploadReceipt =
        serde_json::from_str(r#"{"00": "h-b", "0": "h-a", "01": "h-c"}"#).unwrap();
    uploader.publish(&receipt).await.unwrap();

    assert_eq!(
        api.calls(),
        vec![
            Call::Publish("h-a".to_string()),
            Call::Publish("h-b".to_string()),
            Call::Publish("h-c".to_string()),
        ]
    );
}

#[test]
fn test_receipt_rejects_invalid_ids() {
    assert!(serde_json::from_str::<UploadReceipt>(r#"{"0a": "h"}"#).is_err());
}

#[test]
fn test_endpoint_joins_paths() {
    let client = Story3Client::with_token("token", "https://story3.com/api/v2/");
    assert_eq!(client.endpoint("stories"), "https://story3.com/api/v2/stories");

    let client = Story3Client::with_token("token", "http://localhost:3000/api");
    assert_eq!(
        client.endpoint("twists/abc/publish"),
        "http://localhost:3000/api/twists/abc/publish"
    );
}

#[tokio::test]
async fn test_unreachable_publishing_api_is_transport_error() {
    let client = Story3Client::with_token("token", "http://127.0.0.1:9/api/v2/");

    let err = client
        .create_story(&Twist::new("The Lighthouse", "The lamp goes dark."))
        .await
        .unwrap_err();

    assert!(err.is_retryable());
    match err.kind() {
        TwisterErrorKind::Transport(e) => {
            assert!(matches!(e.kind(), TransportErrorKind::Http(_)))
        }
        other => panic!("unexpected error: {:?}", other),
    }
}
