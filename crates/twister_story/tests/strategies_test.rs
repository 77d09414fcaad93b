mod test_utils;

use serde_json::json;
use std::sync::Arc;
use test_utils::{MockDriver, MockFailure};
use twister_core::{GenerationParameters, Role, TwistId};
use twister_error::{MalformedResponseErrorKind, TwisterErrorKind};
use twister_story::{
    CompletionAdapter, GenerationPolicy, GenerationVariant, TreeStrategy, TwistTreeGenerator,
};

fn params(branching: u32, depth: u32) -> GenerationParameters {
    GenerationParameters::builder()
        .instructions("a haunted lighthouse")
        .branching_factor(branching)
        .max_depth(depth)
        .build()
        .unwrap()
}

fn id(text: &str) -> TwistId {
    TwistId::parse(text).unwrap()
}

#[tokio::test]
async fn test_single_shot_builds_tree_from_one_reply() {
    let reply = json!({
        "0": { "title": "The Lighthouse", "body": "The lamp goes dark." },
        "00": { "title": "Climb", "body": "You climb." },
        "01": { "title": "Flee", "body": "You run." },
        "010": { "title": "Boat", "body": "You row away." },
        "abc": { "title": "Noise", "body": "Not a twist id." }
    });
    let driver = Arc::new(
        MockDriver::new().with_override("Please create an interactive story", &reply.to_string()),
    );
    let generator = TwistTreeGenerator::new(driver.clone(), GenerationPolicy::single_shot());

    let tree = generator.generate(&params(2, 3)).await.unwrap();

    assert_eq!(driver.call_count(), 1);
    assert_eq!(tree.len(), 4);
    assert_eq!(tree.get(&id("010")).unwrap().title, "Boat");
    assert!(tree.check_parents().is_ok());
}

#[tokio::test]
async fn test_single_shot_rejects_orphans() {
    let reply = json!({
        "0": { "title": "The Lighthouse", "body": "The lamp goes dark." },
        "012": { "title": "Lost", "body": "No parent here." }
    });
    let driver =
        MockDriver::new().with_override("Please create an interactive story", &reply.to_string());
    let generator = TwistTreeGenerator::new(driver, GenerationPolicy::single_shot());

    let err = generator.generate(&params(2, 3)).await.unwrap_err();
    match err.kind() {
        TwisterErrorKind::MalformedResponse(e) => assert_eq!(
            e.kind(),
            &MalformedResponseErrorKind::MissingParent("012".to_string())
        ),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_single_shot_skips_second_roots() {
    let reply = json!({
        "0": { "title": "The Lighthouse", "body": "The lamp goes dark." },
        "00": { "title": "Climb", "body": "You climb." },
        "1": { "title": "Elsewhere", "body": "A second story." },
        "10": { "title": "Elsewhere child", "body": "Below the second story." }
    });
    let driver =
        MockDriver::new().with_override("Please create an interactive story", &reply.to_string());
    let generator = TwistTreeGenerator::new(driver, GenerationPolicy::single_shot());

    let tree = generator.generate(&params(2, 3)).await.unwrap();

    let ids = tree
        .snapshot()
        .into_keys()
        .map(String::from)
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["0", "00"]);
    assert!(tree.check_parents().is_ok());
}

#[tokio::test]
async fn test_single_shot_requires_root() {
    let reply = json!({ "00": { "title": "Climb", "body": "You climb." } });
    let driver =
        MockDriver::new().with_override("Please create an interactive story", &reply.to_string());
    let generator = TwistTreeGenerator::new(driver, GenerationPolicy::single_shot());

    let err = generator.generate(&params(2, 3)).await.unwrap_err();
    match err.kind() {
        TwisterErrorKind::MalformedResponse(e) => {
            assert_eq!(e.kind(), &MalformedResponseErrorKind::MissingKey("0".to_string()))
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_linear_story_becomes_a_chain() {
    let driver = Arc::new(MockDriver::new());
    let generator = TwistTreeGenerator::new(driver.clone(), GenerationPolicy::linear());

    let tree = generator.generate(&params(1, 4)).await.unwrap();

    let ids = tree
        .snapshot()
        .into_keys()
        .map(String::from)
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["0", "00", "000", "0000"]);

    // Root title back-patched, the rest keep their paragraph headings
    assert_eq!(tree.get(&id("0")).unwrap().title, "Title 0");
    assert_eq!(tree.get(&id("00")).unwrap().title, "The Stairs");
    assert_eq!(
        tree.get(&id("0000")).unwrap().body,
        "Morning breaks over a calm sea."
    );

    // Story call in text mode, then one JSON title call
    let calls = driver.calls();
    assert_eq!(calls.len(), 2);
    assert!(!calls[0].json_mode);
    assert!(calls[0].messages.iter().all(|m| m.role != Role::System));
    assert!(calls[1].json_mode);
}

#[tokio::test]
async fn test_semi_linear_forks_alternatives() {
    let driver = Arc::new(MockDriver::new());
    let policy = GenerationPolicy {
        strategy: TreeStrategy::SemiLinear {
            split_at: 1,
            branches: 3,
        },
        ..GenerationPolicy::semi_linear()
    };
    let generator = TwistTreeGenerator::new(driver.clone(), policy);

    let tree = generator.generate(&params(1, 4)).await.unwrap();

    for expected in ["0", "00", "000", "0000", "001", "0010", "002", "0020"] {
        assert!(tree.contains(&id(expected)), "missing {}", expected);
    }
    assert_eq!(tree.len(), 8);
    assert!(tree.check_parents().is_ok());

    assert_eq!(tree.get(&id("001")).unwrap().title, "Title 001");
    assert_eq!(tree.get(&id("002")).unwrap().title, "Title 002");
    assert_eq!(tree.get(&id("000")).unwrap().title, "Title 000");
    assert_eq!(tree.get(&id("0020")).unwrap().title, "End 2");

    // Alternatives continue the story conversation
    let alternative = driver
        .request_starting_with("Now rewrite the story")
        .unwrap();
    assert_eq!(alternative.messages.len(), 3);
    assert_eq!(alternative.messages[1].role, Role::Assistant);

    // Story, two alternatives, titles
    assert_eq!(driver.call_count(), 4);
}

#[tokio::test]
async fn test_semi_linear_split_clamps_to_last_paragraph() {
    let driver = Arc::new(MockDriver::new());
    let policy = GenerationPolicy {
        strategy: TreeStrategy::SemiLinear {
            split_at: 9,
            branches: 2,
        },
        ..GenerationPolicy::semi_linear()
    };
    let generator = TwistTreeGenerator::new(driver, policy);

    let tree = generator.generate(&params(1, 4)).await.unwrap();

    assert!(tree.contains(&id("00001")));
    assert!(tree.contains(&id("000010")));
    assert!(tree.check_parents().is_ok());
}

#[tokio::test]
async fn test_semi_linear_rejects_wide_forks() {
    let driver = Arc::new(MockDriver::new());
    let policy = GenerationPolicy {
        strategy: TreeStrategy::SemiLinear {
            split_at: 1,
            branches: 4,
        },
        ..GenerationPolicy::semi_linear()
    };
    let generator = TwistTreeGenerator::new(driver.clone(), policy);

    let err = generator.generate(&params(1, 4)).await.unwrap_err();
    assert!(matches!(err.kind(), TwisterErrorKind::Validation(_)));
    assert_eq!(driver.call_count(), 0);
}

#[tokio::test]
async fn test_every_variant_generates_a_connected_tree() {
    use strum::IntoEnumIterator;

    for variant in GenerationVariant::iter() {
        let generator = TwistTreeGenerator::new(MockDriver::new(), variant.into());
        if matches!(generator.policy().strategy, TreeStrategy::SingleShot) {
            continue;
        }
        let tree = generator.generate(&params(2, 3)).await.unwrap();
        assert!(tree.contains(&TwistId::root()), "{}", variant);
        assert!(tree.check_parents().is_ok(), "{}", variant);
    }
}

#[tokio::test]
async fn test_complete_once_modes() {
    let driver = MockDriver::new().with_override("Describe the lamp", r#"{"lamp": "brass"}"#);
    let adapter = CompletionAdapter::new(driver);

    let json = adapter
        .complete_once("Describe the lamp", true)
        .await
        .unwrap();
    assert_eq!(json, r#"{"lamp": "brass"}"#);

    let text = adapter.complete_once("Say hello", false).await.unwrap();
    assert_eq!(text, "echo: Say hello");

    let err = adapter.complete_once("Say hello", true).await.unwrap_err();
    assert!(matches!(err.kind(), TwisterErrorKind::MalformedResponse(_)));

    let calls = adapter.driver().calls();
    assert_eq!(calls[0].messages[0].role, Role::System);
    assert_eq!(calls[1].messages.len(), 1);
}

#[tokio::test]
async fn test_linear_title_failure_propagates() {
    let driver = MockDriver::new().failing_on("the title as a string", MockFailure::NotJson);
    let generator = TwistTreeGenerator::new(driver, GenerationPolicy::linear());

    let err = generator.generate(&params(1, 4)).await.unwrap_err();
    assert!(matches!(err.kind(), TwisterErrorKind::MalformedResponse(_)));
}
