mod common;

use common::sample_record;
use creator_agent::store::{creation_millis, record_filename, DeploymentStore};
use creator_agent::CreatorError;
use tempfile::tempdir;

#[tokio::test]
async fn empty_store_has_no_latest() {
    let dir = tempdir().unwrap();
    let store = DeploymentStore::open(dir.path()).await.unwrap();
    assert!(store.latest().await.unwrap().is_none());
}

#[tokio::test]
async fn open_creates_missing_directory() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("deployed-agents");
    let store = DeploymentStore::open(&nested).await.unwrap();
    assert!(nested.is_dir());
    assert!(store.latest().await.unwrap().is_none());
}

#[tokio::test]
async fn latest_returns_most_recent_append() {
    let dir = tempdir().unwrap();
    let store = DeploymentStore::open(dir.path()).await.unwrap();

    let first = sample_record(1_700_000_000_000, "41");
    let second = sample_record(1_700_000_005_000, "42");
    store.append(&first).await.unwrap();
    store.append(&second).await.unwrap();

    assert_eq!(store.latest().await.unwrap(), Some(second));
}

#[tokio::test]
async fn ordering_follows_creation_time_not_agent_id() {
    let dir = tempdir().unwrap();
    let store = DeploymentStore::open(dir.path()).await.unwrap();

    let older = sample_record(1_700_000_000_000, "999");
    let newer = sample_record(1_700_000_000_001, "5");
    // Insert newest first to make sure directory order does not matter.
    store.append(&newer).await.unwrap();
    store.append(&older).await.unwrap();

    let latest = store.latest().await.unwrap().unwrap();
    assert_eq!(latest.agent.id, "5");
}

#[tokio::test]
async fn numeric_prefix_beats_lexical_order() {
    let dir = tempdir().unwrap();
    let store = DeploymentStore::open(dir.path()).await.unwrap();

    store.append(&sample_record(999, "a")).await.unwrap();
    store.append(&sample_record(1_000, "b")).await.unwrap();

    assert_eq!(store.latest().await.unwrap().unwrap().agent.id, "b");
}

#[tokio::test]
async fn append_uses_time_and_agent_id_in_filename() {
    let dir = tempdir().unwrap();
    let store = DeploymentStore::open(dir.path()).await.unwrap();

    let path = store.append(&sample_record(1_712_345_678_901, "17")).await.unwrap();
    assert_eq!(path.file_name().unwrap().to_str().unwrap(), "1712345678901-agent-17.json");

    let saved: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(saved["agent"]["id"], "17");
    assert!(saved["agent"]["transactionHash"].is_string());
    assert!(saved["network"]["registryAddress"].is_string());
    assert!(saved["interactionHints"]["curl"].as_str().unwrap().contains("\"agentId\": \"17\""));
}

#[tokio::test]
async fn append_never_overwrites() {
    let dir = tempdir().unwrap();
    let store = DeploymentStore::open(dir.path()).await.unwrap();

    let record = sample_record(1_700_000_000_000, "7");
    store.append(&record).await.unwrap();

    let mut changed = record.clone();
    changed.request = "something else".to_string();
    let err = store.append(&changed).await.unwrap_err();
    assert!(matches!(err, CreatorError::Store(_)));

    assert_eq!(store.latest().await.unwrap(), Some(record));
}

#[tokio::test]
async fn unrelated_files_are_ignored() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("README.txt"), "notes").unwrap();
    std::fs::write(dir.path().join("draft-agent.json"), "{}").unwrap();

    let store = DeploymentStore::open(dir.path()).await.unwrap();
    assert!(store.latest().await.unwrap().is_none());

    store.append(&sample_record(5, "1")).await.unwrap();
    assert_eq!(store.latest().await.unwrap().unwrap().agent.id, "1");
}

#[test]
fn filename_prefix_parsing() {
    assert_eq!(record_filename(1_234, "9"), "1234-agent-9.json");
    assert_eq!(creation_millis("1234-agent-9.json"), Some(1_234));
    assert_eq!(creation_millis("1234-agent-9.tmp"), None);
    assert_eq!(creation_millis("latest-agent-9.json"), None);
}

#[tokio::test]
async fn same_millisecond_records_resolve_by_filename() {
    let dir = tempdir().unwrap();
    let store = DeploymentStore::open(dir.path()).await.unwrap();

    store.append(&sample_record(1_700_000_000_000, "9")).await.unwrap();
    store.append(&sample_record(1_700_000_000_000, "10")).await.unwrap();

    // "…-agent-9.json" sorts after "…-agent-10.json".
    for _ in 0..5 {
        assert_eq!(store.latest().await.unwrap().unwrap().agent.id, "9");
    }
}
