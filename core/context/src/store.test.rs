use super::*;
use tempfile::tempdir;
use wisp_protocol::Message;

#[tokio::test]
async fn append_and_reload_preserves_messages() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("session.jsonl");

    {
        let mut store = ContextStore::open(&path).await.expect("open");
        store.append(Message::user("hello")).await.expect("append");
        store
            .append(Message::assistant(vec![wisp_protocol::ContentPart::text("hi")]))
            .await
            .expect("append");
    }

    let reloaded = ContextStore::open(&path).await.expect("reopen");
    assert_eq!(reloaded.history().len(), 2);
}

#[tokio::test]
async fn checkpoints_are_monotonic_across_reload() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("session.jsonl");

    {
        let mut store = ContextStore::open(&path).await.expect("open");
        store.checkpoint().await.expect("checkpoint");
        store.checkpoint().await.expect("checkpoint");
    }

    let reloaded = ContextStore::open(&path).await.expect("reopen");
    assert_eq!(reloaded.n_checkpoints(), 2);
}

#[tokio::test]
async fn filter_rewrites_file_and_survives_reload() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("session.jsonl");

    let mut store = ContextStore::open(&path).await.expect("open");
    store.append(Message::user("keep")).await.expect("append");
    store.append(Message::user("drop")).await.expect("append");
    store
        .filter(|m| m.text_content() != "drop")
        .await
        .expect("filter");
    assert_eq!(store.history().len(), 1);
    drop(store);

    let reloaded = ContextStore::open(&path).await.expect("reopen");
    assert_eq!(reloaded.history().len(), 1);
    assert_eq!(reloaded.history().history()[0].message.text_content(), "keep");
}

#[tokio::test]
async fn filter_preserves_checkpoints_and_usage_across_reload() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("session.jsonl");

    {
        let mut store = ContextStore::open(&path).await.expect("open");
        store.checkpoint().await.expect("checkpoint");
        store.append(Message::user("keep")).await.expect("append");
        store.append(Message::user("drop")).await.expect("append");
        store
            .append_usage(wisp_message::UsageRecord {
                input_tokens: 10,
                output_tokens: 5,
                ..Default::default()
            })
            .await
            .expect("append_usage");
        store.checkpoint().await.expect("checkpoint");
        store.filter(|m| m.text_content() != "drop").await.expect("filter");
        assert_eq!(store.n_checkpoints(), 2);
        assert_eq!(store.token_count(), 15);
    }

    let reloaded = ContextStore::open(&path).await.expect("reopen");
    assert_eq!(reloaded.history().len(), 1);
    assert_eq!(reloaded.n_checkpoints(), 2);
    assert_eq!(reloaded.token_count(), 15);
}

#[tokio::test]
async fn filter_is_idempotent() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("session.jsonl");
    let mut store = ContextStore::open(&path).await.expect("open");
    store.append(Message::user("a")).await.expect("append");
    store.append(Message::user("b")).await.expect("append");

    let keep = |m: &Message| m.text_content() != "b";
    store.filter(keep).await.expect("filter once");
    let after_first = store.history().len();
    store.filter(keep).await.expect("filter twice");
    assert_eq!(store.history().len(), after_first);
}

#[tokio::test]
async fn unknown_record_kind_is_skipped_on_load() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("session.jsonl");
    tokio::fs::write(&path, "{\"role\":\"_future\",\"x\":1}\n{\"role\":\"user\",\"content\":[{\"type\":\"text\",\"text\":\"hi\"}]}\n")
        .await
        .expect("write");

    let store = ContextStore::open(&path).await.expect("open despite unknown record");
    assert_eq!(store.history().len(), 1);
}

#[tokio::test]
async fn in_memory_store_never_touches_disk() {
    let mut store = ContextStore::in_memory();
    store.append(Message::user("hi")).await.expect("append");
    assert_eq!(store.history().len(), 1);
}

#[tokio::test]
async fn reload_completes_an_orphaned_tool_call_with_a_synthetic_result() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("session.jsonl");

    {
        let mut store = ContextStore::open(&path).await.expect("open");
        store.append(Message::user("read it")).await.expect("append");
        store
            .append(Message::assistant(vec![wisp_protocol::ContentPart::ToolCall(wisp_protocol::ToolCall {
                id: "call-1".to_string(),
                name: "Read".to_string(),
                arguments: "{}".to_string(),
            })]))
            .await
            .expect("append");
        // Simulates a crash before the tool result was appended.
    }

    let reloaded = ContextStore::open(&path).await.expect("reopen");
    assert_eq!(reloaded.history().len(), 3);
    let last = &reloaded.history().history().last().expect("last message").message;
    assert_eq!(last.role, wisp_protocol::Role::Tool);
    assert_eq!(last.tool_call_id.as_deref(), Some("call-1"));
}

#[tokio::test]
async fn reload_drops_a_trailing_tool_result_with_no_matching_assistant_call() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("session.jsonl");
    // Simulates truncation: the tool result survived but its assistant
    // message did not.
    let stray = Message::tool_result("missing-call", "stray output");
    tokio::fs::write(&path, format!("{}\n", serde_json::to_string(&stray).expect("serialize")))
        .await
        .expect("write");

    let reloaded = ContextStore::open(&path).await.expect("open despite a dangling tool result");
    assert_eq!(reloaded.history().len(), 0);
}
