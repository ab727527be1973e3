//! Orchestrates a single compaction: picks the tail to preserve, asks a
//! strategy for a prompt, issues one summarization call, and assembles the
//! replacement history.

use futures::StreamExt;
use wisp_message::UsageRecord;
use wisp_model::ApiClient;
use wisp_model::ModelPart;
use wisp_protocol::Message;
use wisp_protocol::Role;

use crate::CompactionError;
use crate::strategy::CompactContext;
use crate::strategy::CompactStrategy;

/// The result of a successful compaction: the new history to install via
/// `ContextStore::replace_all`, and the usage incurred by the summarization
/// call itself (so callers can fold it into running totals).
pub struct CompactOutcome {
    pub history: Vec<Message>,
    pub usage: UsageRecord,
}

/// Compacts `history`, preserving the last `tail_len` messages verbatim
/// (extended backwards if needed to keep a tool_call paired with its
/// assistant message). Returns `Ok(None)` when compaction is a no-op
/// because there are not enough messages to make it worthwhile.
///
/// The summarization call must not itself trigger compaction; callers are
/// expected to invoke this with a `history` slice, not route it back
/// through the same context store that holds the live conversation.
pub async fn compact(
    history: &[Message],
    tail_len: usize,
    strategy: &dyn CompactStrategy,
    user_instruction: Option<String>,
    recently_touched_files: Vec<std::path::PathBuf>,
    api_client: &dyn ApiClient,
) -> Result<Option<CompactOutcome>, CompactionError> {
    if history.len() <= tail_len {
        return Ok(None);
    }

    let split_at = tail_start_index(history, history.len() - tail_len);
    let (prefix, tail) = history.split_at(split_at);

    if prefix.is_empty() {
        return Ok(None);
    }

    let ctx = CompactContext {
        prefix: prefix.to_vec(),
        user_instruction,
        recently_touched_files,
    };

    let prompt = strategy.generate_prompt(&ctx);
    let stream_result = run_summarization(strategy, &ctx, api_client, &prompt, tail).await;

    if let Err(err) = &stream_result {
        tracing::warn!(error = %err, "compaction aborted, leaving history unchanged");
    }
    stream_result
}

async fn run_summarization(
    strategy: &dyn CompactStrategy,
    ctx: &CompactContext,
    api_client: &dyn ApiClient,
    prompt: &str,
    tail: &[Message],
) -> Result<Option<CompactOutcome>, CompactionError> {
    let mut stream = api_client.stream(prompt, &[], &[]).await?;

    let mut summary_text = String::new();
    let mut usage = UsageRecord::default();
    while let Some(part) = stream.next().await {
        match part? {
            ModelPart::TextDelta(delta) => summary_text.push_str(&delta),
            ModelPart::Usage(record) => usage = record,
            _ => {}
        }
    }

    if summary_text.trim().is_empty() {
        return Err(CompactionError::EmptySummary);
    }

    let compacted = strategy.build_compacted_history(&summary_text, ctx, tail);
    Ok(Some(CompactOutcome { history: compacted, usage }))
}

/// Walks the proposed split point backwards while the message at the split
/// is a tool result, so the preserved tail never opens on an orphaned
/// tool message without its preceding assistant call.
fn tail_start_index(history: &[Message], proposed: usize) -> usize {
    let mut index = proposed;
    while index > 0 && history[index].role == Role::Tool {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use wisp_model::EchoApiClient;
    use wisp_protocol::ContentPart;
    use wisp_protocol::ToolCall;

    use super::*;
    use crate::strategy::SimpleStrategy;

    fn msg(i: usize) -> Message {
        Message::user(format!("message {i}"))
    }

    #[tokio::test]
    async fn below_threshold_is_a_no_op() {
        let history = vec![msg(0), msg(1)];
        let client = EchoApiClient::new("summary");
        let result = compact(&history, 5, &SimpleStrategy, None, vec![], &client).await.expect("compact");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn compacts_prefix_and_preserves_tail() {
        let history: Vec<Message> = (0..10).map(msg).collect();
        let client = EchoApiClient::new("summary of the earlier conversation");
        let outcome = compact(&history, 3, &SimpleStrategy, None, vec![], &client)
            .await
            .expect("compact")
            .expect("not a no-op");

        assert_eq!(outcome.history.len(), 1 + 3);
        assert!(outcome.history[0].text_content().contains("summary of the earlier conversation"));
        assert_eq!(outcome.history[1].text_content(), "message 7");
        assert_eq!(outcome.history[3].text_content(), "message 9");
    }

    #[tokio::test]
    async fn tail_extends_backward_to_keep_tool_pairing() {
        let mut history: Vec<Message> = (0..5).map(msg).collect();
        history.push(Message::assistant(vec![ContentPart::ToolCall(ToolCall {
            id: "c1".into(),
            name: "Read".into(),
            arguments: "{}".into(),
        })]));
        history.push(Message::tool_result("c1", "file contents"));

        // tail_len = 1 would otherwise split right before the tool result.
        let client = EchoApiClient::new("summary");
        let outcome = compact(&history, 1, &SimpleStrategy, None, vec![], &client)
            .await
            .expect("compact")
            .expect("not a no-op");

        // Tail must include both the assistant tool_call and its tool result.
        assert_eq!(outcome.history.len(), 1 + 2);
        assert_eq!(outcome.history[1].tool_calls().len(), 1);
        assert_eq!(outcome.history[2].role, Role::Tool);
    }
}
