//! The per-step state machine that [`crate::Soul::run_turn`] drives (§4.G
//! "Step"): one model call, zero or more tool dispatches, and the
//! auto-compaction check that precedes both.

use std::path::PathBuf;

use futures::StreamExt;
use wisp_compaction::CompactOutcome;
use wisp_message::UsageRecord;
use wisp_message::synthetic_cancelled_result;
use wisp_protocol::ContentPart;
use wisp_protocol::Message;
use wisp_protocol::ToolCall;
use wisp_tools::ToolRegistry;
use wisp_tools::dispatch;
use wisp_tools_api::ToolContext;
use wisp_wire::TurnOutcome;
use wisp_wire::WireEvent;

use crate::error::LoopError;
use crate::retry::backoff_delay;
use crate::soul::Soul;
use crate::turn::TurnState;

/// The number of most-recent messages auto-compaction preserves verbatim
/// (extended backward by the compaction engine to keep tool pairing intact).
const AUTO_COMPACT_TAIL_LEN: usize = 20;

/// The cap on how many recently-touched file paths are remembered for
/// [`wisp_compaction::FileRecoveryStrategy`].
const TOUCHED_FILES_CAP: usize = 20;

/// What one call to [`run_step`] decided.
pub enum StepOutcome {
    /// The turn is not over; run another step numbered `n`.
    Continue(u32),
    /// The turn reached a terminal state.
    Ended(TurnOutcome),
}

fn current_step(soul: &Soul) -> u32 {
    match soul.state {
        TurnState::RunningStep(n) => n,
        _ => 1,
    }
}

/// Runs one step of the turn loop: the auto-compaction check, one model
/// call (with retry), and the resulting tool dispatches.
pub async fn run_step(soul: &mut Soul) -> StepOutcome {
    if soul.cancellation.is_cancelled() {
        return StepOutcome::Ended(TurnOutcome::Cancelled);
    }

    let step_num = current_step(soul);
    if step_num > soul.loop_control.max_steps_per_turn {
        return StepOutcome::Ended(TurnOutcome::MaxStepsReached);
    }

    maybe_auto_compact(soul, step_num).await;

    soul.wire.emit(WireEvent::StepBegin { step: step_num });

    let tools_json = build_tool_schemas(&soul.tools);
    let raw_history: Vec<Message> = soul.context.history().messages().cloned().collect();
    let history = wisp_model::prepare_history(&raw_history, soul.model.supports_thinking());

    let attempt_outcome = match stream_step(soul, &tools_json, &history).await {
        Ok(outcome) => outcome,
        Err(()) => return StepOutcome::Ended(TurnOutcome::FatalError),
    };

    let StreamedStep {
        text,
        thought,
        tool_calls,
        usage,
        cancelled_mid_stream,
    } = attempt_outcome;

    let assistant_message = build_assistant_message(text, thought, &tool_calls, soul.thinking_enabled);
    soul.context.append(assistant_message).await.ok();
    if usage.total() > 0 {
        soul.context.append_usage(usage).await.ok();
    }

    if cancelled_mid_stream {
        for call in &tool_calls {
            soul.context
                .append(synthetic_cancelled_result(call.id.clone(), "turn cancelled mid-stream"))
                .await
                .ok();
        }
        return StepOutcome::Ended(TurnOutcome::Cancelled);
    }

    if tool_calls.is_empty() {
        return StepOutcome::Ended(TurnOutcome::NoToolCalls);
    }

    match run_tool_calls(soul, tool_calls).await {
        Some(outcome) => StepOutcome::Ended(outcome),
        None => StepOutcome::Continue(step_num + 1),
    }
}

struct StreamedStep {
    text: String,
    thought: String,
    tool_calls: Vec<ToolCall>,
    usage: UsageRecord,
    cancelled_mid_stream: bool,
}

/// Calls the model with retry (§4.G "Retry policy"), consuming the stream
/// part by part and bailing out early on cancellation. `Err(())` means the
/// step is fatal; callers translate that into `Ending(fatal_error)` after
/// logging.
async fn stream_step(soul: &Soul, tools_json: &[serde_json::Value], history: &[Message]) -> Result<StreamedStep, ()> {
    let mut attempt: u32 = 0;
    loop {
        if soul.cancellation.is_cancelled() {
            return Ok(StreamedStep {
                text: String::new(),
                thought: String::new(),
                tool_calls: Vec::new(),
                usage: UsageRecord::default(),
                cancelled_mid_stream: true,
            });
        }

        let mut stream = match soul.api_client.stream(&soul.system_prompt, tools_json, history).await {
            Ok(stream) => stream,
            Err(err) => {
                if err.is_retryable() && attempt < soul.loop_control.max_retries_per_step {
                    tracing::warn!(error = %err, attempt, "retrying model call");
                    soul.clock.sleep(backoff_delay(attempt + 1)).await;
                    attempt += 1;
                    continue;
                }
                tracing::error!(error = %err, "model call failed fatally");
                return Err(());
            }
        };

        let mut text = String::new();
        let mut thought = String::new();
        let mut pending_calls: Vec<(String, Option<String>, String)> = Vec::new();
        let mut completed_ids: std::collections::HashSet<String> = std::collections::HashSet::new();
        let mut usage = UsageRecord::default();
        let mut cancelled_mid_stream = false;
        let mut mid_stream_failure = None;

        loop {
            if soul.cancellation.is_cancelled() {
                cancelled_mid_stream = true;
                break;
            }
            match stream.next().await {
                None => break,
                Some(Ok(part)) => handle_part(
                    soul,
                    part,
                    &mut text,
                    &mut thought,
                    &mut pending_calls,
                    &mut completed_ids,
                    &mut usage,
                ),
                Some(Err(err)) => {
                    mid_stream_failure = Some(err);
                    break;
                }
            }
        }

        if let Some(err) = mid_stream_failure {
            if err.is_retryable() && attempt < soul.loop_control.max_retries_per_step {
                tracing::warn!(error = %err, attempt, "model stream dropped, retrying");
                soul.clock.sleep(backoff_delay(attempt + 1)).await;
                attempt += 1;
                continue;
            }
            tracing::error!(error = %err, "model stream failed fatally");
            return Err(());
        }

        let tool_calls = pending_calls
            .into_iter()
            .filter(|(id, name, _)| name.is_some() && completed_ids.contains(id))
            .map(|(id, name, arguments)| ToolCall {
                id,
                name: name.unwrap_or_default(),
                arguments,
            })
            .collect();

        return Ok(StreamedStep {
            text,
            thought,
            tool_calls,
            usage,
            cancelled_mid_stream,
        });
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_part(
    soul: &Soul,
    part: wisp_model::ModelPart,
    text: &mut String,
    thought: &mut String,
    pending_calls: &mut Vec<(String, Option<String>, String)>,
    completed_ids: &mut std::collections::HashSet<String>,
    usage: &mut UsageRecord,
) {
    use wisp_model::ModelPart;
    match part {
        ModelPart::TextDelta(delta) => {
            soul.wire.emit(WireEvent::Text { delta: delta.clone() });
            text.push_str(&delta);
        }
        ModelPart::ThoughtDelta(delta) => {
            soul.wire.emit(WireEvent::Thought { delta: delta.clone() });
            thought.push_str(&delta);
        }
        ModelPart::ToolCallDelta { id, name, argument_chunk } => {
            soul.wire.emit(WireEvent::ToolCallDelta {
                call_id: id.clone(),
                name: name.clone(),
                argument_chunk: argument_chunk.clone(),
            });
            match pending_calls.iter_mut().find(|(call_id, _, _)| *call_id == id) {
                Some((_, existing_name, args)) => {
                    if existing_name.is_none() {
                        *existing_name = name;
                    }
                    args.push_str(&argument_chunk);
                }
                None => pending_calls.push((id, name, argument_chunk)),
            }
        }
        ModelPart::ToolCallComplete { id } => {
            soul.wire.emit(WireEvent::ToolCallComplete { call_id: id.clone() });
            completed_ids.insert(id);
        }
        ModelPart::Finish(_) => {}
        ModelPart::Usage(record) => *usage = record,
    }
}

fn build_assistant_message(text: String, thought: String, tool_calls: &[ToolCall], thinking_enabled: bool) -> Message {
    let mut content = Vec::new();
    if thinking_enabled && !thought.is_empty() {
        content.push(ContentPart::thought(thought));
    }
    if !text.is_empty() {
        content.push(ContentPart::text(text));
    }
    content.extend(tool_calls.iter().cloned().map(ContentPart::ToolCall));
    Message::assistant(content)
}

fn build_tool_schemas(registry: &ToolRegistry) -> Vec<serde_json::Value> {
    registry
        .names()
        .into_iter()
        .filter_map(|name| registry.get(name))
        .map(|tool| {
            serde_json::json!({
                "name": tool.name(),
                "description": tool.description(),
                "input_schema": wisp_model::inline_refs(&tool.input_schema()),
            })
        })
        .collect()
}

/// Runs `tool_calls` in order, batching consecutive concurrency-safe calls
/// together (§4.D). Returns `Some(outcome)` when the step ends on a
/// rejection or cancellation, `None` to continue to the next step.
async fn run_tool_calls(soul: &mut Soul, tool_calls: Vec<ToolCall>) -> Option<TurnOutcome> {
    let mut i = 0;
    while i < tool_calls.len() {
        if soul.cancellation.is_cancelled() {
            cancel_remaining(soul, &tool_calls[i..]).await;
            return Some(TurnOutcome::Cancelled);
        }

        let safety = soul
            .tools
            .get(&tool_calls[i].name)
            .map(|t| t.concurrency_safety())
            .unwrap_or_default();

        let mut end = i + 1;
        if safety == wisp_protocol::ConcurrencySafety::Safe {
            while end < tool_calls.len() {
                let next_safe = soul
                    .tools
                    .get(&tool_calls[end].name)
                    .map(|t| t.concurrency_safety() == wisp_protocol::ConcurrencySafety::Safe)
                    .unwrap_or(true);
                if next_safe {
                    end += 1;
                } else {
                    break;
                }
            }
        }

        let batch = tool_calls[i..end].to_vec();
        let tools = soul.tools.clone();
        let workspace_root = soul.workspace_root.clone();
        let wire = soul.wire.clone();
        let approval = soul.approval.clone();
        let cancellation = soul.cancellation.clone();
        let injector = soul.injector.clone();

        let futures = batch.into_iter().map(|call| {
            let tools = tools.clone();
            let mut ctx = ToolContext::new(
                workspace_root.clone(),
                wire.clone(),
                approval.clone(),
                cancellation.clone(),
                injector.clone(),
            );
            async move {
                let action = call.name.clone();
                let description = call.arguments.clone();
                let result = dispatch(&tools, &mut ctx, &call.name, &call.arguments, &action, &description).await;
                (call, result)
            }
        });

        let results = futures::future::join_all(futures).await;

        let mut rejected = false;
        for (call, result) in &results {
            soul.wire.emit(WireEvent::ToolResult {
                call_id: call.id.clone(),
                output: result.output.clone(),
            });
            let text = result.output.content.as_model_text();
            soul.context.append(Message::tool_result(call.id.clone(), text)).await.ok();
            record_touched_file(soul, &call.name, &call.arguments);
            if matches!(result.outcome, wisp_tools::DispatchOutcome::Rejected) {
                rejected = true;
            }
        }

        if rejected {
            cancel_remaining(soul, &tool_calls[end..]).await;
            return Some(TurnOutcome::ToolRejected);
        }

        i = end;
    }
    None
}

/// Appends a synthetic cancelled tool result for every call in `remaining`,
/// preserving Invariant 1 pairing after an early exit.
async fn cancel_remaining(soul: &mut Soul, remaining: &[ToolCall]) {
    for call in remaining {
        soul.context
            .append(synthetic_cancelled_result(call.id.clone(), "a sibling tool call in this step did not run"))
            .await
            .ok();
    }
}

/// Heuristic bookkeeping for [`wisp_compaction::FileRecoveryStrategy`]:
/// tools whose arguments carry a `file_path` field are assumed to have
/// touched that file, most-recent first, capped to avoid unbounded growth.
fn record_touched_file(soul: &mut Soul, tool_name: &str, arguments_json: &str) {
    if !matches!(tool_name, "Read" | "Write" | "Edit") {
        return;
    }
    let Ok(value) = serde_json::from_str::<serde_json::Value>(arguments_json) else {
        return;
    };
    let Some(path) = value.get("file_path").and_then(serde_json::Value::as_str) else {
        return;
    };
    let path = PathBuf::from(path);
    soul.touched_files.retain(|p| p != &path);
    soul.touched_files.insert(0, path);
    soul.touched_files.truncate(TOUCHED_FILES_CAP);
}

async fn maybe_auto_compact(soul: &mut Soul, step_num: u32) {
    let max_tokens = soul.model.max_context_tokens();
    if max_tokens == 0 {
        return;
    }
    let usage_fraction = soul.context.token_count() as f64 / max_tokens as f64;
    if usage_fraction < soul.loop_control.auto_compact_threshold {
        return;
    }

    soul.state = TurnState::Compacting;
    match do_compaction(soul, None).await {
        Ok(true) => tracing::info!("auto-compaction ran"),
        Ok(false) => {}
        Err(err) => tracing::warn!(error = %err, "auto-compaction failed, continuing without compaction"),
    }
    soul.state = TurnState::RunningStep(step_num);
}

/// Entry point for the `/compact` slash command (via [`wisp_slash::SoulControl::compact`]).
pub async fn run_compaction(soul: &mut Soul, instruction: Option<String>) -> Result<(), LoopError> {
    soul.state = TurnState::Compacting;
    let result = do_compaction(soul, instruction).await;
    soul.state = TurnState::Idle;
    result.map(|_| ())
}

async fn do_compaction(soul: &mut Soul, instruction: Option<String>) -> Result<bool, LoopError> {
    let history: Vec<Message> = soul.context.history().messages().cloned().collect();
    let strategy = soul.compact_strategies.get(&soul.compact_strategy_name);
    let outcome: Option<CompactOutcome> = wisp_compaction::compact(
        &history,
        AUTO_COMPACT_TAIL_LEN,
        strategy,
        instruction,
        soul.touched_files.clone(),
        soul.api_client.as_ref(),
    )
    .await?;

    let Some(outcome) = outcome else {
        return Ok(false);
    };

    soul.context.replace_all(outcome.history).await?;
    if outcome.usage.total() > 0 {
        soul.context.append_usage(outcome.usage).await?;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use wisp_approval::ApprovalGate;
    use wisp_context::ContextStore;
    use wisp_model::EchoApiClient;
    use wisp_model::ModelError;
    use wisp_model::ModelPart;
    use wisp_model::ScriptedApiClient;
    use wisp_model::ScriptedResponse;
    use wisp_model::StaticModel;
    use wisp_protocol::LoopControlConfig;
    use wisp_protocol::Role;
    use wisp_slash::SlashRegistry;
    use wisp_tools::ToolRegistry;
    use wisp_tools::builtin::ReadFileTool;
    use wisp_tools_api::Injector;

    use super::*;
    use crate::clock::FakeClock;

    fn test_model() -> Arc<dyn wisp_model::Model> {
        Arc::new(StaticModel {
            id: "echo".to_string(),
            max_context_tokens: 100_000,
            supports_thinking: false,
        })
    }

    fn build_soul(api_client: Arc<dyn wisp_model::ApiClient>, tools: ToolRegistry, workspace_root: std::path::PathBuf) -> Soul {
        let wire = wisp_wire::new_wire().engine;
        let mut soul = Soul::new(
            workspace_root,
            ContextStore::in_memory(),
            tools,
            api_client,
            test_model(),
            Arc::new(ApprovalGate::new()),
            Arc::new(wire),
            SlashRegistry::default(),
            LoopControlConfig::default(),
            Injector::new(),
        );
        soul.state = TurnState::RunningStep(1);
        soul
    }

    #[tokio::test]
    async fn text_only_reply_ends_the_turn_with_no_tool_calls() {
        let mut soul = build_soul(Arc::new(EchoApiClient::new("hello there")), ToolRegistry::new(), std::env::temp_dir());
        soul.context.append(Message::user("hi".to_string())).await.expect("append");

        let outcome = run_step(&mut soul).await;
        assert!(matches!(outcome, StepOutcome::Ended(TurnOutcome::NoToolCalls)));

        let last = soul.context().history().history().last().expect("assistant message");
        assert_eq!(last.message.role, Role::Assistant);
        assert_eq!(last.message.text_content(), "hello there");
    }

    #[tokio::test]
    async fn tool_call_is_dispatched_and_step_continues() {
        let dir = tempfile::tempdir().expect("tempdir");
        tokio::fs::write(dir.path().join("sample.txt"), "file contents").await.expect("write");

        let mut tools = ToolRegistry::new();
        tools.register(Arc::new(ReadFileTool));

        let scripted = ScriptedApiClient::new(vec![ScriptedResponse::Parts(vec![
            ModelPart::ToolCallDelta {
                id: "call-1".to_string(),
                name: Some("Read".to_string()),
                argument_chunk: r#"{"file_path":"sample.txt"}"#.to_string(),
            },
            ModelPart::ToolCallComplete { id: "call-1".to_string() },
            ModelPart::Finish(wisp_model::FinishReason::ToolCalls),
        ])]);

        let mut soul = build_soul(Arc::new(scripted), tools, dir.path().to_path_buf());
        soul.context.append(Message::user("read it".to_string())).await.expect("append");

        let outcome = run_step(&mut soul).await;
        assert!(matches!(outcome, StepOutcome::Continue(2)));

        let messages: Vec<Message> = soul.context().history().messages().cloned().collect();
        let tool_result = messages.iter().find(|m| m.role == Role::Tool).expect("tool result appended");
        assert_eq!(tool_result.text_content(), "file contents");
        assert_eq!(soul.touched_files, vec![std::path::PathBuf::from("sample.txt")]);
    }

    #[tokio::test]
    async fn retryable_model_error_is_retried_then_succeeds() {
        let scripted = ScriptedApiClient::new(vec![
            ScriptedResponse::Error(ModelError::HttpStatus { status: 503, message: "busy".to_string() }),
            ScriptedResponse::Parts(vec![ModelPart::TextDelta("recovered".to_string()), ModelPart::Finish(wisp_model::FinishReason::Stop)]),
        ]);

        let mut soul = build_soul(Arc::new(scripted), ToolRegistry::new(), std::env::temp_dir());
        soul.context.append(Message::user("hi".to_string())).await.expect("append");
        soul = soul.with_clock(FakeClock::new());

        let outcome = run_step(&mut soul).await;
        assert!(matches!(outcome, StepOutcome::Ended(TurnOutcome::NoToolCalls)));
        let last = soul.context().history().history().last().expect("assistant message");
        assert_eq!(last.message.text_content(), "recovered");
    }

    #[tokio::test]
    async fn cancellation_before_the_model_call_ends_the_step_as_cancelled() {
        let mut soul = build_soul(Arc::new(EchoApiClient::new("unused")), ToolRegistry::new(), std::env::temp_dir());
        soul.cancel_current_turn();

        let outcome = run_step(&mut soul).await;
        assert!(matches!(outcome, StepOutcome::Ended(TurnOutcome::Cancelled)));
    }

    #[tokio::test]
    async fn thought_parts_are_stripped_before_sending_history_to_a_non_thinking_model() {
        let recorder = Arc::new(wisp_model::RecordingApiClient::new("ok"));
        let mut soul = build_soul(recorder.clone(), ToolRegistry::new(), std::env::temp_dir());
        soul.context
            .append(Message::assistant(vec![
                ContentPart::thought("earlier reasoning"),
                ContentPart::text("earlier reply"),
            ]))
            .await
            .expect("append");
        soul.context.append(Message::user("hi\0there".to_string())).await.expect("append");

        run_step(&mut soul).await;

        let calls = recorder.calls();
        let sent_history = calls.first().expect("one call recorded");
        for message in sent_history {
            assert!(!message.content.iter().any(|p| p.is_thought()));
            assert!(!message.text_content().contains('\0'));
        }
        assert_eq!(sent_history[1].text_content(), "hithere");
    }
}
