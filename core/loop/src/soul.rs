//! [`Soul`]: the agent loop plus everything it owns (§4.G, glossary).

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use wisp_approval::ApprovalGate;
use wisp_compaction::CompactStrategyRegistry;
use wisp_context::ContextStore;
use wisp_model::ApiClient;
use wisp_model::Model;
use wisp_protocol::LoopControlConfig;
use wisp_protocol::Message;
use wisp_slash::ContextStats;
use wisp_slash::SlashError;
use wisp_slash::SlashRegistry;
use wisp_slash::SoulControl;
use wisp_tools::ToolRegistry;
use wisp_tools_api::Injector;
use wisp_wire::EngineSide;
use wisp_wire::TurnOutcome;
use wisp_wire::WireEvent;

use crate::clock::Clock;
use crate::clock::RealClock;
use crate::queue::PendingInputQueue;
use crate::step;
use crate::turn::TurnState;

/// Outcome of [`Soul::submit`]: either the turn ran to a terminal state
/// right away, or it was queued behind one already in flight. `Queued`
/// carries the id assigned to the pending input, so the caller can later
/// target it with [`Soul::cancel_pending_input`] or
/// [`Soul::promote_pending_input`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Ran(TurnOutcome),
    Queued(String),
}

/// Everything one running agent needs, wired together. A subagent
/// constructs its own `Soul` with a filtered [`ToolRegistry`] and an
/// in-memory [`ContextStore`] rather than sharing this one.
pub struct Soul {
    pub(crate) workspace_root: std::path::PathBuf,
    pub(crate) context: ContextStore,
    pub(crate) tools: ToolRegistry,
    pub(crate) api_client: Arc<dyn ApiClient>,
    pub(crate) model: Arc<dyn Model>,
    pub(crate) available_models: Vec<Arc<dyn Model>>,
    pub(crate) approval: Arc<ApprovalGate>,
    pub(crate) wire: Arc<EngineSide>,
    pub(crate) slash: SlashRegistry,
    pub(crate) compact_strategies: CompactStrategyRegistry,
    pub(crate) compact_strategy_name: String,
    pub(crate) loop_control: LoopControlConfig,
    pub(crate) thinking_enabled: bool,
    pub(crate) cancellation: CancellationToken,
    pub(crate) injector: Injector,
    pub(crate) pending_inputs: PendingInputQueue,
    pub(crate) state: TurnState,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) system_prompt: String,
    /// Paths recently read or written, most-recent first, capped. Consulted
    /// by `FileRecoveryStrategy` when compaction runs.
    pub(crate) touched_files: Vec<std::path::PathBuf>,
    /// Step count of the most recently completed turn, read by the `Task`
    /// tool to report `steps_used` back to a parent agent.
    pub(crate) last_step_count: u32,
}

impl Soul {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        workspace_root: impl Into<std::path::PathBuf>,
        context: ContextStore,
        tools: ToolRegistry,
        api_client: Arc<dyn ApiClient>,
        model: Arc<dyn Model>,
        approval: Arc<ApprovalGate>,
        wire: Arc<EngineSide>,
        slash: SlashRegistry,
        loop_control: LoopControlConfig,
        injector: Injector,
    ) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            context,
            tools,
            api_client,
            model,
            available_models: Vec::new(),
            approval,
            wire,
            slash,
            compact_strategies: CompactStrategyRegistry::with_defaults(),
            compact_strategy_name: "simple".to_string(),
            loop_control,
            thinking_enabled: false,
            cancellation: CancellationToken::new(),
            injector,
            pending_inputs: PendingInputQueue::new(),
            state: TurnState::Idle,
            clock: Arc::new(RealClock::new()),
            system_prompt: "You are a helpful coding assistant.".to_string(),
            touched_files: Vec::new(),
            last_step_count: 0,
        }
    }

    pub fn with_available_models(mut self, models: Vec<Arc<dyn Model>>) -> Self {
        self.available_models = models;
        self
    }

    pub fn with_compact_strategies(mut self, registry: CompactStrategyRegistry) -> Self {
        self.compact_strategies = registry;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    pub fn state(&self) -> &TurnState {
        &self.state
    }

    pub fn context(&self) -> &ContextStore {
        &self.context
    }

    /// The step count of the most recently completed turn.
    pub fn last_step_count(&self) -> u32 {
        self.last_step_count
    }

    /// Queues `input` for a later turn if one is already running, otherwise
    /// runs it immediately. Mirrors §4.G "Concurrency": a new input never
    /// interleaves with an in-flight turn, it waits in FIFO order.
    pub async fn submit(&mut self, input: String) -> SubmitOutcome {
        if !matches!(self.state, TurnState::Idle) {
            let id = self.pending_inputs.push(input);
            return SubmitOutcome::Queued(id);
        }
        SubmitOutcome::Ran(self.run_turn(input).await)
    }

    /// Runs one full turn for `input`, draining any queued follow-up inputs
    /// submitted while this turn runs is the caller's responsibility (see
    /// [`Soul::drain_pending`]).
    pub async fn run_turn(&mut self, input: String) -> TurnOutcome {
        self.wire.emit(WireEvent::TurnBegin { user_input: input.clone() });

        if self.slash.is_slash_input(&input) {
            let outcome = self.run_slash_turn(&input).await;
            self.wire.emit(WireEvent::TurnEnd { outcome });
            self.state = TurnState::Idle;
            return outcome;
        }

        // Every user-initiated turn opens a new checkpoint boundary (§3
        // "Checkpoint"), so the UI can replay "the last run" and compaction
        // can choose preservation boundaries.
        self.context.checkpoint().await.ok();

        self.context.append(Message::user(input)).await.ok();

        self.state = TurnState::RunningStep(1);
        let mut steps_run = 0u32;
        let outcome = loop {
            steps_run += 1;
            match step::run_step(self).await {
                step::StepOutcome::Continue(next_step) => {
                    self.state = TurnState::RunningStep(next_step);
                }
                step::StepOutcome::Ended(outcome) => break outcome,
            }
        };
        self.last_step_count = steps_run;

        self.state = TurnState::Ending(outcome);
        self.wire.emit(WireEvent::TurnEnd { outcome });
        self.state = TurnState::Idle;
        outcome
    }

    async fn run_slash_turn(&mut self, input: &str) -> TurnOutcome {
        let mut dispatcher = std::mem::take(&mut self.slash);
        let result = dispatcher.dispatch(self, input).await;
        self.slash = dispatcher;
        match result {
            Ok(()) => TurnOutcome::NoToolCalls,
            Err(err) => {
                tracing::warn!(error = %err, "slash command failed");
                TurnOutcome::FatalError
            }
        }
    }

    /// Pops and runs the next queued input, if any. Callers (typically
    /// `wisp-session`) drive this after a turn completes so follow-up
    /// inputs submitted mid-turn are not lost.
    pub async fn drain_pending(&mut self) -> Vec<TurnOutcome> {
        let mut outcomes = Vec::new();
        while let Some(input) = self.pending_inputs.pop() {
            outcomes.push(self.run_turn(input).await);
        }
        outcomes
    }

    pub fn cancel_current_turn(&self) {
        self.cancellation.cancel();
    }

    pub fn cancel_pending_inputs(&mut self) {
        self.pending_inputs.cancel_all();
    }

    /// Cancels a single queued input by id. Returns `false` if it is not
    /// pending (already run, already cancelled, or never existed).
    pub fn cancel_pending_input(&mut self, id: &str) -> bool {
        self.pending_inputs.cancel(id)
    }

    pub fn promote_last_pending(&mut self) {
        self.pending_inputs.promote_last();
    }

    /// Moves a single queued input to the front of the queue by id. Returns
    /// `false` if it is not pending.
    pub fn promote_pending_input(&mut self, id: &str) -> bool {
        self.pending_inputs.promote(id)
    }

    pub fn pending_input_count(&self) -> usize {
        self.pending_inputs.len()
    }

    /// Queued inputs in FIFO order, for surfacing to the UI (id + preview).
    pub fn pending_inputs(&self) -> impl Iterator<Item = &wisp_protocol::UserQueuedCommand> {
        self.pending_inputs.pending()
    }
}

#[async_trait]
impl SoulControl for Soul {
    async fn compact(&mut self, instruction: Option<String>) -> Result<(), SlashError> {
        step::run_compaction(self, instruction)
            .await
            .map_err(|err| SlashError::CompactionFailed(err.to_string()))
    }

    fn set_model(&mut self, model_id: &str) -> Result<(), SlashError> {
        let found = self.available_models.iter().find(|m| m.id() == model_id).cloned();
        match found {
            Some(model) => {
                self.model = model;
                Ok(())
            }
            None => Err(SlashError::UnknownModel(model_id.to_string())),
        }
    }

    fn set_thinking(&mut self, enabled: bool) {
        self.thinking_enabled = enabled;
    }

    fn set_yolo(&mut self, enabled: bool) {
        self.approval.set_yolo(enabled);
    }

    fn context_stats(&self) -> ContextStats {
        ContextStats {
            token_count: self.context.token_count(),
            max_context_tokens: self.model.max_context_tokens(),
            message_count: self.context.history().len(),
            checkpoint_count: self.context.n_checkpoints(),
        }
    }

    fn available_models(&self) -> Vec<String> {
        self.available_models.iter().map(|m| m.id().to_string()).collect()
    }

    fn emit_status(&self, text: &str) {
        self.wire.emit(WireEvent::PreviewChange { description: text.to_string() });
    }
}

#[cfg(test)]
mod tests {
    use wisp_model::EchoApiClient;
    use wisp_model::StaticModel;
    use wisp_protocol::LoopControlConfig;

    use super::*;

    fn build_soul() -> Soul {
        let wire = wisp_wire::new_wire().engine;
        Soul::new(
            std::env::temp_dir(),
            ContextStore::in_memory(),
            ToolRegistry::new(),
            Arc::new(EchoApiClient::new("hi")),
            Arc::new(StaticModel {
                id: "echo".to_string(),
                max_context_tokens: 100_000,
                supports_thinking: false,
            }),
            Arc::new(ApprovalGate::new()),
            Arc::new(wire),
            SlashRegistry::default(),
            LoopControlConfig::default(),
            Injector::new(),
        )
    }

    #[tokio::test]
    async fn submit_runs_immediately_while_idle() {
        let mut soul = build_soul();
        let outcome = soul.submit("hello".to_string()).await;
        assert!(matches!(outcome, SubmitOutcome::Ran(TurnOutcome::NoToolCalls)));
        assert_eq!(soul.pending_input_count(), 0);
    }

    #[tokio::test]
    async fn submit_queues_behind_a_running_turn() {
        let mut soul = build_soul();
        soul.state = TurnState::RunningStep(1);

        let outcome = soul.submit("follow up".to_string()).await;
        let SubmitOutcome::Queued(id) = outcome else {
            panic!("expected Queued, got {outcome:?}");
        };
        assert_eq!(soul.pending_input_count(), 1);
        assert_eq!(soul.pending_inputs().next().map(|c| c.id.clone()), Some(id));
    }

    #[tokio::test]
    async fn cancel_pending_input_removes_only_that_item() {
        let mut soul = build_soul();
        soul.state = TurnState::RunningStep(1);

        let SubmitOutcome::Queued(first_id) = soul.submit("first".to_string()).await else {
            panic!("expected Queued");
        };
        let SubmitOutcome::Queued(_second_id) = soul.submit("second".to_string()).await else {
            panic!("expected Queued");
        };

        assert!(soul.cancel_pending_input(&first_id));
        assert_eq!(soul.pending_input_count(), 1);
        assert!(!soul.cancel_pending_input(&first_id));
    }

    #[tokio::test]
    async fn promote_pending_input_moves_item_to_front() {
        let mut soul = build_soul();
        soul.state = TurnState::RunningStep(1);

        let SubmitOutcome::Queued(first_id) = soul.submit("first".to_string()).await else {
            panic!("expected Queued");
        };
        let SubmitOutcome::Queued(second_id) = soul.submit("second".to_string()).await else {
            panic!("expected Queued");
        };

        assert!(soul.promote_pending_input(&second_id));
        let ordered: Vec<String> = soul.pending_inputs().map(|c| c.id.clone()).collect();
        assert_eq!(ordered, vec![second_id, first_id]);
    }

    #[tokio::test]
    async fn cancel_pending_inputs_clears_the_whole_queue() {
        let mut soul = build_soul();
        soul.state = TurnState::RunningStep(1);
        soul.submit("first".to_string()).await;
        soul.submit("second".to_string()).await;

        soul.cancel_pending_inputs();
        assert_eq!(soul.pending_input_count(), 0);
    }
}
