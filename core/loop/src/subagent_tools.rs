//! `Task`, `CreateSubagent` and `TaskOutput` (§4.I "Subagent Market").
//!
//! Implemented here rather than in `wisp-subagent` because spawning a child
//! requires a running `Soul` to build another `Soul` from; `wisp-subagent`
//! only holds the market data and the tiered tool-access policy these tools
//! consult.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use wisp_approval::ApprovalGate;
use wisp_context::ContextStore;
use wisp_message::UsageRecord;
use wisp_model::ApiClient;
use wisp_model::Model;
use wisp_protocol::ConcurrencySafety;
use wisp_protocol::LoopControlConfig;
use wisp_protocol::Role;
use wisp_protocol::ToolOutput;
use wisp_protocol::ToolOutputExt;
use wisp_subagent::AgentDefinition;
use wisp_subagent::AgentSource;
use wisp_subagent::BackgroundTaskStore;
use wisp_subagent::SubagentMarket;
use wisp_subagent::SubagentResult;
use wisp_subagent::SubagentStatus;
use wisp_subagent::ToolFilter;
use wisp_tools::Tool;
use wisp_tools::ToolError;
use wisp_tools::ToolRegistry;
use wisp_tools_api::Injector;
use wisp_tools_api::ToolContext;
use wisp_wire::EngineSide;
use wisp_wire::TurnOutcome;

use crate::clock::Clock;
use crate::clock::RealClock;
use crate::soul::Soul;

fn generate_agent_id() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    format!("agent-{}", COUNTER.fetch_add(1, Ordering::Relaxed))
}

/// Everything needed to build a child [`Soul`] from an [`AgentDefinition`],
/// registered into a [`wisp_tools_api::Injector`] so the `Task` tool can
/// pull it out by type.
#[derive(Clone)]
pub struct SubagentSpawner {
    market: SubagentMarket,
    tools: ToolRegistry,
    api_client: Arc<dyn ApiClient>,
    model: Arc<dyn Model>,
    available_models: Vec<Arc<dyn Model>>,
    approval: Arc<ApprovalGate>,
    wire: Arc<EngineSide>,
    loop_control: LoopControlConfig,
    injector: Injector,
    background: Arc<BackgroundTaskStore>,
    workspace_root: PathBuf,
    clock: Arc<dyn Clock>,
}

impl SubagentSpawner {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        market: SubagentMarket,
        tools: ToolRegistry,
        api_client: Arc<dyn ApiClient>,
        model: Arc<dyn Model>,
        approval: Arc<ApprovalGate>,
        wire: Arc<EngineSide>,
        loop_control: LoopControlConfig,
        workspace_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            market,
            tools,
            api_client,
            model,
            available_models: Vec::new(),
            approval,
            wire,
            loop_control,
            injector: Injector::new(),
            background: BackgroundTaskStore::new(),
            workspace_root: workspace_root.into(),
            clock: Arc::new(RealClock::new()),
        }
    }

    pub fn with_available_models(mut self, models: Vec<Arc<dyn Model>>) -> Self {
        self.available_models = models;
        self
    }

    pub fn with_injector(mut self, injector: Injector) -> Self {
        self.injector = injector;
        self
    }

    pub fn with_background_store(mut self, store: Arc<BackgroundTaskStore>) -> Self {
        self.background = store;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn market(&self) -> &SubagentMarket {
        &self.market
    }

    fn with_market(&self, market: SubagentMarket) -> Self {
        let mut spawner = self.clone();
        spawner.market = market;
        spawner
    }

    fn resolve_model(&self, definition: &AgentDefinition) -> Arc<dyn Model> {
        match &definition.model_override {
            Some(id) => self.available_models.iter().find(|m| m.id() == id).cloned().unwrap_or_else(|| self.model.clone()),
            None => self.model.clone(),
        }
    }

    /// Builds a headless child `Soul` for `definition`, wired with a fresh
    /// `SubagentSpawner` registered into its own injector so it can itself
    /// dispatch `Task` (subject to `ToolFilter`).
    fn build_child(&self, definition: &AgentDefinition, cancellation: CancellationToken) -> Soul {
        let filter = ToolFilter::new(definition);
        let child_tools = self.tools.filtered(|name| filter.is_allowed(name));
        let child_market = match definition.source {
            AgentSource::Fixed => self.market.isolated_child(),
            AgentSource::Dynamic => self.market.shared_child(),
        };
        let child_spawner = self.with_market(child_market);
        let mut child_injector = self.injector.clone();
        child_injector.register(child_spawner);

        let mut loop_control = self.loop_control.clone();
        if let Some(max_steps) = definition.max_steps_override {
            loop_control.max_steps_per_turn = max_steps;
        }

        let mut child = Soul::new(
            self.workspace_root.clone(),
            ContextStore::in_memory(),
            child_tools,
            self.api_client.clone(),
            self.resolve_model(definition),
            self.approval.clone(),
            self.wire.clone(),
            wisp_slash::SlashRegistry::default(),
            loop_control,
            child_injector,
        )
        .with_system_prompt(definition.system_prompt.clone())
        .with_clock(self.clock.clone());
        child.cancellation = cancellation;
        child
    }
}

fn last_assistant_text(soul: &Soul) -> String {
    soul.context()
        .history()
        .history()
        .iter()
        .rev()
        .find_map(|tracked| if tracked.message.role == Role::Assistant { Some(tracked.message.text_content()) } else { None })
        .unwrap_or_default()
}

fn outcome_to_status(outcome: TurnOutcome) -> SubagentStatus {
    match outcome {
        TurnOutcome::NoToolCalls => SubagentStatus::Completed,
        TurnOutcome::MaxStepsReached => SubagentStatus::MaxSteps,
        TurnOutcome::Cancelled => SubagentStatus::Cancelled,
        TurnOutcome::ToolRejected | TurnOutcome::FatalError => SubagentStatus::Failed,
    }
}

async fn run_subagent(
    spawner: &SubagentSpawner,
    definition: Arc<AgentDefinition>,
    agent_id: String,
    description: String,
    cancellation: CancellationToken,
) -> SubagentResult {
    let mut child = spawner.build_child(&definition, cancellation);
    let outcome = child.run_turn(description).await;
    SubagentResult {
        agent_id,
        status: outcome_to_status(outcome),
        output: last_assistant_text(&child),
        steps_used: child.last_step_count(),
        usage: UsageRecord::default(),
    }
}

fn result_to_output(result: SubagentResult) -> ToolOutput {
    match result.status {
        SubagentStatus::Completed => ToolOutput::text(result.output),
        other => ToolOutput::error(format!("subagent ended with status {other:?}: {}", result.output)),
    }
}

#[derive(Debug, Deserialize)]
struct TaskArgs {
    subagent_name: String,
    description: String,
    #[serde(default)]
    run_in_background: bool,
}

/// Synchronously (or in the background) delegates a task to a named
/// subagent.
pub struct TaskTool;

#[async_trait]
impl Tool for TaskTool {
    fn name(&self) -> &str {
        "Task"
    }

    fn description(&self) -> &str {
        "Delegate a task to a named subagent. Set run_in_background to poll its result later via TaskOutput."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "subagent_name": {"type": "string"},
                "description": {"type": "string", "description": "The task to hand off, seeded as the subagent's first user message."},
                "run_in_background": {"type": "boolean", "default": false}
            },
            "required": ["subagent_name", "description"]
        })
    }

    fn concurrency_safety(&self) -> ConcurrencySafety {
        ConcurrencySafety::Unsafe
    }

    async fn execute(&self, input: Value, ctx: &mut ToolContext) -> Result<ToolOutput, ToolError> {
        let args: TaskArgs = serde_json::from_value(input)?;
        let Some(spawner) = ctx.injector().optional::<SubagentSpawner>() else {
            return Err(ToolError::Internal {
                message: "no subagent spawner registered for this agent".to_string(),
            });
        };
        let Some(definition) = spawner.market.get(&args.subagent_name) else {
            return Err(ToolError::invalid_input(format!("unknown subagent: {}", args.subagent_name)));
        };

        let agent_id = generate_agent_id();
        let cancellation = ctx.cancellation().clone();

        if args.run_in_background {
            spawner.background.mark_running(agent_id.clone());
            let spawner_owned = (*spawner).clone();
            let agent_id_spawned = agent_id.clone();
            tokio::spawn(async move {
                let result = run_subagent(&spawner_owned, definition, agent_id_spawned, args.description, cancellation).await;
                spawner_owned.background.complete(result);
            });
            return Ok(ToolOutput::text(format!(
                "Spawned background subagent '{}' as {agent_id}. Poll with TaskOutput(\"{agent_id}\").",
                args.subagent_name
            )));
        }

        let result = run_subagent(&spawner, definition, agent_id, args.description, cancellation).await;
        Ok(result_to_output(result))
    }
}

#[derive(Debug, Deserialize)]
struct TaskOutputArgs {
    agent_id: String,
}

/// Polls the result of a background-spawned `Task` call.
pub struct TaskOutputTool;

#[async_trait]
impl Tool for TaskOutputTool {
    fn name(&self) -> &str {
        "TaskOutput"
    }

    fn description(&self) -> &str {
        "Poll the status and result of a background subagent spawned by Task."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {"agent_id": {"type": "string"}},
            "required": ["agent_id"]
        })
    }

    async fn execute(&self, input: Value, ctx: &mut ToolContext) -> Result<ToolOutput, ToolError> {
        let args: TaskOutputArgs = serde_json::from_value(input)?;
        let Some(spawner) = ctx.injector().optional::<SubagentSpawner>() else {
            return Err(ToolError::Internal {
                message: "no subagent spawner registered for this agent".to_string(),
            });
        };
        match spawner.background.status(&args.agent_id) {
            None => Err(ToolError::invalid_input(format!("unknown agent_id: {}", args.agent_id))),
            Some(SubagentStatus::Running) => Ok(ToolOutput::text(format!("Subagent '{}' is still running.", args.agent_id))),
            Some(_terminal) => match spawner.background.take_result(&args.agent_id) {
                Some(result) => Ok(result_to_output(result)),
                None => Ok(ToolOutput::error(format!("result for '{}' was already retrieved", args.agent_id))),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreateSubagentArgs {
    name: String,
    system_prompt: String,
}

/// Registers a runtime-defined subagent into the (shared) dynamic table.
pub struct CreateSubagentTool;

#[async_trait]
impl Tool for CreateSubagentTool {
    fn name(&self) -> &str {
        "CreateSubagent"
    }

    fn description(&self) -> &str {
        "Define a new subagent with a name and system prompt, invocable afterward via Task."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "system_prompt": {"type": "string"}
            },
            "required": ["name", "system_prompt"]
        })
    }

    async fn execute(&self, input: Value, ctx: &mut ToolContext) -> Result<ToolOutput, ToolError> {
        let args: CreateSubagentArgs = serde_json::from_value(input)?;
        let Some(spawner) = ctx.injector().optional::<SubagentSpawner>() else {
            return Err(ToolError::Internal {
                message: "no subagent spawner registered for this agent".to_string(),
            });
        };
        spawner.market.register_dynamic(AgentDefinition::dynamic(args.name.clone(), args.system_prompt));
        Ok(ToolOutput::text(format!("Created subagent '{}'.", args.name)))
    }
}
