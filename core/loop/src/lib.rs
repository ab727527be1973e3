//! The Agent Loop (§4.G "Soul"): the turn/step state machine that wires
//! together the Context Store, Tool Registry, Model Client, Compaction
//! Engine, Slash-Command Layer, and Subagent Market into one running agent.

mod clock;
mod error;
mod queue;
mod ralph;
mod soul;
mod step;
mod subagent_tools;
mod turn;

pub use clock::Clock;
pub use clock::FakeClock;
pub use clock::RealClock;
pub use error::LoopError;
pub use queue::PendingInputQueue;
pub use ralph::RalphOutcome;
pub use ralph::run_ralph;
pub use soul::Soul;
pub use soul::SubmitOutcome;
pub use step::StepOutcome;
pub use subagent_tools::CreateSubagentTool;
pub use subagent_tools::SubagentSpawner;
pub use subagent_tools::TaskOutputTool;
pub use subagent_tools::TaskTool;
pub use turn::TurnState;
