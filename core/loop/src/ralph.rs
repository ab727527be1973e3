//! Ralph mode (§4.G "Ralph mode"): the loop-of-loops that wraps the Turn
//! loop itself, resubmitting a prompt across multiple turns until an
//! iteration count, a wall-clock duration, or cancellation stops it.
//!
//! Named after the "Ralph Wiggum" technique of simply running an agent in
//! a loop until it stops finding work; grounded on the teacher's
//! `LoopDriver`/`IterationCondition` pair, collapsed to the single
//! bounded-iteration behavior `loop_control.max_ralph_iterations` resolves
//! to here.

use wisp_wire::TurnOutcome;

use crate::soul::Soul;

/// Why [`run_ralph`] stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RalphStopReason {
    /// `loop_control.max_ralph_iterations` is `0`; exactly one turn ran.
    Disabled,
    /// The configured positive iteration count was reached.
    IterationLimit,
    /// `loop_control.max_ralph_duration` elapsed.
    DurationLimit,
    /// The session's `CancellationToken` fired.
    Cancelled,
}

/// The full record of a Ralph-mode run: every turn's outcome, in order, plus
/// why the loop stopped.
#[derive(Debug, Clone)]
pub struct RalphOutcome {
    pub turn_outcomes: Vec<TurnOutcome>,
    pub stop_reason: RalphStopReason,
}

impl RalphOutcome {
    pub fn iterations_run(&self) -> u32 {
        self.turn_outcomes.len() as u32
    }
}

/// Runs `initial_prompt` as the first turn, then — while Ralph mode is
/// enabled — resubmits `loop_prompt` (defaulting to `initial_prompt` itself
/// when `None`) as a new turn each time the previous one reaches a terminal
/// state, per-iteration failures included (continue-on-error): a turn
/// ending in `FatalError` or `ToolRejected` does not stop the loop, it is
/// simply recorded and the next iteration is submitted.
pub async fn run_ralph(soul: &mut Soul, initial_prompt: String, loop_prompt: Option<String>) -> RalphOutcome {
    let next_prompt = loop_prompt.unwrap_or_else(|| initial_prompt.clone());

    if !soul.loop_control.ralph_enabled() {
        let outcome = soul.run_turn(initial_prompt).await;
        return RalphOutcome {
            turn_outcomes: vec![outcome],
            stop_reason: RalphStopReason::Disabled,
        };
    }

    let started_at_ms = soul.clock.elapsed_ms();
    let mut turn_outcomes = Vec::new();
    let mut prompt = initial_prompt;

    loop {
        if soul.cancellation_token().is_cancelled() {
            return RalphOutcome {
                turn_outcomes,
                stop_reason: RalphStopReason::Cancelled,
            };
        }

        let outcome = soul.run_turn(prompt).await;
        turn_outcomes.push(outcome);

        if outcome == TurnOutcome::Cancelled {
            return RalphOutcome {
                turn_outcomes,
                stop_reason: RalphStopReason::Cancelled,
            };
        }

        if let Some(max_duration) = soul.loop_control.max_ralph_duration {
            let elapsed = soul.clock.elapsed_ms().saturating_sub(started_at_ms);
            if elapsed >= max_duration.as_millis() as u64 {
                return RalphOutcome {
                    turn_outcomes,
                    stop_reason: RalphStopReason::DurationLimit,
                };
            }
        }

        if !soul.loop_control.ralph_should_continue(turn_outcomes.len() as u32) {
            return RalphOutcome {
                turn_outcomes,
                stop_reason: RalphStopReason::IterationLimit,
            };
        }

        prompt = next_prompt.clone();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use wisp_approval::ApprovalGate;
    use wisp_context::ContextStore;
    use wisp_model::EchoApiClient;
    use wisp_model::StaticModel;
    use wisp_protocol::LoopControlConfig;
    use wisp_slash::SlashRegistry;
    use wisp_tools::ToolRegistry;
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

    fn build_soul(loop_control: LoopControlConfig) -> Soul {
        let wire = wisp_wire::new_wire().engine;
        Soul::new(
            std::env::temp_dir(),
            ContextStore::in_memory(),
            ToolRegistry::new(),
            Arc::new(EchoApiClient::new("hi")),
            test_model(),
            Arc::new(ApprovalGate::new()),
            Arc::new(wire),
            SlashRegistry::default(),
            loop_control,
            Injector::new(),
        )
    }

    #[tokio::test]
    async fn disabled_ralph_runs_exactly_one_turn() {
        let mut soul = build_soul(LoopControlConfig { max_ralph_iterations: 0, ..Default::default() });
        let outcome = run_ralph(&mut soul, "hello".to_string(), None).await;
        assert_eq!(outcome.iterations_run(), 1);
        assert_eq!(outcome.stop_reason, RalphStopReason::Disabled);
    }

    #[tokio::test]
    async fn positive_iteration_count_stops_after_the_configured_number_of_turns() {
        let mut soul = build_soul(LoopControlConfig { max_ralph_iterations: 3, ..Default::default() });
        let outcome = run_ralph(&mut soul, "hello".to_string(), None).await;
        assert_eq!(outcome.iterations_run(), 3);
        assert_eq!(outcome.stop_reason, RalphStopReason::IterationLimit);
    }

    #[tokio::test]
    async fn duration_bound_stops_an_otherwise_infinite_loop() {
        let clock = FakeClock::new();
        let mut soul = build_soul(LoopControlConfig {
            max_ralph_iterations: -1,
            max_ralph_duration: Some(Duration::from_millis(0)),
            ..Default::default()
        })
        .with_clock(clock);
        let outcome = run_ralph(&mut soul, "hello".to_string(), None).await;
        assert_eq!(outcome.stop_reason, RalphStopReason::DurationLimit);
        assert_eq!(outcome.iterations_run(), 1);
    }

    #[tokio::test]
    async fn cancellation_stops_the_loop_before_the_next_iteration() {
        let mut soul = build_soul(LoopControlConfig { max_ralph_iterations: -1, ..Default::default() });
        soul.cancel_current_turn();
        let outcome = run_ralph(&mut soul, "hello".to_string(), None).await;
        assert_eq!(outcome.stop_reason, RalphStopReason::Cancelled);
        assert_eq!(outcome.iterations_run(), 0);
    }
}
