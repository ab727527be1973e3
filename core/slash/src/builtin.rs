//! A handful of built-in commands exercising the handler surface end to
//! end: compaction, yolo toggling, model switching, thinking mode, and a
//! read-only context report.

use async_trait::async_trait;

use crate::SlashCommand;
use crate::SlashError;
use crate::SoulControl;

/// `/compact [instruction]` — manually triggers compaction (§4.E), folding
/// an optional free-text instruction into the summarization prompt.
pub struct CompactCommand;

#[async_trait]
impl SlashCommand for CompactCommand {
    fn name(&self) -> &str {
        "compact"
    }

    fn description(&self) -> &str {
        "Summarize older history to reclaim context budget."
    }

    async fn run(&self, soul: &mut dyn SoulControl, args: &str) -> Result<(), SlashError> {
        let instruction = if args.is_empty() { None } else { Some(args.to_string()) };
        soul.compact(instruction).await
    }
}

/// `/yolo [on|off]` — toggles unconditional tool approval. Bare `/yolo`
/// enables it; `/yolo off` disables it.
pub struct YoloCommand;

#[async_trait]
impl SlashCommand for YoloCommand {
    fn name(&self) -> &str {
        "yolo"
    }

    fn description(&self) -> &str {
        "Toggle YOLO mode (auto-approve every tool call)."
    }

    async fn run(&self, soul: &mut dyn SoulControl, args: &str) -> Result<(), SlashError> {
        let enabled = !matches!(args.trim(), "off" | "0" | "false");
        soul.set_yolo(enabled);
        soul.emit_status(if enabled { "YOLO mode enabled." } else { "YOLO mode disabled." });
        Ok(())
    }
}

/// `/model <id>` — switches the active model. Fails with
/// [`SlashError::UnknownModel`] if `id` is not one this soul can switch to.
pub struct ModelCommand;

#[async_trait]
impl SlashCommand for ModelCommand {
    fn name(&self) -> &str {
        "model"
    }

    fn aliases(&self) -> &[&str] {
        &["m"]
    }

    fn description(&self) -> &str {
        "Switch the active model."
    }

    async fn run(&self, soul: &mut dyn SoulControl, args: &str) -> Result<(), SlashError> {
        let id = args.trim();
        if id.is_empty() {
            let available = soul.available_models().join(", ");
            soul.emit_status(&format!("Available models: {available}"));
            return Ok(());
        }
        soul.set_model(id)?;
        soul.emit_status(&format!("Switched to model '{id}'."));
        Ok(())
    }
}

/// `/thinking [on|off]` — requests chain-of-thought from models that
/// support it.
pub struct ThinkingCommand;

#[async_trait]
impl SlashCommand for ThinkingCommand {
    fn name(&self) -> &str {
        "thinking"
    }

    fn description(&self) -> &str {
        "Toggle chain-of-thought requests for supporting models."
    }

    async fn run(&self, soul: &mut dyn SoulControl, args: &str) -> Result<(), SlashError> {
        let enabled = !matches!(args.trim(), "off" | "0" | "false");
        soul.set_thinking(enabled);
        soul.emit_status(if enabled { "Thinking mode enabled." } else { "Thinking mode disabled." });
        Ok(())
    }
}

/// `/context` (alias `/stats`) — reports current context usage without
/// mutating anything.
pub struct ContextStatsCommand;

#[async_trait]
impl SlashCommand for ContextStatsCommand {
    fn name(&self) -> &str {
        "context"
    }

    fn aliases(&self) -> &[&str] {
        &["stats"]
    }

    fn description(&self) -> &str {
        "Show current context window usage."
    }

    async fn run(&self, soul: &mut dyn SoulControl, _args: &str) -> Result<(), SlashError> {
        let stats = soul.context_stats();
        soul.emit_status(&format!(
            "{} / {} tokens ({:.0}%), {} messages, {} checkpoints",
            stats.token_count,
            stats.max_context_tokens,
            stats.usage_fraction() * 100.0,
            stats.message_count,
            stats.checkpoint_count,
        ));
        Ok(())
    }
}

/// Registers every built-in command on `registry`.
pub fn register_builtins(registry: &mut crate::SlashRegistry) {
    registry.register(std::sync::Arc::new(CompactCommand));
    registry.register(std::sync::Arc::new(YoloCommand));
    registry.register(std::sync::Arc::new(ModelCommand));
    registry.register(std::sync::Arc::new(ThinkingCommand));
    registry.register(std::sync::Arc::new(ContextStatsCommand));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ContextStats;
    use crate::SlashRegistry;
    use std::cell::RefCell;

    struct RecordingSoul {
        yolo: bool,
        thinking: bool,
        model: String,
        statuses: RefCell<Vec<String>>,
        compacted_with: Option<Option<String>>,
    }

    impl RecordingSoul {
        fn new() -> Self {
            Self {
                yolo: false,
                thinking: false,
                model: "default".to_string(),
                statuses: RefCell::new(Vec::new()),
                compacted_with: None,
            }
        }
    }

    #[async_trait]
    impl SoulControl for RecordingSoul {
        async fn compact(&mut self, instruction: Option<String>) -> Result<(), SlashError> {
            self.compacted_with = Some(instruction);
            Ok(())
        }
        fn set_model(&mut self, model_id: &str) -> Result<(), SlashError> {
            if model_id == "bogus" {
                return Err(SlashError::UnknownModel(model_id.to_string()));
            }
            self.model = model_id.to_string();
            Ok(())
        }
        fn set_thinking(&mut self, enabled: bool) {
            self.thinking = enabled;
        }
        fn set_yolo(&mut self, enabled: bool) {
            self.yolo = enabled;
        }
        fn context_stats(&self) -> ContextStats {
            ContextStats { token_count: 500, max_context_tokens: 1000, message_count: 4, checkpoint_count: 1 }
        }
        fn available_models(&self) -> Vec<String> {
            vec!["default".to_string(), "fast".to_string()]
        }
        fn emit_status(&self, text: &str) {
            self.statuses.borrow_mut().push(text.to_string());
        }
    }

    #[tokio::test]
    async fn yolo_bare_enables() {
        let mut registry = SlashRegistry::new();
        register_builtins(&mut registry);
        let mut soul = RecordingSoul::new();
        registry.dispatch(&mut soul, "/yolo").await.expect("dispatch");
        assert!(soul.yolo);
    }

    #[tokio::test]
    async fn yolo_off_disables() {
        let mut registry = SlashRegistry::new();
        register_builtins(&mut registry);
        let mut soul = RecordingSoul::new();
        soul.yolo = true;
        registry.dispatch(&mut soul, "/yolo off").await.expect("dispatch");
        assert!(!soul.yolo);
    }

    #[tokio::test]
    async fn model_switches_by_alias() {
        let mut registry = SlashRegistry::new();
        register_builtins(&mut registry);
        let mut soul = RecordingSoul::new();
        registry.dispatch(&mut soul, "/m fast").await.expect("dispatch");
        assert_eq!(soul.model, "fast");
    }

    #[tokio::test]
    async fn model_rejects_unknown_id() {
        let mut registry = SlashRegistry::new();
        register_builtins(&mut registry);
        let mut soul = RecordingSoul::new();
        let err = registry.dispatch(&mut soul, "/model bogus").await.unwrap_err();
        assert!(matches!(err, SlashError::UnknownModel(_)));
    }

    #[tokio::test]
    async fn compact_forwards_instruction() {
        let mut registry = SlashRegistry::new();
        register_builtins(&mut registry);
        let mut soul = RecordingSoul::new();
        registry.dispatch(&mut soul, "/compact focus on auth").await.expect("dispatch");
        assert_eq!(soul.compacted_with, Some(Some("focus on auth".to_string())));
    }

    #[tokio::test]
    async fn stats_alias_reports_usage() {
        let mut registry = SlashRegistry::new();
        register_builtins(&mut registry);
        let mut soul = RecordingSoul::new();
        registry.dispatch(&mut soul, "/stats").await.expect("dispatch");
        assert!(soul.statuses.borrow()[0].contains("500 / 1000 tokens"));
    }
}
