//! [`SlashRegistry`]: name/alias lookup plus the top-level dispatch entry
//! point the agent loop calls for a `/`-prefixed user input.

use std::collections::HashMap;
use std::sync::Arc;

use crate::SlashCommand;
use crate::SlashError;
use crate::SoulControl;

#[derive(Clone, Default)]
pub struct SlashRegistry {
    commands: HashMap<String, Arc<dyn SlashCommand>>,
}

impl SlashRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, command: Arc<dyn SlashCommand>) -> &mut Self {
        self.commands.insert(command.name().to_string(), command.clone());
        for alias in command.aliases() {
            self.commands.insert((*alias).to_string(), command.clone());
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn SlashCommand>> {
        self.commands.get(name).cloned()
    }

    /// True when `input` begins with `/` and names a registered command
    /// (or alias). The agent loop uses this to decide whether a user input
    /// bypasses the model entirely.
    pub fn is_slash_input(&self, input: &str) -> bool {
        Self::parse(input).is_some_and(|(name, _)| self.commands.contains_key(name))
    }

    /// Splits `/name rest of args` into `(name, args)`. Returns `None` if
    /// `input` does not start with `/`.
    fn parse(input: &str) -> Option<(&str, &str)> {
        let rest = input.strip_prefix('/')?;
        match rest.split_once(char::is_whitespace) {
            Some((name, args)) => Some((name, args.trim_start())),
            None => Some((rest, "")),
        }
    }

    /// Parses and runs a `/`-prefixed input against `soul`.
    ///
    /// Returns `Err(SlashError::UnknownCommand)` for an unregistered name
    /// rather than silently doing nothing, so the caller can surface it to
    /// the user.
    pub async fn dispatch(&self, soul: &mut dyn SoulControl, input: &str) -> Result<(), SlashError> {
        let (name, args) = Self::parse(input).ok_or_else(|| SlashError::UnknownCommand(input.to_string()))?;
        let command = self
            .commands
            .get(name)
            .ok_or_else(|| SlashError::UnknownCommand(name.to_string()))?;
        tracing::debug!(command = name, "dispatching slash command");
        command.run(soul, args).await
    }

    pub fn names(&self) -> Vec<&str> {
        self.commands.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::ContextStats;

    struct EchoSoul {
        yolo: bool,
    }

    #[async_trait]
    impl SoulControl for EchoSoul {
        async fn compact(&mut self, _instruction: Option<String>) -> Result<(), SlashError> {
            Ok(())
        }
        fn set_model(&mut self, _model_id: &str) -> Result<(), SlashError> {
            Ok(())
        }
        fn set_thinking(&mut self, _enabled: bool) {}
        fn set_yolo(&mut self, enabled: bool) {
            self.yolo = enabled;
        }
        fn context_stats(&self) -> ContextStats {
            ContextStats { token_count: 0, max_context_tokens: 1, message_count: 0, checkpoint_count: 0 }
        }
        fn available_models(&self) -> Vec<String> {
            vec![]
        }
        fn emit_status(&self, text: &str) {
            // Interior mutability would be more realistic; the test only
            // checks dispatch routing, not status capture.
            let _ = text;
        }
    }

    struct Yolo;

    #[async_trait]
    impl SlashCommand for Yolo {
        fn name(&self) -> &str {
            "yolo"
        }
        fn description(&self) -> &str {
            "toggle yolo mode"
        }
        async fn run(&self, soul: &mut dyn SoulControl, args: &str) -> Result<(), SlashError> {
            soul.set_yolo(args != "off");
            Ok(())
        }
    }

    fn soul() -> EchoSoul {
        EchoSoul { yolo: false }
    }

    #[tokio::test]
    async fn dispatch_runs_the_matching_command() {
        let mut registry = SlashRegistry::new();
        registry.register(Arc::new(Yolo));
        let mut s = soul();
        registry.dispatch(&mut s, "/yolo").await.expect("dispatch");
        assert!(s.yolo);
    }

    #[tokio::test]
    async fn dispatch_passes_trimmed_args() {
        let mut registry = SlashRegistry::new();
        registry.register(Arc::new(Yolo));
        let mut s = soul();
        registry.dispatch(&mut s, "/yolo off").await.expect("dispatch");
        assert!(!s.yolo);
    }

    #[tokio::test]
    async fn unknown_command_is_an_error() {
        let registry = SlashRegistry::new();
        let mut s = soul();
        let err = registry.dispatch(&mut s, "/nope").await.unwrap_err();
        assert!(matches!(err, SlashError::UnknownCommand(_)));
    }

    #[test]
    fn is_slash_input_requires_registration() {
        let mut registry = SlashRegistry::new();
        registry.register(Arc::new(Yolo));
        assert!(registry.is_slash_input("/yolo"));
        assert!(registry.is_slash_input("/yolo on"));
        assert!(!registry.is_slash_input("/unregistered"));
        assert!(!registry.is_slash_input("not a command"));
    }
}
