//! Pluggable compaction strategies, grounded on the observation that
//! "replace a prefix with a summary" has more than one reasonable shape: a
//! plain summary, or a summary plus a budgeted reattachment of recently
//! touched files so the next step doesn't immediately re-read them.

use std::collections::HashMap;
use std::path::PathBuf;

use wisp_protocol::ContentPart;
use wisp_protocol::Message;

/// Everything a strategy needs to build its summarization prompt and the
/// resulting compacted history.
pub struct CompactContext {
    /// The messages being replaced (everything before the preserved tail).
    pub prefix: Vec<Message>,
    /// An optional user-supplied instruction to fold into the summary
    /// prompt (from the `/compact <instruction>` slash command).
    pub user_instruction: Option<String>,
    /// Paths the current turn has read or written, most-recent first. Only
    /// consulted by [`FileRecoveryStrategy`].
    pub recently_touched_files: Vec<PathBuf>,
}

/// A pluggable policy for turning a history prefix into a replacement.
pub trait CompactStrategy: Send + Sync {
    fn name(&self) -> &str;

    /// Builds the prompt sent to the model to produce the summary text.
    fn generate_prompt(&self, ctx: &CompactContext) -> String;

    /// Builds the final compacted history, given the model's summary text
    /// and the tail of messages to preserve verbatim.
    fn build_compacted_history(&self, summary_text: &str, ctx: &CompactContext, tail: &[Message]) -> Vec<Message>;
}

/// Summarizes the prefix into a single assistant message; no file
/// reattachment.
pub struct SimpleStrategy;

impl CompactStrategy for SimpleStrategy {
    fn name(&self) -> &str {
        "simple"
    }

    fn generate_prompt(&self, ctx: &CompactContext) -> String {
        build_default_prompt(ctx)
    }

    fn build_compacted_history(&self, summary_text: &str, _ctx: &CompactContext, tail: &[Message]) -> Vec<Message> {
        let mut history = vec![Message::assistant(vec![ContentPart::text(summary_text.to_string())])];
        history.extend_from_slice(tail);
        history
    }
}

/// Like [`SimpleStrategy`], but also reattaches up to a fixed budget of
/// recently-touched files after the summary.
pub struct FileRecoveryStrategy {
    max_files: usize,
}

impl Default for FileRecoveryStrategy {
    fn default() -> Self {
        Self { max_files: 5 }
    }
}

impl CompactStrategy for FileRecoveryStrategy {
    fn name(&self) -> &str {
        "file_recovery"
    }

    fn generate_prompt(&self, ctx: &CompactContext) -> String {
        build_default_prompt(ctx)
    }

    fn build_compacted_history(&self, summary_text: &str, ctx: &CompactContext, tail: &[Message]) -> Vec<Message> {
        let mut history = vec![Message::assistant(vec![ContentPart::text(summary_text.to_string())])];
        if !ctx.recently_touched_files.is_empty() {
            let listed = ctx
                .recently_touched_files
                .iter()
                .take(self.max_files)
                .map(|p| format!("- {}", p.display()))
                .collect::<Vec<_>>()
                .join("\n");
            history.push(Message::system(format!(
                "Recently touched files (not re-read, for reference):\n{listed}"
            )));
        }
        history.extend_from_slice(tail);
        history
    }
}

fn build_default_prompt(ctx: &CompactContext) -> String {
    let rendered = ctx
        .prefix
        .iter()
        .enumerate()
        .map(|(i, m)| format!("## Message {}\nRole: {:?}\nContent:\n{}", i + 1, m.role, m.text_content()))
        .collect::<Vec<_>>()
        .join("\n\n");

    let mut prompt = format!(
        "Summarize the following conversation so it can replace it in context. \
         Preserve any decisions, file paths, and outstanding tasks.\n\n{rendered}"
    );
    if let Some(instruction) = &ctx.user_instruction {
        prompt.push_str(&format!("\n\nAdditional instruction from the user: {instruction}"));
    }
    prompt
}

/// A name-keyed table of available strategies, falling back to `simple` for
/// an unrecognized name.
pub struct CompactStrategyRegistry {
    strategies: HashMap<String, Box<dyn CompactStrategy>>,
}

impl CompactStrategyRegistry {
    pub fn with_defaults() -> Self {
        let mut strategies: HashMap<String, Box<dyn CompactStrategy>> = HashMap::new();
        strategies.insert("simple".to_string(), Box::new(SimpleStrategy));
        strategies.insert("file_recovery".to_string(), Box::new(FileRecoveryStrategy::default()));
        Self { strategies }
    }

    pub fn register(&mut self, strategy: Box<dyn CompactStrategy>) {
        self.strategies.insert(strategy.name().to_string(), strategy);
    }

    pub fn get(&self, name: &str) -> &dyn CompactStrategy {
        self.strategies
            .get(name)
            .map(AsRef::as_ref)
            .unwrap_or_else(|| self.strategies.get("simple").expect("simple strategy always registered").as_ref())
    }
}

impl Default for CompactStrategyRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> CompactContext {
        CompactContext {
            prefix: vec![Message::user("hello"), Message::assistant(vec![ContentPart::text("hi")])],
            user_instruction: None,
            recently_touched_files: vec![],
        }
    }

    #[test]
    fn unknown_strategy_name_falls_back_to_simple() {
        let registry = CompactStrategyRegistry::with_defaults();
        assert_eq!(registry.get("does-not-exist").name(), "simple");
    }

    #[test]
    fn simple_strategy_produces_summary_plus_tail() {
        let strategy = SimpleStrategy;
        let tail = vec![Message::user("continue")];
        let history = strategy.build_compacted_history("summary text", &ctx(), &tail);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].text_content(), "summary text");
        assert_eq!(history[1].text_content(), "continue");
    }

    #[test]
    fn file_recovery_strategy_reattaches_touched_files() {
        let strategy = FileRecoveryStrategy::default();
        let mut context = ctx();
        context.recently_touched_files = vec![PathBuf::from("src/lib.rs")];
        let history = strategy.build_compacted_history("summary", &context, &[]);
        assert_eq!(history.len(), 2);
        assert!(history[1].text_content().contains("src/lib.rs"));
    }

    #[test]
    fn file_recovery_skips_reattachment_when_nothing_touched() {
        let strategy = FileRecoveryStrategy::default();
        let history = strategy.build_compacted_history("summary", &ctx(), &[]);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn prompt_includes_user_instruction_when_present() {
        let mut context = ctx();
        context.user_instruction = Some("focus on the auth module".to_string());
        let prompt = SimpleStrategy.generate_prompt(&context);
        assert!(prompt.contains("focus on the auth module"));
    }
}
