//! The [`SlashCommand`] trait: one named handler mutating a soul.

use async_trait::async_trait;

use crate::SlashError;
use crate::SoulControl;

/// A single slash command. `name()` is the canonical invocation (without the
/// leading `/`); `aliases()` lists additional names that resolve to the same
/// handler.
#[async_trait]
pub trait SlashCommand: Send + Sync {
    fn name(&self) -> &str;

    fn aliases(&self) -> &[&str] {
        &[]
    }

    fn description(&self) -> &str;

    /// Runs the handler. `args` is the raw text after the command name,
    /// trimmed of leading whitespace; empty if none was given.
    async fn run(&self, soul: &mut dyn SoulControl, args: &str) -> Result<(), SlashError>;
}
