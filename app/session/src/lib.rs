//! Session metadata and on-disk discovery (§9 "SessionFile format",
//! "Exit codes"). Owns the naming scheme for session files; the actual
//! append-only log is [`wisp_context::ContextStore`], opened at the path
//! this crate resolves.

mod discovery;
mod error;
mod session;

pub use discovery::SESSION_FILE_EXTENSION;
pub use discovery::default_sessions_dir;
pub use discovery::list_session_ids;
pub use discovery::most_recent_session_id;
pub use discovery::resolve_session_id;
pub use discovery::session_file_path;
pub use error::SessionError;
pub use session::Session;
pub use session::SessionBuilder;
