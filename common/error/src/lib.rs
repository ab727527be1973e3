//! Shared error classification used across every crate in the workspace.
//!
//! Individual crates define their own `thiserror` error enums; this crate
//! only supplies the cross-cutting [`StatusCode`] taxonomy and the
//! [`ErrorExt`] trait that lets callers ask "is this retryable?" without
//! matching on a crate-specific enum.

mod ext;
mod status_code;

pub use ext::ErrorExt;
pub use ext::PlainError;
pub use status_code::StatusCategory;
pub use status_code::StatusCode;
pub use status_code::StatusMeta;
