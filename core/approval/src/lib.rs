//! The Approval Gate: decides whether a side-effecting tool call proceeds.

mod error;
mod gate;

pub use error::ApprovalError;
pub use gate::ApprovalGate;
