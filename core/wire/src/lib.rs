//! The Wire Channel: a typed duplex pipe between the agent loop and any
//! observer (terminal UI, ACP peer, test harness).

mod event;
mod request;
mod side_log;
mod wire;

pub use event::TurnOutcome;
pub use event::WireEvent;
pub use request::ApprovalReply;
pub use request::WireReply;
pub use request::WireRequest;
pub use request::WireRequestKind;
pub use side_log::SideLog;
pub use wire::EngineSide;
pub use wire::PendingRequest;
pub use wire::UiSide;
pub use wire::WireError;
pub use wire::WirePair;
pub use wire::new_wire;
