//! The duplex channel pair itself.

use tokio::sync::mpsc;
use tokio::sync::oneshot;

use crate::event::WireEvent;
use crate::request::WireReply;
use crate::request::WireRequest;

#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("the UI-side endpoint has disconnected")]
    Disconnected,
    #[error("the request was cancelled before a reply arrived")]
    Cancelled,
}

/// A pending request awaiting a UI reply.
pub struct PendingRequest {
    pub request: WireRequest,
    reply_tx: oneshot::Sender<WireReply>,
}

/// The engine-side endpoint: sends events, issues requests and awaits replies.
pub struct EngineSide {
    events_tx: mpsc::UnboundedSender<WireEvent>,
    requests_tx: mpsc::UnboundedSender<PendingRequest>,
}

impl EngineSide {
    pub fn emit(&self, event: WireEvent) {
        // A disconnected UI is not fatal to the engine; events are
        // fire-and-forget from the loop's perspective.
        let _ = self.events_tx.send(event);
    }

    pub async fn request(&self, request: WireRequest) -> Result<WireReply, WireError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.requests_tx
            .send(PendingRequest { request, reply_tx })
            .map_err(|_| WireError::Disconnected)?;
        reply_rx.await.map_err(|_| WireError::Cancelled)
    }
}

/// The UI-side endpoint: receives events, answers requests.
pub struct UiSide {
    events_rx: mpsc::UnboundedReceiver<WireEvent>,
    requests_rx: mpsc::UnboundedReceiver<PendingRequest>,
}

impl UiSide {
    pub async fn recv_event(&mut self) -> Option<WireEvent> {
        self.events_rx.recv().await
    }

    pub async fn recv_request(&mut self) -> Option<PendingRequest> {
        self.requests_rx.recv().await
    }
}

impl PendingRequest {
    pub fn reply(self, reply: WireReply) {
        let _ = self.reply_tx.send(reply);
    }
}

pub struct WirePair {
    pub engine: EngineSide,
    pub ui: UiSide,
}

/// Builds a fresh connected `(EngineSide, UiSide)` pair.
pub fn new_wire() -> WirePair {
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (requests_tx, requests_rx) = mpsc::unbounded_channel();
    WirePair {
        engine: EngineSide { events_tx, requests_tx },
        ui: UiSide { events_rx, requests_rx },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::ApprovalReply;

    #[tokio::test]
    async fn events_are_delivered_in_send_order() {
        let WirePair { engine, mut ui } = new_wire();
        engine.emit(WireEvent::TurnBegin { user_input: "hi".into() });
        engine.emit(WireEvent::StepBegin { step: 1 });

        let first = ui.recv_event().await.expect("first event");
        let second = ui.recv_event().await.expect("second event");
        assert!(matches!(first, WireEvent::TurnBegin { .. }));
        assert!(matches!(second, WireEvent::StepBegin { step: 1 }));
    }

    #[tokio::test]
    async fn request_round_trips_to_a_reply() {
        let WirePair { engine, mut ui } = new_wire();
        let request_fut = tokio::spawn(async move {
            engine
                .request(WireRequest::approval("Shell", "run command", "rm file.txt"))
                .await
        });

        let pending = ui.recv_request().await.expect("pending request");
        pending.reply(WireReply::Approval(ApprovalReply::Reject));

        let reply = request_fut.await.expect("join").expect("reply");
        assert!(matches!(reply, WireReply::Approval(ApprovalReply::Reject)));
    }

    #[tokio::test]
    async fn request_errors_when_ui_drops_without_replying() {
        let WirePair { engine, mut ui } = new_wire();
        let request_fut = tokio::spawn(async move {
            engine.request(WireRequest::question(vec!["ok?".into()])).await
        });
        let pending = ui.recv_request().await.expect("pending");
        drop(pending);

        let result = request_fut.await.expect("join");
        assert!(matches!(result, Err(WireError::Cancelled)));
    }
}
