use std::sync::Arc;

use super::*;
use wisp_wire::{ApprovalReply as WireApprovalReply, WirePair, WireReply, new_wire};

#[tokio::test]
async fn yolo_mode_approves_without_prompting() {
    let gate = ApprovalGate::new();
    gate.set_yolo(true);
    let WirePair { engine, .. } = new_wire();

    let approved = gate.request(&engine, "Shell", "run command", "ls").await.expect("request");
    assert!(approved);
}

#[tokio::test]
async fn reject_reply_denies_without_remembering() {
    let gate = Arc::new(ApprovalGate::new());
    let WirePair { engine, mut ui } = new_wire();

    let gate_clone = gate.clone();
    let handle = tokio::spawn(async move {
        gate_clone.request(&engine, "Shell", "run command", "rm x").await
    });
    let pending = ui.recv_request().await.expect("pending");
    pending.reply(WireReply::Approval(WireApprovalReply::Reject));
    let approved = handle.await.expect("join").expect("request");
    assert!(!approved);
}

#[tokio::test]
async fn approve_and_remember_persists_and_skips_future_prompts() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("approvals.json");
    let gate = Arc::new(ApprovalGate::load(&path).await.expect("load"));
    let WirePair { engine, mut ui } = new_wire();

    let gate_clone = gate.clone();
    let handle = tokio::spawn(async move {
        gate_clone.request(&engine, "Shell", "run command", "rm x").await
    });
    let pending = ui.recv_request().await.expect("pending");
    pending.reply(WireReply::Approval(WireApprovalReply::ApproveAndRemember));
    let approved = handle.await.expect("join").expect("request");
    assert!(approved);

    // The same gate now auto-approves without prompting.
    let WirePair { engine: engine2, .. } = new_wire();
    let approved_again = gate.request(&engine2, "Shell", "run command", "rm x").await.expect("request");
    assert!(approved_again);

    // A fresh gate reloaded from disk also auto-approves.
    let gate2 = ApprovalGate::load(&path).await.expect("reload");
    let WirePair { engine: engine3, .. } = new_wire();
    let approved3 = gate2.request(&engine3, "Shell", "run command", "rm x").await.expect("request");
    assert!(approved3);
}
