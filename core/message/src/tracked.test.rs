use super::*;

#[test]
fn tracked_message_carries_seq_and_checkpoint() {
    let msg = Message::user("hi");
    let tracked = TrackedMessage::new(3, msg, Some(1));
    assert_eq!(tracked.seq, 3);
    assert_eq!(tracked.checkpoint_id, Some(1));
}

#[test]
fn tracked_message_without_checkpoint() {
    let tracked = TrackedMessage::new(0, Message::user("hi"), None);
    assert_eq!(tracked.checkpoint_id, None);
}
