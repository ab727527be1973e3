use super::*;

#[test]
fn queued_command_gets_a_unique_id_and_timestamp() {
    let cmd = UserQueuedCommand::new("test command");
    assert_eq!(cmd.prompt, "test command");
    assert!(!cmd.id.is_empty());
    assert!(cmd.queued_at > 0);
}

#[test]
fn preview_truncates_long_prompts() {
    let cmd = UserQueuedCommand::new("this is a very long command that should be truncated");
    assert_eq!(cmd.preview(20), "this is a very long ...");
    let short = UserQueuedCommand::new("short");
    assert_eq!(short.preview(20), "short");
}

#[test]
fn steering_source_display() {
    assert_eq!(SteeringSource::User.to_string(), "user");
    assert_eq!(SteeringSource::Hook.to_string(), "hook");
}

#[test]
fn steering_attachment_constructors_set_source() {
    assert_eq!(SteeringAttachment::user("x").source, SteeringSource::User);
    assert_eq!(SteeringAttachment::hook("x").source, SteeringSource::Hook);
    assert_eq!(SteeringAttachment::system("x").source, SteeringSource::System);
}

#[test]
fn serde_round_trip() {
    let cmd = UserQueuedCommand::new("test");
    let json = serde_json::to_string(&cmd).expect("serialize");
    let parsed: UserQueuedCommand = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(parsed.prompt, cmd.prompt);
}
