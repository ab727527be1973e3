use super::*;

#[test]
fn new_session_gets_a_fresh_uuid() {
    let a = Session::new("/work");
    let b = Session::new("/work");
    assert_ne!(a.id, b.id);
}

#[test]
fn with_id_resumes_a_known_id() {
    let session = Session::with_id("known-id", "/work");
    assert_eq!(session.id, "known-id");
}

#[test]
fn builder_sets_every_field() {
    let session = Session::builder("/work")
        .id("fixed-id")
        .model_id("echo")
        .max_turns(50)
        .title("demo")
        .ephemeral(true)
        .build();

    assert_eq!(session.id, "fixed-id");
    assert_eq!(session.model_id.as_deref(), Some("echo"));
    assert_eq!(session.max_turns, Some(50));
    assert_eq!(session.title.as_deref(), Some("demo"));
    assert!(session.ephemeral);
}

#[test]
fn touch_advances_last_activity_at() {
    let mut session = Session::new("/work");
    let before = session.last_activity_at;
    std::thread::sleep(std::time::Duration::from_millis(5));
    session.touch();
    assert!(session.last_activity_at >= before);
}
