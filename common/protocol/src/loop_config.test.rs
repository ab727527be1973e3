use super::*;

#[test]
fn defaults_match_documented_values() {
    let cfg = LoopControlConfig::default();
    assert_eq!(cfg.max_steps_per_turn, 100);
    assert_eq!(cfg.max_retries_per_step, 3);
    assert!((cfg.auto_compact_threshold - 0.8).abs() < f64::EPSILON);
    assert_eq!(cfg.max_ralph_iterations, 0);
    assert!(!cfg.ralph_enabled());
}

#[test]
fn validate_rejects_threshold_out_of_range() {
    let mut cfg = LoopControlConfig::default();
    cfg.auto_compact_threshold = 1.5;
    assert!(cfg.validate().is_err());
}

#[test]
fn validate_rejects_ralph_below_negative_one() {
    let mut cfg = LoopControlConfig::default();
    cfg.max_ralph_iterations = -2;
    assert!(cfg.validate().is_err());
}

#[test]
fn validate_accepts_negative_one_as_infinite() {
    let mut cfg = LoopControlConfig::default();
    cfg.max_ralph_iterations = -1;
    assert!(cfg.validate().is_ok());
    assert!(cfg.ralph_enabled());
    assert!(cfg.ralph_should_continue(1_000));
}

#[test]
fn ralph_should_continue_respects_bound() {
    let mut cfg = LoopControlConfig::default();
    cfg.max_ralph_iterations = 3;
    assert!(cfg.ralph_should_continue(0));
    assert!(cfg.ralph_should_continue(2));
    assert!(!cfg.ralph_should_continue(3));
}

#[test]
fn partial_toml_uses_defaults() {
    let cfg: LoopControlConfig = toml::from_str("max_steps_per_turn = 50").expect("parse");
    assert_eq!(cfg.max_steps_per_turn, 50);
    assert_eq!(cfg.max_retries_per_step, 3);
}
