use super::*;
use tempfile::TempDir;

fn isolated_home() -> TempDir {
    TempDir::new().expect("tempdir")
}

#[test]
fn defaults_when_no_files_or_env_present() {
    let home = isolated_home();
    let project = TempDir::new().expect("tempdir");
    // SAFETY: tests run single-threaded within this process for env vars
    // touched here (no other test in this crate sets WISP_HOME).
    unsafe { std::env::set_var(HOME_OVERRIDE_ENV, home.path()) };

    let config = load_layered(project.path()).expect("load");
    assert_eq!(config.compact_strategy, "simple");
    assert!(config.default_model.is_none());
    assert!(!config.default_thinking);

    unsafe { std::env::remove_var(HOME_OVERRIDE_ENV) };
}

#[test]
fn project_layer_overrides_user_layer() {
    let home = isolated_home();
    std::fs::create_dir_all(home.path().join(CONFIG_DIR_NAME)).expect("mkdir");
    std::fs::write(home.path().join(CONFIG_DIR_NAME).join("config.toml"), "default_model = \"user-model\"\n").expect("write");

    let project = TempDir::new().expect("tempdir");
    std::fs::create_dir_all(project.path().join(CONFIG_DIR_NAME)).expect("mkdir");
    std::fs::write(
        project.path().join(CONFIG_DIR_NAME).join("config.toml"),
        "default_model = \"project-model\"\n",
    )
    .expect("write");

    unsafe { std::env::set_var(HOME_OVERRIDE_ENV, home.path()) };
    let config = load_layered(project.path()).expect("load");
    unsafe { std::env::remove_var(HOME_OVERRIDE_ENV) };

    assert_eq!(config.default_model.as_deref(), Some("project-model"));
}

#[test]
fn partial_file_only_overrides_the_fields_it_sets() {
    let home = isolated_home();
    unsafe { std::env::set_var(HOME_OVERRIDE_ENV, home.path()) };

    let project = TempDir::new().expect("tempdir");
    std::fs::create_dir_all(project.path().join(CONFIG_DIR_NAME)).expect("mkdir");
    std::fs::write(
        project.path().join(CONFIG_DIR_NAME).join("config.toml"),
        "max_steps_per_turn = 5\n",
    )
    .expect("write");

    let config = load_layered(project.path()).expect("load");
    unsafe { std::env::remove_var(HOME_OVERRIDE_ENV) };

    assert_eq!(config.loop_control.max_steps_per_turn, 5);
    assert_eq!(config.compact_strategy, "simple");
}

#[test]
fn malformed_file_is_an_error() {
    let home = isolated_home();
    unsafe { std::env::set_var(HOME_OVERRIDE_ENV, home.path()) };

    let project = TempDir::new().expect("tempdir");
    std::fs::create_dir_all(project.path().join(CONFIG_DIR_NAME)).expect("mkdir");
    std::fs::write(project.path().join(CONFIG_DIR_NAME).join("config.toml"), "not valid toml = = =").expect("write");

    let result = load_layered(project.path());
    unsafe { std::env::remove_var(HOME_OVERRIDE_ENV) };

    assert!(result.is_err());
}

#[test]
fn env_var_overrides_both_files() {
    let home = isolated_home();
    unsafe {
        std::env::set_var(HOME_OVERRIDE_ENV, home.path());
        std::env::set_var("WISP_CONFIG_DEFAULT_MODEL", "env-model");
    }

    let project = TempDir::new().expect("tempdir");
    let config = load_layered(project.path()).expect("load");

    unsafe {
        std::env::remove_var(HOME_OVERRIDE_ENV);
        std::env::remove_var("WISP_CONFIG_DEFAULT_MODEL");
    }

    assert_eq!(config.default_model.as_deref(), Some("env-model"));
}
