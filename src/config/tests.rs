use super::*;
use crate::constants::{ANONYMOUS_TOKEN, DEFAULT_BACKEND_URL, DEFAULT_MODEL, PROJECT_CONFIG_FILENAME};
use std::fs;
use std::time::Duration;

fn scratch_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "chatelix_test_{}_{}",
        name,
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_empty_file_uses_defaults() {
    let config: Config = toml::from_str("").unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.model, DEFAULT_MODEL);
    assert_eq!(config.temperature(), 0.7);
    assert_eq!(config.max_tokens(), 2000);
    assert!(config.fallback_enabled());
    assert_eq!(config.log_level(), "warn");
    assert_eq!(config.base_url(), DEFAULT_BACKEND_URL);
    assert_eq!(config.timeout(), Duration::from_secs(120));
}

#[test]
fn test_parses_all_fields() {
    let config: Config = toml::from_str(
        r#"
model = "anthropic/claude-3.5-sonnet"
temperature = 0.2
max_tokens = 512
fallback = false
system_prompt = "Be brief."
log_level = "debug"

[backend]
base_url = "https://example.supabase.co"
auth_token = "secret"
timeout_secs = 30
"#,
    )
    .unwrap();
    assert_eq!(config.model, "anthropic/claude-3.5-sonnet");
    assert_eq!(config.temperature(), 0.2);
    assert_eq!(config.max_tokens(), 512);
    assert!(!config.fallback_enabled());
    assert_eq!(config.system_prompt.as_deref(), Some("Be brief."));
    assert_eq!(config.log_level(), "debug");
    assert_eq!(config.base_url(), "https://example.supabase.co");
    assert_eq!(config.timeout(), Duration::from_secs(30));
}

#[test]
fn test_project_values_win_in_merge() {
    let global: Config = toml::from_str(
        r#"
model = "openai/gpt-4o"
temperature = 0.5
[backend]
base_url = "https://global.example"
auth_token = "global-token"
"#,
    )
    .unwrap();
    let project: Config = toml::from_str(
        r#"
temperature = 0.1
[backend]
base_url = "https://project.example"
"#,
    )
    .unwrap();

    let merged = Config::merge(global, project);
    // Project left the model at its default, so the global one is kept.
    assert_eq!(merged.model, "openai/gpt-4o");
    assert_eq!(merged.temperature, Some(0.1));
    assert_eq!(merged.base_url(), "https://project.example");
    assert_eq!(merged.backend.auth_token.as_deref(), Some("global-token"));
}

#[test]
fn test_endpoint_overrides_merge_and_map_to_default_names() {
    let global: Config = toml::from_str(
        r#"
[backend.endpoints]
openai = "openai-chat-v2"
claude = "claude-legacy"
"#,
    )
    .unwrap();
    let project: Config = toml::from_str(
        r#"
[backend.endpoints]
claude = "claude-chat-eu"
deepseek = ""
"#,
    )
    .unwrap();

    let merged = Config::merge(global, project);
    assert_eq!(merged.backend.endpoints.len(), 3);

    let overrides = merged.endpoint_overrides().unwrap();
    assert_eq!(overrides.get("openai-chat").map(String::as_str), Some("openai-chat-v2"));
    assert_eq!(overrides.get("claude-chat").map(String::as_str), Some("claude-chat-eu"));
    // An empty name keeps the default endpoint.
    assert!(!overrides.contains_key("deepseek-chat"));
    assert!(Config::default().endpoint_overrides().unwrap().is_empty());
}

#[test]
fn test_unknown_endpoint_provider_is_rejected() {
    let config: Config = toml::from_str("[backend.endpoints]\nmistral = \"mistral-chat\"\n").unwrap();
    let err = config.endpoint_overrides().unwrap_err();
    assert!(err.to_string().contains("Unknown provider: mistral"));
}

#[test]
fn test_env_substitution() {
    std::env::set_var("CHATELIX_TEST_SUBST", "from-env");
    assert_eq!(Config::resolve_str("{env:CHATELIX_TEST_SUBST}"), "from-env");
    assert_eq!(
        Config::resolve_str("a-{env:CHATELIX_TEST_SUBST}-b"),
        "a-from-env-b"
    );
    assert_eq!(Config::resolve_str("{env:CHATELIX_TEST_UNSET_VAR}"), "");
    assert_eq!(Config::resolve_str("{env:unterminated"), "{env:unterminated");

    let mut config = Config {
        system_prompt: Some("{env:CHATELIX_TEST_SUBST}".into()),
        ..Config::default()
    };
    config.resolve_substitutions();
    assert_eq!(config.system_prompt.as_deref(), Some("from-env"));
}

#[test]
fn test_auth_token_precedence() {
    assert_eq!(
        Config::pick_auth_token(Some("env".into()), Some("cfg".into())),
        "env"
    );
    assert_eq!(Config::pick_auth_token(None, Some("cfg".into())), "cfg");
    // An unset {env:VAR} placeholder substitutes to an empty string.
    assert_eq!(
        Config::pick_auth_token(Some(String::new()), Some(String::new())),
        ANONYMOUS_TOKEN
    );
    assert_eq!(Config::pick_auth_token(None, None), ANONYMOUS_TOKEN);
}

#[test]
fn test_global_config_created_when_missing() {
    let dir = scratch_dir("global");
    let path = dir.join("nested").join("config.toml");
    let config = Config::load_global(&path).unwrap();
    assert!(path.exists());
    assert_eq!(config.model, DEFAULT_MODEL);
    assert!(config.fallback_enabled());
    assert_eq!(config.base_url(), DEFAULT_BACKEND_URL);

    // Second load reads the file it wrote.
    assert_eq!(Config::load_global(&path).unwrap(), config);
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_project_config_found_in_parent() {
    let root = scratch_dir("project");
    fs::create_dir_all(root.join(".git")).unwrap();
    fs::write(root.join(PROJECT_CONFIG_FILENAME), "model = \"google/gemini-pro\"\n").unwrap();
    let nested = root.join("a").join("b");
    fs::create_dir_all(&nested).unwrap();

    let found = Config::load_project(nested).unwrap().unwrap();
    assert_eq!(found.model, "google/gemini-pro");
    fs::remove_dir_all(&root).ok();
}

#[test]
fn test_project_search_stops_at_git_root() {
    let root = scratch_dir("gitstop");
    fs::write(root.join(PROJECT_CONFIG_FILENAME), "model = \"x/y\"\n").unwrap();
    let repo = root.join("repo");
    fs::create_dir_all(repo.join(".git")).unwrap();

    assert!(Config::load_project(repo).unwrap().is_none());
    fs::remove_dir_all(&root).ok();
}

#[test]
fn test_display_masks_auth_token() {
    let mut config = Config::default();
    config.backend.auth_token = Some("super-secret".into());
    let shown = config.to_display_toml().unwrap();
    assert!(!shown.contains("super-secret"));
    assert!(shown.contains("********"));
}
