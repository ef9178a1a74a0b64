//! Coverage for config parsing, overrides and path resolution.

use std::path::Path;

use smartsense::config::{
    config_path_with, load_or_default, Config, ModelsConfig, QueryConfig, RuntimePaths,
    CONFIG_PATH_ENV, DEFAULT_FALLBACK_MODELS, MODELS_ENV, TIMEOUT_ENV,
};
use smartsense::providers::openrouter::OPENROUTER_API_URL;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let owned: Vec<(String, String)> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key: &str| {
        owned
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }
}

#[test]
fn defaults_cover_every_field() {
    let config = Config::default();
    assert_eq!(config.models.base_url, OPENROUTER_API_URL);
    assert_eq!(config.models.fallback, DEFAULT_FALLBACK_MODELS.to_vec());
    assert_eq!(config.models.api_key_env, "OPENROUTER_API_KEY");
    assert_eq!(config.models.title, "SmartSense Inbox");
    assert_eq!(config.models.referer, None);

    let query = QueryConfig::default();
    assert_eq!(query.timeout_secs, 30);
    assert_eq!(query.context_messages, 20);
    assert_eq!(query.body_preview_chars, 150);
    assert_eq!(query.max_sources, 5);
    assert_eq!(query.recent_window_days, 7);
}

#[test]
fn partial_toml_keeps_remaining_defaults() {
    let config = Config::from_toml(
        r#"
[models]
fallback = ["a/one", "b/two"]
referer = "https://inbox.example"

[query]
timeout_secs = 10
"#,
    )
    .expect("partial config should parse");

    assert_eq!(config.models.fallback, vec!["a/one", "b/two"]);
    assert_eq!(config.models.referer.as_deref(), Some("https://inbox.example"));
    assert_eq!(config.models.api_key_env, ModelsConfig::default().api_key_env);
    assert_eq!(config.query.timeout_secs, 10);
    assert_eq!(config.query.context_messages, 20);
}

#[test]
fn empty_toml_is_default() {
    let config = Config::from_toml("").expect("empty config should parse");
    assert_eq!(config.models.fallback.len(), DEFAULT_FALLBACK_MODELS.len());
}

#[test]
fn malformed_toml_is_rejected() {
    assert!(Config::from_toml("[query\ntimeout_secs = ").is_err());
    assert!(Config::from_toml("[query]\ntimeout_secs = \"soon\"").is_err());
}

#[test]
fn env_overrides_replace_tiers_and_timeout() {
    let mut config = Config::default();
    config.apply_overrides(env_from(&[(MODELS_ENV, " x/one, y/two ,,"), (TIMEOUT_ENV, "15")]));
    assert_eq!(config.models.fallback, vec!["x/one", "y/two"]);
    assert_eq!(config.query.timeout_secs, 15);
}

#[test]
fn invalid_env_overrides_are_ignored() {
    let mut config = Config::default();
    config.apply_overrides(env_from(&[(MODELS_ENV, " , "), (TIMEOUT_ENV, "0")]));
    assert_eq!(config.models.fallback.len(), DEFAULT_FALLBACK_MODELS.len());
    assert_eq!(config.query.timeout_secs, 30);

    config.apply_overrides(env_from(&[(TIMEOUT_ENV, "soon")]));
    assert_eq!(config.query.timeout_secs, 30);
}

#[test]
fn missing_file_loads_defaults() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let config = load_or_default(&tmp.path().join("absent.toml")).expect("defaults");
    assert_eq!(config.query.max_sources, 5);
}

#[test]
fn file_is_loaded_when_present() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let path = tmp.path().join("config.toml");
    std::fs::write(&path, "[query]\nmax_sources = 3\n").expect("write config");

    let config = load_or_default(&path).expect("config should load");
    assert_eq!(config.query.max_sources, 3);

    let explicit = Config::load(Some(path.as_path())).expect("explicit path should load");
    assert_eq!(explicit.query.max_sources, 3);
}

#[test]
fn broken_file_is_an_error() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let path = tmp.path().join("config.toml");
    std::fs::write(&path, "models = 12").expect("write config");
    assert!(load_or_default(&path).is_err());
}

#[test]
fn config_path_prefers_env_var() {
    let path = config_path_with(env_from(&[(CONFIG_PATH_ENV, "/tmp/smartsense.toml")]))
        .expect("path should resolve");
    assert_eq!(path, Path::new("/tmp/smartsense.toml"));

    let fallback = config_path_with(env_from(&[])).expect("path should resolve");
    assert!(fallback.ends_with(".smartsense/config.toml"));
}

#[test]
fn runtime_paths_layout() {
    let paths = RuntimePaths::under(Path::new("/srv/smartsense"));
    assert_eq!(paths.config_file, Path::new("/srv/smartsense/config.toml"));
    assert_eq!(paths.env_file, Path::new("/srv/smartsense/.env"));
    assert_eq!(paths.logs_dir, Path::new("/srv/smartsense/logs"));
}
