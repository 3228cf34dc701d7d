use std::sync::{Mutex, MutexGuard, OnceLock};
use tempfile::TempDir;

use super::environment::{env_parse, env_string};
use super::{
    Config, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_OPENROUTER_BASE_URL, DEFAULT_TOP_K,
    EmbedderKind, LlmProvider,
};
use crate::retrieval::SplitterKind;

const WEAVE_VARS: &[&str] = &[
    "OPENAI_API_KEY",
    "OPENROUTER_API_KEY",
    "WEAVE_PROVIDER",
    "WEAVE_LLM_BASE_URL",
    "WEAVE_TIMEOUT_SECS",
    "WEAVE_MAX_TOKENS",
    "WEAVE_CONTEXT_TOKENS",
    "WEAVE_GENERATION_MODEL",
    "WEAVE_EMBEDDING_MODEL",
    "WEAVE_ORGANIZATION",
    "WEAVE_CHUNK_SIZE",
    "WEAVE_CHUNK_OVERLAP",
    "WEAVE_TOP_K",
    "WEAVE_SPLITTER",
    "WEAVE_EMBEDDER",
];

fn env_lock<'a>() -> MutexGuard<'a, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct EnvGuard {
    saved: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    /// Clears every weave variable, then applies `vars`.
    fn new(home: &str, vars: &[(&str, &str)]) -> Self {
        let mut keys: Vec<&str> = WEAVE_VARS.to_vec();
        keys.push("HOME");
        keys.extend(vars.iter().map(|(key, _)| *key));

        let saved = keys
            .iter()
            .map(|key| (key.to_string(), std::env::var(key).ok()))
            .collect::<Vec<_>>();

        for key in WEAVE_VARS {
            unsafe { std::env::remove_var(key) };
        }
        unsafe { std::env::set_var("HOME", home) };
        for (key, value) in vars {
            unsafe { std::env::set_var(key, value) };
        }

        Self { saved }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in self.saved.iter().rev() {
            match value {
                Some(val) => unsafe { std::env::set_var(key, val) },
                None => unsafe { std::env::remove_var(key) },
            }
        }
    }
}

fn write_config_file(home: &TempDir, contents: &str) {
    let config_dir = home.path().join(".weave");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config"), contents).unwrap();
}

#[test]
fn load_from_env_only() {
    let _lock = env_lock();
    let temp_home = TempDir::new().unwrap();
    let home = temp_home.path().to_str().unwrap().to_string();

    let _env = EnvGuard::new(
        &home,
        &[
            ("OPENAI_API_KEY", "env-key"),
            ("WEAVE_TIMEOUT_SECS", "45"),
            ("WEAVE_MAX_TOKENS", "2048"),
            ("WEAVE_GENERATION_MODEL", "env-model"),
            ("WEAVE_ORGANIZATION", "Acme"),
            ("WEAVE_TOP_K", "5"),
        ],
    );

    let config = Config::load().unwrap();
    assert_eq!(config.llm.provider, LlmProvider::OpenAI);
    assert_eq!(config.llm.api_key, "env-key");
    assert_eq!(config.llm.timeout_secs, 45);
    assert_eq!(config.models.max_tokens, 2048);
    assert_eq!(config.models.generation, "env-model");
    assert_eq!(config.workflow.organization, "Acme");
    assert_eq!(config.retrieval.top_k, 5);
    assert_eq!(config.retrieval.chunk_size, DEFAULT_CHUNK_SIZE);
    assert_eq!(config.retrieval.chunk_overlap, DEFAULT_CHUNK_OVERLAP);
}

#[test]
fn load_prefers_env_over_file() {
    let _lock = env_lock();
    let temp_home = TempDir::new().unwrap();
    let home = temp_home.path().to_str().unwrap().to_string();
    write_config_file(
        &temp_home,
        r#"{
            "llm": { "api_key": "file-key", "timeout_secs": 20 },
            "models": { "generation": "file-model", "max_tokens": 1024 },
            "retrieval": { "chunk_size": 300, "chunk_overlap": 30, "splitter": "character" },
            "workflow": { "organization": "FileCo" }
        }"#,
    );

    let _env = EnvGuard::new(
        &home,
        &[
            ("OPENAI_API_KEY", "env-key"),
            ("WEAVE_TIMEOUT_SECS", "40"),
            ("WEAVE_GENERATION_MODEL", "env-model"),
        ],
    );

    let config = Config::load().unwrap();
    assert_eq!(config.llm.api_key, "env-key");
    assert_eq!(config.llm.timeout_secs, 40);
    assert_eq!(config.models.generation, "env-model");
    assert_eq!(config.models.max_tokens, 1024);
    assert_eq!(config.retrieval.chunk_size, 300);
    assert_eq!(config.retrieval.chunk_overlap, 30);
    assert_eq!(config.retrieval.splitter, SplitterKind::Character);
    assert_eq!(config.workflow.organization, "FileCo");
}

#[test]
fn load_errors_without_api_key() {
    let _lock = env_lock();
    let temp_home = TempDir::new().unwrap();
    let home = temp_home.path().to_str().unwrap().to_string();

    let _env = EnvGuard::new(&home, &[]);

    let err = Config::load().unwrap_err();
    assert!(err.to_string().contains("OpenAI API key not found"));

    let unvalidated = Config::load_unvalidated().unwrap();
    assert!(unvalidated.llm.api_key.is_empty());
    assert_eq!(unvalidated.retrieval.top_k, DEFAULT_TOP_K);
}

#[test]
fn load_supports_openrouter_provider() {
    let _lock = env_lock();
    let temp_home = TempDir::new().unwrap();
    let home = temp_home.path().to_str().unwrap().to_string();

    let _env = EnvGuard::new(
        &home,
        &[
            ("WEAVE_PROVIDER", "openrouter"),
            ("OPENROUTER_API_KEY", "or-key"),
            ("OPENAI_API_KEY", "ignored"),
        ],
    );

    let config = Config::load().unwrap();
    assert_eq!(config.llm.provider, LlmProvider::OpenRouter);
    assert_eq!(config.llm.api_key, "or-key");
    assert_eq!(config.llm.base_url, DEFAULT_OPENROUTER_BASE_URL);
}

#[test]
fn load_rejects_overlap_not_smaller_than_chunk_size() {
    let _lock = env_lock();
    let temp_home = TempDir::new().unwrap();
    let home = temp_home.path().to_str().unwrap().to_string();

    let _env = EnvGuard::new(
        &home,
        &[
            ("OPENAI_API_KEY", "env-key"),
            ("WEAVE_CHUNK_SIZE", "100"),
            ("WEAVE_CHUNK_OVERLAP", "100"),
        ],
    );

    let err = Config::load().unwrap_err();
    assert!(err.to_string().contains("overlap"));
}

#[test]
fn load_rejects_zero_top_k() {
    let _lock = env_lock();
    let temp_home = TempDir::new().unwrap();
    let home = temp_home.path().to_str().unwrap().to_string();

    let _env = EnvGuard::new(&home, &[("OPENAI_API_KEY", "env-key"), ("WEAVE_TOP_K", "0")]);

    let err = Config::load().unwrap_err();
    assert!(err.to_string().contains("top_k"));
}

#[test]
fn load_rejects_unknown_embedder_in_file() {
    let _lock = env_lock();
    let temp_home = TempDir::new().unwrap();
    let home = temp_home.path().to_str().unwrap().to_string();
    write_config_file(&temp_home, r#"{ "retrieval": { "embedder": "magic" } }"#);

    let _env = EnvGuard::new(&home, &[("OPENAI_API_KEY", "env-key")]);

    let err = Config::load().unwrap_err();
    assert!(format!("{err:#}").contains("Unknown embedder 'magic'"));
}

#[test]
fn save_persists_nested_structure() {
    let _lock = env_lock();
    let temp_home = TempDir::new().unwrap();
    let home = temp_home.path().to_str().unwrap().to_string();

    let _env = EnvGuard::new(&home, &[]);

    let mut config = Config::builder().build().unwrap();
    config.llm.api_key = "test-key".to_string();
    config.llm.timeout_secs = 55;
    config.models.generation = "custom/model".to_string();
    config.retrieval.embedder = EmbedderKind::Hashing;
    config.retrieval.splitter = SplitterKind::Character;
    config.workflow.organization = "Acme".to_string();
    config.save().unwrap();

    let persisted = std::fs::read_to_string(Config::config_path().unwrap()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&persisted).unwrap();
    assert_eq!(json["llm"]["api_key"], "test-key");
    assert_eq!(json["llm"]["provider"], "openai");
    assert_eq!(json["llm"]["timeout_secs"], 55);
    assert_eq!(json["models"]["generation"], "custom/model");
    assert_eq!(json["retrieval"]["embedder"], "hashing");
    assert_eq!(json["retrieval"]["splitter"], "character");
    assert_eq!(json["workflow"]["organization"], "Acme");

    let reloaded = Config::load().unwrap();
    assert_eq!(reloaded.retrieval.embedder, EmbedderKind::Hashing);
    assert_eq!(reloaded.retrieval.splitter, SplitterKind::Character);
    assert_eq!(reloaded.workflow.organization, "Acme");
}

#[test]
fn env_helpers_parse_values() {
    let _lock = env_lock();
    let temp_home = TempDir::new().unwrap();
    let home = temp_home.path().to_str().unwrap().to_string();
    let _env = EnvGuard::new(
        &home,
        &[("WEAVE_TEST_STRING", "value"), ("WEAVE_TEST_NUMBER", " 123 ")],
    );

    assert_eq!(
        env_string("WEAVE_TEST_STRING").unwrap(),
        Some("value".to_string())
    );
    assert_eq!(env_string("WEAVE_TEST_MISSING").unwrap(), None);
    assert_eq!(env_parse::<u64>("WEAVE_TEST_NUMBER").unwrap(), Some(123));
    assert!(env_parse::<u32>("WEAVE_TEST_STRING").is_err());
}
