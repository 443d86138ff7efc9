use crate::Cli;
use crate::config::{
    AppConfig, ConfigError, ConfigSources, DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
    EnvOverrides, FileConfig, LlmConfig, Secrets, load_project_config, load_secrets,
    secrets_or_default,
};
use clap::Parser;
use std::fs;
use tempfile::TempDir;

fn cli(args: &[&str]) -> Cli {
    Cli::parse_from(std::iter::once("seo-agent").chain(args.iter().copied()))
}

fn with_key(key: &str) -> ConfigSources {
    ConfigSources {
        env: EnvOverrides {
            api_key: Some(key.to_string()),
            ..EnvOverrides::default()
        },
        ..ConfigSources::default()
    }
}

#[test]
fn test_load_project_config() {
    let temp_dir = TempDir::new().unwrap();
    let project_root = temp_dir.path();

    let dir = project_root.join(".seo-agent");
    fs::create_dir_all(&dir).unwrap();

    let config_content = r#"
model = "meta-llama/Llama-3.1-8B-Instruct"
max_tokens = 256
native_tools = true

[llm]
request_timeout_ms = 30000
"#;

    fs::write(dir.join("config.toml"), config_content).unwrap();

    let project_cfg = load_project_config(project_root).unwrap();

    assert_eq!(
        project_cfg.model,
        Some("meta-llama/Llama-3.1-8B-Instruct".to_string())
    );
    assert_eq!(project_cfg.max_tokens, Some(256));
    assert_eq!(project_cfg.native_tools, Some(true));

    let llm_cfg = project_cfg.llm.unwrap();
    assert_eq!(llm_cfg.request_timeout_ms, Some(30000));
    assert_eq!(llm_cfg.connect_timeout_ms, None);
}

#[test]
fn test_load_project_config_not_exists() {
    let temp_dir = TempDir::new().unwrap();
    let project_cfg = load_project_config(temp_dir.path()).unwrap();
    assert_eq!(project_cfg, FileConfig::default());
}

#[test]
fn test_load_project_config_invalid_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join(".seo-agent");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.toml"), "model = [not toml").unwrap();

    let project_cfg = load_project_config(temp_dir.path()).unwrap();
    assert_eq!(project_cfg, FileConfig::default());
}

#[test]
fn test_load_secrets() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join(".seo-agent");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("secrets.toml"), "TOKEN = \"hf_secret\"\nOTHER = 1\n").unwrap();

    let secrets = load_secrets(temp_dir.path()).unwrap();
    assert_eq!(secrets.token.as_deref(), Some("hf_secret"));
}

#[test]
fn test_unreadable_secrets_fall_back_to_empty() {
    let temp_dir = TempDir::new().unwrap();
    // A directory where the file should be cannot be read as text.
    fs::create_dir_all(temp_dir.path().join(".seo-agent/secrets.toml")).unwrap();

    assert!(load_secrets(temp_dir.path()).is_err());
    assert_eq!(secrets_or_default(temp_dir.path()), Secrets::default());

    let mut sources = with_key("from-env");
    sources.secrets = secrets_or_default(temp_dir.path());
    let cfg = AppConfig::resolve(&cli(&[]), sources).unwrap();
    assert_eq!(cfg.api_key, "from-env");
}

#[test]
fn test_missing_api_key_is_fatal() {
    let err = AppConfig::resolve(&cli(&[]), ConfigSources::default()).unwrap_err();
    assert_eq!(err, ConfigError::MissingApiKey);

    // Blank values do not count.
    let err = AppConfig::resolve(&cli(&["--api-key", " "]), with_key("")).unwrap_err();
    assert_eq!(err, ConfigError::MissingApiKey);
}

#[test]
fn test_api_key_precedence() {
    let sources = ConfigSources {
        env: EnvOverrides {
            api_key: Some("from-env".into()),
            ..EnvOverrides::default()
        },
        secrets: Secrets {
            token: Some("from-secrets".into()),
        },
        project: FileConfig {
            api_key: Some("from-project".into()),
            ..FileConfig::default()
        },
        global: FileConfig {
            api_key: Some("from-global".into()),
            ..FileConfig::default()
        },
    };

    let cfg = AppConfig::resolve(&cli(&["--api-key", "from-cli"]), sources.clone()).unwrap();
    assert_eq!(cfg.api_key, "from-cli");

    let cfg = AppConfig::resolve(&cli(&[]), sources.clone()).unwrap();
    assert_eq!(cfg.api_key, "from-secrets");

    let mut no_secrets = sources.clone();
    no_secrets.secrets = Secrets::default();
    let cfg = AppConfig::resolve(&cli(&[]), no_secrets.clone()).unwrap();
    assert_eq!(cfg.api_key, "from-env");

    no_secrets.env = EnvOverrides::default();
    let cfg = AppConfig::resolve(&cli(&[]), no_secrets).unwrap();
    assert_eq!(cfg.api_key, "from-project");
}

#[test]
fn test_defaults() {
    let cfg = AppConfig::resolve(&cli(&[]), with_key("k")).unwrap();
    assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    assert_eq!(cfg.model, DEFAULT_MODEL);
    assert_eq!(cfg.max_tokens, DEFAULT_MAX_TOKENS);
    assert_eq!(cfg.temperature, 0.3);
    assert!(!cfg.native_tools);
    assert_eq!(cfg.llm, LlmConfig::default());
    assert!(cfg.system_prompt.contains("TOOL_CALL: <tool_name>"));
}

#[test]
fn test_layering_cli_over_project_over_global() {
    let mut sources = with_key("k");
    sources.project = FileConfig {
        model: Some("project-model".into()),
        temperature: Some(0.7),
        llm: Some(crate::config::PartialLlmConfig {
            connect_timeout_ms: Some(1_000),
            request_timeout_ms: None,
        }),
        ..FileConfig::default()
    };
    sources.global = FileConfig {
        model: Some("global-model".into()),
        base_url: Some("http://localhost:8080/v1".into()),
        max_tokens: Some(1024),
        llm: Some(crate::config::PartialLlmConfig {
            connect_timeout_ms: Some(9_000),
            request_timeout_ms: Some(10_000),
        }),
        ..FileConfig::default()
    };

    let cfg = AppConfig::resolve(&cli(&[]), sources.clone()).unwrap();
    assert_eq!(cfg.model, "project-model");
    assert_eq!(cfg.base_url, "http://localhost:8080/v1");
    assert_eq!(cfg.max_tokens, 1024);
    assert_eq!(cfg.temperature, 0.7);
    assert_eq!(cfg.llm.connect_timeout_ms, 1_000);
    assert_eq!(cfg.llm.request_timeout_ms, 10_000);

    let cfg = AppConfig::resolve(
        &cli(&["--model", "cli-model", "--max-tokens", "64", "--native-tools"]),
        sources,
    )
    .unwrap();
    assert_eq!(cfg.model, "cli-model");
    assert_eq!(cfg.max_tokens, 64);
    assert!(cfg.native_tools);

    let settings = cfg.turn_settings();
    assert_eq!(settings.model, "cli-model");
    assert!(settings.native_tools);
}
