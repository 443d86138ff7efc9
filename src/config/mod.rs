use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::agent::TurnSettings;
use crate::agent::prompt::DEFAULT_SYSTEM_PROMPT;

pub const PROJECT_DIR: &str = ".seo-agent";
pub const DEFAULT_BASE_URL: &str = "https://router.huggingface.co/v1";
pub const DEFAULT_MODEL: &str = "deepseek-ai/DeepSeek-R1-0528:novita";
pub const DEFAULT_MAX_TOKENS: u32 = 512;
pub const DEFAULT_TEMPERATURE: f64 = 0.3;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error(
        "API token not found: set TOKEN in .seo-agent/secrets.toml, the environment or .env, or pass --api-key"
    )]
    MissingApiKey,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub system_prompt: String,
    pub native_tools: bool,
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LlmConfig {
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 5_000,
            request_timeout_ms: 120_000,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    pub system_prompt: Option<String>,
    pub native_tools: Option<bool>,
    pub llm: Option<PartialLlmConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PartialLlmConfig {
    pub connect_timeout_ms: Option<u64>,
    pub request_timeout_ms: Option<u64>,
}

/// Secret store kept next to the project, mirroring a `secrets.toml` with a `TOKEN` entry.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Secrets {
    #[serde(rename = "TOKEN")]
    pub token: Option<String>,
}

/// Values read from the process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("TOKEN").ok(),
            base_url: std::env::var("SEO_AGENT_BASE_URL").ok(),
            model: std::env::var("SEO_AGENT_MODEL").ok(),
        }
    }
}

/// Everything `AppConfig::resolve` layers together.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    pub env: EnvOverrides,
    pub secrets: Secrets,
    pub project: FileConfig,
    pub global: FileConfig,
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    pub fn from_cli(cli: &crate::Cli) -> Result<Self> {
        let project_root = std::env::current_dir().context("resolve current dir")?;
        let sources = ConfigSources {
            env: EnvOverrides::from_env(),
            secrets: secrets_or_default(&project_root),
            project: load_project_config(&project_root).unwrap_or_default(),
            global: load_file_config().unwrap_or_default(),
        };
        Ok(Self::resolve(cli, sources)?)
    }

    /// Precedence: CLI > secrets (token only) > env > project file > global file > defaults.
    pub fn resolve(cli: &crate::Cli, sources: ConfigSources) -> Result<Self, ConfigError> {
        let ConfigSources {
            env,
            secrets,
            project,
            global,
        } = sources;

        let api_key = non_empty(cli.api_key.clone())
            .or(non_empty(secrets.token))
            .or(non_empty(env.api_key))
            .or(non_empty(project.api_key))
            .or(non_empty(global.api_key))
            .ok_or(ConfigError::MissingApiKey)?;

        let base_url = non_empty(cli.base_url.clone())
            .or(non_empty(env.base_url))
            .or(project.base_url)
            .or(global.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let model = non_empty(cli.model.clone())
            .or(non_empty(env.model))
            .or(project.model)
            .or(global.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let max_tokens = cli
            .max_tokens
            .or(project.max_tokens)
            .or(global.max_tokens)
            .unwrap_or(DEFAULT_MAX_TOKENS);
        let temperature = cli
            .temperature
            .or(project.temperature)
            .or(global.temperature)
            .unwrap_or(DEFAULT_TEMPERATURE);
        let system_prompt = project
            .system_prompt
            .or(global.system_prompt)
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());
        let native_tools = cli.native_tools
            || project
                .native_tools
                .or(global.native_tools)
                .unwrap_or(false);

        let llm_defaults = LlmConfig::default();
        let project_llm = project.llm.unwrap_or_default();
        let global_llm = global.llm.unwrap_or_default();
        let llm = LlmConfig {
            connect_timeout_ms: project_llm
                .connect_timeout_ms
                .or(global_llm.connect_timeout_ms)
                .unwrap_or(llm_defaults.connect_timeout_ms),
            request_timeout_ms: project_llm
                .request_timeout_ms
                .or(global_llm.request_timeout_ms)
                .unwrap_or(llm_defaults.request_timeout_ms),
        };

        Ok(Self {
            base_url,
            model,
            api_key,
            max_tokens,
            temperature,
            system_prompt,
            native_tools,
            llm,
        })
    }

    pub fn turn_settings(&self) -> TurnSettings {
        TurnSettings {
            system_prompt: self.system_prompt.clone(),
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            native_tools: self.native_tools,
        }
    }
}

fn read_toml<T: for<'de> Deserialize<'de> + Default>(path: &Path, what: &str) -> Result<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    let s = fs::read_to_string(path)
        .with_context(|| format!("read {what} file: {}", path.display()))?;
    match toml::from_str::<T>(&s) {
        Ok(cfg) => {
            info!(path=%path.display(), "loaded {what} file");
            Ok(cfg)
        }
        Err(e) => {
            warn!(path=%path.display(), error=%e.to_string(), "parse {what} failed");
            Ok(T::default())
        }
    }
}

pub fn load_file_config() -> Result<FileConfig> {
    use std::env;

    fn candidate_paths() -> Vec<PathBuf> {
        let mut v = Vec::new();
        if let Ok(p) = env::var("SEO_AGENT_CONFIG") {
            v.push(PathBuf::from(p));
        }
        if let Ok(xdg_home) = env::var("XDG_CONFIG_HOME") {
            v.push(Path::new(&xdg_home).join("seo-agent/config.toml"));
        } else if let Some(dir) = dirs::config_dir() {
            v.push(dir.join("seo-agent/config.toml"));
        }
        v
    }

    for p in candidate_paths() {
        if p.exists() {
            return read_toml(&p, "config");
        }
    }
    Ok(FileConfig::default())
}

/// Load project-specific configuration from .seo-agent/config.toml
pub fn load_project_config(project_root: &Path) -> Result<FileConfig> {
    read_toml(
        &project_root.join(PROJECT_DIR).join("config.toml"),
        "project config",
    )
}

/// Load the token store from .seo-agent/secrets.toml
pub fn load_secrets(project_root: &Path) -> Result<Secrets> {
    read_toml(&project_root.join(PROJECT_DIR).join("secrets.toml"), "secrets")
}

/// Unreadable secrets fall back to empty, but leave a trace: the token lookup
/// continues with the environment and the config files.
pub fn secrets_or_default(project_root: &Path) -> Secrets {
    load_secrets(project_root).unwrap_or_else(|e| {
        warn!(error=%format!("{e:#}"), "secrets unavailable, falling back to other token sources");
        Secrets::default()
    })
}

#[cfg(test)]
mod tests;
