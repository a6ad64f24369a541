//! Configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` + `config.<env>.toml`
//! + `APP_*` env vars (`__` separates nested keys). The resulting [`Config`] is
//! constructed once by the caller and handed down explicitly.
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> Result<Self> {
        let base = env::current_dir().map_err(|e| Error::InvalidConfig(format!("cannot resolve working directory: {e}")))?;
        Self::load_from(&base)
    }

    /// Load with config files resolved against `base`. `RUST_ENV` picks the
    /// overlay file and defaults to `dev`.
    pub fn load_from(base: &Path) -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_for_env(base, &env_name)
    }

    pub fn load_for_env(base: &Path, env_name: &str) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(resolve_with_base(base, "config.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(resolve_with_base(base, "config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(resolve_with_base(base, "config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(resolve_with_base(base, "config.test.toml"))),
            other => return Err(Error::InvalidConfig(format!("unknown environment '{other}'"))),
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.app()?.validate()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("Failed to get '{key}': {e}")))
    }

    /// Like [`Config::get`], but a key that is not configured at all is `None`.
    pub fn get_opt<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        if !self.figment.contains(key) { return Ok(None); }
        self.get(key).map(Some)
    }

    pub fn app(&self) -> Result<AppConfig> {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(self.figment.clone())
            .extract()
            .map_err(Error::from)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub app_name: String,
    pub data: DataConfig,
    pub llm: LlmConfig,
    pub retrieval: RetrievalConfig,
    pub starters: Vec<Starter>,
}

/// Project-relative data directories. `documents_dir` and `images_dir` also
/// act as the markers used to recognise paths coming back from the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub documents_dir: String,
    pub images_dir: String,
    pub index_dir: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub max_tokens: u32,
    pub streaming: bool,
    pub embed_model: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub similarity_top_k: usize,
    pub response_mode: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Starter {
    pub label: String,
    pub message: String,
    pub icon: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "Document Chat Multi Step Agent".to_string(),
            data: DataConfig::default(),
            llm: LlmConfig::default(),
            retrieval: RetrievalConfig::default(),
            starters: default_starters(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            documents_dir: "data/documents".to_string(),
            images_dir: "data/images".to_string(),
            index_dir: "data/indices".to_string(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self { max_tokens: 2048, streaming: true, embed_model: "text-embedding-3-small".to_string() }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { similarity_top_k: 5, response_mode: "compact".to_string() }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.data.documents_dir.trim_matches('/').is_empty() {
            return Err(Error::InvalidConfig("data.documents_dir must not be empty".into()));
        }
        if self.data.images_dir.trim_matches('/').is_empty() {
            return Err(Error::InvalidConfig("data.images_dir must not be empty".into()));
        }
        if self.retrieval.similarity_top_k == 0 {
            return Err(Error::InvalidConfig("retrieval.similarity_top_k must be at least 1".into()));
        }
        if self.llm.max_tokens == 0 {
            return Err(Error::InvalidConfig("llm.max_tokens must be at least 1".into()));
        }
        Ok(())
    }
}

impl DataConfig {
    /// Display prefix of document paths, e.g. `./data/documents/`.
    pub fn documents_prefix(&self) -> String { format!("./{}/", self.documents_dir.trim_matches('/')) }

    pub fn images_prefix(&self) -> String { format!("./{}/", self.images_dir.trim_matches('/')) }

    pub fn index_path(&self, base: &Path) -> PathBuf { resolve_with_base(base, &self.index_dir) }
}

fn default_starters() -> Vec<Starter> {
    let starter = |label: &str, message: &str, icon: &str| Starter {
        label: label.to_string(),
        message: message.to_string(),
        icon: icon.to_string(),
    };
    vec![
        starter(
            "Instrument Setup Checklist",
            "What should I check before running a new sample batch on the instrument?",
            "/public/images/setup.jpg",
        ),
        starter(
            "Calibration Formulas",
            "Can you share some formulas or calculations for calibration procedures?",
            "/public/images/calibration.jpg",
        ),
        starter(
            "Troubleshooting Error Codes",
            "What does a pressure fault error usually mean and how do I clear it?",
            "/public/images/troubleshooting.jpg",
        ),
        starter(
            "Maintenance Schedule",
            "How often should routine maintenance be scheduled for the chromatography systems?",
            "/public/images/maintenance.jpg",
        ),
    ]
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
