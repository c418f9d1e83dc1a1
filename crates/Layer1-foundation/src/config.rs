//! Session configuration
//!
//! A `Config` is assembled once at startup (defaults -> optional settings
//! file -> environment -> CLI flags) and is immutable afterwards. Changing
//! the provider or model means building a new agent from a new `Config`.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Ignore patterns applied to every workspace listing when the user supplies
/// none of their own.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    "__pycache__",
    "*.pyc",
    ".git",
    ".venv",
    "venv",
    "node_modules",
    "target",
    ".env",
];

/// Local model servers EmberCode can talk to. Both expose the same
/// OpenAI-compatible chat endpoint; the kind only selects defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    LmStudio,
    Ollama,
}

impl ProviderKind {
    /// Default endpoint for this provider
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            ProviderKind::LmStudio => "http://localhost:1234",
            ProviderKind::Ollama => "http://localhost:11434",
        }
    }

    /// Default model name for this provider
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::LmStudio => "local-model",
            ProviderKind::Ollama => "codellama",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::LmStudio => "lmstudio",
            ProviderKind::Ollama => "ollama",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "lmstudio" => Ok(ProviderKind::LmStudio),
            "ollama" => Ok(ProviderKind::Ollama),
            other => Err(Error::Config(format!(
                "Invalid provider: {} (expected 'lmstudio' or 'ollama')",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main configuration for the EmberCode agent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Workspace root; all tool file operations are sandboxed to it
    pub workspace: PathBuf,

    /// Local model server kind
    pub provider: ProviderKind,

    /// Model server base URL
    pub endpoint: String,

    /// Model name as shown by the server
    pub model: String,

    /// Sampling temperature (0-2)
    pub temperature: f32,

    /// Maximum tokens to generate per completion
    pub max_tokens: u32,

    /// Completion request timeout in seconds
    pub timeout_secs: u64,

    /// Turn budget for a single task execution
    pub max_turns: usize,

    /// Restrict command execution to the allow-listed prefixes
    pub safe_mode: bool,

    /// Verbose console output
    pub verbose: bool,

    /// Workspace ignore patterns (gitignore-flavored, see Workspace docs)
    pub ignore_patterns: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workspace: PathBuf::from("."),
            provider: ProviderKind::LmStudio,
            endpoint: ProviderKind::LmStudio.default_endpoint().to_string(),
            model: ProviderKind::LmStudio.default_model().to_string(),
            temperature: 0.7,
            max_tokens: 4096,
            timeout_secs: 120,
            max_turns: 10,
            safe_mode: false,
            verbose: false,
            ignore_patterns: DEFAULT_IGNORE_PATTERNS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON settings file. Missing keys keep their
    /// defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content).map_err(|e| {
            Error::Config(format!("Invalid settings at {}: {}", path.display(), e))
        })?;
        Ok(config)
    }

    /// Overlay `EMBER_*` environment variables onto this configuration.
    /// Unparseable numeric values are skipped with a warning rather than
    /// aborting startup.
    pub fn apply_env(&mut self) {
        if let Ok(workspace) = std::env::var("EMBER_WORKSPACE") {
            self.workspace = PathBuf::from(workspace);
        }
        if let Ok(provider) = std::env::var("EMBER_PROVIDER") {
            match provider.parse() {
                Ok(kind) => self.provider = kind,
                Err(e) => tracing::warn!("Ignoring EMBER_PROVIDER: {}", e),
            }
        }
        if let Ok(endpoint) = std::env::var("EMBER_ENDPOINT") {
            self.endpoint = endpoint;
        }
        if let Ok(model) = std::env::var("EMBER_MODEL") {
            self.model = model;
        }
        if let Ok(temp) = std::env::var("EMBER_TEMPERATURE") {
            match temp.parse() {
                Ok(t) => self.temperature = t,
                Err(_) => tracing::warn!("Ignoring non-numeric EMBER_TEMPERATURE: {}", temp),
            }
        }
        if let Ok(tokens) = std::env::var("EMBER_MAX_TOKENS") {
            match tokens.parse() {
                Ok(t) => self.max_tokens = t,
                Err(_) => tracing::warn!("Ignoring non-numeric EMBER_MAX_TOKENS: {}", tokens),
            }
        }
    }

    /// Validate and normalize. Resolves the workspace to an absolute path.
    pub fn validate(&mut self) -> Result<()> {
        if !self.workspace.exists() {
            return Err(Error::Config(format!(
                "Workspace does not exist: {}",
                self.workspace.display()
            )));
        }
        self.workspace = self
            .workspace
            .canonicalize()
            .map_err(|e| Error::Config(format!("Cannot resolve workspace: {}", e)))?;

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Error::Config(format!(
                "Temperature must be between 0 and 2: {}",
                self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(Error::Config("max_tokens must be positive".to_string()));
        }
        if self.max_turns == 0 {
            return Err(Error::Config("max_turns must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.provider, ProviderKind::LmStudio);
        assert_eq!(config.endpoint, "http://localhost:1234");
        assert_eq!(config.max_turns, 10);
        assert!(!config.safe_mode);
        assert!(config.ignore_patterns.iter().any(|p| p == ".git"));
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!(
            "ollama".parse::<ProviderKind>().unwrap(),
            ProviderKind::Ollama
        );
        assert_eq!(
            "LMStudio".parse::<ProviderKind>().unwrap(),
            ProviderKind::LmStudio
        );
        assert!("openai".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempdir().unwrap();
        let settings = dir.path().join("settings.json");
        fs::write(
            &settings,
            r#"{"model": "qwen2.5-coder", "temperature": 0.2, "safe_mode": true}"#,
        )
        .unwrap();

        let config = Config::from_file(&settings).unwrap();
        assert_eq!(config.model, "qwen2.5-coder");
        assert_eq!(config.temperature, 0.2);
        assert!(config.safe_mode);
        // Untouched keys keep their defaults
        assert_eq!(config.max_turns, 10);
    }

    #[test]
    fn test_from_file_invalid() {
        let dir = tempdir().unwrap();
        let settings = dir.path().join("settings.json");
        fs::write(&settings, "{not json").unwrap();
        assert!(Config::from_file(&settings).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let dir = tempdir().unwrap();

        let mut config = Config {
            workspace: dir.path().to_path_buf(),
            temperature: 3.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let mut config = Config {
            workspace: dir.path().join("missing"),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let mut config = Config {
            workspace: dir.path().to_path_buf(),
            max_tokens: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let mut config = Config {
            workspace: dir.path().to_path_buf(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert!(config.workspace.is_absolute());
    }
}
