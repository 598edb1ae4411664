//! Server Configuration
//!
//! Read from environment variables (after `.env` is loaded).

use std::str::FromStr;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown provider '{0}' (expected gemini, ollama or mock)")]
    UnknownProvider(String),
}

/// Which backend answers analysis requests
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    Ollama,
    Mock,
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(Self::Gemini),
            "ollama" => Ok(Self::Ollama),
            "mock" => Ok(Self::Mock),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gemini => write!(f, "gemini"),
            Self::Ollama => write!(f, "ollama"),
            Self::Mock => write!(f, "mock"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Listen address
    pub bind_addr: String,

    /// Directory holding the built WASM frontend
    pub static_dir: String,

    pub provider: ProviderKind,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (environment, test map)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let provider = match lookup("PULSE_PROVIDER") {
            Some(name) => name.parse()?,
            None => ProviderKind::Gemini,
        };

        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".into()),
            static_dir: lookup("STATIC_DIR").unwrap_or_else(|| "static".into()),
            provider,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.static_dir, "static");
        assert_eq!(config.provider, ProviderKind::Gemini);
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> =
            HashMap::from([("PULSE_PROVIDER", " Mock "), ("BIND_ADDR", "127.0.0.1:8080")]);
        let config =
            ServerConfig::from_lookup(|key| vars.get(key).map(ToString::to_string)).unwrap();

        assert_eq!(config.provider, ProviderKind::Mock);
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
    }

    #[test]
    fn test_unknown_provider() {
        let err = ServerConfig::from_lookup(|key| (key == "PULSE_PROVIDER").then(|| "openai".into()))
            .unwrap_err();
        assert_eq!(err, ConfigError::UnknownProvider("openai".into()));
    }
}
