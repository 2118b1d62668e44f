//! Server configuration parsed from environment variables.
//!
//! LLM settings live in [`crate::llm::config`]; this covers the listener and
//! the per-request token budget.

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_AI_MAX_TOKENS: u32 = 4096;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub max_tokens: u32,
}

impl ServerConfig {
    /// Read `PORT` (default 3000) and `AI_MAX_TOKENS` (default 4096).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a set variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] with an injectable variable source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a set variable does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            port: parse_or("PORT", lookup("PORT"), DEFAULT_PORT)?,
            max_tokens: parse_or("AI_MAX_TOKENS", lookup("AI_MAX_TOKENS"), DEFAULT_AI_MAX_TOKENS)?,
        })
    }
}

fn parse_or<T: std::str::FromStr>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid { var, value: value.to_string() }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
