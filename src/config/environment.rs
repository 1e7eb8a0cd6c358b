// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Reads listen address, catalog source, planner defaults and the intent collaborator from env vars
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Plateful Contributors

//! Environment-based configuration management

use crate::constants::{ports, variants};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, warn};
use url::Url;

/// Default catalog location, relative to the working directory
const DEFAULT_CATALOG_PATH: &str = "data/catalog.json";
/// Default OpenAI-compatible endpoint (Ollama)
const DEFAULT_LLM_BASE_URL: &str = "http://localhost:11434/v1";
/// Default intent model
const DEFAULT_LLM_MODEL: &str = "llama3:instruct";
/// Default intent call timeout
const DEFAULT_INTENT_TIMEOUT_SECS: u64 = 20;

/// Environment type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Test runs
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Where the meal catalog comes from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// JSON catalog file
    pub path: PathBuf,
    /// Offer only meals flagged shareable
    pub shared_only: bool,
}

/// Planner request defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Variants returned when a request does not say
    pub default_variants: usize,
    /// Attach the debug payload to every response
    pub debug: bool,
}

/// Natural-language intent collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentConfig {
    /// Consult the collaborator at all
    pub enabled: bool,
    /// OpenAI-compatible base URL
    pub base_url: String,
    /// Model id
    pub model: String,
    /// Optional bearer token
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Cross-origin settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins; `*` allows any
    pub allowed_origins: Vec<String>,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,
    /// HTTP port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Catalog source
    pub catalog: CatalogConfig,
    /// Planner defaults
    pub planner: PlannerConfig,
    /// Intent collaborator
    pub intent: IntentConfig,
    /// CORS
    pub cors: CorsConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an unparsable value
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        if let Err(e) = dotenvy::dotenv() {
            warn!("No .env file found or failed to load: {e}");
        }

        let default_variants: usize = parse_env("PLATEFUL_DEFAULT_VARIANTS", variants::DEFAULT_COUNT)?;

        let config = Self {
            host: env_var_or("HOST", "127.0.0.1"),
            http_port: parse_env("HTTP_PORT", ports::DEFAULT_HTTP_PORT)?,
            environment: Environment::from_str_or_default(&env_var_or("ENVIRONMENT", "development")),
            catalog: CatalogConfig {
                path: PathBuf::from(env_var_or("PLATEFUL_CATALOG_PATH", DEFAULT_CATALOG_PATH)),
                shared_only: parse_flag("PLATEFUL_SHARED_ONLY", true)?,
            },
            planner: PlannerConfig {
                default_variants: default_variants.clamp(variants::MIN_COUNT, variants::MAX_COUNT),
                debug: parse_flag("PLATEFUL_DEBUG", false)?,
            },
            intent: IntentConfig {
                enabled: parse_flag("PLATEFUL_INTENT_ENABLED", true)?,
                base_url: env_var_or("LOCAL_LLM_BASE_URL", DEFAULT_LLM_BASE_URL),
                model: env_var_or("LOCAL_LLM_MODEL", DEFAULT_LLM_MODEL),
                api_key: env::var("LOCAL_LLM_API_KEY")
                    .ok()
                    .filter(|key| !key.trim().is_empty()),
                timeout_secs: parse_env("PLATEFUL_INTENT_TIMEOUT_SECS", DEFAULT_INTENT_TIMEOUT_SECS)?,
            },
            cors: CorsConfig {
                allowed_origins: parse_origins(&env_var_or("CORS_ORIGINS", "*")),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns an error for a zero port, a malformed collaborator URL or a zero timeout
    pub fn validate(&self) -> Result<()> {
        if self.http_port == 0 {
            return Err(anyhow!("HTTP_PORT must be greater than zero"));
        }

        if self.intent.enabled {
            Url::parse(&self.intent.base_url)
                .map_err(|e| anyhow!("Invalid LOCAL_LLM_BASE_URL '{}': {e}", self.intent.base_url))?;
            if self.intent.timeout_secs == 0 {
                return Err(anyhow!("PLATEFUL_INTENT_TIMEOUT_SECS must be greater than zero"));
            }
        }

        if self.cors.allowed_origins.is_empty() {
            warn!("CORS_ORIGINS is empty; browsers will be refused");
        }

        Ok(())
    }

    /// Configuration summary for logging, without secrets
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Plateful Server Configuration:\n\
             - Listen: {}:{}\n\
             - Environment: {}\n\
             - Catalog: {} (shared only: {})\n\
             - Default Variants: {}\n\
             - Debug Payload: {}\n\
             - Intent: {}\n\
             - CORS Origins: {}",
            self.host,
            self.http_port,
            self.environment,
            self.catalog.path.display(),
            self.catalog.shared_only,
            self.planner.default_variants,
            if self.planner.debug { "Enabled" } else { "Disabled" },
            if self.intent.enabled {
                format!("{} @ {}", self.intent.model, self.intent.base_url)
            } else {
                "Disabled".to_owned()
            },
            self.cors.allowed_origins.join(", "),
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse an environment variable, falling back to `default` when unset
fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("Invalid {key} value '{raw}': {e}")),
        _ => Ok(default),
    }
}

/// Parse a boolean flag accepting `true/false`, `1/0`, `yes/no`, `on/off`
fn parse_flag(key: &str, default: bool) -> Result<bool> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => parse_bool(&raw)
            .ok_or_else(|| anyhow!("Invalid {key} value '{raw}': expected a boolean")),
        _ => Ok(default),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse comma-separated CORS origins
fn parse_origins(origins_str: &str) -> Vec<String> {
    if origins_str.trim() == "*" {
        vec!["*".to_owned()]
    } else {
        origins_str
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins() {
        assert_eq!(parse_origins("*"), vec!["*"]);
        assert_eq!(
            parse_origins("http://localhost:3000, https://app.example.com,"),
            vec!["http://localhost:3000", "https://app.example.com"]
        );
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" 0 "), Some(false));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(Environment::from_str_or_default("PROD"), Environment::Production);
        assert_eq!(Environment::from_str_or_default("test"), Environment::Testing);
        assert_eq!(Environment::from_str_or_default("other"), Environment::Development);
    }
}
