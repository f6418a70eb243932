// src/config/mod.rs
// All tunables come from the environment (.env supported); nothing is hardcoded
// past the defaults below.

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
pub struct TriageConfig {
    // ── Completion endpoint
    pub openai_base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: usize,
    pub openai_timeout: u64,

    // ── Database
    pub database_url: String,
    pub sqlite_max_connections: u32,

    // ── Server
    pub host: String,
    pub port: u16,
    pub cors_origin: String,

    // ── Logging
    pub log_level: String,
}

// Handles values with trailing comments and stray whitespace, which show up
// constantly in hand-edited .env files.
fn env_var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(val) => {
            let clean_val = val.split('#').next().unwrap_or("").trim();
            match clean_val.parse::<T>() {
                Ok(parsed) => parsed,
                Err(_) => {
                    eprintln!("Config: {} = '{}' (parse failed, using default)", key, val);
                    default
                }
            }
        }
        Err(_) => default,
    }
}

impl TriageConfig {
    pub fn from_env() -> Self {
        if dotenvy::dotenv().is_err() {
            eprintln!("Warning: .env file not found. Using environment variables and defaults.");
        }

        Self {
            openai_base_url: env_var_or("OPENAI_BASE_URL", "https://api.openai.com/v1".to_string()),
            model: env_var_or("TRIAGE_MODEL", "gpt-4o-mini".to_string()),
            temperature: env_var_or("TRIAGE_TEMPERATURE", 0.2),
            max_output_tokens: env_var_or("TRIAGE_MAX_OUTPUT_TOKENS", 1024),
            openai_timeout: env_var_or("TRIAGE_OPENAI_TIMEOUT", 60),
            database_url: env_var_or("DATABASE_URL", "sqlite:./triage.db".to_string()),
            sqlite_max_connections: env_var_or("SQLITE_MAX_CONNECTIONS", 5),
            host: env_var_or("TRIAGE_HOST", "0.0.0.0".to_string()),
            port: env_var_or("TRIAGE_PORT", 3001),
            cors_origin: env_var_or("TRIAGE_CORS_ORIGIN", "http://localhost:3000".to_string()),
            log_level: env_var_or("TRIAGE_LOG_LEVEL", "info".to_string()),
        }
    }

    /// Full completion-endpoint URL for a given path, e.g. `chat/completions`.
    pub fn api_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.openai_base_url.trim_end_matches('/'), endpoint)
    }

    /// Server bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn openai_timeout_ms(&self) -> u64 {
        self.openai_timeout * 1000
    }
}

// Global config instance - loaded once at startup
pub static CONFIG: Lazy<TriageConfig> = Lazy::new(TriageConfig::from_env);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = TriageConfig::from_env();

        assert_eq!(config.model, "gpt-4o-mini");
        assert!(config.sqlite_max_connections > 0);
        assert!(config.max_output_tokens > 0);
    }

    #[test]
    fn test_convenience_methods() {
        let config = TriageConfig::from_env();

        assert!(config.api_url("chat/completions").ends_with("/chat/completions"));
        assert_eq!(config.openai_timeout_ms(), config.openai_timeout * 1000);
    }
}
