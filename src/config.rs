use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::quiz::DEFAULT_REWARD_PER_CORRECT;

/// Upper bound accepted for `quiz.reward_per_correct`
pub const MAX_REWARD_PER_CORRECT: u32 = 1_000;

/// Main configuration structure for the CodePath client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub backend: BackendConfig,
    #[serde(default)]
    pub user: UserConfig,
    #[serde(default)]
    pub quiz: QuizConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL the endpoint paths are resolved against
    pub base_url: String,
    /// Unset means requests wait indefinitely
    #[serde(default)]
    pub request_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub username: Option<String>,
    pub stream: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            username: None,
            stream: "General".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizConfig {
    pub reward_per_correct: u32,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            reward_per_correct: DEFAULT_REWARD_PER_CORRECT,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig {
                base_url: "http://127.0.0.1:5000".to_string(),
                request_timeout_seconds: None,
            },
            user: UserConfig::default(),
            quiz: QuizConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment variable overrides
    /// ALWAYS returns a valid config - never fails
    pub fn load() -> Self {
        let env_paths = ["../.env", ".env"];

        let mut env_loaded = false;
        for path in &env_paths {
            if dotenvy::from_path(path).is_ok() {
                tracing::info!("Loaded .env from: {}", path);
                env_loaded = true;
                break;
            }
        }

        if !env_loaded {
            tracing::debug!("No .env file found - continuing with env vars only");
        }

        let config_path =
            env::var("CODEPATH_CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

        let mut config = Self::from_file(&config_path);
        config.apply_env_overrides();

        if let Err(e) = config.validate() {
            tracing::warn!("Config validation warnings: {} - continuing anyway", e);
        }

        config
    }

    fn from_file(config_path: &str) -> Self {
        if !Path::new(config_path).exists() {
            tracing::debug!("Config file not found at {} - using defaults", config_path);
            return Self::default();
        }
        match fs::read_to_string(config_path) {
            Ok(contents) => match serde_yaml::from_str::<Config>(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded configuration from {}", config_path);
                    config
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to parse config file {}: {} - using defaults",
                        config_path,
                        e
                    );
                    Self::default()
                }
            },
            Err(e) => {
                tracing::error!(
                    "Failed to read config file {}: {} - using defaults",
                    config_path,
                    e
                );
                Self::default()
            }
        }
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("CODEPATH_BACKEND_URL") {
            self.backend.base_url = url;
        }
        if let Some(timeout) = lookup("CODEPATH_REQUEST_TIMEOUT_SECONDS") {
            if let Ok(secs) = timeout.parse() {
                self.backend.request_timeout_seconds = Some(secs);
            }
        }
        if let Some(username) = lookup("CODEPATH_USERNAME") {
            self.user.username = Some(username).filter(|u| !u.is_empty());
        }
        if let Some(stream) = lookup("CODEPATH_STREAM") {
            self.user.stream = stream;
        }
        if let Some(reward) = lookup("CODEPATH_QUIZ_REWARD") {
            match reward.parse::<u32>() {
                Ok(reward) if reward <= MAX_REWARD_PER_CORRECT => {
                    self.quiz.reward_per_correct = reward;
                }
                _ => tracing::warn!(
                    "Ignoring CODEPATH_QUIZ_REWARD '{}': expected 0..={}",
                    reward,
                    MAX_REWARD_PER_CORRECT
                ),
            }
        }
    }

    /// Validate configuration
    fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        reqwest::Url::parse(&self.backend.base_url)
            .map_err(|e| format!("backend.base_url '{}' is invalid: {e}", self.backend.base_url))?;

        if self.backend.request_timeout_seconds == Some(0) {
            return Err("backend.request_timeout_seconds cannot be 0".into());
        }

        if self.quiz.reward_per_correct > MAX_REWARD_PER_CORRECT {
            return Err(format!(
                "quiz.reward_per_correct {} exceeds {}",
                self.quiz.reward_per_correct, MAX_REWARD_PER_CORRECT
            )
            .into());
        }

        if self.user.stream.trim().is_empty() {
            return Err("user.stream cannot be empty".into());
        }

        Ok(())
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Option<Duration> {
        self.backend
            .request_timeout_seconds
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("CODEPATH_BACKEND_URL", "https://codepath.example"),
            ("CODEPATH_REQUEST_TIMEOUT_SECONDS", "30"),
            ("CODEPATH_QUIZ_REWARD", "not-a-number"),
            ("CODEPATH_USERNAME", "a1b2c3"),
        ]
        .into_iter()
        .collect();

        let mut cfg = Config::default();
        cfg.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(cfg.backend.base_url, "https://codepath.example");
        assert_eq!(cfg.request_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(cfg.quiz.reward_per_correct, DEFAULT_REWARD_PER_CORRECT);
        assert_eq!(cfg.user.username.as_deref(), Some("a1b2c3"));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_yaml_sections_default() {
        let cfg: Config = serde_yaml::from_str("backend:\n  base_url: http://localhost:8000\n")
            .expect("minimal config should parse");
        assert_eq!(cfg.user.stream, "General");
        assert_eq!(cfg.quiz.reward_per_correct, 10);
        assert_eq!(cfg.request_timeout(), None);
    }

    #[test]
    fn test_reward_out_of_range_is_rejected() {
        let mut cfg = Config::default();
        cfg.apply_overrides(|key| (key == "CODEPATH_QUIZ_REWARD").then(|| "4294967295".to_string()));
        assert_eq!(cfg.quiz.reward_per_correct, DEFAULT_REWARD_PER_CORRECT);

        cfg.apply_overrides(|key| (key == "CODEPATH_QUIZ_REWARD").then(|| "25".to_string()));
        assert_eq!(cfg.quiz.reward_per_correct, 25);

        cfg.quiz.reward_per_correct = MAX_REWARD_PER_CORRECT + 1;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_url() {
        let mut cfg = Config::default();
        cfg.backend.base_url = "localhost".to_string();
        assert!(cfg.validate().is_err());
    }
}
