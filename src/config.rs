//! Configuration module

use std::env;
use std::path::PathBuf;

use crate::predictor::AdviceMode;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Classifier artifact (.json or .onnx)
    pub model_path: PathBuf,

    /// Attribution explainer artifact, required in attribution mode
    pub explainer_path: Option<PathBuf>,

    /// rules | attribution
    pub advice_mode: AdviceMode,

    /// Reject out-of-range survey codes instead of passing them through
    pub strict_validation: bool,

    /// Emit JSON log lines
    pub log_json: bool,

    /// Environment (development, production)
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            model_path: PathBuf::from("model.json"),
            explainer_path: None,
            advice_mode: AdviceMode::Rules,
            strict_validation: false,
            log_json: false,
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port: u16 = match lookup("PORT") {
            Some(p) => p.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                reason: format!("{:?} is not a port number", p),
            })?,
            None => defaults.port,
        };

        let advice_mode: AdviceMode = match lookup("ADVICE_MODE") {
            Some(mode) => mode
                .parse()
                .map_err(|reason| ConfigError::Invalid { name: "ADVICE_MODE", reason })?,
            None => defaults.advice_mode,
        };

        let strict_validation = match lookup("STRICT_VALIDATION") {
            Some(flag) => parse_bool(&flag).ok_or_else(|| ConfigError::Invalid {
                name: "STRICT_VALIDATION",
                reason: format!("{:?} is not a boolean", flag),
            })?,
            None => defaults.strict_validation,
        };

        Ok(Self {
            port,
            model_path: lookup("MODEL_PATH").map(PathBuf::from).unwrap_or(defaults.model_path),
            explainer_path: lookup("EXPLAINER_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            advice_mode,
            strict_validation,
            log_json: lookup("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json")),
            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.model_path, PathBuf::from("model.json"));
        assert_eq!(config.explainer_path, None);
        assert_eq!(config.advice_mode, AdviceMode::Rules);
        assert!(!config.strict_validation);
        assert!(!config.is_production());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("PORT", "9000"),
            ("MODEL_PATH", "/models/clf.onnx"),
            ("EXPLAINER_PATH", "/models/explainer.json"),
            ("ADVICE_MODE", "attribution"),
            ("STRICT_VALIDATION", "true"),
            ("LOG_FORMAT", "JSON"),
            ("ENVIRONMENT", "production"),
        ])
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.model_path, PathBuf::from("/models/clf.onnx"));
        assert_eq!(config.explainer_path, Some(PathBuf::from("/models/explainer.json")));
        assert_eq!(config.advice_mode, AdviceMode::Attribution);
        assert!(config.strict_validation);
        assert!(config.log_json);
        assert!(config.is_production());
    }

    #[test]
    fn test_unknown_advice_mode_fails() {
        let err = config(&[("ADVICE_MODE", "both")]).unwrap_err();
        assert!(err.to_string().contains("ADVICE_MODE"));
    }

    #[test]
    fn test_bad_port_and_flag_fail() {
        assert!(config(&[("PORT", "eighty")]).is_err());
        assert!(config(&[("STRICT_VALIDATION", "maybe")]).is_err());
    }

    #[test]
    fn test_empty_explainer_path_is_unset() {
        let config = config(&[("EXPLAINER_PATH", " ")]).unwrap();
        assert_eq!(config.explainer_path, None);
    }
}
