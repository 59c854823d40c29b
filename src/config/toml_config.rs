use crate::core::{ConfigProvider, ProviderKind};
use crate::utils::error::{Result, SuggestError};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_MIN_GOAL_LENGTH: usize = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub provider: ProviderSection,
    pub request: RequestSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSection {
    pub kind: ProviderKind,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    /// 指定讀取 API key 的環境變數名稱
    pub api_key_env: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestSection {
    pub min_goal_length: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: Option<String>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SuggestError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SuggestError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GEMINI_API_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SuggestError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => escape_basic_string(&value),
                Err(_) => format!("${{{}}}", var_name),
            }
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        crate::utils::validation::validate_url("provider.base_url", self.base_url())?;
        crate::utils::validation::validate_non_empty_string("provider.model", self.model())?;

        if let Some(timeout) = self.provider.timeout_seconds {
            crate::utils::validation::validate_range("provider.timeout_seconds", timeout, 1, 600)?;
        }

        if let Some(temperature) = self.provider.temperature {
            crate::utils::validation::validate_range("provider.temperature", temperature, 0.0, 2.0)?;
        }

        if let Some(tokens) = self.provider.max_output_tokens {
            crate::utils::validation::validate_range("provider.max_output_tokens", tokens, 1, 65_536)?;
        }

        if let Some(min) = self.request.min_goal_length {
            crate::utils::validation::validate_range("request.min_goal_length", min, 1, 1_000)?;
        }

        if let Some(level) = &self.logging.level {
            let valid_levels = ["trace", "debug", "info", "warn", "error"];
            if !valid_levels.contains(&level.as_str()) {
                return Err(SuggestError::InvalidConfigValueError {
                    field: "logging.level".to_string(),
                    value: level.clone(),
                    reason: format!("Valid levels: {}", valid_levels.join(", ")),
                });
            }
        }

        Ok(())
    }

    /// 取得目標最短長度 (表單層規則)
    pub fn min_goal_length(&self) -> usize {
        self.request.min_goal_length.unwrap_or(DEFAULT_MIN_GOAL_LENGTH)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.level.as_deref()
    }

    pub fn json_logs(&self) -> bool {
        self.logging.json.unwrap_or(false)
    }

    /// API key 來源說明，不含金鑰本身
    pub fn api_key_source(&self) -> String {
        if self.provider.api_key.as_deref().is_some_and(|k| !k.is_empty() && !k.starts_with("${")) {
            return "config".to_string();
        }
        self.candidate_env_vars()
            .into_iter()
            .find(|name| std::env::var(name).is_ok_and(|v| !v.is_empty()))
            .map(|name| format!("env:{}", name))
            .unwrap_or_else(|| "missing".to_string())
    }

    fn candidate_env_vars(&self) -> Vec<String> {
        match &self.provider.api_key_env {
            Some(name) => vec![name.clone()],
            None => self
                .provider
                .kind
                .api_key_env_vars()
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ConfigProvider for TomlConfig {
    fn provider_kind(&self) -> ProviderKind {
        self.provider.kind
    }

    fn base_url(&self) -> &str {
        self.provider
            .base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.kind.default_base_url())
    }

    fn model(&self) -> &str {
        self.provider
            .model
            .as_deref()
            .unwrap_or_else(|| self.provider.kind.default_model())
    }

    fn api_key(&self) -> Option<String> {
        // 未替換的 ${VAR} 視為未設定
        if let Some(key) = &self.provider.api_key {
            if !key.is_empty() && !key.starts_with("${") {
                return Some(key.clone());
            }
        }
        self.candidate_env_vars()
            .into_iter()
            .find_map(|name| std::env::var(name).ok().filter(|v| !v.is_empty()))
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.provider.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }

    fn temperature(&self) -> Option<f32> {
        self.provider.temperature
    }

    fn max_output_tokens(&self) -> Option<u32> {
        self.provider.max_output_tokens
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

/// 環境變數值會落在 TOML 的雙引號字串內，需先跳脫
fn escape_basic_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}
