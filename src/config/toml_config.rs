use crate::core::primes::MAX_PRIME_COUNT;
use crate::core::StreamConfigProvider;
use crate::domain::model::StreamSettings;
use crate::utils::error::{Result, StreamError};
use crate::utils::validation::{validate_positive_number, validate_range, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const MAX_QUEUE_CAPACITY: usize = 4096;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub stream: StreamSettings,
    pub monitoring: MonitoringConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub json: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| StreamError::ConfigParseError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PRIME_COUNT})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| StreamError::ConfigParseError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.enabled
    }
}

impl StreamConfigProvider for TomlConfig {
    fn prime_count(&self) -> u32 {
        self.stream.prime_count
    }

    fn report_every(&self) -> u32 {
        self.stream.report_every
    }

    fn queue_capacity(&self) -> usize {
        self.stream.queue_capacity
    }
}

impl StreamConfigProvider for StreamSettings {
    fn prime_count(&self) -> u32 {
        self.prime_count
    }

    fn report_every(&self) -> u32 {
        self.report_every
    }

    fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }
}

impl Validate for StreamSettings {
    fn validate(&self) -> Result<()> {
        validate_range("stream.prime_count", self.prime_count, 1, MAX_PRIME_COUNT)?;
        validate_positive_number("stream.report_every", self.report_every, 1)?;
        validate_range("stream.queue_capacity", self.queue_capacity, 1, MAX_QUEUE_CAPACITY)?;
        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.stream.validate()
    }
}
