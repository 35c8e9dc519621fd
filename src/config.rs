use serde::Deserialize;
use std::path::Path;

use crate::error::ConfigError;
use crate::models::Quality;

/// API 密钥所在的环境变量
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    // --- 增强服务配置 ---
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub model_name: String,
    // --- 输出配置 ---
    /// 结果图保存目录
    pub output_dir: String,
    /// 结果文件名前缀
    pub output_prefix: String,
    /// 输出日志文件
    pub output_log_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- 处理默认值 ---
    pub default_target_language: String,
    pub default_quality: Quality,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model_name: "gemini-2.5-flash-image".to_string(),
            output_dir: "output".to_string(),
            output_prefix: "enhanced_".to_string(),
            output_log_file: "output.txt".to_string(),
            verbose_logging: false,
            default_target_language: "English".to_string(),
            default_quality: Quality::Standard,
        }
    }
}

/// 配置文件内容（所有字段可选，只覆盖出现的项）
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub api_base_url: Option<String>,
    pub model_name: Option<String>,
    pub output_dir: Option<String>,
    pub output_prefix: Option<String>,
    pub output_log_file: Option<String>,
    pub verbose_logging: Option<bool>,
    pub default_target_language: Option<String>,
    pub default_quality: Option<Quality>,
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            api_key: std::env::var(API_KEY_VAR).ok().filter(|v| !v.trim().is_empty()),
            api_base_url: std::env::var("GEMINI_API_BASE_URL").unwrap_or(default.api_base_url),
            model_name: std::env::var("GEMINI_MODEL_NAME").unwrap_or(default.model_name),
            output_dir: std::env::var("OUTPUT_DIR").unwrap_or(default.output_dir),
            output_prefix: std::env::var("OUTPUT_PREFIX").unwrap_or(default.output_prefix),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            default_target_language: std::env::var("TARGET_LANGUAGE").unwrap_or(default.default_target_language),
            default_quality: std::env::var("OUTPUT_QUALITY").ok().and_then(|v| v.parse().ok()).unwrap_or(default.default_quality),
        }
    }

    /// 用 TOML 配置文件覆盖当前配置
    ///
    /// API 密钥只从环境变量读取，不写进配置文件
    pub fn with_file(mut self, path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::FileParseFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        let file: FileConfig =
            toml::from_str(&content).map_err(|e| ConfigError::FileParseFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        self.merge(file);
        Ok(self)
    }

    /// 合并配置文件中出现的字段
    pub fn merge(&mut self, file: FileConfig) {
        if let Some(v) = file.api_base_url {
            self.api_base_url = v;
        }
        if let Some(v) = file.model_name {
            self.model_name = v;
        }
        if let Some(v) = file.output_dir {
            self.output_dir = v;
        }
        if let Some(v) = file.output_prefix {
            self.output_prefix = v;
        }
        if let Some(v) = file.output_log_file {
            self.output_log_file = v;
        }
        if let Some(v) = file.verbose_logging {
            self.verbose_logging = v;
        }
        if let Some(v) = file.default_target_language {
            self.default_target_language = v;
        }
        if let Some(v) = file.default_quality {
            self.default_quality = v;
        }
    }

    /// 获取 API 密钥，缺失时立即失败
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingApiKey {
                var_name: API_KEY_VAR.to_string(),
            })
    }

    /// 启动时校验
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.require_api_key()?;

        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "api_base_url 必须以 http:// 或 https:// 开头: {}",
                self.api_base_url
            )));
        }
        if self.model_name.trim().is_empty() {
            return Err(ConfigError::Invalid("model_name 不能为空".to_string()));
        }
        if self.output_prefix.contains(['/', '\\']) {
            return Err(ConfigError::Invalid(format!(
                "output_prefix 不能包含路径分隔符: {}",
                self.output_prefix
            )));
        }

        Ok(())
    }
}
