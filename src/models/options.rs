use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 输出画质
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    #[default]
    Standard,
    High,
    Ultra,
}

impl Quality {
    /// 对应服务端的输出尺寸
    pub fn image_size(self) -> &'static str {
        match self {
            Quality::Standard => "1K",
            Quality::High => "2K",
            Quality::Ultra => "4K",
        }
    }
}

impl FromStr for Quality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" | "1k" => Ok(Quality::Standard),
            "high" | "2k" => Ok(Quality::High),
            "ultra" | "4k" => Ok(Quality::Ultra),
            other => Err(format!("未知的画质: {}", other)),
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Quality::Standard => "standard",
            Quality::High => "high",
            Quality::Ultra => "ultra",
        };
        write!(f, "{}", name)
    }
}

/// 单次批处理的选项，批处理期间不可变
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingOptions {
    pub colorize: bool,
    pub translate: bool,
    pub target_language: String,
    #[serde(default)]
    pub quality: Quality,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            colorize: true,
            translate: false,
            target_language: "English".to_string(),
            quality: Quality::default(),
        }
    }
}

impl ProcessingOptions {
    /// 检查选项组合是否可用
    pub fn validate(&self) -> Result<(), String> {
        if self.translate && self.target_language.trim().is_empty() {
            return Err("启用翻译时必须指定目标语言".to_string());
        }
        Ok(())
    }

    /// 是否至少请求了一种处理
    pub fn has_any_task(&self) -> bool {
        self.colorize || self.translate
    }
}

impl fmt::Display for ProcessingOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "上色={}, 翻译={}, 目标语言={}, 画质={}",
            self.colorize, self.translate, self.target_language, self.quality
        )
    }
}
