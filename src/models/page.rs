use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// 页面唯一标识
///
/// 导入时生成（UUID v4），不同批次的导入之间不会重复
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageId(Uuid);

impl PageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// base64 编码的图片数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePayload {
    pub mime_type: String,
    /// 不带 `data:` 前缀的 base64 文本
    pub data: String,
}

impl ImagePayload {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// 从原始字节编码
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self::new(mime_type, STANDARD.encode(bytes))
    }

    /// 解码为原始字节
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(self.data.as_bytes())
    }

    /// 转为 data URI，可直接用作显示源
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// 解析 `data:<mime>;base64,<data>` 形式的字符串
    pub fn from_data_uri(uri: &str) -> Option<Self> {
        let rest = uri.strip_prefix("data:")?;
        let (header, data) = rest.split_once(',')?;
        let mime_type = header.strip_suffix(";base64")?;
        if mime_type.is_empty() {
            return None;
        }
        Some(Self::new(mime_type, data))
    }
}

/// 页面处理状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    Pending,
    Processing,
    Completed,
    Error,
}

impl fmt::Display for PageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PageStatus::Pending => "等待中",
            PageStatus::Processing => "处理中",
            PageStatus::Completed => "已完成",
            PageStatus::Error => "失败",
        };
        write!(f, "{}", label)
    }
}

/// 漫画页面
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    /// 原始路径 / 文件名（压缩包内可能带目录）
    pub name: String,
    pub original: ImagePayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed: Option<ImagePayload>,
    pub status: PageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Page {
    /// 创建处于等待状态的新页面
    pub fn new(name: impl Into<String>, original: ImagePayload) -> Self {
        Self {
            id: PageId::new(),
            name: name.into(),
            original,
            processed: None,
            status: PageStatus::Pending,
            error: None,
        }
    }

    /// 去掉目录后的文件名
    pub fn file_name(&self) -> &str {
        self.name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.name.as_str())
    }

    /// 去掉目录与扩展名后的文件名
    pub fn file_stem(&self) -> &str {
        let file_name = self.file_name();
        match file_name.rfind('.') {
            Some(idx) if idx > 0 => &file_name[..idx],
            _ => file_name,
        }
    }
}
