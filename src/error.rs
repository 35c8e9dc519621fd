use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 导入错误（压缩包 / 单张图片）
    #[error("导入错误: {0}")]
    Ingest(#[from] IngestError),
    /// 图像增强服务错误
    #[error("增强服务错误: {0}")]
    Enhance(#[from] EnhanceError),
    /// 结果保存错误
    #[error("保存错误: {0}")]
    Save(#[from] SaveError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 导入错误
///
/// 对当前这次导入是终止性的，注册表保持原样
#[derive(Debug, Error)]
pub enum IngestError {
    /// 压缩包中没有任何受支持的图片
    #[error("压缩包中没有可用的图片: {archive}")]
    EmptyArchive { archive: String },

    /// 压缩包或图片无法解析
    #[error("无法读取 {name}: {message}")]
    Decode { name: String, message: String },

    /// 既不是压缩包也不是受支持的图片格式
    #[error("不支持的文件类型: {name}")]
    UnsupportedFormat { name: String },

    /// 批处理进行中，拒绝替换页面
    #[error("正在处理中，无法导入新文件")]
    Busy,

    /// 文件读取失败
    #[error("读取文件失败 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 图像增强错误
///
/// 只影响当前这一页，批处理继续
#[derive(Debug, Error)]
pub enum EnhanceError {
    /// 服务没有返回任何候选结果
    #[error("服务未返回任何候选结果")]
    NoCandidates,

    /// 服务只返回了文字，没有图片
    #[error("服务未返回图片: {text}")]
    NonImageResponse { text: String },

    /// 服务返回了非 2xx 响应
    #[error("API返回错误响应 (状态码: {status}): {body}")]
    Api { status: u16, body: String },

    /// 网络 / 传输层失败
    #[error("API请求失败 ({endpoint}): {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// 返回的图片数据无法解析
    #[error("图片数据无效: {0}")]
    InvalidPayload(String),
}

/// 结果保存错误
#[derive(Debug, Error)]
pub enum SaveError {
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// base64 解码失败
    #[error("图片数据解码失败 ({name}): {source}")]
    DecodeFailed {
        name: String,
        #[source]
        source: base64::DecodeError,
    },

    /// 压缩包写入失败
    #[error("写入压缩包失败 ({path}): {source}")]
    ArchiveFailed {
        path: String,
        #[source]
        source: zip::result::ZipError,
    },

    /// 没有任何已完成的页面可导出
    #[error("没有已完成的页面可导出")]
    NothingToExport,
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 缺少 API 密钥
    #[error("环境变量 {var_name} 不存在，无法调用增强服务")]
    MissingApiKey { var_name: String },

    /// 配置文件解析失败
    #[error("配置文件解析失败 ({path}): {message}")]
    FileParseFailed { path: String, message: String },

    /// 配置值不合法
    #[error("配置无效: {0}")]
    Invalid(String),
}

// ========== 便捷构造函数 ==========

impl IngestError {
    /// 创建解析失败错误
    pub fn decode(name: impl Into<String>, message: impl std::fmt::Display) -> Self {
        IngestError::Decode {
            name: name.into(),
            message: message.to_string(),
        }
    }

    /// 创建文件读取错误
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        IngestError::Io {
            path: path.into(),
            source,
        }
    }
}

impl EnhanceError {
    /// 创建传输层错误
    pub fn transport(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        EnhanceError::Transport {
            endpoint: endpoint.into(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_archive_message_names_archive() {
        let err = IngestError::EmptyArchive {
            archive: "chapter01.zip".to_string(),
        };
        assert!(err.to_string().contains("chapter01.zip"));
    }

    #[test]
    fn test_app_error_wraps_source() {
        let err: AppError = EnhanceError::NoCandidates.into();
        assert!(matches!(err, AppError::Enhance(EnhanceError::NoCandidates)));
        assert!(err.to_string().starts_with("增强服务错误"));
    }
}
