//! 结果保存服务 - 业务能力层
//!
//! 只负责"把一张结果图写出去"，不关心流程

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::SaveError;
use crate::models::image_format;
use crate::models::{ImagePayload, Page, PageId};

/// 结果文件名：`<前缀><原文件名去扩展名>.<结果图扩展名>`
///
/// 原始路径中的目录部分被去掉
pub fn output_file_name(page: &Page, result: &ImagePayload, prefix: &str) -> String {
    format!(
        "{}{}.{}",
        prefix,
        page.file_stem(),
        image_format::extension_for_mime(&result.mime_type)
    )
}

/// 在已用名字集合中找一个不冲突的名字，冲突时追加 `_2`、`_3`
pub fn unique_name(used: &mut HashSet<String>, candidate: String) -> String {
    if used.insert(candidate.clone()) {
        return candidate;
    }

    let (stem, ext) = match candidate.rfind('.') {
        Some(idx) => (&candidate[..idx], &candidate[idx..]),
        None => (candidate.as_str(), ""),
    };

    let mut n = 2;
    loop {
        let name = format!("{}_{}{}", stem, n, ext);
        if used.insert(name.clone()) {
            return name;
        }
        n += 1;
    }
}

/// 输出文件名分配表
///
/// 不同目录下的同名页面得到不同的文件名；同一页重新处理时沿用原来的名字
#[derive(Debug, Default)]
pub struct OutputNames {
    assigned: HashMap<(PageId, String), String>,
    used: HashSet<String>,
}

impl OutputNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, page: &Page, result: &ImagePayload, prefix: &str) -> String {
        let candidate = output_file_name(page, result, prefix);
        if let Some(name) = self.assigned.get(&(page.id, candidate.clone())) {
            return name.clone();
        }

        let name = unique_name(&mut self.used, candidate.clone());
        self.assigned.insert((page.id, candidate), name.clone());
        name
    }
}

/// 结果保存能力
#[async_trait]
pub trait ResultSaver: Send + Sync {
    /// 保存一张结果图，返回写入位置
    async fn save(&self, payload: &ImagePayload, file_name: &str) -> Result<PathBuf, SaveError>;
}

/// 保存到本地目录
///
/// 职责：
/// - 解码 base64 并写文件
/// - 目录不存在时自动创建
pub struct DirectorySaver {
    output_dir: PathBuf,
}

impl DirectorySaver {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

#[async_trait]
impl ResultSaver for DirectorySaver {
    async fn save(&self, payload: &ImagePayload, file_name: &str) -> Result<PathBuf, SaveError> {
        let bytes = payload.decode().map_err(|source| SaveError::DecodeFailed {
            name: file_name.to_string(),
            source,
        })?;

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|source| SaveError::WriteFailed {
                path: self.output_dir.display().to_string(),
                source,
            })?;

        let path = self.output_dir.join(file_name);
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|source| SaveError::WriteFailed {
                path: path.display().to_string(),
                source,
            })?;

        debug!("写入 {} ({} 字节)", path.display(), bytes.len());
        Ok(path)
    }
}
