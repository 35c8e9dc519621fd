//! 导入服务 - 业务能力层
//!
//! 把一个上传文件变成有序的页面列表：
//! - 单张图片 → 1 页
//! - ZIP / CBZ → 过滤无关条目、自然排序后的多页

use std::path::Path;
use tracing::{debug, info};

use crate::error::IngestError;
use crate::infrastructure::{ArchiveEntry, ZipReader};
use crate::models::image_format::{self, InputKind};
use crate::models::{ImagePayload, Page};
use crate::utils::sort_natural;

/// 系统元数据目录标记（路径中出现即丢弃）
pub const SYSTEM_FOLDER_MARKERS: &[&str] = &["__MACOSX"];

/// 导入服务
///
/// 职责：
/// - 判断文件类型
/// - 解压、过滤、排序
/// - 不修改注册表，只返回页面列表
#[derive(Debug, Default, Clone, Copy)]
pub struct ArchiveIngestor;

impl ArchiveIngestor {
    pub fn new() -> Self {
        Self
    }

    /// 从磁盘读取并导入
    pub async fn ingest_path(&self, path: &Path) -> Result<Vec<Page>, IngestError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        // 先判断类型，避免读入无关的大文件
        if image_format::classify(&name).is_none() {
            return Err(IngestError::UnsupportedFormat { name });
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| IngestError::io(path.display().to_string(), e))?;

        self.ingest_bytes(name, bytes).await
    }

    /// 导入内存中的文件
    ///
    /// # 参数
    /// - `name`: 原始文件名（用于判断类型）
    /// - `bytes`: 文件内容
    pub async fn ingest_bytes(
        &self,
        name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Vec<Page>, IngestError> {
        let name = name.into();

        match image_format::classify(&name) {
            None => Err(IngestError::UnsupportedFormat { name }),
            Some(InputKind::Image(mime_type)) => {
                debug!("单张图片: {} ({} 字节)", name, bytes.len());
                Ok(vec![Page::new(
                    name,
                    ImagePayload::from_bytes(mime_type, &bytes),
                )])
            }
            Some(InputKind::Archive) => {
                let archive_name = name.clone();
                tokio::task::spawn_blocking(move || extract_archive(&archive_name, bytes))
                    .await
                    .map_err(|e| IngestError::decode(name, e))?
            }
        }
    }
}

/// 解压压缩包并生成页面
///
/// 同步执行，调用方负责放到阻塞线程池
pub fn extract_archive(archive_name: &str, bytes: Vec<u8>) -> Result<Vec<Page>, IngestError> {
    let mut reader = ZipReader::open(archive_name, bytes)?;
    let all_entries = reader.entries();
    let total_entries = all_entries.len();

    let mut entries: Vec<(ArchiveEntry, &'static str)> = all_entries
        .into_iter()
        .filter(is_candidate)
        .filter_map(|entry| image_format::image_mime_type(&entry.name).map(|mime| (entry, mime)))
        .collect();

    if entries.is_empty() {
        return Err(IngestError::EmptyArchive {
            archive: archive_name.to_string(),
        });
    }

    sort_natural(&mut entries, |(entry, _)| entry.name.as_str());

    info!(
        "📦 {}: {} 个条目中有 {} 张可用图片",
        archive_name,
        total_entries,
        entries.len()
    );

    entries
        .into_iter()
        .map(|(entry, mime_type)| {
            let data = reader.read_base64(&entry)?;
            Ok(Page::new(entry.name, ImagePayload::new(mime_type, data)))
        })
        .collect()
}

/// 排除目录、隐藏文件和系统元数据目录
pub fn is_candidate(entry: &ArchiveEntry) -> bool {
    if entry.is_dir {
        return false;
    }
    if entry.leaf_name().starts_with('.') {
        return false;
    }
    !SYSTEM_FOLDER_MARKERS
        .iter()
        .any(|marker| entry.name.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> ArchiveEntry {
        ArchiveEntry {
            index: 0,
            name: name.to_string(),
            is_dir: name.ends_with('/'),
        }
    }

    #[test]
    fn test_is_candidate_filters_noise() {
        assert!(is_candidate(&entry("ch1/001.jpg")));
        assert!(!is_candidate(&entry("ch1/")));
        assert!(!is_candidate(&entry("ch1/.DS_Store")));
        assert!(!is_candidate(&entry("ch1/._001.jpg")));
        assert!(!is_candidate(&entry("__MACOSX/ch1/001.jpg")));
    }

    #[tokio::test]
    async fn test_single_image_bypasses_archive_logic() {
        let pages = ArchiveIngestor::new()
            .ingest_bytes("cover.PNG", vec![1, 2, 3])
            .await
            .unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].name, "cover.PNG");
        assert_eq!(pages[0].original.mime_type, "image/png");
        assert_eq!(pages[0].original.decode().unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_unsupported_extension() {
        let result = ArchiveIngestor::new()
            .ingest_bytes("notes.pdf", vec![0])
            .await;
        assert!(matches!(result, Err(IngestError::UnsupportedFormat { .. })));
    }
}
