//! ZIP 读取器 - 基础设施层
//!
//! 持有解压中的压缩包，只暴露"列出条目 / 读取条目"的能力

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::io::{Cursor, Read};
use tracing::debug;
use zip::ZipArchive;

use crate::error::IngestError;

/// 按条目头声明的大小预分配缓冲区的上限
const MAX_PREALLOC: u64 = 64 << 20;

/// 条目头里的大小不可信，只作为有上限的预分配提示
fn capacity_hint(declared_size: u64) -> usize {
    declared_size.min(MAX_PREALLOC) as usize
}

/// 压缩包条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// 在压缩包中的下标
    pub index: usize,
    /// 完整路径（可能含非 ASCII 字符）
    pub name: String,
    pub is_dir: bool,
}

impl ArchiveEntry {
    /// 去掉目录后的文件名
    pub fn leaf_name(&self) -> &str {
        self.name
            .trim_end_matches(['/', '\\'])
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or("")
    }
}

/// ZIP 读取器
///
/// 职责：
/// - 持有唯一的 ZipArchive
/// - 不认识 Page
/// - 不做过滤和排序
pub struct ZipReader {
    archive_name: String,
    archive: ZipArchive<Cursor<Vec<u8>>>,
}

impl ZipReader {
    /// 打开内存中的压缩包
    pub fn open(archive_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, IngestError> {
        let archive_name = archive_name.into();
        let archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| IngestError::decode(&archive_name, e))?;

        debug!("打开压缩包 {}，共 {} 个条目", archive_name, archive.len());

        Ok(Self {
            archive_name,
            archive,
        })
    }

    pub fn archive_name(&self) -> &str {
        &self.archive_name
    }

    /// 列出所有条目
    pub fn entries(&self) -> Vec<ArchiveEntry> {
        (0..self.archive.len())
            .filter_map(|index| {
                self.archive.name_for_index(index).map(|name| ArchiveEntry {
                    index,
                    name: name.to_string(),
                    is_dir: name.ends_with('/') || name.ends_with('\\'),
                })
            })
            .collect()
    }

    /// 读取条目原始字节
    pub fn read_bytes(&mut self, entry: &ArchiveEntry) -> Result<Vec<u8>, IngestError> {
        let mut file = self
            .archive
            .by_index(entry.index)
            .map_err(|e| IngestError::decode(&entry.name, e))?;

        let mut contents = Vec::with_capacity(capacity_hint(file.size()));
        file.read_to_end(&mut contents)
            .map_err(|e| IngestError::decode(&entry.name, e))?;

        debug!("解压 {} ({} 字节)", entry.name, contents.len());
        Ok(contents)
    }

    /// 读取条目并编码为 base64
    pub fn read_base64(&mut self, entry: &ArchiveEntry) -> Result<String, IngestError> {
        let bytes = self.read_bytes(entry)?;
        Ok(STANDARD.encode(bytes))
    }
}
