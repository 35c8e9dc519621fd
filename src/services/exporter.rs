//! 导出服务 - 业务能力层
//!
//! 把所有已完成的页面打包成一个 ZIP（"全部下载"）

use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::path::Path;
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::SaveError;
use crate::services::page_registry::PageRegistry;
use crate::services::result_saver::{output_file_name, unique_name};

/// 打包已完成页面，返回压缩包字节
///
/// 文件顺序与注册表一致；去掉目录后重名的文件追加 `_2`、`_3` 后缀
pub fn build_zip(registry: &PageRegistry, prefix: &str) -> Result<Vec<u8>, SaveError> {
    let archive_error = |source| SaveError::ArchiveFailed {
        path: "<memory>".to_string(),
        source,
    };

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let mut used_names = HashSet::new();
    let mut count = 0usize;

    for page in registry.completed() {
        let Some(result) = page.processed.as_ref() else {
            continue;
        };

        let bytes = result.decode().map_err(|source| SaveError::DecodeFailed {
            name: page.name.clone(),
            source,
        })?;

        let file_name = unique_name(&mut used_names, output_file_name(page, result, prefix));
        writer
            .start_file(file_name.as_str(), SimpleFileOptions::default())
            .map_err(archive_error)?;
        writer
            .write_all(&bytes)
            .map_err(|source| SaveError::WriteFailed {
                path: file_name.clone(),
                source,
            })?;
        count += 1;
    }

    if count == 0 {
        return Err(SaveError::NothingToExport);
    }

    let cursor = writer.finish().map_err(archive_error)?;
    info!("🗜️ 已打包 {} 张结果图", count);
    Ok(cursor.into_inner())
}

/// 打包并写入磁盘，返回导出的页数
pub async fn export_zip(
    registry: &PageRegistry,
    path: &Path,
    prefix: &str,
) -> Result<usize, SaveError> {
    let bytes = build_zip(registry, prefix)?;
    let count = registry.completed().count();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| SaveError::WriteFailed {
                path: parent.display().to_string(),
                source,
            })?;
    }

    tokio::fs::write(path, bytes)
        .await
        .map_err(|source| SaveError::WriteFailed {
            path: path.display().to_string(),
            source,
        })?;

    info!("✓ 压缩包已保存: {}", path.display());
    Ok(count)
}
