//! 图片 / 压缩包格式识别
//!
//! 只按扩展名判断，不解析文件内容

use phf::phf_map;
use std::path::Path;

/// 受支持的图片扩展名（小写）→ MIME 类型
static IMAGE_EXTENSIONS: phf::Map<&'static str, &'static str> = phf_map! {
    "jpg" => "image/jpeg",
    "jpeg" => "image/jpeg",
    "png" => "image/png",
    "webp" => "image/webp",
    "bmp" => "image/bmp",
};

/// 按压缩包处理的扩展名
const ARCHIVE_EXTENSIONS: &[&str] = &["zip", "cbz"];

/// 输入文件类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// ZIP 容器
    Archive,
    /// 单张图片
    Image(&'static str),
}

/// 获取小写扩展名
pub fn lowercase_extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// 根据文件名返回 MIME 类型，不受支持时返回 None
pub fn image_mime_type(name: &str) -> Option<&'static str> {
    lowercase_extension(name).and_then(|ext| IMAGE_EXTENSIONS.get(ext.as_str()).copied())
}

/// 判断输入文件类别
pub fn classify(name: &str) -> Option<InputKind> {
    let ext = lowercase_extension(name)?;
    if ARCHIVE_EXTENSIONS.contains(&ext.as_str()) {
        return Some(InputKind::Archive);
    }
    IMAGE_EXTENSIONS.get(ext.as_str()).copied().map(InputKind::Image)
}

/// MIME 类型对应的保存扩展名
pub fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "image/bmp" => "bmp",
        _ => "png",
    }
}
