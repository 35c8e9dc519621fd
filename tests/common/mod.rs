#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use manga_enhance::{
    EnhanceError, EnhancementClient, ImagePayload, ProcessingOptions, ResultSaver, SaveError,
};

/// ZIP 中的一个文件条目
pub fn file<'a>(name: &'a str, content: &'a [u8]) -> (&'a str, Option<&'a [u8]>) {
    (name, Some(content))
}

/// ZIP 中的一个目录条目
pub fn dir(name: &str) -> (&str, Option<&[u8]>) {
    (name, None)
}

/// 构建内存 ZIP
pub fn build_zip(entries: &[(&str, Option<&[u8]>)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        match content {
            Some(bytes) => {
                writer
                    .start_file(*name, SimpleFileOptions::default())
                    .unwrap();
                writer.write_all(bytes).unwrap();
            }
            None => {
                writer
                    .add_directory(*name, SimpleFileOptions::default())
                    .unwrap();
            }
        }
    }
    writer.finish().unwrap().into_inner()
}

/// 返回固定结果，可指定让哪些原图失败，并记录调用顺序
#[derive(Default)]
pub struct ScriptedClient {
    /// 原图 base64 数据在此集合中的页面会失败
    pub failing: HashSet<String>,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn failing_on(data: &[&str]) -> Self {
        Self {
            failing: data.iter().map(|d| d.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl EnhancementClient for ScriptedClient {
    async fn enhance(
        &self,
        image: &ImagePayload,
        _options: &ProcessingOptions,
    ) -> Result<ImagePayload, EnhanceError> {
        self.calls.lock().unwrap().push(image.data.clone());
        if self.failing.contains(&image.data) {
            return Err(EnhanceError::NonImageResponse {
                text: "refused".to_string(),
            });
        }
        Ok(ImagePayload::from_bytes("image/png", b"colored"))
    }
}

/// 第一次调用会阻塞，直到测试方放行
pub struct GatedClient {
    pub entered: Notify,
    pub release: Notify,
}

impl GatedClient {
    pub fn new() -> Self {
        Self {
            entered: Notify::new(),
            release: Notify::new(),
        }
    }
}

#[async_trait]
impl EnhancementClient for GatedClient {
    async fn enhance(
        &self,
        _image: &ImagePayload,
        _options: &ProcessingOptions,
    ) -> Result<ImagePayload, EnhanceError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(ImagePayload::from_bytes("image/png", b"colored"))
    }
}

/// 只记录文件名，不落盘
#[derive(Default)]
pub struct MemorySaver {
    pub saved: Mutex<Vec<String>>,
}

#[async_trait]
impl ResultSaver for MemorySaver {
    async fn save(&self, _payload: &ImagePayload, file_name: &str) -> Result<PathBuf, SaveError> {
        self.saved.lock().unwrap().push(file_name.to_string());
        Ok(PathBuf::from(file_name))
    }
}

pub fn memory_saver() -> Arc<MemorySaver> {
    Arc::new(MemorySaver::default())
}
