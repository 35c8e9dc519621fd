//! 会话状态 - 编排层
//!
//! ## 职责
//!
//! 持有一次交互过程中的全部可变状态：
//! - 页面注册表（整体替换，读者拿到的是快照）
//! - 当前选中的页码范围
//! - 面向用户的日志
//! - "正在处理"标记
//!
//! 所有锁都只在同步代码中短暂持有，不跨越 `.await`

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tracing::{debug, warn};

use crate::error::IngestError;
use crate::models::{Page, PageRange};
use crate::services::{ArchiveIngestor, LogEntry, LogSink, PageRegistry};

/// 会话
#[derive(Debug)]
pub struct Session {
    ingestor: ArchiveIngestor,
    registry: RwLock<Arc<PageRegistry>>,
    range: Mutex<PageRange>,
    logs: Mutex<LogSink>,
    processing: AtomicBool,
}

/// 处理标记守卫，离开作用域时自动释放
#[derive(Debug)]
pub struct ProcessingGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_log_sink(LogSink::new())
    }

    pub fn with_log_sink(logs: LogSink) -> Self {
        Self {
            ingestor: ArchiveIngestor::new(),
            registry: RwLock::new(Arc::new(PageRegistry::default())),
            range: Mutex::new(PageRange::default()),
            logs: Mutex::new(logs),
            processing: AtomicBool::new(false),
        }
    }

    // ========== 导入 ==========

    /// 导入磁盘上的一个文件，成功后替换全部页面
    ///
    /// 返回载入的页数
    pub async fn load_file(&self, path: &Path) -> Result<usize, IngestError> {
        let _guard = self.claim_for_load()?;
        let result = self.ingestor.ingest_path(path).await;
        self.commit(&path.display().to_string(), result)
    }

    /// 导入内存中的一个文件
    pub async fn load_bytes(&self, name: &str, bytes: Vec<u8>) -> Result<usize, IngestError> {
        let _guard = self.claim_for_load()?;
        let result = self.ingestor.ingest_bytes(name, bytes).await;
        self.commit(name, result)
    }

    /// 按顺序导入多个文件并拼接
    ///
    /// 单个文件失败只记日志并跳过；全部失败时注册表保持不变，返回最后一个错误
    pub async fn load_files(&self, paths: &[PathBuf]) -> Result<usize, IngestError> {
        let _guard = self.claim_for_load()?;

        let mut pages = Vec::new();
        let mut last_error = None;

        for path in paths {
            match self.ingestor.ingest_path(path).await {
                Ok(mut loaded) => {
                    debug!("{} → {} 页", path.display(), loaded.len());
                    pages.append(&mut loaded);
                }
                Err(e) => {
                    self.log_error(format!("导入失败 {}: {}", path.display(), e));
                    last_error = Some(e);
                }
            }
        }

        match (pages.is_empty(), last_error) {
            (true, Some(e)) => Err(e),
            (true, None) => Ok(0),
            (false, _) => Ok(self.replace_pages(pages)),
        }
    }

    fn commit(
        &self,
        source: &str,
        result: Result<Vec<Page>, IngestError>,
    ) -> Result<usize, IngestError> {
        let pages = result.map_err(|e| {
            self.log_error(format!("导入失败 {}: {}", source, e));
            e
        })?;

        Ok(self.replace_pages(pages))
    }

    /// 导入期间占用处理标记，批处理和其他导入都无法插入
    fn claim_for_load(&self) -> Result<ProcessingGuard<'_>, IngestError> {
        self.try_begin().ok_or_else(|| {
            self.log_error("正在处理中，无法导入新文件");
            IngestError::Busy
        })
    }

    fn replace_pages(&self, pages: Vec<Page>) -> usize {
        let total = pages.len();
        *self.registry.write().unwrap_or_else(|e| e.into_inner()) =
            Arc::new(PageRegistry::new(pages));
        let range = PageRange::initial(total);
        *self.range.lock().unwrap_or_else(|e| e.into_inner()) = range;

        self.log_info(format!("已载入 {} 页，默认范围 {}", total, range));
        total
    }

    // ========== 查询 ==========

    /// 当前注册表快照
    pub fn registry(&self) -> Arc<PageRegistry> {
        self.registry
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// 所有页面的拷贝（按载入顺序）
    pub fn pages(&self) -> Vec<Page> {
        self.registry().pages().to_vec()
    }

    pub fn range(&self) -> PageRange {
        *self.range.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// 设置处理范围，超出部分按当前页数截断
    pub fn set_range(&self, start: usize, end: usize) -> PageRange {
        let range = PageRange::clamped(start, end, self.registry().len());
        *self.range.lock().unwrap_or_else(|e| e.into_inner()) = range;
        range
    }

    /// 按当前页数重新校正范围并写回
    pub fn reclamp_range(&self) -> PageRange {
        let total = self.registry().len();
        let mut guard = self.range.lock().unwrap_or_else(|e| e.into_inner());
        *guard = guard.reclamp(total);
        *guard
    }

    /// 日志快照（旧 → 新）
    pub fn logs(&self) -> Vec<LogEntry> {
        self.logs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entries()
    }

    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    // ========== 修改 ==========

    /// 清空所有页面，范围重置为 1-1
    ///
    /// 处理中拒绝执行，返回是否已清空
    pub fn clear(&self) -> bool {
        if self.is_processing() {
            self.log_error("正在处理中，无法清空页面");
            return false;
        }

        *self.registry.write().unwrap_or_else(|e| e.into_inner()) =
            Arc::new(PageRegistry::default());
        *self.range.lock().unwrap_or_else(|e| e.into_inner()) = PageRange::default();
        self.log_info("已清空所有页面");
        true
    }

    /// 尝试占用处理标记，已被占用时返回 `None`
    pub fn try_begin(&self) -> Option<ProcessingGuard<'_>> {
        self.processing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ProcessingGuard {
                flag: &self.processing,
            })
    }

    /// 用纯函数转换注册表并整体替换
    pub fn apply(&self, transition: impl FnOnce(&PageRegistry) -> PageRegistry) {
        let mut guard = self.registry.write().unwrap_or_else(|e| e.into_inner());
        let next = transition(&guard);
        *guard = Arc::new(next);
    }

    // ========== 日志 ==========

    pub fn log_info(&self, message: impl Into<String>) {
        self.with_logs(|logs| logs.info(message));
    }

    pub fn log_success(&self, message: impl Into<String>) {
        self.with_logs(|logs| logs.success(message));
    }

    pub fn log_error(&self, message: impl Into<String>) {
        self.with_logs(|logs| logs.error(message));
    }

    fn with_logs(&self, f: impl FnOnce(&mut LogSink)) {
        match self.logs.lock() {
            Ok(mut logs) => f(&mut logs),
            Err(poisoned) => {
                warn!("日志锁已中毒，继续写入");
                f(&mut poisoned.into_inner());
            }
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PageStatus;
    use crate::services::page_registry::mark_processing;
    use crate::services::Severity;

    const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0];

    #[tokio::test]
    async fn test_load_bytes_replaces_pages_and_resets_range() {
        let session = Session::new();
        session.load_bytes("cover.png", JPEG.to_vec()).await.unwrap();
        session.set_range(1, 1);

        let count = session.load_bytes("001.jpg", JPEG.to_vec()).await.unwrap();

        assert_eq!(count, 1);
        assert_eq!(session.pages().len(), 1);
        assert_eq!(session.pages()[0].name, "001.jpg");
        assert_eq!((session.range().start(), session.range().end()), (1, 1));
    }

    #[tokio::test]
    async fn test_failed_load_keeps_registry_and_logs_error() {
        let session = Session::new();
        session.load_bytes("001.jpg", JPEG.to_vec()).await.unwrap();
        let before = session.logs().len();

        let result = session.load_bytes("notes.txt", b"hello".to_vec()).await;

        assert!(matches!(result, Err(IngestError::UnsupportedFormat { .. })));
        assert_eq!(session.pages().len(), 1);
        let logs = session.logs();
        assert_eq!(logs.len(), before + 1);
        assert_eq!(logs.last().unwrap().severity, Severity::Error);
    }

    #[tokio::test]
    async fn test_load_refused_while_processing() {
        let session = Session::new();
        let _guard = session.try_begin().expect("claim flag");

        let result = session.load_bytes("001.jpg", JPEG.to_vec()).await;

        assert!(matches!(result, Err(IngestError::Busy)));
        assert!(session.pages().is_empty());
    }

    #[tokio::test]
    async fn test_load_holds_flag_and_releases_it() {
        let session = Session::new();
        session.load_bytes("001.jpg", JPEG.to_vec()).await.unwrap();
        assert!(!session.is_processing());

        let _ = session.load_bytes("notes.txt", b"x".to_vec()).await;
        assert!(!session.is_processing());

        // 导入进行中时批处理无法占用标记
        let guard = session.claim_for_load().unwrap();
        assert!(session.is_processing());
        assert!(session.try_begin().is_none());
        drop(guard);
        assert!(session.try_begin().is_some());
    }

    #[test]
    fn test_guard_is_exclusive_and_released_on_drop() {
        let session = Session::new();
        {
            let _guard = session.try_begin().expect("first claim");
            assert!(session.is_processing());
            assert!(session.try_begin().is_none());
        }
        assert!(!session.is_processing());
        assert!(session.try_begin().is_some());
    }

    #[tokio::test]
    async fn test_set_range_clamps_to_page_count() {
        let session = Session::new();
        session.load_bytes("001.jpg", JPEG.to_vec()).await.unwrap();

        let range = session.set_range(0, 99);
        assert_eq!((range.start(), range.end()), (1, 1));
    }

    #[tokio::test]
    async fn test_clear_resets_everything() {
        let session = Session::new();
        session.load_bytes("001.jpg", JPEG.to_vec()).await.unwrap();

        assert!(session.clear());
        assert!(session.pages().is_empty());
        assert_eq!(session.range(), PageRange::default());
        assert_eq!(session.logs().last().unwrap().severity, Severity::Info);
    }

    #[tokio::test]
    async fn test_clear_refused_while_processing() {
        let session = Session::new();
        session.load_bytes("001.jpg", JPEG.to_vec()).await.unwrap();
        let _guard = session.try_begin().unwrap();

        assert!(!session.clear());
        assert_eq!(session.pages().len(), 1);
    }

    #[tokio::test]
    async fn test_apply_replaces_snapshot() {
        let session = Session::new();
        session.load_bytes("001.jpg", JPEG.to_vec()).await.unwrap();
        let before = session.registry();
        let id = before.pages()[0].id;

        session.apply(|r| mark_processing(r, id));

        assert_eq!(before.pages()[0].status, PageStatus::Pending);
        assert_eq!(
            session.registry().get(id).unwrap().status,
            PageStatus::Processing
        );
    }
}
