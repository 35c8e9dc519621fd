//! 页面注册表 - 业务能力层
//!
//! 有序的页面集合。所有修改都是纯函数：输入旧注册表，返回新注册表，
//! 由持有者整体替换，渲染层不会看到半更新的状态。

use crate::models::{ImagePayload, Page, PageId, PageStatus};
use crate::models::PageRange;

/// 页面注册表
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRegistry {
    pages: Vec<Page>,
}

impl PageRegistry {
    pub fn new(pages: Vec<Page>) -> Self {
        Self { pages }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn get(&self, id: PageId) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == id)
    }

    /// 取出范围内页面的 id（按顺序）
    pub fn ids_in_range(&self, range: PageRange) -> Vec<PageId> {
        let indices = range.indices();
        let end = indices.end.min(self.pages.len());
        let start = indices.start.min(end);
        self.pages[start..end].iter().map(|p| p.id).collect()
    }

    /// 已完成的页面
    pub fn completed(&self) -> impl Iterator<Item = &Page> {
        self.pages
            .iter()
            .filter(|p| p.status == PageStatus::Completed)
    }

    /// 各状态计数 (等待, 处理中, 完成, 失败)
    pub fn status_counts(&self) -> (usize, usize, usize, usize) {
        self.pages
            .iter()
            .fold((0, 0, 0, 0), |(p, r, c, e), page| match page.status {
                PageStatus::Pending => (p + 1, r, c, e),
                PageStatus::Processing => (p, r + 1, c, e),
                PageStatus::Completed => (p, r, c + 1, e),
                PageStatus::Error => (p, r, c, e + 1),
            })
    }
}

// ========== 状态迁移函数 ==========

/// 通用迁移：对指定页面应用 `update`，返回新的注册表
///
/// id 不存在时原样返回
pub fn update_page(
    registry: &PageRegistry,
    id: PageId,
    update: impl FnOnce(&mut Page),
) -> PageRegistry {
    let mut pages = registry.pages.clone();
    if let Some(page) = pages.iter_mut().find(|p| p.id == id) {
        update(page);
    }
    PageRegistry { pages }
}

/// 标记为处理中，清除上一次的错误
pub fn mark_processing(registry: &PageRegistry, id: PageId) -> PageRegistry {
    update_page(registry, id, |page| {
        page.status = PageStatus::Processing;
        page.error = None;
    })
}

/// 写入处理结果并标记为完成
pub fn mark_completed(registry: &PageRegistry, id: PageId, result: ImagePayload) -> PageRegistry {
    update_page(registry, id, |page| {
        page.processed = Some(result);
        page.status = PageStatus::Completed;
        page.error = None;
    })
}

/// 记录错误信息并标记为失败
pub fn mark_error(registry: &PageRegistry, id: PageId, message: impl Into<String>) -> PageRegistry {
    let message = message.into();
    update_page(registry, id, |page| {
        page.status = PageStatus::Error;
        page.error = Some(message);
    })
}
