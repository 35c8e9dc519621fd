//! 页面处理上下文
//!
//! 封装"我正在处理本批的第几页"这一信息

use std::fmt::Display;

use crate::models::PageId;

/// 页面处理上下文
#[derive(Debug, Clone)]
pub struct PageCtx {
    /// 页面ID
    pub page_id: PageId,

    /// 页面在注册表中的序号（从1开始）
    pub page_index: usize,

    /// 在本批中的位置（从1开始，仅用于日志显示）
    pub position: usize,

    /// 本批页数
    pub batch_size: usize,

    /// 原始文件名
    pub name: String,
}

impl PageCtx {
    pub fn new(
        page_id: PageId,
        page_index: usize,
        position: usize,
        batch_size: usize,
        name: impl Into<String>,
    ) -> Self {
        Self {
            page_id,
            page_index,
            position,
            batch_size,
            name: name.into(),
        }
    }
}

impl Display for PageCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}/{} 第 {} 页 {}]",
            self.position, self.batch_size, self.page_index, self.name
        )
    }
}
