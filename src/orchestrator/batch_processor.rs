//! 批处理器 - 编排层
//!
//! ## 职责
//!
//! 1. **单批互斥**：同一时刻只允许一个批次，重复启动直接忽略
//! 2. **范围选择**：按当前范围（重新校正后）挑出要处理的页面
//! 3. **严格顺序**：逐页处理，上一页结束后才开始下一页
//! 4. **失败隔离**：单页失败只记录在该页上，批次继续
//! 5. **批次统计**：汇总成功 / 失败数量
//!
//! 单页的细节委托给 `workflow::PageFlow`

use std::sync::Arc;
use tracing::debug;

use crate::clients::EnhancementClient;
use crate::models::ProcessingOptions;
use crate::orchestrator::session::Session;
use crate::services::ResultSaver;
use crate::utils::logging::{log_batch_complete, log_batch_start};
use crate::workflow::{PageCtx, PageFlow, PageOutcome};

/// 批次统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// 批处理器
pub struct BatchOrchestrator {
    session: Arc<Session>,
    flow: PageFlow,
}

impl BatchOrchestrator {
    pub fn new(
        session: Arc<Session>,
        client: Arc<dyn EnhancementClient>,
        saver: Arc<dyn ResultSaver>,
        output_prefix: impl Into<String>,
    ) -> Self {
        Self {
            session,
            flow: PageFlow::new(client, saver, output_prefix),
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// 处理当前范围内的页面
    ///
    /// 已有批次在运行、没有页面或选项无效时返回 `None`
    pub async fn start_processing(&self, options: &ProcessingOptions) -> Option<BatchSummary> {
        let Some(_guard) = self.session.try_begin() else {
            debug!("已有批次在运行，忽略本次启动");
            return None;
        };

        let registry = self.session.registry();
        if registry.is_empty() {
            self.session.log_error("没有可处理的页面，请先导入文件");
            return None;
        }

        if let Err(reason) = options.validate() {
            self.session.log_error(format!("处理选项无效: {}", reason));
            return None;
        }

        let range = self.session.reclamp_range();
        let ids = registry.ids_in_range(range);
        let mut summary = BatchSummary {
            total: ids.len(),
            ..Default::default()
        };

        log_batch_start(range.start(), range.end(), registry.len(), &options.to_string());
        self.session.log_info(format!(
            "开始处理第 {} 页，共 {} 页",
            range,
            range.page_count()
        ));

        for (offset, id) in ids.iter().enumerate() {
            let name = registry
                .get(*id)
                .map(|p| p.name.clone())
                .unwrap_or_default();
            let ctx = PageCtx::new(*id, range.start() + offset, offset + 1, ids.len(), name);

            match self.flow.run(&self.session, &ctx, options).await {
                PageOutcome::Completed => summary.succeeded += 1,
                PageOutcome::Failed => summary.failed += 1,
            }
        }

        self.session.log_info(format!(
            "批处理完成: 成功 {}/{}，失败 {}",
            summary.succeeded, summary.total, summary.failed
        ));
        log_batch_complete(summary.succeeded, summary.total);

        Some(summary)
    }
}
