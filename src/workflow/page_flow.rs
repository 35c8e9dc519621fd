//! 页面处理流程 - 流程层
//!
//! 核心职责：定义"一页"的完整处理流程
//!
//! 流程顺序：
//! 1. 标记为处理中
//! 2. 调用增强服务（一次，不重试）
//! 3. 成功 → 写回结果 → 自动保存；失败 → 记录错误
//!
//! 失败只影响当前页，从不向上传播

use std::sync::{Arc, Mutex};
use tracing::{info, warn};

use crate::clients::EnhancementClient;
use crate::models::{ImagePayload, Page, ProcessingOptions};
use crate::orchestrator::Session;
use crate::services::page_registry::{mark_completed, mark_error, mark_processing};
use crate::services::result_saver::{OutputNames, ResultSaver};
use crate::workflow::page_ctx::PageCtx;

/// 单页处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// 已完成
    Completed,
    /// 失败（错误信息已写入页面）
    Failed,
}

/// 页面处理流程
///
/// - 编排单页的完整处理流程
/// - 只通过 Session 修改状态
/// - 只依赖业务能力（client / saver）
pub struct PageFlow {
    client: Arc<dyn EnhancementClient>,
    saver: Arc<dyn ResultSaver>,
    output_prefix: String,
    names: Mutex<OutputNames>,
}

impl PageFlow {
    pub fn new(
        client: Arc<dyn EnhancementClient>,
        saver: Arc<dyn ResultSaver>,
        output_prefix: impl Into<String>,
    ) -> Self {
        Self {
            client,
            saver,
            output_prefix: output_prefix.into(),
            names: Mutex::new(OutputNames::new()),
        }
    }

    pub async fn run(
        &self,
        session: &Session,
        ctx: &PageCtx,
        options: &ProcessingOptions,
    ) -> PageOutcome {
        let registry = session.registry();
        let Some(page) = registry.get(ctx.page_id) else {
            warn!("{} 页面已不存在，跳过", ctx);
            return PageOutcome::Failed;
        };

        session.apply(|r| mark_processing(r, ctx.page_id));
        session.log_info(format!("{} 正在处理...", ctx));

        match self.client.enhance(&page.original, options).await {
            Ok(result) => {
                session.apply(|r| mark_completed(r, ctx.page_id, result.clone()));
                session.log_success(format!("{} ✓ 处理完成", ctx));
                self.save_result(session, ctx, page, &result).await;
                PageOutcome::Completed
            }
            Err(e) => {
                let message = e.to_string();
                session.apply(|r| mark_error(r, ctx.page_id, message.clone()));
                session.log_error(format!("{} ❌ 处理失败: {}", ctx, message));
                PageOutcome::Failed
            }
        }
    }

    /// 自动保存结果图
    ///
    /// 保存失败只记日志，页面仍然是已完成
    async fn save_result(
        &self,
        session: &Session,
        ctx: &PageCtx,
        page: &Page,
        result: &ImagePayload,
    ) {
        let file_name = self
            .names
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .assign(page, result, &self.output_prefix);

        match self.saver.save(result, &file_name).await {
            Ok(path) => info!("{} 💾 已保存: {}", ctx, path.display()),
            Err(e) => session.log_error(format!("{} 保存失败: {}", ctx, e)),
        }
    }
}
