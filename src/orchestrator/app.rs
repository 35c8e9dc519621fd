//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：日志文件、启动信息、创建增强客户端和保存器
//! 2. **导入**：按命令行顺序载入所有输入文件
//! 3. **处理**：选定范围后启动一个批次
//! 4. **导出**：可选地把所有已完成页面打包成 ZIP
//! 5. **收尾**：把会话日志写入日志文件，输出统计

use anyhow::{anyhow, bail, Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::clients::{EnhancementClient, GeminiClient};
use crate::config::Config;
use crate::models::ProcessingOptions;
use crate::orchestrator::batch_processor::{BatchOrchestrator, BatchSummary};
use crate::orchestrator::session::Session;
use crate::services::{export_zip, DirectorySaver, ResultSaver};
use crate::utils::logging::{
    append_log_entries, init_log_file, log_pages_loaded, log_startup, print_final_stats,
};

/// 一次运行的输入
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    /// 输入文件（图片或压缩包），按顺序拼接
    pub inputs: Vec<PathBuf>,
    /// 处理范围（从 1 开始，首尾都包含），缺省为导入后的默认范围
    pub range: Option<(usize, usize)>,
    pub options: ProcessingOptions,
    /// 处理完成后导出的 ZIP 路径
    pub zip_path: Option<PathBuf>,
}

/// 应用主结构
pub struct App {
    config: Config,
    session: Arc<Session>,
    orchestrator: BatchOrchestrator,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        init_log_file(&config.output_log_file, &config.model_name)?;

        let client = GeminiClient::new(&config).context("无法创建增强客户端")?;
        log_startup(client.model_name(), &config.output_dir);

        let saver = DirectorySaver::new(&config.output_dir);

        Ok(Self::with_components(
            config,
            Arc::new(client),
            Arc::new(saver),
        ))
    }

    /// 使用指定的客户端和保存器组装应用
    pub fn with_components(
        config: Config,
        client: Arc<dyn EnhancementClient>,
        saver: Arc<dyn ResultSaver>,
    ) -> Self {
        let session = Arc::new(Session::new());
        let orchestrator = BatchOrchestrator::new(
            session.clone(),
            client,
            saver,
            config.output_prefix.clone(),
        );

        Self {
            config,
            session,
            orchestrator,
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// 运行应用主逻辑
    ///
    /// 无论成功与否，会话日志都会追加到日志文件
    pub async fn run(&self, request: &RunRequest) -> Result<BatchSummary> {
        let result = self.run_batch(request).await;
        self.flush_logs();
        result
    }

    async fn run_batch(&self, request: &RunRequest) -> Result<BatchSummary> {
        info!("\n📁 正在载入 {} 个文件...", request.inputs.len());
        let total = self
            .session
            .load_files(&request.inputs)
            .await
            .context("导入失败")?;

        if total == 0 {
            bail!("没有提供任何输入文件");
        }

        let range = match request.range {
            Some((start, end)) => self.session.set_range(start, end),
            None => self.session.range(),
        };
        log_pages_loaded(total, range.start(), range.end());

        let summary = self
            .orchestrator
            .start_processing(&request.options)
            .await
            .ok_or_else(|| anyhow!("批处理未启动，详见日志"))?;

        if let Some(path) = &request.zip_path {
            match export_zip(&self.session.registry(), path, &self.config.output_prefix).await {
                Ok(count) => self
                    .session
                    .log_success(format!("已导出 {} 页到 {}", count, path.display())),
                Err(e) => self.session.log_error(format!("导出失败: {}", e)),
            }
        }

        let (pending, _, _, _) = self.session.registry().status_counts();
        print_final_stats(&summary, pending, &self.config.output_log_file);

        Ok(summary)
    }

    fn flush_logs(&self) {
        if let Err(e) = append_log_entries(&self.config.output_log_file, &self.session.logs()) {
            warn!("⚠️ 写入日志文件失败: {:#}", e);
        }
    }
}
