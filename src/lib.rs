//! # Manga Enhance
//!
//! 一个对漫画页面逐页上色 / 翻译的批处理工具
//!
//! ## 架构设计
//!
//! 本系统采用严格的分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有原始资源，只暴露能力
//! - `ZipReader` - 压缩包条目枚举和读取
//!
//! ### ② 业务能力层（Services / Clients）
//! - `services/` - 描述"我能做什么"
//! - `ArchiveIngestor` - 文件 → 有序页面
//! - `PageRegistry` - 页面集合和纯函数状态转换
//! - `LogSink` - 最多 50 条的用户日志
//! - `ResultSaver` / `exporter` - 保存单张结果、打包全部结果
//! - `clients/` - `EnhancementClient`（Gemini 实现）
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一页"的完整处理流程
//! - `PageCtx` - 上下文封装（页序号 + 批内位置）
//! - `PageFlow` - 流程编排（处理中 → 增强 → 完成 / 失败 → 保存）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/session` - 会话状态（注册表、范围、日志、处理标记）
//! - `orchestrator/batch_processor` - 单批互斥、顺序处理
//! - `orchestrator/app` - 一次完整运行
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{EnhancementClient, GeminiClient};
pub use config::Config;
pub use error::{AppError, AppResult, ConfigError, EnhanceError, IngestError, SaveError};
pub use models::{ImagePayload, Page, PageId, PageRange, PageStatus, ProcessingOptions, Quality};
pub use orchestrator::{App, BatchOrchestrator, BatchSummary, RunRequest, Session};
pub use services::{DirectorySaver, LogEntry, LogSink, PageRegistry, ResultSaver, Severity};
pub use workflow::{PageCtx, PageFlow, PageOutcome};
