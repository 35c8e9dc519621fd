//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责会话状态和批次调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `session` - 会话状态
//! - 持有页面注册表、处理范围、用户日志
//! - 用原子标记保证同一时刻只有一个批次
//! - 导入 / 清空 / 范围设置
//!
//! ### `batch_processor` - 批处理器
//! - 按范围挑选页面，严格顺序处理
//! - 创建并复用 PageFlow
//! - 输出批次统计
//!
//! ### `app` - 应用入口
//! - 初始化日志文件、客户端、保存器
//! - 导入 → 处理 → 导出 → 写日志
//!
//! ## 层次关系
//!
//! ```text
//! app (一次运行)
//!     ↓
//! batch_processor (处理一个范围)
//!     ↓
//! workflow::PageFlow (处理单页)
//!     ↓
//! services / clients (能力层：registry / saver / enhance)
//!     ↓
//! infrastructure (基础设施：ZipReader)
//! ```

pub mod app;
pub mod batch_processor;
pub mod session;

// 重新导出主要类型
pub use app::{App, RunRequest};
pub use batch_processor::{BatchOrchestrator, BatchSummary};
pub use session::{ProcessingGuard, Session};
