/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::orchestrator::BatchSummary;
use crate::services::log_sink::LogEntry;

/// 初始化 tracing 订阅器
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 info / debug
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .try_init();
}

/// 创建（覆盖）运行日志文件并写入抬头
///
/// 抬头记录开始时间和模型，之后由 [`append_log_entries`] 追加会话日志
pub fn init_log_file(log_file_path: &str, model_name: &str) -> Result<()> {
    let started = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    let log_header = format!("# 漫画增强运行日志\n# 开始: {started}\n# 模型: {model_name}\n\n");
    fs::write(log_file_path, log_header)
        .with_context(|| format!("无法写入日志文件: {}", log_file_path))
}

/// 将日志条目追加到日志文件
pub fn append_log_entries(log_file_path: &str, entries: &[LogEntry]) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .with_context(|| format!("无法打开日志文件: {}", log_file_path))?;

    for entry in entries {
        writeln!(file, "{}", entry)?;
    }

    Ok(())
}

/// 记录程序启动信息
///
/// # 参数
/// - `model_name`: 使用的模型
/// - `output_dir`: 结果输出目录
pub fn log_startup(model_name: &str, output_dir: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 漫画逐页处理模式");
    info!("🤖 模型: {}", model_name);
    info!("📁 输出目录: {}", output_dir);
    info!("{}", "=".repeat(60));
}

/// 记录页面加载信息
///
/// # 参数
/// - `total`: 页面总数
/// - `start` / `end`: 默认选中的范围
pub fn log_pages_loaded(total: usize, start: usize, end: usize) {
    info!("✓ 共载入 {} 页", total);
    info!("📋 默认处理范围: 第 {}-{} 页", start, end);
}

/// 记录批次开始信息
pub fn log_batch_start(start: usize, end: usize, total: usize, options: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始处理第 {}-{} 页 / 共 {} 页", start, end, total);
    info!("⚙️ 选项: {}", options);
    info!("{}", "=".repeat(60));
}

/// 记录批次完成信息
///
/// # 参数
/// - `success`: 成功数量
/// - `total`: 批次总数
pub fn log_batch_complete(success: usize, total: usize) {
    info!("\n{}", "─".repeat(60));
    info!("✓ 批次完成: 成功 {}/{}", success, total);
    info!("{}", "─".repeat(60));
}

/// 汇总一次运行的结果
///
/// `untouched` 是运行结束时仍未处理的页数（范围之外的页面）
pub fn final_stats_lines(
    summary: &BatchSummary,
    untouched: usize,
    log_file_path: &str,
) -> Vec<String> {
    let rate = if summary.total == 0 {
        0.0
    } else {
        summary.succeeded as f64 * 100.0 / summary.total as f64
    };

    vec![
        format!(
            "📊 运行结束 {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ),
        format!(
            "✅ {}/{} 页成功 ({:.0}%)，❌ {} 页失败",
            summary.succeeded, summary.total, rate, summary.failed
        ),
        format!("⏸ 范围外未处理: {} 页", untouched),
        format!("📝 日志: {}", log_file_path),
    ]
}

/// 以 info 级别输出 [`final_stats_lines`]
pub fn print_final_stats(summary: &BatchSummary, untouched: usize, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    for line in final_stats_lines(summary, untouched, log_file_path) {
        info!("{}", line);
    }
    info!("{}", "=".repeat(60));
}

/// 按字符数截断，超出部分以 `...` 代替
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_owned(),
    }
}
