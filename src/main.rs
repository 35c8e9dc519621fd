mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use cli::Cli;
use manga_enhance::utils::logging;
use manga_enhance::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // 加载配置
    let mut config = Config::from_env();
    if let Some(path) = &cli.config {
        config = config.with_file(path)?;
    }
    cli.apply_to(&mut config);

    // 初始化日志
    logging::init(config.verbose_logging);

    config.validate().context("配置校验失败")?;

    let request = cli.request(&config);
    if !request.options.has_any_task() {
        warn!("⚠️ 未启用上色或翻译，只会按原样重新生成图片");
    }

    // 初始化并运行应用
    let app = App::initialize(config)?;
    let summary = app.run(&request).await?;

    info!(
        "结束: 共 {} 页，成功 {}，失败 {}",
        summary.total, summary.succeeded, summary.failed
    );

    Ok(())
}
