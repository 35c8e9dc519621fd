use clap::Parser;
use std::path::PathBuf;

use manga_enhance::{Config, ProcessingOptions, Quality, RunRequest};

#[derive(Parser, Debug)]
#[command(name = "manga-enhance")]
#[command(author, version, about = "漫画逐页上色 / 翻译批处理工具", long_about = None)]
pub struct Cli {
    /// 输入文件（jpg / png / webp / bmp 图片，或 zip / cbz 压缩包），按顺序拼接
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// 起始页（从 1 开始）
    #[arg(long)]
    pub start: Option<usize>,

    /// 结束页（包含），超出页数时自动截断
    #[arg(long)]
    pub end: Option<usize>,

    /// 不上色
    #[arg(long)]
    pub no_colorize: bool,

    /// 翻译页面中的文字
    #[arg(long)]
    pub translate: bool,

    /// 翻译目标语言
    #[arg(long = "lang")]
    pub target_language: Option<String>,

    /// 输出画质: standard / high / ultra（或 1k / 2k / 4k）
    #[arg(long)]
    pub quality: Option<Quality>,

    /// 结果图保存目录
    #[arg(long)]
    pub output_dir: Option<String>,

    /// 处理完成后把所有结果打包到此 ZIP
    #[arg(long = "zip")]
    pub zip_path: Option<PathBuf>,

    /// 使用的模型
    #[arg(long)]
    pub model: Option<String>,

    /// TOML 配置文件
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// 显示详细日志
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// 命令行参数覆盖配置
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(model) = &self.model {
            config.model_name = model.clone();
        }
        if self.verbose {
            config.verbose_logging = true;
        }
    }

    pub fn options(&self, config: &Config) -> ProcessingOptions {
        ProcessingOptions {
            colorize: !self.no_colorize,
            translate: self.translate,
            target_language: self
                .target_language
                .clone()
                .unwrap_or_else(|| config.default_target_language.clone()),
            quality: self.quality.unwrap_or(config.default_quality),
        }
    }

    /// 只给出一端时，另一端取最宽的值，由会话截断
    pub fn range(&self) -> Option<(usize, usize)> {
        match (self.start, self.end) {
            (None, None) => None,
            (start, end) => Some((start.unwrap_or(1), end.unwrap_or(usize::MAX))),
        }
    }

    pub fn request(&self, config: &Config) -> RunRequest {
        RunRequest {
            inputs: self.inputs.clone(),
            range: self.range(),
            options: self.options(config),
            zip_path: self.zip_path.clone(),
        }
    }
}
