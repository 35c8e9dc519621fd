pub mod gemini_client;

pub use gemini_client::{build_instructions, GeminiClient};

use async_trait::async_trait;

use crate::error::EnhanceError;
use crate::models::{ImagePayload, ProcessingOptions};

/// 图像增强能力
///
/// 每页恰好调用一次，不重试
#[async_trait]
pub trait EnhancementClient: Send + Sync {
    async fn enhance(
        &self,
        image: &ImagePayload,
        options: &ProcessingOptions,
    ) -> Result<ImagePayload, EnhanceError>;
}
