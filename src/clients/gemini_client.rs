/// Gemini 图像增强客户端
///
/// 封装对 `generateContent` 的单次调用：一张图片 + 一段指令 → 一张新图片
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clients::EnhancementClient;
use crate::config::Config;
use crate::error::{ConfigError, EnhanceError};
use crate::models::{ImagePayload, ProcessingOptions};
use crate::utils::logging::truncate_text;

const COLORIZE_DIRECTIVE: &str =
    "Colorize this manga page with realistic, natural colors while preserving the original line art.";
const RAW_OUTPUT_DIRECTIVE: &str =
    "Do not apply any filtering, smoothing, or stylization; return raw, unfiltered, pixel-level output.";
const OUTPUT_ONLY_DIRECTIVE: &str =
    "Output only the resulting image with no other commentary or text.";

/// 构建发送给服务的指令文本
///
/// 最多四行：上色、翻译（含目标语言）、不过滤、只输出图片
pub fn build_instructions(options: &ProcessingOptions) -> String {
    let mut lines = Vec::with_capacity(4);

    if options.colorize {
        lines.push(COLORIZE_DIRECTIVE.to_string());
    }
    if options.translate {
        lines.push(format!(
            "Detect all non-English text in the image and translate it into {}. \
             Overlay the translation in place of the original text, matching the original font style, size, and placement.",
            options.target_language
        ));
    }
    lines.push(RAW_OUTPUT_DIRECTIVE.to_string());
    lines.push(OUTPUT_ONLY_DIRECTIVE.to_string());

    lines.join("\n")
}

// ========== 请求 / 响应结构 ==========

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    role: &'static str,
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart {
    Image {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<&'static str>,
    image_config: ImageConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    image_size: &'static str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    text: Option<String>,
    inline_data: Option<InlineData>,
}

/// 从响应中取出第一张图片
fn extract_image(response: GenerateContentResponse) -> Result<ImagePayload, EnhanceError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            warn!("请求被服务拦截: {}", reason);
        }
        return Err(EnhanceError::NoCandidates);
    };

    let parts = candidate.content.map(|c| c.parts).unwrap_or_default();
    let mut texts = Vec::new();

    for part in parts {
        if let Some(inline) = part.inline_data {
            if inline.data.is_empty() {
                return Err(EnhanceError::InvalidPayload(format!(
                    "{} 图片数据为空",
                    inline.mime_type
                )));
            }
            return Ok(ImagePayload::new(inline.mime_type, inline.data));
        }
        if let Some(text) = part.text {
            texts.push(text);
        }
    }

    let text = if texts.is_empty() {
        candidate
            .finish_reason
            .map(|r| format!("finishReason={}", r))
            .unwrap_or_default()
    } else {
        texts.join(" ")
    };

    Err(EnhanceError::NonImageResponse {
        text: truncate_text(text.trim(), 200),
    })
}

/// Gemini 客户端
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    api_base_url: String,
    model_name: String,
}

impl GeminiClient {
    /// 创建新的客户端
    ///
    /// 缺少 API 密钥时直接失败，不会发出未认证的请求
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let api_key = config.require_api_key()?.to_string();

        Ok(Self {
            http: reqwest::Client::new(),
            api_key,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            model_name: config.model_name.clone(),
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base_url, self.model_name
        )
    }

    fn build_request(image: &ImagePayload, options: &ProcessingOptions) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![
                    RequestPart::Image {
                        inline_data: InlineData {
                            mime_type: image.mime_type.clone(),
                            data: image.data.clone(),
                        },
                    },
                    RequestPart::Text {
                        text: build_instructions(options),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["TEXT", "IMAGE"],
                image_config: ImageConfig {
                    image_size: options.quality.image_size(),
                },
            },
        }
    }
}

/// 解析响应体，非 JSON 或结构不符时返回 `InvalidPayload`
fn parse_response(body: &str) -> Result<GenerateContentResponse, EnhanceError> {
    serde_json::from_str(body).map_err(|e| {
        warn!("响应体无法解析: {}", e);
        EnhanceError::InvalidPayload(format!(
            "响应不是有效的 JSON: {} ({})",
            e,
            truncate_text(body, 120)
        ))
    })
}

#[async_trait]
impl EnhancementClient for GeminiClient {
    async fn enhance(
        &self,
        image: &ImagePayload,
        options: &ProcessingOptions,
    ) -> Result<ImagePayload, EnhanceError> {
        let endpoint = self.endpoint();
        debug!("正在调用增强服务，模型: {}", self.model_name);
        debug!("图片类型: {}, 数据长度: {}", image.mime_type, image.data.len());

        let request = Self::build_request(image, options);

        let response = self
            .http
            .post(&endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("增强服务调用失败: {}", e);
                EnhanceError::transport(&endpoint, e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EnhanceError::Api {
                status: status.as_u16(),
                body: truncate_text(&body, 500),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| EnhanceError::transport(&endpoint, e))?;
        let parsed = parse_response(&body)?;

        debug!("增强服务调用成功，候选数量: {}", parsed.candidates.len());

        extract_image(parsed)
    }
}
