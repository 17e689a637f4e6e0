//! LLM API 客户端
//!
//! 评测模型只暴露一个能力：prompt → 原始文本。
//! 测试中用固定应答的实现替换，不需要网络。

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::JudgeError;

/// 评测模型
#[async_trait]
pub trait Evaluator: Send + Sync {
    /// 发送一次请求，返回模型的原始文本
    async fn complete(&self, prompt: &str) -> Result<String, JudgeError>;

    /// 模型名称（仅用于日志）
    fn model_name(&self) -> &str;
}

/// 兼容 OpenAI 接口的评测模型（Gemini / OpenAI / Doubao 等）
pub struct OpenAiEvaluator {
    client: Client<OpenAIConfig>,
    model_name: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiEvaluator {
    pub fn new(api_key: &str, config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
            temperature: config.llm_temperature,
            max_tokens: config.llm_max_tokens,
        }
    }
}

#[async_trait]
impl Evaluator for OpenAiEvaluator {
    async fn complete(&self, prompt: &str) -> Result<String, JudgeError> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("提示词长度: {} 字符", prompt.len());

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(JudgeError::provider)?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![ChatCompletionRequestMessage::User(user_msg)])
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()
            .map_err(JudgeError::provider)?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            JudgeError::provider(e)
        })?;

        debug!("LLM API 调用成功");

        // 没有内容时返回空文本，交给结果解析的兜底逻辑
        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default();

        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
