//! LLM 评测服务 - 业务能力层
//!
//! 只负责"让模型评测一份代码"这一能力：拼装提示词、发起一次调用、清理返回文本。
//! 不重试，也不解析结果。
//!
//! ## 失败
//! - 未配置 API Key：返回 [`JudgeError::Unavailable`]，不发起请求
//! - 调用失败：返回 [`JudgeError::Provider`]，保留原始错误信息
//! - 调用超时：返回 [`JudgeError::Timeout`]

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::clients::llm_client::{Evaluator, OpenAiEvaluator};
use crate::config::Config;
use crate::error::JudgeError;
use crate::models::persona::Persona;
use crate::services::prompt::build_judge_prompt;
use crate::utils::logging::truncate_text;

/// 一次评测调用的模型回复
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelReply {
    /// 模型返回的原文
    pub raw: String,
    /// 去掉代码块围栏后的文本
    pub text: String,
}

impl ModelReply {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let text = strip_code_fence(&raw);
        Self { raw, text }
    }
}

/// LLM 评测服务
pub struct LlmService {
    evaluator: Option<Arc<dyn Evaluator>>,
    persona: Persona,
    timeout: Duration,
}

impl LlmService {
    /// 按配置创建，未配置 API Key 时不创建客户端
    pub fn new(config: &Config) -> Self {
        let evaluator = config
            .llm_api_key
            .as_deref()
            .map(|key| Arc::new(OpenAiEvaluator::new(key, config)) as Arc<dyn Evaluator>);

        Self {
            evaluator,
            persona: Persona::from_key(Some(&config.judge_persona)),
            timeout: Duration::from_secs(config.evaluator_timeout_secs),
        }
    }

    /// 使用指定的评测模型创建
    pub fn with_evaluator(
        evaluator: Option<Arc<dyn Evaluator>>,
        persona: Persona,
        timeout: Duration,
    ) -> Self {
        Self {
            evaluator,
            persona,
            timeout,
        }
    }

    pub fn persona(&self) -> Persona {
        self.persona
    }

    /// 评测一份代码，返回模型回复
    ///
    /// # 参数
    /// - `user_code`: 学生代码（拉取失败时为占位文本）
    /// - `problem_desc`: 题目描述
    /// - `test_cases_info`: 渲染好的测试用例文本
    pub async fn judge(
        &self,
        user_code: &str,
        problem_desc: &str,
        test_cases_info: &str,
    ) -> Result<ModelReply, JudgeError> {
        let evaluator = self.evaluator.as_ref().ok_or(JudgeError::Unavailable)?;

        let prompt = build_judge_prompt(self.persona, user_code, problem_desc, test_cases_info);
        debug!(
            "调用评测模型 {}，人设: {}，提示词长度: {} 字符",
            evaluator.model_name(),
            self.persona,
            prompt.len()
        );

        let raw = tokio::time::timeout(self.timeout, evaluator.complete(&prompt))
            .await
            .map_err(|_| {
                warn!("评测模型调用超时 ({}s)", self.timeout.as_secs());
                JudgeError::Timeout {
                    secs: self.timeout.as_secs(),
                }
            })??;

        debug!("模型原始返回: {}", truncate_text(&raw, 200));

        Ok(ModelReply::new(raw))
    }
}

/// 去掉模型无视要求包上的 markdown 代码块
///
/// 以 ``` 开头时丢弃第一行，再丢弃结尾的 ```，最后去掉首尾空白。
pub fn strip_code_fence(raw: &str) -> String {
    let text = raw.trim();
    if !text.starts_with("```") {
        return text.to_string();
    }

    let body = text.split_once('\n').map(|(_, rest)| rest).unwrap_or("");
    let body = body.strip_suffix("```").unwrap_or(body);
    body.trim().to_string()
}
