//! 单元测试用的替身实现

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::clients::github_client::RepoHost;
use crate::clients::llm_client::Evaluator;
use crate::error::{JudgeError, RepoError};

/// 返回固定应答的评测模型，并记录收到的提示词
pub struct CannedEvaluator {
    reply: Result<String, String>,
    delay: Option<Duration>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl CannedEvaluator {
    pub fn reply(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            delay: None,
            calls: Arc::default(),
        }
    }

    pub fn fail(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            delay: None,
            calls: Arc::default(),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Evaluator for CannedEvaluator {
    async fn complete(&self, prompt: &str) -> Result<String, JudgeError> {
        self.calls.lock().unwrap().push(prompt.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply.clone().map_err(JudgeError::provider)
    }

    fn model_name(&self) -> &str {
        "canned"
    }
}

/// 返回固定文件内容（或固定错误）的代码仓库
pub struct FakeRepoHost {
    result: Result<String, RepoError>,
    delay: Option<Duration>,
    reads: Arc<Mutex<Vec<(String, String, String)>>>,
}

impl FakeRepoHost {
    pub fn with_file(content: &str) -> Self {
        Self {
            result: Ok(content.to_string()),
            delay: None,
            reads: Arc::default(),
        }
    }

    pub fn failing(err: RepoError) -> Self {
        Self {
            result: Err(err),
            delay: None,
            reads: Arc::default(),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// 已读取的 (仓库名, 文件路径, 分支)
    pub fn reads(&self) -> Arc<Mutex<Vec<(String, String, String)>>> {
        Arc::clone(&self.reads)
    }
}

#[async_trait]
impl RepoHost for FakeRepoHost {
    async fn read_file(
        &self,
        _token: &str,
        repo_name: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<String, RepoError> {
        self.reads.lock().unwrap().push((
            repo_name.to_string(),
            path.to_string(),
            git_ref.to_string(),
        ));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.result.clone()
    }
}
