//! 代码拉取服务 - 业务能力层
//!
//! 从学生仓库主分支读取 `solution.py`。读取超时按评测失败处理；
//! 其他失败都转换成带错误说明的占位代码，评测流程照常继续。

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::clients::github_client::{repo_name_from_url, RepoHost, PRIMARY_BRANCH, SOLUTION_FILE};
use crate::error::{JudgeError, RepoError};
use crate::models::submission::Submission;
use crate::models::user::User;

/// 代码拉取服务
pub struct SourceFetcher {
    host: Arc<dyn RepoHost>,
    timeout: Duration,
}

impl SourceFetcher {
    pub fn new(host: Arc<dyn RepoHost>, timeout: Duration) -> Self {
        Self { host, timeout }
    }

    /// 拉取提交对应的代码
    ///
    /// 读取超时返回 [`JudgeError::SourceTimeout`]；其他失败返回占位代码（永远非空）。
    pub async fn fetch(
        &self,
        user: &User,
        submission: &Submission,
    ) -> Result<String, JudgeError> {
        match self.try_fetch(user, submission).await {
            Ok(code) => {
                debug!("已拉取代码 {} 字符", code.chars().count());
                Ok(code)
            }
            Err(RepoError::Timeout { secs }) => {
                warn!("拉取代码超时 (提交 #{}): {}s", submission.id, secs);
                Err(JudgeError::SourceTimeout { secs })
            }
            Err(e) => {
                warn!("拉取代码失败 (提交 #{}): {}", submission.id, e);
                Ok(fetch_failure_placeholder(&e))
            }
        }
    }

    async fn try_fetch(&self, user: &User, submission: &Submission) -> Result<String, RepoError> {
        let token = user.access_token().ok_or(RepoError::MissingToken)?;
        let repo_url = submission
            .repo_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(RepoError::MissingRepoUrl)?;
        let repo_name = repo_name_from_url(repo_url)
            .ok_or_else(|| RepoError::InvalidRepoRef(repo_url.to_string()))?;

        tokio::time::timeout(
            self.timeout,
            self.host
                .read_file(token, &repo_name, SOLUTION_FILE, PRIMARY_BRANCH),
        )
        .await
        .map_err(|_| RepoError::Timeout {
            secs: self.timeout.as_secs(),
        })?
    }
}

/// 拉取失败时交给评测模型的占位代码
pub fn fetch_failure_placeholder(err: &RepoError) -> String {
    format!("# Error fetching code: {}", err)
}
