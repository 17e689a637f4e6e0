use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::verdict::Verdict;

/// 评测结束但未成功时写入 `judge_output` 的标记
pub const JUDGE_ERROR_MARKER: &str = "Judge error";
/// 评测成功时写入 `judge_output` 的标记
pub const JUDGED_FROM_REPO_MARKER: &str = "AI Judge evaluated the code from repo.";

/// 提交状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    /// 等待评测
    #[default]
    Pending,
    /// 通过
    Accepted,
    /// 答案错误
    WrongAnswer,
    /// 运行错误
    RuntimeError,
    /// 超时
    #[serde(rename = "tle")]
    TimeLimitExceeded,
    /// 超内存
    #[serde(rename = "mle")]
    MemoryLimitExceeded,
    /// 评测失败或代码有错误
    Error,
}

impl SubmissionStatus {
    /// 获取状态名称
    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Accepted => "accepted",
            SubmissionStatus::WrongAnswer => "wrong_answer",
            SubmissionStatus::RuntimeError => "runtime_error",
            SubmissionStatus::TimeLimitExceeded => "tle",
            SubmissionStatus::MemoryLimitExceeded => "mle",
            SubmissionStatus::Error => "error",
        }
    }

    /// 解析评测模型给出的状态
    ///
    /// 模型只允许返回 accepted / wrong_answer / error，其他取值一律视为 error。
    pub fn from_verdict_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "accepted" => Some(SubmissionStatus::Accepted),
            "wrong_answer" => Some(SubmissionStatus::WrongAnswer),
            "error" => Some(SubmissionStatus::Error),
            _ => None,
        }
    }

    /// 是否为评测终态
    pub fn is_terminal(self) -> bool {
        self != SubmissionStatus::Pending
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 学生提交
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub user_id: i64,
    pub problem_id: i64,
    pub repo_url: Option<String>,
    pub commit_sha: Option<String>,
    pub language: Option<String>,
    pub status: SubmissionStatus,
    pub score: i32,
    pub ai_feedback: Option<String>,
    pub judge_output: Option<String>,
    /// 实际参与评测的代码快照
    pub code_content: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Submission {
    /// 创建一条待评测的提交（id 由存储层分配）
    pub fn pending(
        user_id: i64,
        problem_id: i64,
        repo_url: Option<String>,
        language: Option<String>,
    ) -> Self {
        Self {
            id: 0,
            user_id,
            problem_id,
            repo_url,
            commit_sha: None,
            language,
            status: SubmissionStatus::Pending,
            score: 0,
            ai_feedback: None,
            judge_output: None,
            code_content: None,
            timestamp: Utc::now(),
        }
    }

    /// 写入评测结果
    pub fn apply_verdict(&mut self, verdict: Verdict) {
        self.status = verdict.status;
        self.score = verdict.score;
        self.ai_feedback = Some(verdict.feedback);
        self.judge_output = Some(JUDGED_FROM_REPO_MARKER.to_string());
    }

    /// 强制置为错误终态
    pub fn mark_error(&mut self, message: impl Into<String>) {
        self.status = SubmissionStatus::Error;
        self.score = 0;
        self.ai_feedback = Some(message.into());
        self.judge_output = Some(JUDGE_ERROR_MARKER.to_string());
    }
}
