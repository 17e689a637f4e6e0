use serde::{Deserialize, Serialize};

use crate::models::submission::SubmissionStatus;

/// 评测结论：(状态, 分数, 反馈)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub status: SubmissionStatus,
    pub score: i32,
    pub feedback: String,
}
