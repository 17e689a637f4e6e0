//! 评测上下文
//!
//! 封装"我正在评测谁的哪次提交"这一信息，只用于日志前缀

use std::fmt::Display;

use crate::models::problem::Problem;
use crate::models::submission::Submission;
use crate::models::user::User;

/// 评测上下文
#[derive(Debug, Clone)]
pub struct JudgeCtx {
    pub submission_id: i64,
    pub username: String,
    pub problem_title: String,
}

impl JudgeCtx {
    pub fn new(submission: &Submission, user: &User, problem: &Problem) -> Self {
        Self {
            submission_id: submission.id,
            username: user.username.clone(),
            problem_title: problem.title.clone(),
        }
    }
}

impl Display for JudgeCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[提交 #{} 用户 {} 题目「{}」]",
            self.submission_id, self.username, self.problem_title
        )
    }
}
