//! 存储层
//!
//! 评测流程只依赖 [`SubmissionStore`] 这几个读写操作，具体存储方式由调用方决定。

pub mod memory;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::problem::{Problem, TestCase};
use crate::models::submission::Submission;
use crate::models::user::User;

pub use memory::MemoryStore;

/// 提交存储
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn get_user(&self, user_id: i64) -> Result<User, StoreError>;

    async fn get_problem(&self, problem_id: i64) -> Result<Problem, StoreError>;

    /// 按入库顺序返回题目的测试用例
    async fn list_test_cases(&self, problem_id: i64) -> Result<Vec<TestCase>, StoreError>;

    async fn get_submission(&self, submission_id: i64) -> Result<Submission, StoreError>;

    /// 写入新提交并分配 id
    async fn insert_submission(&self, submission: Submission) -> Result<Submission, StoreError>;

    /// 覆盖写回已有提交（后写覆盖先写）
    async fn save_submission(&self, submission: &Submission) -> Result<(), StoreError>;
}
