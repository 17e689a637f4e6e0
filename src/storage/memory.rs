use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::problem::{Problem, TestCase};
use crate::models::submission::{Submission, SubmissionStatus};
use crate::models::user::User;
use crate::storage::SubmissionStore;

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    problems: BTreeMap<i64, Problem>,
    test_cases: Vec<TestCase>,
    submissions: BTreeMap<i64, Submission>,
    next_user_id: i64,
    next_test_case_id: i64,
    next_submission_id: i64,
}

/// 内存存储
///
/// 批量评测时由任务文件填充，结束后整体导出。
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按用户名写入用户，已存在时更新令牌（新令牌为空则保留旧的）
    pub async fn upsert_user(&self, username: &str, token: Option<String>) -> User {
        let mut tables = self.tables.write().await;
        if let Some(user) = tables.users.values_mut().find(|u| u.username == username) {
            if token.is_some() {
                user.github_access_token = token;
            }
            return user.clone();
        }

        tables.next_user_id += 1;
        let user = User::new(tables.next_user_id, username, token);
        tables.users.insert(user.id, user.clone());
        user
    }

    /// 写入题目，同 id 覆盖
    pub async fn put_problem(&self, problem: Problem) {
        self.tables
            .write()
            .await
            .problems
            .insert(problem.id, problem);
    }

    /// 追加测试用例并分配 id
    pub async fn add_test_case(&self, problem_id: i64, mut test_case: TestCase) -> TestCase {
        let mut tables = self.tables.write().await;
        tables.next_test_case_id += 1;
        test_case.id = tables.next_test_case_id;
        test_case.problem_id = problem_id;
        tables.test_cases.push(test_case.clone());
        test_case
    }

    /// 所有待评测提交的 id
    pub async fn pending_submission_ids(&self) -> Vec<i64> {
        self.tables
            .read()
            .await
            .submissions
            .values()
            .filter(|s| s.status == SubmissionStatus::Pending)
            .map(|s| s.id)
            .collect()
    }

    /// 按 id 顺序导出所有提交
    pub async fn all_submissions(&self) -> Vec<Submission> {
        self.tables
            .read()
            .await
            .submissions
            .values()
            .cloned()
            .collect()
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    async fn get_user(&self, user_id: i64) -> Result<User, StoreError> {
        self.tables
            .read()
            .await
            .users
            .get(&user_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("user", user_id))
    }

    async fn get_problem(&self, problem_id: i64) -> Result<Problem, StoreError> {
        self.tables
            .read()
            .await
            .problems
            .get(&problem_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("problem", problem_id))
    }

    async fn list_test_cases(&self, problem_id: i64) -> Result<Vec<TestCase>, StoreError> {
        Ok(self
            .tables
            .read()
            .await
            .test_cases
            .iter()
            .filter(|tc| tc.problem_id == problem_id)
            .cloned()
            .collect())
    }

    async fn get_submission(&self, submission_id: i64) -> Result<Submission, StoreError> {
        self.tables
            .read()
            .await
            .submissions
            .get(&submission_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("submission", submission_id))
    }

    async fn insert_submission(&self, mut submission: Submission) -> Result<Submission, StoreError> {
        let mut tables = self.tables.write().await;
        tables.next_submission_id += 1;
        submission.id = tables.next_submission_id;
        tables.submissions.insert(submission.id, submission.clone());
        Ok(submission)
    }

    async fn save_submission(&self, submission: &Submission) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        match tables.submissions.get_mut(&submission.id) {
            Some(slot) => {
                *slot = submission.clone();
                Ok(())
            }
            None => Err(StoreError::not_found("submission", submission.id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_upsert_user_keeps_identity() {
        let store = MemoryStore::new();
        let first = store.upsert_user("alice", Some("t1".into())).await;
        let again = store.upsert_user("alice", None).await;
        assert_eq!(first.id, again.id);
        assert_eq!(again.access_token(), Some("t1"));

        let rotated = store.upsert_user("alice", Some("t2".into())).await;
        assert_eq!(rotated.access_token(), Some("t2"));

        let bob = store.upsert_user("bob", None).await;
        assert_ne!(bob.id, first.id);
    }

    #[tokio::test]
    async fn test_test_cases_are_scoped_and_ordered() {
        let store = MemoryStore::new();
        store.add_test_case(1, TestCase::new("a", "1")).await;
        store.add_test_case(2, TestCase::new("x", "9")).await;
        store.add_test_case(1, TestCase::new("b", "2")).await;

        let cases = assert_ok!(store.list_test_cases(1).await);
        let inputs: Vec<_> = cases.iter().map(|c| c.input_data.as_str()).collect();
        assert_eq!(inputs, ["a", "b"]);
        assert!(cases.iter().all(|c| c.problem_id == 1));
        assert!(assert_ok!(store.list_test_cases(3).await).is_empty());
    }

    #[tokio::test]
    async fn test_submission_lifecycle() {
        let store = MemoryStore::new();
        let inserted = assert_ok!(
            store
                .insert_submission(Submission::pending(1, 1, None, None))
                .await
        );
        assert_eq!(inserted.id, 1);
        assert_eq!(store.pending_submission_ids().await, vec![1]);

        let mut judged = inserted.clone();
        judged.mark_error("boom");
        assert_ok!(store.save_submission(&judged).await);

        let loaded = assert_ok!(store.get_submission(1).await);
        assert_eq!(loaded.status, SubmissionStatus::Error);
        assert!(store.pending_submission_ids().await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_records_are_not_found() {
        let store = MemoryStore::new();
        assert_eq!(
            assert_err!(store.get_problem(9).await),
            StoreError::not_found("problem", 9)
        );
        let mut ghost = Submission::pending(1, 1, None, None);
        ghost.id = 42;
        assert_err!(store.save_submission(&ghost).await);
        assert_err!(store.get_user(1).await);
    }
}
