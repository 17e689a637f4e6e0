//! 提交流程 - 流程层
//!
//! 评测流程的调用方：创建待评测提交、准备上下文、调用 [`JudgeFlow`]，
//! 并在评测流程自身出错时把提交强制置为 error 终态。

use tracing::{error, info};

use crate::clients::github_client::student_repo_url;
use crate::config::Config;
use crate::error::AppResult;
use crate::models::submission::Submission;
use crate::storage::SubmissionStore;
use crate::workflow::judge_flow::JudgeFlow;

/// 提交流程
pub struct SubmitFlow {
    judge_flow: JudgeFlow,
    web_base_url: String,
}

impl SubmitFlow {
    /// 按配置创建
    pub fn new(config: &Config) -> AppResult<Self> {
        Ok(Self::with_judge_flow(
            JudgeFlow::new(config)?,
            &config.github_web_base_url,
        ))
    }

    pub fn with_judge_flow(judge_flow: JudgeFlow, web_base_url: &str) -> Self {
        Self {
            judge_flow,
            web_base_url: web_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// 学生提交一道题：创建提交并立即评测
    ///
    /// 仓库地址按用户名和题目标题推导，与开题时创建的仓库一致。
    pub async fn submit(
        &self,
        store: &dyn SubmissionStore,
        user_id: i64,
        problem_id: i64,
        language: &str,
    ) -> AppResult<Submission> {
        let user = store.get_user(user_id).await?;
        let problem = store.get_problem(problem_id).await?;

        let repo_url = student_repo_url(&self.web_base_url, &user.username, &problem.title);
        let submission = store
            .insert_submission(Submission::pending(
                user.id,
                problem.id,
                Some(repo_url),
                Some(language.to_string()),
            ))
            .await?;
        info!(
            "[提交 #{}] 📥 {} 提交了题目「{}」",
            submission.id, user.username, problem.title
        );

        self.judge_guarded(store, submission).await
    }

    /// 评测一条已存在的提交
    pub async fn judge_by_id(
        &self,
        store: &dyn SubmissionStore,
        submission_id: i64,
    ) -> AppResult<Submission> {
        let submission = store.get_submission(submission_id).await?;
        self.judge_guarded(store, submission).await
    }

    /// 评测失败兜底：流程出错时提交仍然要落到 error 终态
    async fn judge_guarded(
        &self,
        store: &dyn SubmissionStore,
        submission: Submission,
    ) -> AppResult<Submission> {
        let fallback = submission.clone();

        let result = async {
            let user = store.get_user(submission.user_id).await?;
            let problem = store.get_problem(submission.problem_id).await?;
            let test_cases = store.list_test_cases(problem.id).await?;
            self.judge_flow
                .run(submission, &user, &problem, &test_cases, store)
                .await
        }
        .await;

        match result {
            Ok(judged) => Ok(judged),
            Err(e) => {
                error!("[提交 #{}] ❌ 评测流程出错: {}", fallback.id, e);
                let mut failed = fallback;
                failed.mark_error(judge_failed_message(&e));
                store.save_submission(&failed).await?;
                Ok(failed)
            }
        }
    }
}

/// 兜底时写入的反馈
pub fn judge_failed_message(err: &dyn std::fmt::Display) -> String {
    format!("Judge failed: {}", err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::llm_client::Evaluator;
    use crate::models::persona::Persona;
    use crate::models::problem::{Problem, TestCase};
    use crate::models::submission::{SubmissionStatus, JUDGE_ERROR_MARKER};
    use crate::services::{LlmService, SourceFetcher};
    use crate::storage::MemoryStore;
    use crate::testing::{CannedEvaluator, FakeRepoHost};
    use std::sync::Arc;
    use std::time::Duration;

    fn submit_flow(host: FakeRepoHost, reply: &str) -> SubmitFlow {
        let evaluator: Arc<dyn Evaluator> = Arc::new(CannedEvaluator::reply(reply));
        let judge_flow = JudgeFlow::with_parts(
            SourceFetcher::new(Arc::new(host), Duration::from_secs(5)),
            LlmService::with_evaluator(Some(evaluator), Persona::Standard, Duration::from_secs(5)),
        );
        SubmitFlow::with_judge_flow(judge_flow, "https://github.com/")
    }

    async fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        store.upsert_user("alice", Some("ghp_alice".into())).await;
        store.put_problem(Problem::new(7, "Two Sum", "Find two numbers.")).await;
        store.add_test_case(7, TestCase::new("[2,7], 9", "[0,1]")).await;
        store
    }

    #[tokio::test]
    async fn test_submit_creates_and_judges() {
        let store = seeded_store().await;
        let host = FakeRepoHost::with_file("def solve(): ...");
        let reads = host.reads();
        let flow = submit_flow(
            host,
            r#"{"status":"wrong_answer","score":20,"feedback":"Not implemented."}"#,
        );

        let judged = flow.submit(&store, 1, 7, "python").await.unwrap();

        assert_eq!(judged.id, 1);
        assert_eq!(
            judged.repo_url.as_deref(),
            Some("https://github.com/alice/minicode-alice-two-sum")
        );
        assert_eq!(judged.language.as_deref(), Some("python"));
        assert_eq!(judged.status, SubmissionStatus::WrongAnswer);
        assert_eq!(judged.score, 20);
        assert_eq!(reads.lock().unwrap()[0].0, "minicode-alice-two-sum");
        assert_eq!(store.get_submission(1).await.unwrap(), judged);
    }

    #[tokio::test]
    async fn test_submit_unknown_problem_is_rejected_before_insert() {
        let store = seeded_store().await;
        let flow = submit_flow(FakeRepoHost::with_file(""), "{}");
        let err = flow.submit(&store, 1, 404, "python").await.unwrap_err();
        assert!(err.to_string().contains("problem #404"));
        assert!(store.all_submissions().await.is_empty());
    }

    #[tokio::test]
    async fn test_broken_context_forces_error_state() {
        let store = seeded_store().await;
        // 提交指向不存在的用户
        let orphan = store
            .insert_submission(Submission::pending(99, 7, None, None))
            .await
            .unwrap();

        let flow = submit_flow(FakeRepoHost::with_file(""), "{}");
        let judged = flow.judge_by_id(&store, orphan.id).await.unwrap();

        assert_eq!(judged.status, SubmissionStatus::Error);
        assert_eq!(judged.score, 0);
        assert_eq!(judged.ai_feedback.as_deref(), Some("Judge failed: user #99 不存在"));
        assert_eq!(judged.judge_output.as_deref(), Some(JUDGE_ERROR_MARKER));
        assert_eq!(store.get_submission(orphan.id).await.unwrap(), judged);
    }
}
