//! 评测流程 - 流程层
//!
//! 核心职责：定义"一次提交"的完整评测流程
//!
//! 流程顺序：
//! 1. 拉取代码（失败时得到占位代码，不中断；读取超时直接记为评测失败）
//! 2. 渲染测试用例
//! 3. 调用评测模型
//! 4. 解析结果
//! 5. 写回提交（只写一次）
//!
//! 流程结束后提交一定处于终态：要么是模型给出的结论，要么是 error。

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::clients::github_client::{GithubClient, RepoHost};
use crate::config::Config;
use crate::error::{AppResult, JudgeError, StoreError};
use crate::models::problem::{Problem, TestCase};
use crate::models::submission::Submission;
use crate::models::user::User;
use crate::models::verdict::Verdict;
use crate::services::prompt::render_test_cases;
use crate::services::result_interpreter::interpret_with_raw;
use crate::services::{LlmService, SourceFetcher};
use crate::storage::SubmissionStore;
use crate::utils::logging::truncate_text;
use crate::workflow::judge_ctx::JudgeCtx;

/// 一次评测的终态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JudgeOutcome {
    /// 模型给出了结论
    Judged(Verdict),
    /// 模型不可用或调用失败
    Failed(JudgeError),
}

impl JudgeOutcome {
    /// 把终态写入提交，同时记录参与评测的代码（没读到代码时为 None）
    pub fn apply(self, submission: &mut Submission, code: Option<String>) {
        match self {
            JudgeOutcome::Judged(verdict) => submission.apply_verdict(verdict),
            JudgeOutcome::Failed(err) => submission.mark_error(err.to_string()),
        }
        submission.code_content = code;
    }
}

/// 评测流程
///
/// - 编排 拉取 → 评测 → 解析 → 写回
/// - 负责把所有失败转换成提交上的数据
/// - 不持有任何可变状态，多次提交可以并发评测
pub struct JudgeFlow {
    fetcher: SourceFetcher,
    llm_service: LlmService,
    verbose_logging: bool,
}

impl JudgeFlow {
    /// 按配置创建（代码仓库使用 GitHub）
    pub fn new(config: &Config) -> AppResult<Self> {
        let host: Arc<dyn RepoHost> = Arc::new(GithubClient::new(config)?);
        Ok(Self {
            fetcher: SourceFetcher::new(host, Duration::from_secs(config.repo_timeout_secs)),
            llm_service: LlmService::new(config),
            verbose_logging: config.verbose_logging,
        })
    }

    /// 使用指定组件创建
    pub fn with_parts(fetcher: SourceFetcher, llm_service: LlmService) -> Self {
        Self {
            fetcher,
            llm_service,
            verbose_logging: false,
        }
    }

    /// 评测并写回提交
    ///
    /// 只有写回失败才会返回错误，此时由调用方负责兜底。
    pub async fn run(
        &self,
        mut submission: Submission,
        user: &User,
        problem: &Problem,
        test_cases: &[TestCase],
        store: &dyn SubmissionStore,
    ) -> Result<Submission, StoreError> {
        self.judge(&mut submission, user, problem, test_cases).await;

        store.save_submission(&submission).await.map_err(|e| {
            error!("[提交 #{}] ❌ 写回评测结果失败: {}", submission.id, e);
            e
        })?;

        Ok(submission)
    }

    /// 只评测不写回，直接修改内存中的提交
    pub async fn judge(
        &self,
        submission: &mut Submission,
        user: &User,
        problem: &Problem,
        test_cases: &[TestCase],
    ) -> JudgeOutcome {
        let ctx = JudgeCtx::new(submission, user, problem);
        info!("{} 🔍 开始评测", ctx);

        let (outcome, code) = self.evaluate(&ctx, submission, user, problem, test_cases).await;
        outcome.clone().apply(submission, code);

        match &outcome {
            JudgeOutcome::Judged(verdict) => info!(
                "{} ✓ 评测完成: {} ({} 分)",
                ctx, verdict.status, verdict.score
            ),
            JudgeOutcome::Failed(_) => info!("{} ❌ 评测失败，已记为 error", ctx),
        }

        outcome
    }

    async fn evaluate(
        &self,
        ctx: &JudgeCtx,
        submission: &Submission,
        user: &User,
        problem: &Problem,
        test_cases: &[TestCase],
    ) -> (JudgeOutcome, Option<String>) {
        // ========== 1. 拉取代码 ==========
        let code = match self.fetcher.fetch(user, submission).await {
            Ok(code) => code,
            Err(e) => {
                warn!("{} ⚠️ 拉取代码超时，不再请求评测模型: {}", ctx, e);
                return (JudgeOutcome::Failed(e), None);
            }
        };
        if self.verbose_logging {
            info!("{} 代码预览: {}", ctx, truncate_text(&code, 120));
        }

        // ========== 2. 渲染测试用例 ==========
        let test_cases_info = render_test_cases(test_cases);

        // ========== 3. 调用评测模型 ==========
        let outcome = match self
            .llm_service
            .judge(&code, &problem.description, &test_cases_info)
            .await
        {
            // ========== 4. 解析结果 ==========
            Ok(reply) => JudgeOutcome::Judged(interpret_with_raw(&reply.text, &reply.raw)),
            Err(e) => {
                warn!("{} ⚠️ 评测模型不可用: {}", ctx, e);
                JudgeOutcome::Failed(e)
            }
        };

        (outcome, Some(code))
    }
}
