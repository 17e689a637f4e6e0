use crate::clients::github_client::student_repo_url;
use crate::config::Config;
use crate::models::loaders::{load_all_toml_files, JudgeJob};
use crate::models::submission::{Submission, SubmissionStatus};
use crate::storage::{MemoryStore, SubmissionStore};
use crate::utils::logging::{log_jobs_loaded, log_startup, print_final_stats};
use crate::workflow::{judge_failed_message, SubmitFlow};
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    store: Arc<MemoryStore>,
    flow: Arc<SubmitFlow>,
}

/// 评测统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchStats {
    pub accepted: usize,
    pub wrong_answer: usize,
    pub error: usize,
}

impl BatchStats {
    fn record(&mut self, status: SubmissionStatus) {
        match status {
            SubmissionStatus::Accepted => self.accepted += 1,
            SubmissionStatus::WrongAnswer => self.wrong_answer += 1,
            _ => self.error += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.accepted + self.wrong_answer + self.error
    }
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);
        let flow = SubmitFlow::new(&config).context("初始化评测流程失败")?;
        Ok(Self::with_flow(config, flow))
    }

    /// 使用指定的提交流程创建
    pub fn with_flow(config: Config, flow: SubmitFlow) -> Self {
        Self {
            config,
            store: Arc::new(MemoryStore::new()),
            flow: Arc::new(flow),
        }
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// 运行应用主逻辑：加载任务 → 并发评测 → 输出结果
    pub async fn run(&self) -> Result<BatchStats> {
        info!("\n📁 正在扫描评测任务...");
        let jobs = load_all_toml_files(&self.config.jobs_folder).await?;

        if jobs.is_empty() {
            warn!("⚠️ 没有找到评测任务文件，程序结束");
            return Ok(BatchStats::default());
        }

        let pending = self.seed(&jobs).await?;
        log_jobs_loaded(jobs.len(), pending.len());

        let stats = self.judge_all(pending).await?;

        self.write_report().await?;
        print_final_stats(
            stats.accepted,
            stats.wrong_answer,
            stats.error,
            &self.config.output_report_file,
        );

        Ok(stats)
    }

    /// 把任务文件写入存储，返回待评测提交 id
    async fn seed(&self, jobs: &[JudgeJob]) -> Result<Vec<i64>> {
        for job in jobs {
            let problem = &job.problem;
            self.store.put_problem(problem.clone()).await;
            for test_case in &job.test_cases {
                self.store
                    .add_test_case(problem.id, test_case.clone())
                    .await;
            }

            for entry in &job.submissions {
                let user = self
                    .store
                    .upsert_user(&entry.username, entry.github_access_token.clone())
                    .await;
                let repo_url = entry.repo_url.clone().unwrap_or_else(|| {
                    student_repo_url(
                        &self.config.github_web_base_url,
                        &user.username,
                        &problem.title,
                    )
                });
                self.store
                    .insert_submission(Submission::pending(
                        user.id,
                        problem.id,
                        Some(repo_url),
                        entry.language.clone(),
                    ))
                    .await?;
            }
        }

        Ok(self.store.pending_submission_ids().await)
    }

    /// 并发评测，同时进行的提交数量受配置限制
    pub async fn judge_all(&self, submission_ids: Vec<i64>) -> Result<BatchStats> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_submissions));
        let mut ids = Vec::with_capacity(submission_ids.len());
        let mut handles = Vec::with_capacity(submission_ids.len());

        for submission_id in submission_ids {
            let permit = semaphore.clone().acquire_owned().await?;
            let flow = Arc::clone(&self.flow);
            let store = Arc::clone(&self.store);

            handles.push(tokio::spawn(async move {
                let _permit = permit;
                flow.judge_by_id(&*store, submission_id).await
            }));
            ids.push(submission_id);
        }

        let mut stats = BatchStats::default();
        let results = futures::future::join_all(handles).await;
        for (submission_id, result) in ids.into_iter().zip(results) {
            match result {
                Ok(Ok(judged)) => stats.record(judged.status),
                Ok(Err(e)) => {
                    error!("[提交 #{}] ❌ 评测结果无法保存: {}", submission_id, e);
                    stats.record(SubmissionStatus::Error);
                }
                Err(e) => {
                    // 任务 panic 时提交仍停留在 pending，这里补写终态
                    error!("[提交 #{}] 任务执行失败: {}", submission_id, e);
                    self.force_error(submission_id, &e).await;
                    stats.record(SubmissionStatus::Error);
                }
            }
        }

        Ok(stats)
    }

    async fn force_error(&self, submission_id: i64, reason: &dyn std::fmt::Display) {
        let result = async {
            let mut submission = self.store.get_submission(submission_id).await?;
            submission.mark_error(judge_failed_message(reason));
            self.store.save_submission(&submission).await
        }
        .await;

        if let Err(e) = result {
            error!("[提交 #{}] 无法写入错误状态: {}", submission_id, e);
        }
    }

    async fn write_report(&self) -> Result<()> {
        let submissions = self.store.all_submissions().await;
        let report = serde_json::to_string_pretty(&submissions)?;
        tokio::fs::write(&self.config.output_report_file, report)
            .await
            .with_context(|| format!("无法写入结果文件: {}", self.config.output_report_file))?;
        Ok(())
    }
}
