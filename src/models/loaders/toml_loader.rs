use crate::models::problem::{Problem, TestCase};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 一个评测任务文件：一道题 + 测试用例 + 若干学生提交
#[derive(Debug, Clone, Deserialize)]
pub struct JudgeJob {
    pub problem: Problem,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
    #[serde(default)]
    pub submissions: Vec<JobSubmission>,
    #[serde(skip)]
    pub file_path: Option<String>,
}

/// 任务文件中的单条提交
#[derive(Debug, Clone, Deserialize)]
pub struct JobSubmission {
    pub username: String,
    #[serde(default)]
    pub github_access_token: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    /// 省略时按用户名和题目标题推导
    #[serde(default)]
    pub repo_url: Option<String>,
}

/// 从 TOML 文件加载评测任务
pub async fn load_toml_to_judge_job(toml_file_path: &Path) -> Result<JudgeJob> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", toml_file_path.display()))?;

    let mut job: JudgeJob = toml::from_str(&content)
        .with_context(|| format!("无法解析TOML文件: {}", toml_file_path.display()))?;

    job.file_path = Some(toml_file_path.to_string_lossy().to_string());

    Ok(job)
}

/// 从文件夹中加载所有 TOML 评测任务
///
/// 解析失败的文件只记录警告并跳过。
pub async fn load_all_toml_files(folder_path: &str) -> Result<Vec<JudgeJob>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut paths = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            paths.push(path);
        }
    }
    // 保证加载顺序稳定
    paths.sort();

    let mut jobs = Vec::new();
    for path in paths {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_toml_to_judge_job(&path).await {
            Ok(job) => {
                tracing::info!(
                    "成功加载题目「{}」: {} 个测试用例, {} 个提交",
                    job.problem.title,
                    job.test_cases.len(),
                    job.submissions.len()
                );
                jobs.push(job);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {:#}", path.display(), e);
            }
        }
    }

    Ok(jobs)
}
