//! 代码仓库 API 客户端
//!
//! 封装学生代码仓库（GitHub REST v3）相关的调用：读取文件、创建仓库、提交代码。
//! 访问令牌按用户传入，客户端本身不持有任何凭据。

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::RepoError;
use crate::models::problem::Problem;
use crate::utils::logging::truncate_text;

const USER_AGENT_VALUE: &str = concat!("minicode-judge/", env!("CARGO_PKG_VERSION"));

/// 学生解答文件
pub const SOLUTION_FILE: &str = "solution.py";
/// 主分支
pub const PRIMARY_BRANCH: &str = "main";

const STARTER_CODE: &str = "# Write your solution here\n\ndef solve():\n    pass\n";

static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9._-]+").expect("slug 正则无效"));

/// 代码仓库读取能力
#[async_trait]
pub trait RepoHost: Send + Sync {
    /// 读取令牌所属用户名下 `repo_name` 仓库中 `path` 文件在 `git_ref` 上的内容
    async fn read_file(
        &self,
        token: &str,
        repo_name: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<String, RepoError>;
}

/// 仓库信息
#[derive(Debug, Clone, Deserialize)]
pub struct RepoInfo {
    pub name: String,
    pub full_name: String,
    pub html_url: String,
    #[serde(default = "default_branch")]
    pub default_branch: String,
}

fn default_branch() -> String {
    PRIMARY_BRANCH.to_string()
}

#[derive(Debug, Deserialize)]
struct AuthenticatedUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct ContentFile {
    path: String,
    sha: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommitRef {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct PutFileResponse {
    commit: CommitRef,
}

/// GitHub 客户端
#[derive(Debug, Clone)]
pub struct GithubClient {
    client: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
}

impl GithubClient {
    /// 创建新的 GitHub 客户端
    pub fn new(config: &Config) -> Result<Self, RepoError> {
        Self::with_base_url(&config.github_api_base_url, config.repo_timeout_secs)
    }

    /// 使用自定义 API 地址创建（测试时指向 mock server）
    pub fn with_base_url(base_url: &str, timeout_secs: u64) -> Result<Self, RepoError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        default_headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(default_headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
        })
    }

    /// 获取令牌对应的用户名
    pub async fn authenticated_login(&self, token: &str) -> Result<String, RepoError> {
        let url = format!("{}/user", self.base_url);
        let response = self.send(self.client.get(&url).bearer_auth(token)).await?;
        let response = expect_success(response, || {
            RepoError::BadResponse {
                status: 404,
                message: "authenticated user not found".to_string(),
            }
        })
        .await?;
        let user: AuthenticatedUser = response.json().await?;
        Ok(user.login)
    }

    /// 获取仓库信息
    pub async fn get_repo(
        &self,
        token: &str,
        owner: &str,
        repo_name: &str,
    ) -> Result<RepoInfo, RepoError> {
        let url = format!("{}/repos/{}/{}", self.base_url, owner, repo_name);
        debug!(url = %url, "获取仓库信息");
        let response = self.send(self.client.get(&url).bearer_auth(token)).await?;
        let response = expect_success(response, || {
            RepoError::RepoNotFound(format!("{}/{}", owner, repo_name))
        })
        .await?;
        Ok(response.json().await?)
    }

    /// 为学生创建题目仓库，返回仓库网页地址
    ///
    /// 仓库已存在时直接返回已有仓库的地址。
    pub async fn provision_student_repo(
        &self,
        token: &str,
        username: &str,
        problem: &Problem,
    ) -> Result<String, RepoError> {
        let repo_name = student_repo_name(username, &problem.title);
        let owner = self.authenticated_login(token).await?;

        match self
            .create_repo(
                token,
                &repo_name,
                &format!("Solution for {} on MiniCode", problem.title),
            )
            .await
        {
            Ok(repo) => {
                let readme = format!("# {}\n\n{}", problem.title, problem.description);
                if let Err(e) = self
                    .upsert_file(
                        token,
                        &owner,
                        &repo.name,
                        "README.md",
                        "Initialize with problem description",
                        &readme,
                    )
                    .await
                {
                    // README 只是说明，失败不影响仓库使用
                    warn!("⚠️ 更新 README 失败 ({}): {}", repo.full_name, e);
                }

                self.upsert_file(
                    token,
                    &owner,
                    &repo.name,
                    SOLUTION_FILE,
                    "Add starter code",
                    STARTER_CODE,
                )
                .await?;

                info!("✓ 已创建学生仓库: {}", repo.html_url);
                Ok(repo.html_url)
            }
            Err(RepoError::AlreadyExists(_)) => {
                info!("仓库 {}/{} 已存在，直接复用", owner, repo_name);
                let repo = self.get_repo(token, &owner, &repo_name).await?;
                Ok(repo.html_url)
            }
            Err(e) => Err(e),
        }
    }

    /// 将编辑器中的代码提交到学生仓库主分支，返回提交 sha
    pub async fn commit_file(
        &self,
        token: &str,
        repo_name: &str,
        path: &str,
        content: &str,
        message: &str,
    ) -> Result<String, RepoError> {
        let owner = self.authenticated_login(token).await?;
        let repo = self.get_repo(token, &owner, repo_name).await?;
        self.upsert_file(token, &owner, &repo.name, path, message, content)
            .await
    }

    async fn create_repo(
        &self,
        token: &str,
        repo_name: &str,
        description: &str,
    ) -> Result<RepoInfo, RepoError> {
        let url = format!("{}/user/repos", self.base_url);
        let body = json!({
            "name": repo_name,
            "description": description,
            "private": true,
            "auto_init": true,
        });
        let response = self
            .send(self.client.post(&url).bearer_auth(token).json(&body))
            .await?;

        if response.status() == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(RepoError::AlreadyExists(repo_name.to_string()));
        }
        let response = expect_success(response, || {
            RepoError::BadResponse {
                status: 404,
                message: "repository creation endpoint not found".to_string(),
            }
        })
        .await?;
        Ok(response.json().await?)
    }

    /// 读取文件元数据与内容，文件不存在时返回 None
    async fn get_content(
        &self,
        token: &str,
        owner: &str,
        repo_name: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<Option<ContentFile>, RepoError> {
        let url = format!(
            "{}/repos/{}/{}/contents/{}",
            self.base_url, owner, repo_name, path
        );
        let response = self
            .send(
                self.client
                    .get(&url)
                    .bearer_auth(token)
                    .query(&[("ref", git_ref)]),
            )
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = expect_success(response, || RepoError::FileNotFound {
            path: path.to_string(),
        })
        .await?;
        Ok(Some(response.json().await?))
    }

    /// 创建或更新主分支上的文件，返回提交 sha
    async fn upsert_file(
        &self,
        token: &str,
        owner: &str,
        repo_name: &str,
        path: &str,
        message: &str,
        content: &str,
    ) -> Result<String, RepoError> {
        let existing_sha = self
            .get_content(token, owner, repo_name, path, PRIMARY_BRANCH)
            .await?
            .map(|file| file.sha);

        let mut body = json!({
            "message": message,
            "content": STANDARD.encode(content),
            "branch": PRIMARY_BRANCH,
        });
        if let Some(sha) = existing_sha {
            body["sha"] = json!(sha);
        }

        let url = format!(
            "{}/repos/{}/{}/contents/{}",
            self.base_url, owner, repo_name, path
        );
        let response = self
            .send(self.client.put(&url).bearer_auth(token).json(&body))
            .await?;
        let response = expect_success(response, || {
            RepoError::RepoNotFound(format!("{}/{}", owner, repo_name))
        })
        .await?;
        let put: PutFileResponse = response.json().await?;
        debug!("已提交 {} 到 {}/{} ({})", path, owner, repo_name, put.commit.sha);
        Ok(put.commit.sha)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, RepoError> {
        request.send().await.map_err(|e| {
            if e.is_timeout() {
                RepoError::Timeout {
                    secs: self.timeout_secs,
                }
            } else {
                RepoError::Transport(e.to_string())
            }
        })
    }
}

#[async_trait]
impl RepoHost for GithubClient {
    async fn read_file(
        &self,
        token: &str,
        repo_name: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<String, RepoError> {
        let owner = self.authenticated_login(token).await?;
        let repo = self.get_repo(token, &owner, repo_name).await?;
        let file = self
            .get_content(token, &owner, &repo.name, path, git_ref)
            .await?
            .ok_or_else(|| RepoError::FileNotFound {
                path: path.to_string(),
            })?;
        decode_content(&file)
    }
}

async fn expect_success(
    response: Response,
    on_not_found: impl FnOnce() -> RepoError,
) -> Result<Response, RepoError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(on_not_found());
    }
    let message = response.text().await.unwrap_or_default();
    Err(RepoError::BadResponse {
        status: status.as_u16(),
        message: truncate_text(message.trim(), 200),
    })
}

fn decode_content(file: &ContentFile) -> Result<String, RepoError> {
    let decode_err = |message: String| RepoError::Decode {
        path: file.path.clone(),
        message,
    };

    if let Some(encoding) = file.encoding.as_deref() {
        if encoding != "base64" {
            return Err(decode_err(format!("unsupported encoding '{}'", encoding)));
        }
    }
    let raw = file.content.as_deref().unwrap_or_default();
    // GitHub 返回的 base64 每 60 个字符换行
    let cleaned: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(cleaned)
        .map_err(|e| decode_err(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| decode_err(e.to_string()))
}

/// 从仓库地址中取出仓库短名
///
/// `https://github.com/alice/minicode-alice-two-sum/` → `minicode-alice-two-sum`
pub fn repo_name_from_url(repo_url: &str) -> Option<String> {
    let last = repo_url.trim().trim_end_matches('/').rsplit('/').next()?;
    let name = last.strip_suffix(".git").unwrap_or(last);
    if name.is_empty() || name.contains(':') {
        None
    } else {
        Some(name.to_string())
    }
}

/// 学生题目仓库的网页地址
pub fn student_repo_url(web_base_url: &str, username: &str, problem_title: &str) -> String {
    format!(
        "{}/{}/{}",
        web_base_url.trim_end_matches('/'),
        username,
        student_repo_name(username, problem_title)
    )
}

/// 学生题目仓库的命名规则：`minicode-{用户名}-{题目标题 slug}`
pub fn student_repo_name(username: &str, problem_title: &str) -> String {
    let lowered = problem_title.trim().to_lowercase();
    let slug = NON_SLUG_CHARS.replace_all(&lowered, "-");
    format!("minicode-{}-{}", username, slug.trim_matches('-'))
}
