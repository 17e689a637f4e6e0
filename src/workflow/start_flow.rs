//! 开题流程 - 流程层
//!
//! 学生开始一道题时为其创建题目仓库；在编辑器里保存代码时提交到仓库主分支。
//! 访问令牌按用户从存储中读取。

use tracing::info;

use crate::clients::github_client::{student_repo_name, GithubClient, SOLUTION_FILE};
use crate::config::Config;
use crate::error::{AppResult, RepoError};
use crate::models::problem::Problem;
use crate::models::user::User;
use crate::storage::SubmissionStore;

const EDITOR_COMMIT_MESSAGE: &str = "Update solution from MiniCode editor";

/// 开题流程
pub struct StartFlow {
    github: GithubClient,
}

impl StartFlow {
    pub fn new(config: &Config) -> AppResult<Self> {
        Ok(Self::with_client(GithubClient::new(config)?))
    }

    pub fn with_client(github: GithubClient) -> Self {
        Self { github }
    }

    /// 开始做题：创建（或复用）学生的题目仓库，返回仓库地址
    pub async fn start_problem(
        &self,
        store: &dyn SubmissionStore,
        user_id: i64,
        problem_id: i64,
    ) -> AppResult<String> {
        let (user, problem) = load(store, user_id, problem_id).await?;
        let token = user.access_token().ok_or(RepoError::MissingToken)?;

        let repo_url = self
            .github
            .provision_student_repo(token, &user.username, &problem)
            .await?;
        info!("📦 {} 开始题目「{}」: {}", user.username, problem.title, repo_url);
        Ok(repo_url)
    }

    /// 保存编辑器中的代码到 `solution.py`，返回提交 sha
    pub async fn save_code(
        &self,
        store: &dyn SubmissionStore,
        user_id: i64,
        problem_id: i64,
        code: &str,
    ) -> AppResult<String> {
        let (user, problem) = load(store, user_id, problem_id).await?;
        let token = user.access_token().ok_or(RepoError::MissingToken)?;

        let repo_name = student_repo_name(&user.username, &problem.title);
        let sha = self
            .github
            .commit_file(token, &repo_name, SOLUTION_FILE, code, EDITOR_COMMIT_MESSAGE)
            .await?;
        info!("💾 {} 保存了题目「{}」的代码 ({})", user.username, problem.title, sha);
        Ok(sha)
    }
}

async fn load(
    store: &dyn SubmissionStore,
    user_id: i64,
    problem_id: i64,
) -> AppResult<(User, Problem)> {
    let user = store.get_user(user_id).await?;
    let problem = store.get_problem(problem_id).await?;
    Ok((user, problem))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::storage::MemoryStore;
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn store_with(token: Option<&str>) -> MemoryStore {
        let store = MemoryStore::new();
        store.upsert_user("alice", token.map(String::from)).await;
        store
            .put_problem(Problem::new(3, "Two Sum", "Find two numbers."))
            .await;
        store
    }

    async fn mount_login_and_repo(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/user"))
            .and(header("authorization", "Bearer ghp_alice"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "login": "alice" })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/alice/minicode-alice-two-sum"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "minicode-alice-two-sum",
                "full_name": "alice/minicode-alice-two-sum",
                "html_url": "https://github.com/alice/minicode-alice-two-sum",
            })))
            .mount(server)
            .await;
    }

    fn flow_for(server: &MockServer) -> StartFlow {
        StartFlow::with_client(GithubClient::with_base_url(&server.uri(), 5).unwrap())
    }

    #[tokio::test]
    async fn test_start_problem_reuses_existing_repo() {
        let server = MockServer::start().await;
        mount_login_and_repo(&server).await;
        Mock::given(method("POST"))
            .and(path("/user/repos"))
            .and(body_partial_json(json!({ "name": "minicode-alice-two-sum" })))
            .respond_with(ResponseTemplate::new(422))
            .expect(1)
            .mount(&server)
            .await;

        let store = store_with(Some("ghp_alice")).await;
        let url = flow_for(&server).start_problem(&store, 1, 3).await.unwrap();
        assert_eq!(url, "https://github.com/alice/minicode-alice-two-sum");
    }

    #[tokio::test]
    async fn test_save_code_commits_solution_file() {
        let server = MockServer::start().await;
        mount_login_and_repo(&server).await;
        Mock::given(method("GET"))
            .and(path("/repos/alice/minicode-alice-two-sum/contents/solution.py"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/repos/alice/minicode-alice-two-sum/contents/solution.py"))
            .and(body_partial_json(json!({
                "message": EDITOR_COMMIT_MESSAGE,
                "content": STANDARD.encode("print(42)\n"),
                "branch": "main",
            })))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({ "commit": { "sha": "abc" } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let store = store_with(Some("ghp_alice")).await;
        let sha = flow_for(&server)
            .save_code(&store, 1, 3, "print(42)\n")
            .await
            .unwrap();
        assert_eq!(sha, "abc");
    }

    #[tokio::test]
    async fn test_missing_token_is_rejected_before_any_request() {
        let server = MockServer::start().await;
        let store = store_with(None).await;

        let err = flow_for(&server)
            .start_problem(&store, 1, 3)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Repo(RepoError::MissingToken)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_problem_is_a_store_error() {
        let server = MockServer::start().await;
        let store = store_with(Some("ghp_alice")).await;

        let err = flow_for(&server)
            .save_code(&store, 1, 404, "pass")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("problem #404"));
    }
}
