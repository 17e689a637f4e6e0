pub mod github_client;
pub mod llm_client;

pub use github_client::{
    repo_name_from_url, student_repo_name, student_repo_url, GithubClient, RepoHost,
};
pub use llm_client::{Evaluator, OpenAiEvaluator};
