use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 评测模型错误
    #[error("评测错误: {0}")]
    Judge(#[from] JudgeError),
    /// 代码仓库错误
    #[error("仓库错误: {0}")]
    Repo(#[from] RepoError),
    /// 存储错误
    #[error("存储错误: {0}")]
    Store(#[from] StoreError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 评测模型错误
///
/// `Display` 文本会原样写入提交的 `ai_feedback`，因此使用英文固定文案。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JudgeError {
    /// 未配置 API Key，未发起请求
    #[error("AI Judge unavailable (API key missing).")]
    Unavailable,
    /// 请求失败或服务端返回错误
    #[error("Evaluator Error: {message}")]
    Provider { message: String },
    /// 请求超时
    #[error("Evaluator Error: request timed out after {secs}s")]
    Timeout { secs: u64 },
    /// 读取学生仓库超时，未请求评测模型
    #[error("Judge Error: repository read timed out after {secs}s")]
    SourceTimeout { secs: u64 },
}

impl JudgeError {
    pub fn provider(source: impl std::fmt::Display) -> Self {
        JudgeError::Provider {
            message: source.to_string(),
        }
    }
}

/// 代码仓库错误
///
/// 拉取代码失败时，`Display` 文本会嵌入占位代码中交给评测模型。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepoError {
    #[error("user has no repository access token")]
    MissingToken,
    #[error("submission has no repository reference")]
    MissingRepoUrl,
    #[error("invalid repository reference: {0}")]
    InvalidRepoRef(String),
    #[error("repository not found: {0}")]
    RepoNotFound(String),
    #[error("file not found: {path}")]
    FileNotFound { path: String },
    #[error("repository already exists: {0}")]
    AlreadyExists(String),
    #[error("repository host returned {status}: {message}")]
    BadResponse { status: u16, message: String },
    #[error("request to repository host failed: {0}")]
    Transport(String),
    #[error("request to repository host timed out after {secs}s")]
    Timeout { secs: u64 },
    #[error("failed to decode {path}: {message}")]
    Decode { path: String, message: String },
}

impl From<reqwest::Error> for RepoError {
    fn from(err: reqwest::Error) -> Self {
        RepoError::Transport(err.to_string())
    }
}

/// 存储错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{entity} #{id} 不存在")]
    NotFound { entity: &'static str, id: i64 },
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        StoreError::NotFound { entity, id }
    }
}

/// 配置错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// 环境变量取值不合法
    #[error("环境变量 {var_name} 取值 '{value}' 不合法，期望: {expected}")]
    InvalidValue {
        var_name: String,
        value: String,
        expected: String,
    },
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_message_is_stable() {
        assert_eq!(
            JudgeError::Unavailable.to_string(),
            "AI Judge unavailable (API key missing)."
        );
    }

    #[test]
    fn test_provider_message_keeps_source() {
        let err = JudgeError::provider("connection reset");
        assert_eq!(err.to_string(), "Evaluator Error: connection reset");
    }

    #[test]
    fn test_app_error_wraps_store_error() {
        let err: AppError = StoreError::not_found("submission", 7).into();
        assert!(err.to_string().contains("submission #7"));
    }
}
