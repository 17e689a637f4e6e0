use serde::{Deserialize, Serialize};

/// 学生用户
///
/// 只保留评测需要的字段。
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: i64,
    pub username: String,
    /// 代码仓库访问令牌，按用户保存
    #[serde(default, skip_serializing)]
    pub github_access_token: Option<String>,
}

impl User {
    pub fn new(id: i64, username: impl Into<String>, token: Option<String>) -> Self {
        Self {
            id,
            username: username.into(),
            github_access_token: token,
        }
    }

    /// 获取非空的访问令牌
    pub fn access_token(&self) -> Option<&str> {
        self.github_access_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

// 令牌不进日志
impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field(
                "github_access_token",
                &self.github_access_token.as_ref().map(|_| "***"),
            )
            .finish()
    }
}
