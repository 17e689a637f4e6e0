use crate::error::ConfigError;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 同时评测的提交数量
    pub max_concurrent_submissions: usize,
    /// 评测任务 TOML 文件存放目录
    pub jobs_folder: String,
    /// 评测结果输出文件（JSON）
    pub output_report_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 评测人设（standard / cto / professor / roast）
    pub judge_persona: String,
    // --- LLM 配置 ---
    /// 未配置时评测直接失败，不发起请求
    pub llm_api_key: Option<String>,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub llm_temperature: f32,
    pub llm_max_tokens: u32,
    pub evaluator_timeout_secs: u64,
    // --- 代码仓库配置 ---
    pub github_api_base_url: String,
    pub github_web_base_url: String,
    pub repo_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_submissions: 8,
            jobs_folder: "judge_jobs".to_string(),
            output_report_file: "judge_report.json".to_string(),
            verbose_logging: false,
            judge_persona: "standard".to_string(),
            llm_api_key: None,
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            llm_model_name: "gemini-2.5-flash".to_string(),
            llm_temperature: 0.2,
            llm_max_tokens: 2048,
            evaluator_timeout_secs: 120,
            github_api_base_url: "https://api.github.com".to_string(),
            github_web_base_url: "https://github.com".to_string(),
            repo_timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            max_concurrent_submissions: env_parse("MAX_CONCURRENT_SUBMISSIONS")
                .unwrap_or(default.max_concurrent_submissions),
            jobs_folder: std::env::var("JOBS_FOLDER").unwrap_or(default.jobs_folder),
            output_report_file: std::env::var("OUTPUT_REPORT_FILE")
                .unwrap_or(default.output_report_file),
            verbose_logging: env_parse("VERBOSE_LOGGING").unwrap_or(default.verbose_logging),
            judge_persona: std::env::var("JUDGE_PERSONA").unwrap_or(default.judge_persona),
            llm_api_key: std::env::var("LLM_API_KEY")
                .or_else(|_| std::env::var("GEMINI_API_KEY"))
                .ok()
                .filter(|key| !key.trim().is_empty()),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL")
                .unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            llm_temperature: env_parse("LLM_TEMPERATURE").unwrap_or(default.llm_temperature),
            llm_max_tokens: env_parse("LLM_MAX_TOKENS").unwrap_or(default.llm_max_tokens),
            evaluator_timeout_secs: env_parse("EVALUATOR_TIMEOUT_SECS")
                .unwrap_or(default.evaluator_timeout_secs),
            github_api_base_url: std::env::var("GITHUB_API_BASE_URL")
                .unwrap_or(default.github_api_base_url),
            github_web_base_url: std::env::var("GITHUB_WEB_BASE_URL")
                .unwrap_or(default.github_web_base_url),
            repo_timeout_secs: env_parse("REPO_TIMEOUT_SECS").unwrap_or(default.repo_timeout_secs),
        }
    }

    /// 校验配置取值范围
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_submissions == 0 {
            return Err(ConfigError::InvalidValue {
                var_name: "MAX_CONCURRENT_SUBMISSIONS".to_string(),
                value: "0".to_string(),
                expected: "正整数".to_string(),
            });
        }
        if !(0.0..=2.0).contains(&self.llm_temperature) {
            return Err(ConfigError::InvalidValue {
                var_name: "LLM_TEMPERATURE".to_string(),
                value: self.llm_temperature.to_string(),
                expected: "0.0 ~ 2.0".to_string(),
            });
        }
        for (var_name, secs) in [
            ("EVALUATOR_TIMEOUT_SECS", self.evaluator_timeout_secs),
            ("REPO_TIMEOUT_SECS", self.repo_timeout_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    var_name: var_name.to_string(),
                    value: "0".to_string(),
                    expected: "大于 0 的秒数".to_string(),
                });
            }
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(var_name: &str) -> Option<T> {
    std::env::var(var_name).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(config.llm_api_key.is_none());
        assert_eq!(config.judge_persona, "standard");
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let config = Config {
            max_concurrent_submissions: 0,
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("MAX_CONCURRENT_SUBMISSIONS"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = Config {
            repo_timeout_secs: 0,
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("REPO_TIMEOUT_SECS"));
    }
}
