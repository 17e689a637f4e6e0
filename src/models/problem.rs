use serde::{Deserialize, Serialize};

/// 题目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub id: i64,
    pub title: String,
    pub description: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_format: Option<String>,
}

fn default_difficulty() -> String {
    "Easy".to_string()
}

impl Problem {
    pub fn new(id: i64, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            difficulty: default_difficulty(),
            input_format: None,
            output_format: None,
        }
    }
}

/// 测试用例
///
/// 在任务文件中可以省略 `id` 与 `problem_id`，入库时再分配。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub problem_id: i64,
    pub input_data: String,
    pub expected_output: String,
    #[serde(default)]
    pub is_sample: bool,
}

impl TestCase {
    pub fn new(input_data: impl Into<String>, expected_output: impl Into<String>) -> Self {
        Self {
            id: 0,
            problem_id: 0,
            input_data: input_data.into(),
            expected_output: expected_output.into(),
            is_sample: false,
        }
    }
}
