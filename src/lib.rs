//! # MiniCode Judge
//!
//! 编程练习平台的 AI 评测流水线：从学生的 GitHub 仓库拉取 `solution.py`，
//! 交给大模型按题目描述和测试用例评判，把结果写回提交记录。
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 只负责和外部服务通信
//! - `GithubClient` - 读取仓库文件、创建学生仓库、提交代码
//! - `OpenAiEvaluator` - OpenAI 兼容接口的大模型调用
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个提交
//! - `SourceFetcher` - 拉取学生代码，失败时给出占位文本
//! - `LlmService` - 构造提示词并请求评测
//! - `result_interpreter` - 宽松解析模型回复
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次提交"的完整评测流程
//! - `JudgeFlow` - 拉取 → 评测 → 解析 → 写回
//! - `SubmitFlow` - 创建提交并兜底，保证提交总能离开 pending
//! - `StartFlow` - 开题建仓库、保存编辑器代码
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量评测，管理并发和结果输出
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod storage;
pub mod utils;
pub mod workflow;

#[cfg(test)]
mod testing;

// 重新导出常用类型
pub use clients::{Evaluator, GithubClient, OpenAiEvaluator, RepoHost};
pub use config::Config;
pub use error::{AppError, AppResult, JudgeError, RepoError, StoreError};
pub use models::{Persona, Problem, Submission, SubmissionStatus, TestCase, User, Verdict};
pub use orchestrator::{App, BatchStats};
pub use services::{interpret, LlmService, SourceFetcher};
pub use storage::{MemoryStore, SubmissionStore};
pub use workflow::{JudgeFlow, JudgeOutcome, StartFlow, SubmitFlow};
