//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 批量评测的"指挥中心"：加载任务文件、填充存储、控制并发、输出统计与结果文件。
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<Submission>)
//!     ↓
//! workflow::SubmitFlow (兜底：任何失败都落到 error 终态)
//!     ↓
//! workflow::JudgeFlow (处理单个 Submission)
//!     ↓
//! services (能力层：拉取代码 / 模型评测 / 结果解析)
//!     ↓
//! clients (GitHub / LLM)
//! ```
//!
//! ## 设计原则
//!
//! 1. **并发隔离**：每个提交一条独立流程，只共享存储
//! 2. **向下依赖**：编排层 → workflow → services → clients
//! 3. **无业务逻辑**：只做调度和统计，不做具体评测判断

pub mod batch_processor;

pub use batch_processor::{App, BatchStats};
