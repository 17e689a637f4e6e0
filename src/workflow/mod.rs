pub mod judge_ctx;
pub mod judge_flow;
pub mod start_flow;
pub mod submit_flow;

pub use judge_ctx::JudgeCtx;
pub use judge_flow::{JudgeFlow, JudgeOutcome};
pub use start_flow::StartFlow;
pub use submit_flow::{judge_failed_message, SubmitFlow};
