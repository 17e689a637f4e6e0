pub mod llm_service;
pub mod prompt;
pub mod result_interpreter;
pub mod source_fetcher;

pub use llm_service::{strip_code_fence, LlmService, ModelReply};
pub use prompt::{build_judge_prompt, render_test_cases};
pub use result_interpreter::{interpret, interpret_with_raw};
pub use source_fetcher::{fetch_failure_placeholder, SourceFetcher};
