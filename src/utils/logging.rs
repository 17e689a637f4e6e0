/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use tracing::info;

use crate::config::Config;

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 批量评测模式");
    info!("📊 最大并发数: {}", config.max_concurrent_submissions);
    info!("🤖 评测模型: {}", config.llm_model_name);
    info!("🎭 评测人设: {}", config.judge_persona);
    if config.llm_api_key.is_none() {
        info!("⚠️ 未配置 LLM_API_KEY，所有提交都会被判为 error");
    }
    info!("{}", "=".repeat(60));
}

/// 记录任务加载信息
///
/// # 参数
/// - `jobs`: 任务文件数量
/// - `submissions`: 待评测提交数量
pub fn log_jobs_loaded(jobs: usize, submissions: usize) {
    info!("✓ 找到 {} 个评测任务，共 {} 个待评测提交", jobs, submissions);
}

/// 打印最终统计信息
///
/// # 参数
/// - `accepted`: 通过数量
/// - `wrong_answer`: 答案错误数量
/// - `error`: 评测失败或代码有错误的数量
/// - `report_path`: 结果文件路径
pub fn print_final_stats(accepted: usize, wrong_answer: usize, error: usize, report_path: &str) {
    let total = accepted + wrong_answer + error;
    info!("\n{}", "=".repeat(60));
    info!("📊 全部评测完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 通过: {}/{}", accepted, total);
    info!("❎ 答案错误: {}", wrong_answer);
    info!("❌ 错误: {}", error);
    info!("{}", "=".repeat(60));
    info!("\n结果已保存至: {}", report_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text_counts_chars() {
        assert_eq!(truncate_text("abc", 5), "abc");
        assert_eq!(truncate_text("abcdef", 3), "abc...");
        assert_eq!(truncate_text("题目描述很长", 2), "题目...");
    }
}
