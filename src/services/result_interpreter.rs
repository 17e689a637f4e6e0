//! 评测结果解析 - 业务能力层
//!
//! 把模型返回的文本转换成 [`Verdict`]。模型输出格式不受我们控制，
//! 因此这里永远不会失败：
//!
//! - 是 JSON 对象：逐个读取字段，缺失字段使用默认值
//! - 不是 JSON 对象：判为 accepted / 75 分，反馈为原文

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::models::submission::SubmissionStatus;
use crate::models::verdict::Verdict;

/// 无法解析时给出的分数
pub const FALLBACK_SCORE: i32 = 75;
/// 无法解析且原文为空时的反馈
pub const UNPARSEABLE_FEEDBACK: &str = "Could not parse AI response.";
/// JSON 中缺少 feedback 时的反馈
pub const MISSING_FEEDBACK: &str = "No feedback generated.";

const MIN_SCORE: i32 = 0;
const MAX_SCORE: i32 = 100;

/// 解析模型输出（已去掉代码块围栏）
pub fn interpret(text: &str) -> Verdict {
    interpret_with_raw(text, text)
}

/// 解析模型输出，无法解析时以原文 `raw` 作为反馈
///
/// `text` 是去掉围栏后的文本；围栏清理可能把原文清空，因此兜底反馈取原文。
pub fn interpret_with_raw(text: &str, raw: &str) -> Verdict {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(fields)) => from_fields(&fields),
        Ok(other) => {
            warn!("模型返回的 JSON 不是对象 ({}), 按纯文本处理", json_kind(&other));
            lenient(raw)
        }
        Err(e) => {
            debug!("模型返回的不是 JSON: {}", e);
            lenient(raw)
        }
    }
}

fn from_fields(fields: &Map<String, Value>) -> Verdict {
    let status = match fields.get("status") {
        None | Some(Value::Null) => SubmissionStatus::Error,
        Some(Value::String(s)) => SubmissionStatus::from_verdict_str(s).unwrap_or_else(|| {
            warn!("未知的评测状态 '{}', 记为 error", s);
            SubmissionStatus::Error
        }),
        Some(other) => {
            warn!("评测状态不是字符串: {}", other);
            SubmissionStatus::Error
        }
    };

    let score = fields.get("score").map(parse_score).unwrap_or(MIN_SCORE);

    let feedback = match fields.get("feedback") {
        None | Some(Value::Null) => MISSING_FEEDBACK.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };

    Verdict {
        status,
        score,
        feedback,
    }
}

/// 数字取整后限制在 0..=100，数字字符串同样接受，其他类型记 0 分
fn parse_score(value: &Value) -> i32 {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match number {
        Some(n) if n.is_finite() => {
            let rounded = n.round();
            let clamped = rounded.clamp(MIN_SCORE as f64, MAX_SCORE as f64) as i32;
            if rounded != clamped as f64 {
                warn!("评测分数 {} 超出范围，已限制为 {}", n, clamped);
            }
            clamped
        }
        _ => {
            warn!("无法识别的评测分数: {}", value);
            MIN_SCORE
        }
    }
}

fn lenient(raw: &str) -> Verdict {
    let feedback = if raw.trim().is_empty() {
        UNPARSEABLE_FEEDBACK.to_string()
    } else {
        raw.trim().to_string()
    };

    Verdict {
        status: SubmissionStatus::Accepted,
        score: FALLBACK_SCORE,
        feedback,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
