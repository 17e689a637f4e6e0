//! 评测提示词

use crate::models::persona::Persona;
use crate::models::problem::TestCase;

/// 没有测试用例时的说明
pub const NO_TEST_CASES_NOTE: &str = "No test cases provided. Judge based on problem description.";

/// 把测试用例渲染成编号的 Input / Expected Output 文本块
pub fn render_test_cases(test_cases: &[TestCase]) -> String {
    if test_cases.is_empty() {
        return NO_TEST_CASES_NOTE.to_string();
    }

    test_cases
        .iter()
        .enumerate()
        .map(|(i, tc)| {
            format!(
                "Test Case {}:\n  Input: {}\n  Expected Output: {}\n\n",
                i + 1,
                tc.input_data,
                tc.expected_output
            )
        })
        .collect()
}

/// 构建评测提示词
///
/// 要求模型只返回一个包含 `status` / `score` / `feedback` 的 JSON 对象。
pub fn build_judge_prompt(
    persona: Persona,
    user_code: &str,
    problem_desc: &str,
    test_cases_info: &str,
) -> String {
    format!(
        r#"ROLE: {role}

TASK: You are an AI Hackathon Judge. Analyze this student's code submission for the given problem.

PROBLEM STATEMENT:
{problem_desc}

TEST CASES:
{test_cases_info}

STUDENT CODE:
```
{user_code}
```

INSTRUCTIONS:
1. First, determine if the code would produce the correct output for the given test cases.
2. Respond with a JSON object (and ONLY a JSON object, no markdown fences) with these fields:
   - "status": "accepted" if the code is correct, "wrong_answer" if incorrect, "error" if the code has bugs
   - "score": a number from 0 to 100 based on correctness, code quality, and efficiency
   - "feedback": a detailed markdown string with your analysis. Include:
     * Whether the solution is correct
     * Code quality observations
     * Time/space complexity analysis
     * Suggestions for improvement
     * If wrong, give hints without giving the full answer
"#,
        role = persona.preamble(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_empty_test_cases() {
        assert_eq!(render_test_cases(&[]), NO_TEST_CASES_NOTE);
    }

    #[test]
    fn test_render_numbers_from_one() {
        let rendered = render_test_cases(&[TestCase::new("1 2", "3"), TestCase::new("5 5", "10")]);
        assert_eq!(
            rendered,
            "Test Case 1:\n  Input: 1 2\n  Expected Output: 3\n\n\
             Test Case 2:\n  Input: 5 5\n  Expected Output: 10\n\n"
        );
    }

    #[test]
    fn test_prompt_embeds_every_part() {
        let prompt = build_judge_prompt(
            Persona::Professor,
            "def solve(): pass",
            "Add two numbers.",
            "Test Case 1:\n  Input: 1 2\n  Expected Output: 3\n\n",
        );
        assert!(prompt.starts_with("ROLE: You are a CS Professor."));
        assert!(prompt.contains("PROBLEM STATEMENT:\nAdd two numbers."));
        assert!(prompt.contains("Expected Output: 3"));
        assert!(prompt.contains("```\ndef solve(): pass\n```"));
        assert!(prompt.contains("\"status\""));
        assert!(prompt.contains("\"score\""));
        assert!(prompt.contains("\"feedback\""));
        assert!(prompt.contains("no markdown fences"));
    }
}
