use serde::{Deserialize, Serialize};

/// 评测人设
///
/// 决定提示词开头的角色说明。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    /// 公正的编程导师
    #[default]
    Standard,
    /// 挑剔的 CTO
    Cto,
    /// 计算机系教授
    Professor,
    /// 毒舌代码审查
    Roast,
}

impl Persona {
    /// 按名称解析人设，未知或为空时回退到 `Standard`
    pub fn from_key(key: Option<&str>) -> Self {
        match key.map(|k| k.trim().to_ascii_lowercase()).as_deref() {
            Some("standard") => Persona::Standard,
            Some("cto") => Persona::Cto,
            Some("professor") => Persona::Professor,
            Some("roast") => Persona::Roast,
            _ => Persona::Standard,
        }
    }

    /// 获取人设名称
    pub fn key(self) -> &'static str {
        match self {
            Persona::Standard => "standard",
            Persona::Cto => "cto",
            Persona::Professor => "professor",
            Persona::Roast => "roast",
        }
    }

    /// 获取角色说明文本
    pub fn preamble(self) -> &'static str {
        match self {
            Persona::Standard => "You are a Fair & Experienced Coding Mentor and Judge.",
            Persona::Cto => "You are a Grumpy CTO. Focus on Engineering Rigor and Architecture.",
            Persona::Professor => "You are a CS Professor. Focus on Algorithms and Complexity.",
            Persona::Roast => "You are a Sarcastic Code Reviewer. Be witty but helpful.",
        }
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_keys() {
        assert_eq!(Persona::from_key(Some("cto")), Persona::Cto);
        assert_eq!(Persona::from_key(Some("Professor")), Persona::Professor);
        assert_eq!(Persona::from_key(Some(" roast ")), Persona::Roast);
        assert_eq!(Persona::from_key(Some("standard")), Persona::Standard);
    }

    #[test]
    fn test_unknown_or_missing_falls_back_to_standard() {
        for key in [None, Some(""), Some("pirate"), Some("ctoo"), Some("标准")] {
            assert_eq!(Persona::from_key(key), Persona::Standard, "key: {:?}", key);
        }
    }

    #[test]
    fn test_every_persona_has_distinct_preamble() {
        let all = [
            Persona::Standard,
            Persona::Cto,
            Persona::Professor,
            Persona::Roast,
        ];
        for a in all {
            assert_eq!(Persona::from_key(Some(a.key())), a);
            for b in all {
                if a != b {
                    assert_ne!(a.preamble(), b.preamble());
                }
            }
        }
    }
}
