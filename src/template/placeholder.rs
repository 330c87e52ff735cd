//! 占位符解析
//!
//! 支持 `${NAME}` 与 `${NAME:DEFAULT}` 两种写法。

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// 占位符匹配模式，名称允许小写以便直接书写服务名（如 `${my-service}`）
pub static PLACEHOLDER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_-]*)(?::([^}]*))?\}").expect("valid regex")
});

/// 从字符串叶子中解析出的占位符
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// 占位符名称
    pub name: String,
    /// 默认值，`${NAME:}` 为空字符串
    pub default: Option<String>,
}

impl Placeholder {
    pub(crate) fn from_captures(caps: &Captures<'_>) -> Self {
        Self {
            name: caps[1].to_string(),
            default: caps.get(2).map(|m| m.as_str().to_string()),
        }
    }

    /// 按出现顺序解析文本中的全部占位符
    #[must_use]
    pub fn parse_all(text: &str) -> Vec<Self> {
        if !text.contains("${") {
            return Vec::new();
        }
        PLACEHOLDER_PATTERN
            .captures_iter(text)
            .map(|caps| Self::from_captures(&caps))
            .collect()
    }

    /// 名称是否像服务标识：含连字符、不含数字且长度大于 3
    ///
    /// 带连字符的普通变量名也会命中，此时先走一次服务发现再回退到变量查找。
    #[must_use]
    pub fn looks_like_service(&self) -> bool {
        self.name.contains('-')
            && !self.name.chars().any(|c| c.is_ascii_digit())
            && self.name.len() > 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn parses_names_and_defaults_in_order() {
        let found = Placeholder::parse_all("${DB_HOST:localhost}:${DB_PORT}/${my-service}");
        assert_eq!(
            found,
            vec![
                Placeholder {
                    name: "DB_HOST".into(),
                    default: Some("localhost".into())
                },
                Placeholder {
                    name: "DB_PORT".into(),
                    default: None
                },
                Placeholder {
                    name: "my-service".into(),
                    default: None
                },
            ]
        );
    }

    #[test]
    fn empty_default_is_kept_distinct_from_none() {
        let found = Placeholder::parse_all("${TOKEN:}");
        assert_eq!(found[0].default.as_deref(), Some(""));
    }

    #[rstest]
    #[case("${foo:bar}", "foo", Some("bar"))]
    #[case("${camelCase}", "camelCase", None)]
    #[case("${_private:x}", "_private", Some("x"))]
    fn lowercase_names_are_placeholders(
        #[case] text: &str,
        #[case] name: &str,
        #[case] default: Option<&str>,
    ) {
        let found = Placeholder::parse_all(text);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, name);
        assert_eq!(found[0].default.as_deref(), default);
    }

    #[rstest]
    #[case("${}")]
    #[case("${9LIVES}")]
    #[case("${has space}")]
    #[case("$NAME")]
    #[case("{NAME}")]
    fn malformed_tokens_do_not_match(#[case] text: &str) {
        assert!(Placeholder::parse_all(text).is_empty());
    }

    #[rstest]
    #[case("my-service", true)]
    #[case("MY-SERVICE", true)]
    #[case("a-b", false)]
    #[case("svc-2", false)]
    #[case("DB_HOST", false)]
    #[case("HYPHEN-ATED-VAR", true)]
    fn service_heuristic(#[case] name: &str, #[case] expected: bool) {
        let placeholder = Placeholder {
            name: name.to_string(),
            default: None,
        };
        assert_eq!(placeholder.looks_like_service(), expected);
    }
}
