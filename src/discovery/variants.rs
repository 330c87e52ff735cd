//! # 服务名变体
//!
//! 注册中心与平台路由对服务名的大小写和分隔符约定不一，这里生成固定顺序的候选名。

use indexmap::IndexSet;

/// 直接查询使用的名称序列：原名在前，随后是四种大小写/分隔符变体
///
/// 与原名相同的变体被跳过，重复变体只保留第一次出现。
#[must_use]
pub fn lookup_variants(token: &str) -> Vec<String> {
    let lower = token.to_lowercase();
    let upper = token.to_uppercase();
    let candidates = [
        lower.clone(),
        lower.replace('_', "-"),
        upper.clone(),
        upper.replace('-', "_"),
    ];

    let mut names: IndexSet<String> = IndexSet::new();
    names.insert(token.to_string());
    for candidate in candidates {
        names.insert(candidate);
    }
    names.into_iter().collect()
}

/// 域名探测使用的六个主机名前缀，顺序固定，不去重
#[must_use]
pub fn domain_candidates(token: &str) -> [String; 6] {
    let lower = token.to_lowercase();
    [
        lower.clone(),
        lower.replace('_', "-"),
        lower.replace('-', ""),
        token.to_uppercase().replace('_', "-").to_lowercase(),
        token.to_string(),
        simple_service_name(token).to_lowercase(),
    ]
}

/// 去掉第一个连字符及其之前的部分，例如 `prefix-service-name` → `service-name`
///
/// 不含连字符或连字符之后为空时返回原名。
#[must_use]
pub fn simple_service_name(token: &str) -> &str {
    match token.split_once('-') {
        Some((_, rest)) => {
            let rest = rest.trim_end_matches('-');
            if rest.is_empty() { token } else { rest }
        }
        None => token,
    }
}
