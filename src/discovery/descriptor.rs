//! # 部署描述符
//!
//! 读取平台注入的 `VCAP_APPLICATION`（本进程对外地址）与 `VCAP_SERVICES`
//! （服务绑定，含注册中心凭证）。解析失败一律视为缺失。

use serde_json::Value;

use crate::vars::VariableSource;

/// 本进程部署描述符变量名
pub const APPLICATION_DESCRIPTOR: &str = "VCAP_APPLICATION";
/// 服务绑定描述符变量名
pub const SERVICES_DESCRIPTOR: &str = "VCAP_SERVICES";
/// 注册中心绑定名，按优先级排列
pub const REGISTRY_BINDING_NAMES: [&str; 4] =
    ["service-registry", "registry", "eureka", "p.service-registry"];

/// 从 `VCAP_APPLICATION.uris[0]` 推导对外域名
///
/// 域名取第一个 `.` 之后的部分；没有 `.` 时整个 URI 即为域名。
#[must_use]
pub fn advertised_domain(vars: &dyn VariableSource) -> Option<String> {
    let raw = vars.get(APPLICATION_DESCRIPTOR)?;
    let descriptor: Value = serde_json::from_str(&raw).ok()?;
    let first_uri = descriptor
        .get("uris")?
        .as_array()?
        .first()?
        .as_str()?
        .trim();

    if first_uri.is_empty() {
        return None;
    }

    let domain = first_uri
        .split_once('.')
        .map_or(first_uri, |(_, domain)| domain);
    Some(domain.to_string())
}

/// 从 `VCAP_SERVICES` 中定位注册中心地址
///
/// 按 [`REGISTRY_BINDING_NAMES`] 顺序取第一个存在的绑定，读取其第一个实例的
/// `credentials.uri`，缺失时读取 `credentials.url`。
#[must_use]
pub fn registry_base_url(vars: &dyn VariableSource) -> Option<String> {
    let raw = vars.get(SERVICES_DESCRIPTOR)?;
    let services: Value = serde_json::from_str(&raw).ok()?;

    REGISTRY_BINDING_NAMES.iter().find_map(|name| {
        let credentials = services
            .get(*name)?
            .as_array()?
            .first()?
            .get("credentials")?;
        credentials
            .get("uri")
            .or_else(|| credentials.get("url"))
            .and_then(Value::as_str)
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
    })
}
