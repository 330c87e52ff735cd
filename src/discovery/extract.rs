//! # 注册中心响应解析
//!
//! 不同注册中心对同一概念使用不同字段名，这里按固定顺序逐个探测响应形状，
//! 每个解析函数只返回 `Option`，互不依赖。

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static ACTUATOR_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/actuator.*$").expect("valid regex"));
static INFO_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/info.*$").expect("valid regex"));
static ACTUATOR_HEALTH_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/actuator/health.*$").expect("valid regex"));
static HEALTH_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/health.*$").expect("valid regex"));

const HOST_OPEN: &str = "<hostName>";
const HOST_CLOSE: &str = "</hostName>";

fn non_blank_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.trim().is_empty())
}

fn first_element(value: &Value) -> Option<&Value> {
    value.as_array().and_then(|items| items.first())
}

/// 从 Eureka XML 片段中取第一个 `<hostName>`，返回 `https://{host}`
#[must_use]
pub fn extract_xml_host(xml: &str) -> Option<String> {
    let start = xml.find(HOST_OPEN)? + HOST_OPEN.len();
    let end = start + xml[start..].find(HOST_CLOSE)?;
    let host = xml[start..end].trim();
    (!host.is_empty()).then(|| format!("https://{host}"))
}

/// 扁平形状：`url`、`uri`、`endpoints[0].url`
#[must_use]
pub fn extract_standard_url(info: &Value) -> Option<String> {
    info.get("url")
        .and_then(non_blank_str)
        .or_else(|| info.get("uri").and_then(non_blank_str))
        .or_else(|| {
            info.get("endpoints")
                .and_then(first_element)
                .and_then(|endpoint| endpoint.get("url"))
                .and_then(non_blank_str)
        })
        .map(str::to_string)
}

/// Eureka 嵌套形状：`application.instance[0]` 或 `instance[0]`
#[must_use]
pub fn extract_eureka_url(info: &Value) -> Option<String> {
    info.pointer("/application/instance")
        .and_then(first_element)
        .and_then(extract_instance_url)
        .or_else(|| {
            info.get("instance")
                .and_then(first_element)
                .and_then(extract_instance_url)
        })
}

/// 单个注册中心响应：先扁平形状，再 Eureka 形状
#[must_use]
pub fn extract_service_url(body: &str) -> Option<String> {
    let info: Value = serde_json::from_str(body).ok()?;
    extract_standard_url(&info).or_else(|| extract_eureka_url(&info))
}

/// 从单个 Eureka 实例推导访问地址
///
/// 依次尝试 `homePageUrl`、`statusPageUrl`（去掉状态/信息路径）、
/// `healthCheckUrl`（去掉健康检查路径）、`hostName` + `port`。
#[must_use]
pub fn extract_instance_url(instance: &Value) -> Option<String> {
    if let Some(home) = instance.get("homePageUrl").and_then(non_blank_str) {
        return Some(home.to_string());
    }

    if let Some(status) = instance.get("statusPageUrl").and_then(non_blank_str) {
        let stripped = ACTUATOR_SUFFIX.replace(status, "");
        return Some(INFO_SUFFIX.replace(&stripped, "").into_owned());
    }

    if let Some(health) = instance.get("healthCheckUrl").and_then(non_blank_str) {
        let stripped = ACTUATOR_HEALTH_SUFFIX.replace(health, "");
        return Some(HEALTH_SUFFIX.replace(&stripped, "").into_owned());
    }

    let host = instance.get("hostName").and_then(non_blank_str)?;
    let port = instance.get("port").and_then(parse_port)?;
    let scheme = if secure_port_enabled(instance) {
        "https"
    } else {
        "http"
    };

    Some(if port == 80 || port == 443 {
        format!("{scheme}://{host}")
    } else {
        format!("{scheme}://{host}:{port}")
    })
}

/// 端口既可能是 `{"$": 8080}` 也可能是裸数字或字符串
fn parse_port(port: &Value) -> Option<u16> {
    let raw = port.get("$").unwrap_or(port);
    match raw {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn secure_port_enabled(instance: &Value) -> bool {
    match instance.pointer("/securePort/@enabled") {
        Some(Value::Bool(enabled)) => *enabled,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// 在服务列表响应中按名称（忽略大小写）查找，取匹配应用的第一个实例
///
/// 支持 `applications.application[]`、`application[]` 与顶层数组三种形状。
#[must_use]
pub fn find_in_listing(body: &str, service_name: &str) -> Option<String> {
    let listing: Value = serde_json::from_str(body).ok()?;

    let applications = if let Some(apps) = listing.pointer("/applications/application") {
        apps
    } else if listing.get("application").is_some_and(Value::is_array) {
        &listing["application"]
    } else if listing.is_array() {
        &listing
    } else {
        return None;
    };

    applications
        .as_array()?
        .iter()
        .find(|app| {
            app.get("name")
                .and_then(Value::as_str)
                .is_some_and(|name| name.eq_ignore_ascii_case(service_name))
        })
        .and_then(|app| app.get("instance"))
        .and_then(first_element)
        .and_then(extract_instance_url)
}
