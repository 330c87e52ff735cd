//! # 日志配置模块
//!
//! 统一的 tracing 初始化与结构化日志宏。每条日志都携带
//! `request_id`、`stage`、`component`、`operation` 四个字段，便于按请求串联。

use std::env;
use std::fmt;
use tracing_subscriber::{EnvFilter, fmt as tracing_fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// 请求处理阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStage {
    /// 启动
    Startup,
    /// 关闭
    Shutdown,
    /// 配置加载
    Configuration,
    /// 服务发现
    Discovery,
    /// 凭证解析
    Authentication,
    /// 缓存访问
    Cache,
    /// 上游请求
    UpstreamRequest,
    /// 响应处理
    Response,
    /// 响应失败
    ResponseFailure,
    /// 模板替换
    Template,
    /// 后台任务
    BackgroundTask,
    /// 内部处理
    Internal,
}

impl fmt::Display for LogStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Startup => "startup",
            Self::Shutdown => "shutdown",
            Self::Configuration => "configuration",
            Self::Discovery => "discovery",
            Self::Authentication => "authentication",
            Self::Cache => "cache",
            Self::UpstreamRequest => "upstream_request",
            Self::Response => "response",
            Self::ResponseFailure => "response_failure",
            Self::Template => "template",
            Self::BackgroundTask => "background_task",
            Self::Internal => "internal",
        };
        f.write_str(name)
    }
}

/// 产生日志的组件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogComponent {
    /// 主程序
    Main,
    /// 服务器初始化
    ServerSetup,
    /// 配置
    Config,
    /// 服务解析器
    ServiceResolver,
    /// 凭证解析器
    CredentialResolver,
    /// 代理执行器
    ProxyExecutor,
    /// 响应缓存
    ResponseCache,
    /// 模板引擎
    TemplateEngine,
    /// 图表存储
    Diagrams,
    /// HTTP 处理器
    Handler,
}

impl fmt::Display for LogComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Main => "main",
            Self::ServerSetup => "server_setup",
            Self::Config => "config",
            Self::ServiceResolver => "service_resolver",
            Self::CredentialResolver => "credential_resolver",
            Self::ProxyExecutor => "proxy_executor",
            Self::ResponseCache => "response_cache",
            Self::TemplateEngine => "template_engine",
            Self::Diagrams => "diagrams",
            Self::Handler => "handler",
        };
        f.write_str(name)
    }
}

/// 结构化 info 日志
#[macro_export]
macro_rules! linfo {
    ($request_id:expr, $stage:expr, $component:expr, $operation:expr, $message:expr $(, $($field:tt)+)?) => {
        ::tracing::info!(
            request_id = %$request_id,
            stage = %$stage,
            component = %$component,
            operation = $operation,
            $($($field)+,)?
            "{}",
            $message
        )
    };
}

/// 结构化 debug 日志
#[macro_export]
macro_rules! ldebug {
    ($request_id:expr, $stage:expr, $component:expr, $operation:expr, $message:expr $(, $($field:tt)+)?) => {
        ::tracing::debug!(
            request_id = %$request_id,
            stage = %$stage,
            component = %$component,
            operation = $operation,
            $($($field)+,)?
            "{}",
            $message
        )
    };
}

/// 结构化 warn 日志
#[macro_export]
macro_rules! lwarn {
    ($request_id:expr, $stage:expr, $component:expr, $operation:expr, $message:expr $(, $($field:tt)+)?) => {
        ::tracing::warn!(
            request_id = %$request_id,
            stage = %$stage,
            component = %$component,
            operation = $operation,
            $($($field)+,)?
            "{}",
            $message
        )
    };
}

/// 结构化 error 日志
#[macro_export]
macro_rules! lerror {
    ($request_id:expr, $stage:expr, $component:expr, $operation:expr, $message:expr $(, $($field:tt)+)?) => {
        ::tracing::error!(
            request_id = %$request_id,
            stage = %$stage,
            component = %$component,
            operation = $operation,
            $($($field)+,)?
            "{}",
            $message
        )
    };
}

/// 初始化日志系统
///
/// `RUST_LOG` 优先；否则使用 `{level},diagram_gateway=debug`。
pub fn init_logging(log_level: Option<&String>) {
    let level = log_level.map_or("info", String::as_str);
    let default_filter = format!("{level},diagram_gateway=debug,hyper=warn,reqwest=warn");

    let log_filter = env::var("RUST_LOG").unwrap_or(default_filter);

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_new(&log_filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_and_component_render_snake_case() {
        assert_eq!(LogStage::UpstreamRequest.to_string(), "upstream_request");
        assert_eq!(LogComponent::ServiceResolver.to_string(), "service_resolver");
    }

    #[test]
    fn macros_accept_optional_fields() {
        crate::linfo!("test", LogStage::Startup, LogComponent::Main, "op", "plain message");
        crate::lwarn!(
            "test",
            LogStage::Discovery,
            LogComponent::ServiceResolver,
            "op",
            &format!("with fields {}", 1),
            token = "svc",
            attempt = 2
        );
    }
}
