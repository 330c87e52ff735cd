//! # 域名模式探测
//!
//! 用本进程对外域名拼出候选主机名，逐个发送健康检查请求。探测严格串行，
//! 首个成功即停止，冷启动最坏延迟为全部失败探测超时之和。

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use super::DiscoveryStrategy;
use super::descriptor::advertised_domain;
use super::variants::domain_candidates;
use crate::logging::{LogComponent, LogStage};
use crate::vars::VariableSource;
use crate::{ldebug, linfo};

/// 候选地址探测器
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EndpointProber: Send + Sync {
    /// 候选地址可用时返回 true
    async fn probe(&self, base_url: &str) -> bool;
}

/// 基于 HTTP 健康检查的探测器
#[derive(Debug, Clone)]
pub struct HttpEndpointProber {
    client: Client,
    health_path: String,
    timeout: Duration,
}

impl HttpEndpointProber {
    /// 创建探测器
    #[must_use]
    pub fn new(client: Client, health_path: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            health_path: health_path.into(),
            timeout,
        }
    }
}

#[async_trait]
impl EndpointProber for HttpEndpointProber {
    async fn probe(&self, base_url: &str) -> bool {
        let url = format!("{base_url}{}", self.health_path);
        let response = tokio::time::timeout(self.timeout, self.client.get(&url).send()).await;

        match response {
            Ok(Ok(resp)) => resp.status().is_success(),
            Ok(Err(e)) => {
                ldebug!(
                    "system",
                    LogStage::Discovery,
                    LogComponent::ServiceResolver,
                    "probe_failed",
                    "Candidate health probe failed",
                    url = %url,
                    error = %e
                );
                false
            }
            Err(_) => false,
        }
    }
}

/// 域名模式探测策略
pub struct DomainProbeStrategy {
    vars: Arc<dyn VariableSource>,
    prober: Arc<dyn EndpointProber>,
}

impl DomainProbeStrategy {
    /// 创建域名探测策略
    pub fn new(vars: Arc<dyn VariableSource>, prober: Arc<dyn EndpointProber>) -> Self {
        Self { vars, prober }
    }
}

#[async_trait]
impl DiscoveryStrategy for DomainProbeStrategy {
    fn name(&self) -> &'static str {
        "domain_probe"
    }

    async fn attempt(&self, token: &str) -> Option<String> {
        let domain = advertised_domain(self.vars.as_ref())?;

        for candidate in domain_candidates(token) {
            let url = format!("https://{candidate}.{domain}");
            if self.prober.probe(&url).await {
                linfo!(
                    "system",
                    LogStage::Discovery,
                    LogComponent::ServiceResolver,
                    "domain_probe_hit",
                    "Service reachable at platform route",
                    token = token,
                    url = %url
                );
                return Some(url);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::descriptor::APPLICATION_DESCRIPTOR;
    use crate::vars::StaticVariables;
    use std::sync::Mutex;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn vars_with_domain() -> Arc<dyn VariableSource> {
        Arc::new(
            [(
                APPLICATION_DESCRIPTOR,
                r#"{"uris": ["gateway.apps.example.com"]}"#,
            )]
            .into_iter()
            .collect::<StaticVariables>(),
        )
    }

    /// 记录探测顺序，只对指定地址返回成功
    struct RecordingProber {
        seen: Mutex<Vec<String>>,
        healthy: Option<String>,
    }

    #[async_trait]
    impl EndpointProber for RecordingProber {
        async fn probe(&self, base_url: &str) -> bool {
            self.seen.lock().unwrap().push(base_url.to_string());
            self.healthy.as_deref() == Some(base_url)
        }
    }

    #[tokio::test]
    async fn probes_all_six_candidates_in_order() {
        let prober = Arc::new(RecordingProber {
            seen: Mutex::new(Vec::new()),
            healthy: None,
        });
        let strategy = DomainProbeStrategy::new(vars_with_domain(), prober.clone());

        assert_eq!(strategy.attempt("Acme-Orders").await, None);
        assert_eq!(
            *prober.seen.lock().unwrap(),
            vec![
                "https://acme-orders.apps.example.com",
                "https://acme-orders.apps.example.com",
                "https://acmeorders.apps.example.com",
                "https://acme-orders.apps.example.com",
                "https://Acme-Orders.apps.example.com",
                "https://orders.apps.example.com",
            ]
        );
    }

    #[tokio::test]
    async fn stops_at_first_healthy_candidate() {
        let prober = Arc::new(RecordingProber {
            seen: Mutex::new(Vec::new()),
            healthy: Some("https://acmeorders.apps.example.com".to_string()),
        });
        let strategy = DomainProbeStrategy::new(vars_with_domain(), prober.clone());

        assert_eq!(
            strategy.attempt("acme-orders").await.as_deref(),
            Some("https://acmeorders.apps.example.com")
        );
        assert_eq!(prober.seen.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn skipped_without_deployment_descriptor() {
        let mut prober = MockEndpointProber::new();
        prober.expect_probe().never();
        let strategy =
            DomainProbeStrategy::new(Arc::new(StaticVariables::new()), Arc::new(prober));

        assert_eq!(strategy.attempt("acme-orders").await, None);
    }

    #[tokio::test]
    async fn http_prober_requires_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/actuator/health"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let prober = HttpEndpointProber::new(
            Client::new(),
            "/actuator/health",
            Duration::from_secs(5),
        );
        assert!(prober.probe(&server.uri()).await);

        let down = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&down)
            .await;
        assert!(!prober.probe(&down.uri()).await);
    }

    #[tokio::test]
    async fn http_prober_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let prober = HttpEndpointProber::new(
            Client::new(),
            "/actuator/health",
            Duration::from_millis(50),
        );
        assert!(!prober.probe(&server.uri()).await);
    }
}
