//! # 服务发现集成测试
//!
//! 使用标准策略链，通过模拟注册中心验证各种响应形状与缓存行为

use pretty_assertions::assert_eq;
use reqwest::Client;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use diagram_gateway::config::DiscoveryConfig;
use diagram_gateway::discovery::{ServiceInstance, ServiceResolver, StaticServiceRegistry};
use diagram_gateway::vars::StaticVariables;

fn resolver(registry_uri: &str, instances: Vec<ServiceInstance>) -> ServiceResolver {
    let services = json!({
        "p.service-registry": [{"credentials": {"uri": "http://wrong.invalid"}}],
        "service-registry": [{"credentials": {"uri": format!("{registry_uri}/")}}]
    });
    let vars: StaticVariables = [("VCAP_SERVICES", services.to_string())]
        .into_iter()
        .collect();

    ServiceResolver::standard(
        &DiscoveryConfig::default(),
        Arc::new(StaticServiceRegistry::new(instances)),
        Arc::new(vars),
        Client::new(),
    )
}

#[tokio::test]
async fn static_instance_wins_before_registry() {
    let registry = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&registry)
        .await;

    let resolver = resolver(
        &registry.uri(),
        vec![ServiceInstance {
            service_id: "ORDER_SERVICE".to_string(),
            uri: "http://10.1.2.3:8080".to_string(),
        }],
    );

    // 大写加下划线变体命中
    assert_eq!(
        resolver.resolve("order-service").await.as_deref(),
        Some("http://10.1.2.3:8080")
    );
}

#[tokio::test]
async fn eureka_xml_host_is_used_first() {
    let registry = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/eureka/apps/BILLING"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<application><name>BILLING</name><instance><hostName>billing.internal</hostName></instance></application>",
        ))
        .mount(&registry)
        .await;

    let resolver = resolver(&registry.uri(), Vec::new());
    assert_eq!(
        resolver.resolve("billing").await.as_deref(),
        Some("https://billing.internal")
    );
}

#[tokio::test]
async fn json_instance_shape_and_positive_cache() {
    let registry = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/applications/catalog"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "application": {
                "instance": [{
                    "hostName": "catalog.internal",
                    "port": {"$": 8443},
                    "securePort": {"@enabled": "true"}
                }]
            }
        })))
        .expect(1)
        .mount(&registry)
        .await;

    let resolver = resolver(&registry.uri(), Vec::new());
    let first = resolver.resolve("catalog").await;
    let second = resolver.resolve("catalog").await;

    assert_eq!(first.as_deref(), Some("https://catalog.internal:8443"));
    assert_eq!(first, second);
    assert_eq!(resolver.cached("catalog"), first);
}

#[tokio::test]
async fn listing_scan_matches_ignoring_case() {
    let registry = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/eureka/apps"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "applications": {
                "application": [
                    {"name": "OTHER", "instance": [{"homePageUrl": "http://other/"}]},
                    {"name": "REPORTS", "instance": [{"statusPageUrl": "http://reports.internal:9000/actuator/info"}]}
                ]
            }
        })))
        .mount(&registry)
        .await;

    let resolver = resolver(&registry.uri(), Vec::new());
    assert_eq!(
        resolver.resolve("reports").await.as_deref(),
        Some("http://reports.internal:9000")
    );
}

#[tokio::test]
async fn misses_are_not_cached_and_clear_drops_hits() {
    let registry = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/ghost"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"url": "http://ghost"})))
        .mount(&registry)
        .await;

    let resolver = resolver(&registry.uri(), Vec::new());
    assert_eq!(resolver.resolve("phantom").await, None);
    assert!(resolver.is_empty());

    assert_eq!(resolver.resolve("ghost").await.as_deref(), Some("http://ghost"));
    assert_eq!(resolver.len(), 1);
    assert_eq!(resolver.clear(), 1);
    assert!(resolver.cached("ghost").is_none());
}
