//! # 配置加载测试

use pretty_assertions::assert_eq;
use std::collections::HashMap;

use diagram_gateway::config::ConfigManager;

const SAMPLE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/config/config.dev.toml");

#[test]
fn bundled_dev_config_loads() {
    let config = ConfigManager::with_path(SAMPLE)
        .load_with_overrides(&HashMap::new())
        .unwrap();

    assert_eq!(config.server.port, 8080);
    assert_eq!(config.proxy.cache_ttl_ms, 30_000);
    assert_eq!(config.discovery.instances[0].service_id, "imc-db-server");
    assert_eq!(
        config.diagrams.details_directories,
        vec!["details", "configs/details", "../configs/details"]
    );
    assert_eq!(
        config.variables.get("METRICS_BASE").map(String::as_str),
        Some("http://localhost:8080")
    );
}

#[test]
fn environment_overrides_apply_on_top_of_file() {
    let overrides = ConfigManager::build_env_overrides([
        ("GATEWAY_SERVER_PORT".to_string(), "9191".to_string()),
        ("GATEWAY_PROXY_ENABLE_CACHING".to_string(), "false".to_string()),
        ("UNRELATED".to_string(), "x".to_string()),
    ]);
    let config = ConfigManager::with_path(SAMPLE)
        .load_with_overrides(&overrides)
        .unwrap();

    assert_eq!(config.server.port, 9191);
    assert!(!config.proxy.enable_caching);
}
