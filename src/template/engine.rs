//! # 模板替换引擎
//!
//! 遍历 JSON 文档中的所有字符串叶子，替换 `${...}` 占位符：
//! - 名称像服务标识时先查询 [`ServiceResolver`]
//! - 再按变量名查找，最后使用默认值
//! - 都没有时保留原始占位符并记录警告
//!
//! 文档无法解析时原样返回。

use indexmap::IndexSet;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

use super::placeholder::{PLACEHOLDER_PATTERN, Placeholder};
use crate::discovery::ServiceResolver;
use crate::logging::{LogComponent, LogStage};
use crate::vars::VariableSource;
use crate::{ldebug, lwarn};

/// 模板替换引擎
pub struct TemplateEngine {
    services: Arc<ServiceResolver>,
    vars: Arc<dyn VariableSource>,
}

impl TemplateEngine {
    /// 创建模板引擎
    #[must_use]
    pub fn new(services: Arc<ServiceResolver>, vars: Arc<dyn VariableSource>) -> Self {
        Self { services, vars }
    }

    /// 替换整份 JSON 文档，输出紧凑格式，键顺序保持不变
    pub async fn substitute(&self, document: &str) -> String {
        let tree: Value = match serde_json::from_str(document) {
            Ok(tree) => tree,
            Err(e) => {
                lwarn!(
                    "system",
                    LogStage::Template,
                    LogComponent::TemplateEngine,
                    "parse_failed",
                    "Document is not valid JSON, returning it unchanged",
                    error = %e
                );
                return document.to_string();
            }
        };

        let mut candidates = IndexSet::new();
        collect_service_candidates(&tree, &mut candidates);
        let services = self.resolve_services(candidates).await;

        let rewritten = self.rewrite(tree, &services);
        serde_json::to_string(&rewritten).unwrap_or_else(|_| document.to_string())
    }

    /// 替换单个字符串
    pub async fn substitute_text(&self, text: &str) -> String {
        let candidates: IndexSet<String> = Placeholder::parse_all(text)
            .into_iter()
            .filter(Placeholder::looks_like_service)
            .map(|p| p.name)
            .collect();
        let services = self.resolve_services(candidates).await;
        self.substitute_str(text, &services)
    }

    async fn resolve_services(&self, names: IndexSet<String>) -> HashMap<String, String> {
        let mut resolved = HashMap::with_capacity(names.len());
        for name in names {
            if let Some(url) = self.services.resolve(&name).await {
                resolved.insert(name, url);
            }
        }
        resolved
    }

    fn rewrite(&self, value: Value, services: &HashMap<String, String>) -> Value {
        match value {
            Value::String(s) => Value::String(self.substitute_str(&s, services)),
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| self.rewrite(item, services))
                    .collect(),
            ),
            Value::Object(map) => {
                let mut out = Map::with_capacity(map.len());
                for (key, child) in map {
                    out.insert(key, self.rewrite(child, services));
                }
                Value::Object(out)
            }
            other => other,
        }
    }

    fn substitute_str(&self, text: &str, services: &HashMap<String, String>) -> String {
        if !text.contains("${") {
            return text.to_string();
        }

        PLACEHOLDER_PATTERN
            .replace_all(text, |caps: &regex::Captures<'_>| {
                let placeholder = Placeholder::from_captures(caps);
                match self.lookup(&placeholder, services) {
                    Some(value) => {
                        ldebug!(
                            "system",
                            LogStage::Template,
                            LogComponent::TemplateEngine,
                            "placeholder_substituted",
                            "Substituted placeholder",
                            name = %placeholder.name
                        );
                        value
                    }
                    None => {
                        lwarn!(
                            "system",
                            LogStage::Template,
                            LogComponent::TemplateEngine,
                            "placeholder_unresolved",
                            "No value found for placeholder",
                            name = %placeholder.name
                        );
                        caps[0].to_string()
                    }
                }
            })
            .into_owned()
    }

    fn lookup(&self, placeholder: &Placeholder, services: &HashMap<String, String>) -> Option<String> {
        if placeholder.looks_like_service() {
            if let Some(url) = services.get(&placeholder.name) {
                return Some(url.clone());
            }
        }
        self.vars
            .get(&placeholder.name)
            .or_else(|| placeholder.default.clone())
    }
}

/// 收集文档中需要先尝试服务发现的占位符名称
fn collect_service_candidates(value: &Value, names: &mut IndexSet<String>) {
    match value {
        Value::String(s) => names.extend(
            Placeholder::parse_all(s)
                .into_iter()
                .filter(Placeholder::looks_like_service)
                .map(|p| p.name),
        ),
        Value::Array(items) => {
            for item in items {
                collect_service_candidates(item, names);
            }
        }
        Value::Object(map) => {
            for child in map.values() {
                collect_service_candidates(child, names);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::DiscoveryStrategy;
    use crate::vars::StaticVariables;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingStrategy {
        known: HashMap<String, String>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DiscoveryStrategy for CountingStrategy {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn attempt(&self, token: &str) -> Option<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.known.get(token).cloned()
        }
    }

    fn engine_with(
        known: &[(&str, &str)],
        vars: &[(&str, &str)],
    ) -> (TemplateEngine, Arc<CountingStrategy>) {
        let strategy = Arc::new(CountingStrategy {
            known: known
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            calls: AtomicUsize::new(0),
        });
        let strategies: Vec<Arc<dyn DiscoveryStrategy>> =
            vec![Arc::clone(&strategy) as Arc<dyn DiscoveryStrategy>];
        let services = Arc::new(ServiceResolver::new(strategies));
        let vars: StaticVariables = vars.iter().copied().collect();
        (TemplateEngine::new(services, Arc::new(vars)), strategy)
    }

    #[tokio::test]
    async fn default_used_when_variable_missing() {
        let (engine, _) = engine_with(&[], &[]);
        let out = engine.substitute(r#"{"host":"${DB_HOST:localhost}"}"#).await;
        assert_eq!(out, r#"{"host":"localhost"}"#);
    }

    #[tokio::test]
    async fn variable_wins_over_default() {
        let (engine, _) = engine_with(&[], &[("DB_HOST", "db.internal")]);
        let out = engine.substitute(r#"{"host":"${DB_HOST:localhost}"}"#).await;
        assert_eq!(out, r#"{"host":"db.internal"}"#);
    }

    #[tokio::test]
    async fn lowercase_names_fall_back_to_default() {
        let (engine, strategy) = engine_with(&[], &[("colour", "teal")]);
        let out = engine
            .substitute(r#"{"a":"${foo:bar}","b":"${colour:grey}"}"#)
            .await;
        assert_eq!(out, r#"{"a":"bar","b":"teal"}"#);
        assert_eq!(strategy.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn service_like_name_resolved_through_discovery() {
        let (engine, _) = engine_with(&[("my-service", "https://my-service.example.com")], &[]);
        let out = engine
            .substitute(r#"{"url":"${my-service}/actuator/metrics"}"#)
            .await;
        assert_eq!(out, r#"{"url":"https://my-service.example.com/actuator/metrics"}"#);
    }

    #[tokio::test]
    async fn unresolved_placeholder_kept_verbatim() {
        let (engine, _) = engine_with(&[], &[]);
        let out = engine.substitute(r#"{"x":"${UNKNOWN_VAR}"}"#).await;
        assert_eq!(out, r#"{"x":"${UNKNOWN_VAR}"}"#);
    }

    #[tokio::test]
    async fn service_miss_falls_back_to_variable_then_default() {
        let (engine, strategy) = engine_with(&[], &[("metrics-host", "from-vars")]);
        let out = engine
            .substitute(r#"["${metrics-host}","${other-host:fallback}"]"#)
            .await;
        assert_eq!(out, r#"["from-vars","fallback"]"#);
        assert_eq!(strategy.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn names_with_digits_skip_discovery() {
        let (engine, strategy) = engine_with(&[("node-1", "https://never")], &[]);
        let out = engine.substitute(r#"{"n":"${node-1:none}"}"#).await;
        assert_eq!(out, r#"{"n":"none"}"#);
        assert_eq!(strategy.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn repeated_service_placeholder_resolved_once() {
        let (engine, strategy) = engine_with(&[("ledger-api", "https://ledger")], &[]);
        let out = engine
            .substitute(r#"{"a":"${ledger-api}","b":["${ledger-api}/x"]}"#)
            .await;
        assert_eq!(out, r#"{"a":"https://ledger","b":["https://ledger/x"]}"#);
        assert_eq!(strategy.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn non_string_scalars_and_key_order_preserved() {
        let (engine, _) = engine_with(&[], &[]);
        let doc = r#"{"z":1,"a":true,"m":null,"list":[2.5,"plain"]}"#;
        assert_eq!(engine.substitute(doc).await, doc);
    }

    #[tokio::test]
    async fn substituted_value_is_not_expanded_again() {
        let (engine, _) = engine_with(&[], &[("OUTER", "${INNER}"), ("INNER", "deep")]);
        let once = engine.substitute(r#"{"v":"${OUTER}"}"#).await;
        assert_eq!(once, r#"{"v":"${INNER}"}"#);
    }

    #[tokio::test]
    async fn invalid_document_returned_unchanged() {
        let (engine, _) = engine_with(&[], &[("A", "b")]);
        let doc = "{not json ${A}";
        assert_eq!(engine.substitute(doc).await, doc);
        assert_eq!(engine.substitute("").await, "");
    }

    #[tokio::test]
    async fn second_pass_is_a_fixed_point() {
        let (engine, _) = engine_with(&[], &[("HOST", "h.example.com")]);
        let doc = json!({"a": "${HOST}", "b": "${MISSING}", "c": "${PORT:8080}"}).to_string();
        let once = engine.substitute(&doc).await;
        let twice = engine.substitute(&once).await;
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn substitute_text_handles_bare_strings() {
        let (engine, _) = engine_with(&[], &[("REGION", "eu-west")]);
        assert_eq!(
            engine.substitute_text("region=${REGION}, zone=${ZONE:a}").await,
            "region=eu-west, zone=a"
        );
    }

    fn placeholder_free_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| json!(n)),
            "[a-zA-Z0-9 _.:/-]{0,16}".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 32, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
                prop::collection::vec(("[a-z]{1,8}", inner), 0..6)
                    .prop_map(|entries| Value::Object(entries.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn documents_without_placeholders_survive_unchanged(doc in placeholder_free_json()) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let (engine, _) = engine_with(&[], &[]);
            let pretty = serde_json::to_string_pretty(&doc).unwrap();
            let out = runtime.block_on(engine.substitute(&pretty));
            let reparsed: Value = serde_json::from_str(&out).unwrap();
            prop_assert_eq!(reparsed, doc);
        }
    }
}
