//! # 键值变量来源
//!
//! 凭证键、部署描述符（`VCAP_APPLICATION` / `VCAP_SERVICES`）以及模板占位符
//! 都通过 [`VariableSource`] 读取，测试中可替换为内存实现，不触碰进程环境。

use dashmap::DashMap;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::sync::Arc;

/// 只读键值来源
pub trait VariableSource: Send + Sync + fmt::Debug {
    /// 读取变量，未设置时返回 `None`
    fn get(&self, key: &str) -> Option<String>;

    /// 读取非空白变量
    fn get_non_blank(&self, key: &str) -> Option<String> {
        self.get(key).filter(|value| !value.trim().is_empty())
    }
}

/// 进程环境变量
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl VariableSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

/// 内存变量表
#[derive(Debug, Default)]
pub struct StaticVariables {
    vars: DashMap<String, String>,
}

impl StaticVariables {
    /// 创建空的变量表
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置变量
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    /// 删除变量
    pub fn remove(&self, key: &str) {
        self.vars.remove(key);
    }

    /// 清空变量
    pub fn clear(&self) {
        self.vars.clear();
    }
}

impl<K, V> FromIterator<(K, V)> for StaticVariables
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let vars = StaticVariables::new();
        for (key, value) in iter {
            vars.set(key, value);
        }
        vars
    }
}

impl From<HashMap<String, String>> for StaticVariables {
    fn from(map: HashMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl VariableSource for StaticVariables {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).map(|entry| entry.value().clone())
    }
}

/// 按顺序叠加的多个来源，第一个命中的生效
#[derive(Debug, Default, Clone)]
pub struct LayeredVariables {
    layers: Vec<Arc<dyn VariableSource>>,
}

impl LayeredVariables {
    /// 创建分层变量来源
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一层，优先级低于已有的层
    #[must_use]
    pub fn with_layer(mut self, layer: Arc<dyn VariableSource>) -> Self {
        self.layers.push(layer);
        self
    }
}

impl VariableSource for LayeredVariables {
    fn get(&self, key: &str) -> Option<String> {
        self.layers.iter().find_map(|layer| layer.get(key))
    }
}
