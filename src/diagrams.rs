//! # 图表配置存储
//!
//! 从配置目录列出并读取图表定义文件，读取后经过模板替换再返回。
//! 目录按配置顺序查找，第一个存在的目录生效。
//! 节点详情文件 `{node}.json` 则在详情目录中逐个查找，第一个存在的文件生效。

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{Context, ProxyError, Result};
use crate::logging::{LogComponent, LogStage};
use crate::template::TemplateEngine;
use crate::{ldebug, lwarn};

const DIAGRAM_EXTENSION: &str = ".json";

/// 图表配置存储
pub struct DiagramStore {
    directories: Vec<PathBuf>,
    details_directories: Vec<PathBuf>,
    engine: Arc<TemplateEngine>,
}

impl DiagramStore {
    /// 创建存储，默认不配置节点详情目录
    #[must_use]
    pub fn new(directories: Vec<PathBuf>, engine: Arc<TemplateEngine>) -> Self {
        Self {
            directories,
            details_directories: Vec::new(),
            engine,
        }
    }

    /// 设置节点详情目录
    #[must_use]
    pub fn with_details_directories(mut self, details_directories: Vec<PathBuf>) -> Self {
        self.details_directories = details_directories;
        self
    }

    /// 第一个存在的配置目录
    #[must_use]
    pub fn locate(&self) -> Option<&Path> {
        self.directories
            .iter()
            .map(PathBuf::as_path)
            .find(|dir| dir.is_dir())
    }

    /// 按名称排序的 `*.json` 文件名；没有配置目录时返回空列表
    pub async fn list(&self) -> Result<Vec<String>> {
        let Some(dir) = self.locate() else {
            lwarn!(
                "system",
                LogStage::Internal,
                LogComponent::Diagrams,
                "configs_dir_missing",
                "No diagram directory found",
                candidates = ?self.directories
            );
            return Ok(Vec::new());
        };

        let mut entries = tokio::fs::read_dir(dir)
            .await
            .with_context(|| format!("Failed to read diagram directory {}", dir.display()))?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .context("Failed to iterate diagram directory")?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(DIAGRAM_EXTENSION) {
                names.push(name);
            }
        }
        names.sort();

        ldebug!(
            "system",
            LogStage::Internal,
            LogComponent::Diagrams,
            "list_diagrams",
            "Listed diagram files",
            dir = %dir.display(),
            count = names.len()
        );
        Ok(names)
    }

    /// 读取图表并完成占位符替换
    pub async fn load(&self, name: &str) -> Result<String> {
        validate_name(name)?;

        let dir = self
            .locate()
            .ok_or_else(|| ProxyError::not_found("diagram", name))?;
        let path = dir.join(name);
        if !path.is_file() {
            return Err(ProxyError::not_found("diagram", name));
        }

        let raw = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read diagram {}", path.display()))?;
        let processed = self.engine.substitute(&raw).await;

        ldebug!(
            "system",
            LogStage::Template,
            LogComponent::Diagrams,
            "load_diagram",
            "Served diagram definition",
            name = name,
            bytes = processed.len()
        );
        Ok(processed)
    }

    /// 读取节点详情并完成占位符替换
    pub async fn load_details(&self, node: &str) -> Result<String> {
        if node.is_empty() || escapes_directory(node) {
            return Err(ProxyError::validation(
                format!("Invalid node name: {node}"),
                Some("nodeName"),
            ));
        }

        let file_name = format!("{node}{DIAGRAM_EXTENSION}");
        let Some(path) = self
            .details_directories
            .iter()
            .map(|dir| dir.join(&file_name))
            .find(|path| path.is_file())
        else {
            ldebug!(
                "system",
                LogStage::Internal,
                LogComponent::Diagrams,
                "node_details_missing",
                "No details definition found for node",
                node = node
            );
            return Err(ProxyError::not_found("node details", node));
        };

        let raw = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read node details {}", path.display()))?;
        let processed = self.engine.substitute(&raw).await;

        ldebug!(
            "system",
            LogStage::Template,
            LogComponent::Diagrams,
            "load_node_details",
            "Served node details",
            node = node,
            path = %path.display()
        );
        Ok(processed)
    }
}

fn escapes_directory(name: &str) -> bool {
    name.contains("..") || name.contains('/') || name.contains('\\')
}

/// 只允许配置目录下的 `*.json` 文件名
fn validate_name(name: &str) -> Result<()> {
    if escapes_directory(name)
        || !name.ends_with(DIAGRAM_EXTENSION)
        || name.len() == DIAGRAM_EXTENSION.len()
    {
        return Err(ProxyError::validation(
            format!("Invalid diagram name: {name}"),
            Some("filename"),
        ));
    }
    Ok(())
}
