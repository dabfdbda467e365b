//! 全局转换配置管理

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use mscp2fleet_engine::{PatternMapping, QueryResolutionEngine};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{ConvResult, ConverterError};

/// 规则查找顺序（rules/<category>/<id>.yaml）
pub const DEFAULT_RULE_CATEGORIES: &[&str] = &[
    "os",
    "system_settings",
    "audit",
    "auth",
    "icloud",
    "pwpolicy",
    "supplemental",
];

/// 输出文件命名约定：<baseline>-fleet-policies.yml
pub const POLICY_FILE_SUFFIX: &str = "-fleet-policies.yml";

/// 完整转换配置
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// mSCP 仓库根目录
    pub project_root: PathBuf,
    pub baselines_dir: PathBuf,
    pub rules_dir: PathBuf,
    /// 转换输出目录
    pub output_dir: PathBuf,
    pub rule_categories: Vec<String>,
    /// 修正阶段扫描的目录
    pub policy_dir: PathBuf,
    /// 组装时占位查询是否按标题回退到名称模式表
    pub name_fallback: bool,
    /// 自定义名称模式映射表（YAML/JSON）
    pub mappings_file: Option<PathBuf>,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        ConfigBuilder::new().build()
    }
}

impl ConvertConfig {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// 项目根目录必须存在，否则转换无法进行
    pub fn ensure_project_root(&self) -> ConvResult<()> {
        if self.project_root.is_dir() {
            Ok(())
        } else {
            Err(ConverterError::ProjectRootNotFound(self.project_root.clone()))
        }
    }

    /// 输出文件路径
    pub fn output_file(&self, baseline_name: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}{}", baseline_name, POLICY_FILE_SUFFIX))
    }

    /// 按配置构建查询解析引擎（未配置映射表时使用内置表）
    pub fn resolution_engine(&self) -> ConvResult<QueryResolutionEngine> {
        let Some(path) = &self.mappings_file else {
            return Ok(QueryResolutionEngine::new());
        };

        let mappings: Vec<PatternMapping> = read_structured(path)?;
        debug!("加载自定义映射表 {}，共{}条", path.display(), mappings.len());
        Ok(QueryResolutionEngine::with_mappings(&mappings)?)
    }
}

/// 配置文件结构（所有字段可选，命令行参数优先）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub project_root: Option<PathBuf>,
    pub baselines_dir: Option<PathBuf>,
    pub rules_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub rule_categories: Option<Vec<String>>,
    pub policy_dir: Option<PathBuf>,
    pub name_fallback: Option<bool>,
    pub mappings_file: Option<PathBuf>,
}

impl ConfigFile {
    /// 按扩展名选择解析器：.json 用 serde_json，其余按 YAML
    pub fn load(path: &Path) -> ConvResult<Self> {
        read_structured(path).map_err(|e| match e {
            ConverterError::IoError { .. } => e,
            other => ConverterError::ConfigError(format!("{}: {}", path.display(), other)),
        })
    }
}

/// 配置构建器（链式 API）
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    project_root: Option<PathBuf>,
    baselines_dir: Option<PathBuf>,
    rules_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    rule_categories: Option<Vec<String>>,
    policy_dir: Option<PathBuf>,
    name_fallback: bool,
    mappings_file: Option<PathBuf>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以配置文件为底，已设置的字段不被覆盖
    pub fn merge_file(mut self, file: ConfigFile) -> Self {
        self.project_root = self.project_root.or(file.project_root);
        self.baselines_dir = self.baselines_dir.or(file.baselines_dir);
        self.rules_dir = self.rules_dir.or(file.rules_dir);
        self.output_dir = self.output_dir.or(file.output_dir);
        self.rule_categories = self.rule_categories.or(file.rule_categories);
        self.policy_dir = self.policy_dir.or(file.policy_dir);
        self.name_fallback = self.name_fallback || file.name_fallback.unwrap_or(false);
        self.mappings_file = self.mappings_file.or(file.mappings_file);
        self
    }

    pub fn project_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.project_root = Some(path.into());
        self
    }

    pub fn baselines_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.baselines_dir = Some(path.into());
        self
    }

    pub fn rules_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.rules_dir = Some(path.into());
        self
    }

    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    pub fn rule_categories(mut self, categories: Vec<String>) -> Self {
        self.rule_categories = Some(categories);
        self
    }

    pub fn policy_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.policy_dir = Some(path.into());
        self
    }

    pub fn name_fallback(mut self, enabled: bool) -> Self {
        self.name_fallback = enabled;
        self
    }

    pub fn mappings_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.mappings_file = Some(path.into());
        self
    }

    /// 未显式指定的目录由项目根目录推导
    pub fn build(self) -> ConvertConfig {
        let project_root = self.project_root.unwrap_or_else(|| PathBuf::from("."));

        ConvertConfig {
            baselines_dir: self
                .baselines_dir
                .unwrap_or_else(|| project_root.join("baselines")),
            rules_dir: self.rules_dir.unwrap_or_else(|| project_root.join("rules")),
            output_dir: self.output_dir.unwrap_or_else(|| project_root.join("fleet")),
            rule_categories: self.rule_categories.unwrap_or_else(|| {
                DEFAULT_RULE_CATEGORIES.iter().map(|c| c.to_string()).collect()
            }),
            policy_dir: self.policy_dir.unwrap_or_else(|| PathBuf::from(".")),
            name_fallback: self.name_fallback,
            mappings_file: self.mappings_file,
            project_root,
        }
    }
}

/// 读取结构化文件：.json 用 serde_json，其余按 YAML
pub(crate) fn read_structured<T: DeserializeOwned>(path: &Path) -> ConvResult<T> {
    let content = fs::read_to_string(path).map_err(|e| ConverterError::io(path, e))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        Ok(serde_json::from_str(&content)?)
    } else {
        Ok(serde_yaml::from_str(&content)?)
    }
}
