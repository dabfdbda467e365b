use std::fmt;
use std::sync::Arc;

use log::debug;

use super::check_script::{CheckScriptResolver, HeuristicSignal};
use super::name_pattern::{NamePatternResolver, DEFAULT_NAME_RESOLVER};
use super::templates::PLACEHOLDER_QUERY;
use crate::core::PatternMapping;
use crate::error::CoreResult;
use crate::utils::preview_compact;

/// 查询来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveSource {
    /// 检查脚本中的域/键偏好读取
    Structural,
    /// 启发式信号
    Heuristic(HeuristicSignal),
    /// 名称模式表（非兜底条目）
    NamePattern { index: usize },
    /// 名称模式表兜底条目
    CatchAll,
    /// 恒真占位查询
    Placeholder,
}

impl fmt::Display for ResolveSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveSource::Structural => write!(f, "structural"),
            ResolveSource::Heuristic(signal) => write!(f, "heuristic:{:?}", signal),
            ResolveSource::NamePattern { index } => write!(f, "name-pattern#{}", index),
            ResolveSource::CatchAll => write!(f, "catch-all"),
            ResolveSource::Placeholder => write!(f, "placeholder"),
        }
    }
}

/// 解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedQuery {
    pub query: String,
    pub source: ResolveSource,
}

impl ResolvedQuery {
    pub fn is_placeholder(&self) -> bool {
        self.source == ResolveSource::Placeholder
    }
}

/// 查询解析引擎：组合检查脚本解析器与名称模式解析器
/// 两个解析器的结果从不混合，调用方按手头数据选择入口
#[derive(Debug, Clone)]
pub struct QueryResolutionEngine {
    script_resolver: CheckScriptResolver,
    name_resolver: Arc<NamePatternResolver>,
}

impl Default for QueryResolutionEngine {
    fn default() -> Self {
        Self {
            script_resolver: CheckScriptResolver,
            name_resolver: Arc::new(DEFAULT_NAME_RESOLVER.clone()),
        }
    }
}

impl QueryResolutionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用自定义映射表构建引擎
    pub fn with_mappings(mappings: &[PatternMapping]) -> CoreResult<Self> {
        Ok(Self {
            script_resolver: CheckScriptResolver,
            name_resolver: Arc::new(NamePatternResolver::from_mappings(mappings)?),
        })
    }

    pub fn name_resolver(&self) -> &NamePatternResolver {
        &self.name_resolver
    }

    /// 两级解析：结构提取 → 启发式分类 → 占位查询
    pub fn resolve_check_script(&self, check_script: &str, rule_id: &str) -> ResolvedQuery {
        if let Some(read) = self.script_resolver.extract_preference(check_script) {
            return ResolvedQuery {
                query: read.to_query(),
                source: ResolveSource::Structural,
            };
        }

        match self.script_resolver.classify(check_script, rule_id) {
            Some((signal, query)) => ResolvedQuery {
                query,
                source: ResolveSource::Heuristic(signal),
            },
            None => ResolvedQuery {
                query: PLACEHOLDER_QUERY.to_string(),
                source: ResolveSource::Placeholder,
            },
        }
    }

    /// 仅基于策略名解析（批量修正阶段，原始检查脚本已不可用）
    pub fn resolve_name(&self, policy_name: &str) -> ResolvedQuery {
        let normalized = policy_name.to_lowercase();
        let matched = self.name_resolver.find_match(&normalized);
        ResolvedQuery {
            query: matched.query.to_string(),
            source: if matched.catch_all {
                ResolveSource::CatchAll
            } else {
                ResolveSource::NamePattern { index: matched.index }
            },
        }
    }

    /// 完整解析：脚本两级解析得到占位查询时，
    /// 仅当标题命中非兜底模式才改用名称模式结果
    pub fn resolve(&self, check_script: &str, rule_id: &str, policy_name: &str) -> ResolvedQuery {
        let resolved = self.resolve_check_script(check_script, rule_id);
        if !resolved.is_placeholder() {
            return resolved;
        }

        let by_name = self.resolve_name(policy_name);
        let chosen = if by_name.source == ResolveSource::CatchAll {
            resolved
        } else {
            by_name
        };

        debug!(
            "规则[{}] 解析来源：{}，查询：{}",
            rule_id,
            chosen.source,
            preview_compact(&chosen.query, 80)
        );
        chosen
    }
}
