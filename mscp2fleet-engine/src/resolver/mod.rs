//! 查询解析引擎
//! 两级策略：检查脚本结构提取 → 启发式分类；名称模式表单独服务于批量修正
mod templates;
mod check_script;
mod name_pattern;
mod engine;

pub use templates::{
    is_placeholder_query, PLACEHOLDER_QUERY,
};
pub use check_script::{CheckScriptResolver, HeuristicSignal, PreferenceRead};
pub use name_pattern::{NameMatch, NamePatternResolver, DEFAULT_NAME_RESOLVER};
pub use engine::{QueryResolutionEngine, ResolveSource, ResolvedQuery};
