// 核心公共结构体（规则/基线/策略记录/模式映射）
pub mod core;
// 自由文本清洗（AsciiDoc/Markdown 标记剥离）
pub mod cleaner;
// 查询解析引擎（结构提取 + 启发式分类 + 名称模式表）
pub mod resolver;
// 策略组装
pub mod assembler;
// 已输出策略的分阶段修正
pub mod refine;
// 日志格式化等工具
pub mod utils;
// 内核错误
pub mod error;

// 顶层导出常用类型
pub use error::{CoreError, CoreResult};
pub use core::{
    Baseline, BaselineSection, CisReference, PatternMapping, PolicyRecord, PolicySpec, Rule,
};
pub use cleaner::TextCleaner;
pub use resolver::{
    CheckScriptResolver, NamePatternResolver, QueryResolutionEngine, ResolvedQuery,
    ResolveSource,
};
pub use assembler::PolicyAssembler;
pub use refine::{
    NamePatternPass, PlaceholderAnnotatePass, PlaceholderCategory, RefinementPass,
    SpecificQueryPass,
};
