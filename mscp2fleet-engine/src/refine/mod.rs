//! 已输出策略记录的分阶段修正
//! 每个阶段独立可调用、幂等，只修改 spec.query：
//! 1. 占位标注：为最泛化的查询追加标记注释
//! 2. 领域替换：按标记类别替换为具体查询
//! 3. 名称模式替换：仍未解析的记录按名称模式表替换
mod marker;
mod annotate;
mod specific;
mod name_pattern_pass;

pub use marker::{
    classify_placeholder, looks_unresolved, parse_marker, strip_marker, PlaceholderCategory,
};
pub use annotate::PlaceholderAnnotatePass;
pub use specific::SpecificQueryPass;
pub use name_pattern_pass::NamePatternPass;

use crate::core::PolicyRecord;

/// 修正阶段统一接口（作用于内存中的记录，文件读写由调用方负责）
pub trait RefinementPass {
    /// 阶段名（日志与报告）
    fn name(&self) -> &'static str;

    /// 修改记录，返回被修改的记录数
    fn apply(&self, records: &mut [PolicyRecord]) -> usize;
}

/// 统计仍带标记注释的记录数
pub fn count_markers(records: &[PolicyRecord]) -> usize {
    records
        .iter()
        .filter(|record| parse_marker(&record.spec.query).is_some())
        .count()
}
