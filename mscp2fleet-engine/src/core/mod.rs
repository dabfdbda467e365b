mod rule;
mod baseline;
mod policy;
pub(crate) mod mapping;

// 导出常用项
pub use rule::{CisReference, Rule};
pub use baseline::{Baseline, BaselineSection};
pub use policy::{
    PolicyRecord, PolicySpec, API_VERSION, CONTRIBUTORS, POLICY_KIND, POLICY_NAME_PREFIX,
    PURPOSE_INFORMATIONAL,
};
pub use mapping::{default_mappings, PatternMapping, CATCH_ALL_PATTERN};
