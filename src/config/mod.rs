//! 配置模块：转换路径、规则类别顺序、修正阶段目录、自定义映射表
pub mod convert;

pub use convert::{
    ConfigBuilder, ConfigFile, ConvertConfig, DEFAULT_RULE_CATEGORIES, POLICY_FILE_SUFFIX,
};
