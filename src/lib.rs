//! mscp2fleet - macOS Security Compliance Project 基线转换为 Fleet 策略 YAML

// 导出全局错误类型
pub use self::error::{ConvResult, ConverterError};

// 导出配置模块
pub use self::config::{ConfigBuilder, ConfigFile, ConvertConfig};

// 导出规则加载接口
pub use self::rule::{RuleLoader, RulePathManager};

// 导出策略文档接口
pub use self::document::{discover_policy_files, PolicyDocument};

// 导出转换与修正接口
pub use self::converter::{BaselineConverter, BaselineReport, ConvertReport};
pub use self::refine::{PassReport, PassRunner};
pub use self::command::{run_command, Command, CommandReport};

// 引擎常用类型直接透出
pub use mscp2fleet_engine::{
    PolicyRecord, PolicySpec, QueryResolutionEngine, RefinementPass, Rule,
};

pub mod error;
pub mod config;
pub mod rule;
pub mod document;
pub mod converter;
pub mod refine;
pub mod command;
