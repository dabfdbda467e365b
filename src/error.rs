//! 全局错误类型定义
use std::path::PathBuf;

use mscp2fleet_engine::CoreError;
use serde_json::Error as SerdeJsonError;
use serde_yaml::Error as SerdeYamlError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConverterError {
    // 配置相关错误
    #[error("Project root not found: {0}")]
    ProjectRootNotFound(PathBuf),
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    // 规则/基线相关错误
    #[error("Failed to load rule {rule_id} from {path}: {source}")]
    RuleParseError {
        rule_id: String,
        path: PathBuf,
        #[source]
        source: SerdeYamlError,
    },
    #[error("Failed to load baseline {path}: {source}")]
    BaselineParseError {
        path: PathBuf,
        #[source]
        source: SerdeYamlError,
    },

    // 策略文档相关错误
    #[error("Failed to parse policy document {path} (record {index}): {source}")]
    DocumentParseError {
        path: PathBuf,
        index: usize,
        #[source]
        source: SerdeYamlError,
    },

    // 内核错误
    #[error("Engine error: {0}")]
    EngineError(#[from] CoreError),

    // 序列化/反序列化错误
    #[error("YAML serialization failed: {0}")]
    YamlError(#[from] SerdeYamlError),
    #[error("JSON parse failed: {0}")]
    JsonError(#[from] SerdeJsonError),

    // 基础错误
    #[error("IO operation failed on {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Directory walk failed: {0}")]
    WalkError(#[from] walkdir::Error),
}

impl ConverterError {
    /// 附带路径的IO错误
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConverterError::IoError {
            path: path.into(),
            source,
        }
    }
}

// 全局Result类型
pub type ConvResult<T> = Result<T, ConverterError>;
