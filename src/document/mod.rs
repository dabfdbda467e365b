//! 策略文档模块：多文档 YAML 的读写与策略文件发现
pub mod policy_document;

pub use policy_document::{discover_policy_files, PolicyDocument, GENERATED_BY_HEADER};
