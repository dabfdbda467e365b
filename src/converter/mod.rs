//! 基线转换模块
pub mod baseline_converter;

pub use baseline_converter::{BaselineConverter, BaselineReport, ConvertReport};
