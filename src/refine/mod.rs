//! 修正阶段文件调度：对策略目录下的每个文件执行内存修正并回写
pub mod runner;

pub use runner::{PassReport, PassRunner};
