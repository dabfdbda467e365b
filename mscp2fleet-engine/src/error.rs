//! mscp2fleet-engine 内核错误定义
//! 封装内核层所有核心错误，与业务层错误解耦，基于thiserror实现类型安全处理
use thiserror::Error;

use regex::Error as RegexError;

/// 内核核心错误枚举
#[derive(Error, Debug)]
pub enum CoreError {
    // ===================== 模式表相关错误 =====================
    /// 正则表达式编译失败（模式映射表中的非法正则）
    #[error("Regex compilation failed for pattern `{pattern}`: {source}")]
    RegexCompileError {
        pattern: String,
        #[source]
        source: RegexError,
    },

    /// 模式映射表为空或全部模式编译失败
    #[error("Pattern mapping table is empty")]
    EmptyMappingTable,

    /// 模式映射表结构非法（查询模板为空等）
    #[error("Invalid pattern mapping at index {index}: {reason}")]
    InvalidMapping { index: usize, reason: String },
}

/// 内核层全局Result类型别名
pub type CoreResult<T> = Result<T, CoreError>;
