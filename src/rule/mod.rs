//! 规则模块：负责 mSCP 规则与基线的定位、加载
pub mod loader;

// 导出核心接口
pub use self::loader::{RuleLoader, RulePathManager};
