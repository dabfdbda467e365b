//! 自由文本清洗子模块
mod text_cleaner;

pub use text_cleaner::TextCleaner;
