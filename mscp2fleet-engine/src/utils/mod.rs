mod log_format;

pub use log_format::{compress_list_default, preview_compact};
