use std::fmt::Write;

/// 日志预览：空白折叠为单个空格，超过 max_chars 个字符截断并追加省略号
pub fn preview_compact(s: &str, max_chars: usize) -> String {
    let folded = s.split_whitespace().collect::<Vec<_>>().join(" ");
    match folded.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &folded[..cut]),
        None => folded,
    }
}

/// 字符串列表日志格式化（标签、规则ID等）
/// 格式：[a, b, ...] (total: N)
pub fn compress_list_default<S: AsRef<str>>(items: &[S]) -> String {
    if items.is_empty() {
        return "[empty]".to_string();
    }

    const MAX_COUNT: usize = 10;
    const MAX_ITEM_LEN: usize = 30;

    let mut result = String::with_capacity(MAX_COUNT * (MAX_ITEM_LEN + 2) + 20);
    result.push('[');

    for (idx, item) in items.iter().take(MAX_COUNT).enumerate() {
        if idx > 0 {
            result.push_str(", ");
        }
        result.push_str(&preview_compact(item.as_ref(), MAX_ITEM_LEN));
    }

    if items.len() > MAX_COUNT {
        let _ = write!(result, "… (total: {})", items.len());
    }
    result.push(']');

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_compact_folds_whitespace_and_truncates() {
        let text = "SELECT 1\n   FROM   file";
        assert_eq!(preview_compact(text, 100).to_string(), "SELECT 1 FROM file");
        assert_eq!(preview_compact(text, 6).to_string(), "SELECT…");
        assert_eq!(preview_compact("  padded  ", 10), "padded");
    }

    #[test]
    fn test_compress_list_default() {
        let empty: Vec<String> = Vec::new();
        assert_eq!(compress_list_default(&empty), "[empty]");
        assert_eq!(compress_list_default(&["compliance", "CIS_Level1"]), "[compliance, CIS_Level1]");

        let many: Vec<String> = (0..12).map(|i| format!("t{}", i)).collect();
        assert!(compress_list_default(&many).ends_with("… (total: 12)]"));
    }
}
