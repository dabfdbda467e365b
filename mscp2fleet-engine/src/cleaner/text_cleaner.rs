//! 负责 discussion / fix 等自由文本字段的标记剥离
use once_cell::sync::Lazy;
use regex::Regex;

// 正则常量（懒加载，避免重复编译）
// AsciiDoc 块属性：[source]、[source,bash]、[source,xml] 等
static SOURCE_BLOCK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[source(?:,[^\]]+)?\]").unwrap()
});

// AsciiDoc 代码块分隔线
static BLOCK_DELIMITER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"----+").unwrap()
});

static BOLD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*([^*]+)\*").unwrap()
});

static ITALIC_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"_([^_]+)_").unwrap()
});

static CODE_SPAN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"`([^`]+)`").unwrap()
});

// 三个及以上换行（中间允许空白）压缩为一个空行
static BLANK_LINES_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n\s*\n\s*\n+").unwrap()
});

static LEADING_WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]+").unwrap()
});

/// 文本清洗器（纯函数，无状态）
#[derive(Debug, Default, Clone, Copy)]
pub struct TextCleaner;

impl TextCleaner {
    /// 剥离 AsciiDoc / Markdown 标记并规整空白
    pub fn clean(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        // 1. AsciiDoc 块标记
        let text = SOURCE_BLOCK_REGEX.replace_all(text, "");
        let text = BLOCK_DELIMITER_REGEX.replace_all(&text, "");

        // 2. Markdown 行内标记
        let text = BOLD_REGEX.replace_all(&text, "$1");
        let text = ITALIC_REGEX.replace_all(&text, "$1");
        let text = CODE_SPAN_REGEX.replace_all(&text, "$1");

        // 3. 空白规整
        let text = BLANK_LINES_REGEX.replace_all(&text, "\n\n");
        let text = LEADING_WHITESPACE_REGEX.replace_all(&text, "");

        text.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_asciidoc_block() {
        let input = "The system must be configured.\n\n[source,bash]\n----\n/usr/bin/sudo /bin/launchctl enable system/com.apple.auditd\n----\n";
        let cleaned = TextCleaner.clean(input);
        assert_eq!(
            cleaned,
            "The system must be configured.\n\n/usr/bin/sudo /bin/launchctl enable system/com.apple.auditd"
        );
    }

    #[test]
    fn test_clean_inline_markup() {
        let cleaned = TextCleaner.clean("Set *askForPassword* to `true` in _com.apple.screensaver_.");
        assert_eq!(cleaned, "Set askForPassword to true in com.apple.screensaver.");
    }

    #[test]
    fn test_clean_collapses_blank_lines_and_indentation() {
        let cleaned = TextCleaner.clean("  first\n\n\n\n   second\n");
        assert_eq!(cleaned, "first\n\nsecond");
    }

    #[test]
    fn test_clean_empty() {
        assert_eq!(TextCleaner.clean(""), "");
    }
}
