//! 占位查询识别与标记注释
//! 标记采用 SQL 行注释追加在查询末尾，不改变查询语义，序列化往返后仍可识别

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::resolver::is_placeholder_query;

// 只含 path LIKE 通配条件的文件查询
static FILE_WILDCARD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^SELECT 1 FROM file WHERE path LIKE '[^']*%'(?: OR path LIKE '[^']*%')*;$").unwrap()
});

// 只含 name LIKE '%…%' 的服务查询
static SERVICE_WILDCARD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^SELECT 1 FROM launchd WHERE name LIKE '%[^'%]+%';$").unwrap()
});

static MARKER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<base>.*?;)\s*-- TODO\[(?P<tag>generic|file|service)\]:.*$").unwrap()
});

// 数据源引用（FROM 子句）
static DATA_SOURCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bFROM\s+\w+").unwrap()
});

/// 占位查询类别（即标记注释中的类别标签）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderCategory {
    /// 恒真占位查询
    Generic,
    /// 无限定的文件路径通配查询
    File,
    /// 无限定的服务名通配查询
    Service,
}

impl PlaceholderCategory {
    pub fn tag(&self) -> &'static str {
        match self {
            PlaceholderCategory::Generic => "generic",
            PlaceholderCategory::File => "file",
            PlaceholderCategory::Service => "service",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "generic" => Some(PlaceholderCategory::Generic),
            "file" => Some(PlaceholderCategory::File),
            "service" => Some(PlaceholderCategory::Service),
            _ => None,
        }
    }

    fn hint(&self) -> &'static str {
        match self {
            PlaceholderCategory::Generic => "Replace with specific query for this policy",
            PlaceholderCategory::File => "Replace with specific file validation query",
            PlaceholderCategory::Service => "Replace with specific service validation query",
        }
    }

    /// 为查询追加本类别的标记注释
    pub fn annotate(&self, query: &str) -> String {
        format!("{}  -- TODO[{}]: {}", query.trim(), self.tag(), self.hint())
    }
}

impl fmt::Display for PlaceholderCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// 判断未标注的查询是否为最泛化形态
pub fn classify_placeholder(query: &str) -> Option<PlaceholderCategory> {
    let query = query.trim();
    if is_placeholder_query(query) {
        Some(PlaceholderCategory::Generic)
    } else if FILE_WILDCARD_REGEX.is_match(query) {
        Some(PlaceholderCategory::File)
    } else if SERVICE_WILDCARD_REGEX.is_match(query) {
        Some(PlaceholderCategory::Service)
    } else {
        None
    }
}

/// 解析标记注释，返回 (原始查询, 类别)
pub fn parse_marker(query: &str) -> Option<(&str, PlaceholderCategory)> {
    let caps = MARKER_REGEX.captures(query.trim())?;
    let base = caps.name("base")?.as_str();
    let category = PlaceholderCategory::from_tag(caps.name("tag")?.as_str())?;
    Some((base, category))
}

/// 去除标记注释（无标记时原样返回）
pub fn strip_marker(query: &str) -> &str {
    parse_marker(query).map_or(query.trim(), |(base, _)| base)
}

/// 查询是否仍"看起来未解析"：恒真占位（含已标注）或没有数据源引用
pub fn looks_unresolved(query: &str) -> bool {
    let base = strip_marker(query);
    is_placeholder_query(base) || !DATA_SOURCE_REGEX.is_match(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_placeholder_shapes() {
        assert_eq!(classify_placeholder("SELECT 1;"), Some(PlaceholderCategory::Generic));
        assert_eq!(
            classify_placeholder("SELECT 1 FROM file WHERE path LIKE '/etc/%' OR path LIKE '/var/%';"),
            Some(PlaceholderCategory::File)
        );
        assert_eq!(
            classify_placeholder("SELECT 1 FROM file WHERE path LIKE '/var/audit/%';"),
            Some(PlaceholderCategory::File)
        );
        assert_eq!(
            classify_placeholder("SELECT 1 FROM launchd WHERE name LIKE '%audit%';"),
            Some(PlaceholderCategory::Service)
        );
        // 已限定的查询不是占位
        assert_eq!(classify_placeholder("SELECT 1 FROM file WHERE path LIKE '/var/audit/%' AND uid = 0;"), None);
        assert_eq!(classify_placeholder("SELECT 1 FROM launchd WHERE name = 'com.apple.auditd';"), None);
    }

    #[test]
    fn test_marker_roundtrip() {
        let annotated = PlaceholderCategory::Service.annotate("SELECT 1 FROM launchd WHERE name LIKE '%audit%';");
        assert_eq!(
            annotated,
            "SELECT 1 FROM launchd WHERE name LIKE '%audit%';  -- TODO[service]: Replace with specific service validation query"
        );
        assert_eq!(
            parse_marker(&annotated),
            Some(("SELECT 1 FROM launchd WHERE name LIKE '%audit%';", PlaceholderCategory::Service))
        );
        // 已标注的查询不再被识别为占位形态
        assert_eq!(classify_placeholder(&annotated), None);
        assert_eq!(strip_marker("SELECT 1;"), "SELECT 1;");
    }

    #[test]
    fn test_looks_unresolved() {
        assert!(looks_unresolved("SELECT 1;"));
        assert!(looks_unresolved(&PlaceholderCategory::Generic.annotate("SELECT 1;")));
        assert!(looks_unresolved("SELECT 1 WHERE 1 = 1;"));
        assert!(!looks_unresolved("SELECT 1 FROM system_info;"));
        assert!(!looks_unresolved(
            "SELECT 1 WHERE EXISTS (SELECT 1 FROM managed_policies WHERE domain='com.apple.MCX' AND name='x' AND (value = 1 OR value = 'true'));"
        ));
    }
}
