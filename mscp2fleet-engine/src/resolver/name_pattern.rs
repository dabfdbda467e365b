//! 名称模式解析器
//! 将有序映射表编译为 (正则, 查询) 列表，按顺序首个命中生效

use std::time::Instant;

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::core::{default_mappings, PatternMapping};
use crate::error::{CoreError, CoreResult};
use crate::utils::preview_compact;

/// 内置映射表编译后的全局实例（进程内只编译一次，只读共享）
pub static DEFAULT_NAME_RESOLVER: Lazy<NamePatternResolver> = Lazy::new(|| {
    NamePatternResolver::from_mappings(&default_mappings())
        .expect("built-in pattern mapping table must compile")
});

/// 编译后的单条映射
#[derive(Debug, Clone)]
struct CompiledMapping {
    regex: Regex,
    query: String,
    catch_all: bool,
}

impl CompiledMapping {
    fn compile(index: usize, mapping: &PatternMapping) -> CoreResult<Self> {
        if mapping.query.trim().is_empty() {
            return Err(CoreError::InvalidMapping {
                index,
                reason: "query is empty".to_string(),
            });
        }

        let regex = RegexBuilder::new(&mapping.pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| CoreError::RegexCompileError {
                pattern: mapping.pattern.clone(),
                source,
            })?;

        Ok(Self {
            regex,
            query: mapping.query.trim().to_string(),
            catch_all: mapping.is_catch_all(),
        })
    }
}

/// 名称匹配结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameMatch<'a> {
    /// 命中条目在编译后表中的位置
    pub index: usize,
    pub query: &'a str,
    /// 命中的是兜底条目（或无条目命中时回退到末条）
    pub catch_all: bool,
}

/// 名称模式解析器
#[derive(Debug, Clone)]
pub struct NamePatternResolver {
    entries: Vec<CompiledMapping>,
}

impl NamePatternResolver {
    /// 编译映射表；单条非法模式记录警告后跳过，全部失败时返回错误
    pub fn from_mappings(mappings: &[PatternMapping]) -> CoreResult<Self> {
        let start = Instant::now();
        let mut entries = Vec::with_capacity(mappings.len());
        let mut skipped = 0usize;

        for (index, mapping) in mappings.iter().enumerate() {
            match CompiledMapping::compile(index, mapping) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    skipped += 1;
                    warn!("映射表第{}条被跳过：{}", index, e);
                }
            }
        }

        if entries.is_empty() {
            return Err(CoreError::EmptyMappingTable);
        }

        if !entries.last().is_some_and(|e| e.catch_all) {
            warn!("映射表末尾缺少兜底模式 `.*`，未命中时将回退到最后一条");
        }

        debug!(
            "映射表编译完成，耗时{:?}，有效{}条，跳过{}条",
            start.elapsed(),
            entries.len(),
            skipped
        );

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 按顺序匹配策略名（调用方负责小写化，正则本身也忽略大小写）
    pub fn find_match(&self, policy_name: &str) -> NameMatch<'_> {
        let hit = self
            .entries
            .iter()
            .enumerate()
            .find(|(_, entry)| entry.regex.is_match(policy_name));

        let (index, entry) = match hit {
            Some(found) => found,
            // entries 构造时保证非空
            None => {
                let last = self.entries.len() - 1;
                (last, &self.entries[last])
            }
        };

        NameMatch {
            index,
            query: &entry.query,
            catch_all: entry.catch_all || hit.is_none(),
        }
    }

    /// 解析策略名对应的查询
    pub fn resolve(&self, policy_name: &str) -> &str {
        let normalized = policy_name.to_lowercase();
        let matched = self.find_match(&normalized);
        debug!(
            "名称[{}] → 第{}条{}",
            preview_compact(&normalized, 60),
            matched.index,
            if matched.catch_all { "（兜底）" } else { "" }
        );
        matched.query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_match_wins() {
        let resolver = NamePatternResolver::from_mappings(&[
            PatternMapping::new(".*firewall.*", "Q1"),
            PatternMapping::new(".*firewall.*stealth.*", "Q2"),
            PatternMapping::new(".*", "DEFAULT"),
        ])
        .unwrap();
        assert_eq!(resolver.resolve("Enable Firewall Stealth Mode"), "Q1");
        assert_eq!(resolver.resolve("Disable Bluetooth"), "DEFAULT");
        assert!(resolver.find_match("disable bluetooth").catch_all);
    }

    #[test]
    fn test_default_table_matches() {
        let resolver = &*DEFAULT_NAME_RESOLVER;
        assert_eq!(
            resolver.resolve("macOS Security - Enable Security Auditing"),
            "SELECT 1 FROM launchd WHERE name = 'com.apple.auditd' AND state = 'running';"
        );
        assert_eq!(
            resolver.resolve("macOS Security - Configure Audit Log Files to Mode 440 or Less Permissive"),
            "SELECT 1 FROM file WHERE path LIKE '/var/audit/%' AND mode <= '440';"
        );
        assert_eq!(
            resolver.resolve("macOS Security - Disable AirDrop"),
            "SELECT 1 FROM managed_policies WHERE domain = 'com.apple.applicationaccess';"
        );
    }

    #[test]
    fn test_invalid_pattern_is_skipped() {
        let resolver = NamePatternResolver::from_mappings(&[
            PatternMapping::new("(unclosed", "BROKEN"),
            PatternMapping::new(".*guest.*", "GUEST"),
            PatternMapping::new(".*", ""),
            PatternMapping::new(".*", "DEFAULT"),
        ])
        .unwrap();
        assert_eq!(resolver.len(), 2);
        assert_eq!(resolver.resolve("guest account"), "GUEST");
        assert_eq!(resolver.resolve("other"), "DEFAULT");
    }

    #[test]
    fn test_no_catch_all_falls_back_to_last_entry() {
        let resolver = NamePatternResolver::from_mappings(&[
            PatternMapping::new("^a$", "A"),
            PatternMapping::new("^b$", "B"),
        ])
        .unwrap();
        let matched = resolver.find_match("zzz");
        assert_eq!(matched.query, "B");
        assert!(matched.catch_all);
    }

    #[test]
    fn test_all_invalid_is_error() {
        let err = NamePatternResolver::from_mappings(&[PatternMapping::new("(", "X")]).unwrap_err();
        assert!(matches!(err, CoreError::EmptyMappingTable));
    }
}
