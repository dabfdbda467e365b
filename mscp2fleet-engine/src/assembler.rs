//! 策略组装器
//! 规则 + 基线名 → Fleet 策略记录（查询解析、文本清洗、标签推导）

use log::{debug, warn};

use crate::cleaner::TextCleaner;
use crate::core::{PolicyRecord, Rule};
use crate::resolver::QueryResolutionEngine;
use crate::utils::compress_list_default;

const BASE_TAGS: [&str; 2] = ["compliance", "macOS_Security_Compliance"];

/// 策略组装器
#[derive(Debug, Clone, Default)]
pub struct PolicyAssembler {
    engine: QueryResolutionEngine,
    cleaner: TextCleaner,
    /// 脚本解析只得到占位查询时，是否按标题回退到名称模式表
    name_fallback: bool,
}

impl PolicyAssembler {
    pub fn new(engine: QueryResolutionEngine) -> Self {
        Self {
            engine,
            cleaner: TextCleaner,
            name_fallback: false,
        }
    }

    pub fn with_name_fallback(mut self, enabled: bool) -> Self {
        self.name_fallback = enabled;
        self
    }

    pub fn engine(&self) -> &QueryResolutionEngine {
        &self.engine
    }

    /// 组装策略记录；规则缺失时返回 None
    pub fn assemble(&self, rule: Option<&Rule>, baseline_name: &str) -> Option<PolicyRecord> {
        let Some(rule) = rule else {
            warn!("基线[{}] 规则缺失，跳过组装", baseline_name);
            return None;
        };

        let title = rule.display_title();
        let resolved = if self.name_fallback {
            self.engine.resolve(&rule.check, &rule.id, title)
        } else {
            self.engine.resolve_check_script(&rule.check, &rule.id)
        };

        let query = resolved.query.trim().to_string();
        if query.is_empty() {
            // 解析器保证非空，这里只做兜底
            warn!("规则[{}] 解析得到空查询，跳过", rule.id);
            return None;
        }

        let tags = Self::derive_tags(rule, baseline_name);
        debug!(
            "规则[{}] 组装完成：来源={}，标签={}",
            rule.id,
            resolved.source,
            compress_list_default(&tags)
        );

        Some(PolicyRecord::macos(
            title,
            self.cleaner.clean(&rule.discussion),
            self.cleaner.clean(&rule.fix),
            query,
            tags,
        ))
    }

    /// 标签：固定基线标签 → CIS benchmark / level → 基线名标签
    pub fn derive_tags(rule: &Rule, baseline_name: &str) -> Vec<String> {
        let mut tags: Vec<String> = BASE_TAGS.iter().map(|t| t.to_string()).collect();

        let cis = rule.cis_reference();
        if let Some(benchmark) = cis.benchmark {
            tags.push(format!("CIS_{}", benchmark));
        }
        if let Some(level) = cis.level {
            tags.push(format!("CIS_Level{}", level));
        }

        tags.push(baseline_tag(baseline_name));
        tags
    }
}

/// 基线名标签：连字符统一为下划线
pub fn baseline_tag(baseline_name: &str) -> String {
    baseline_name.replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CONTRIBUTORS, PURPOSE_INFORMATIONAL};

    fn rule(yaml: &str) -> Rule {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_assemble_none_for_missing_rule() {
        assert!(PolicyAssembler::default().assemble(None, "cis_lvl1").is_none());
    }

    #[test]
    fn test_assemble_full_record() {
        let rule = rule(
            r#"
id: system_settings_screensaver_password_enforce
title: Enforce Screen Saver Password
discussion: |
  Users *must* authenticate.
fix: |
  [source,bash]
  ----
  profile
  ----
check: |
  /usr/bin/osascript -l JavaScript << EOS
  $.NSUserDefaults.alloc.initWithSuiteName('com.apple.screensaver')
  .objectForKey('askForPassword').js
  EOS
references:
  cis:
    benchmark:
      - 2.10.2
    level:
      - 1
"#,
        );

        let policy = PolicyAssembler::default().assemble(Some(&rule), "cis_lvl1-custom").unwrap();
        assert_eq!(policy.api_version, "v1");
        assert_eq!(policy.kind, "policy");
        assert_eq!(policy.spec.name, "macOS Security - Enforce Screen Saver Password");
        assert_eq!(policy.spec.description, "Users must authenticate.");
        assert_eq!(policy.spec.resolution, "profile");
        assert_eq!(
            policy.spec.query,
            "SELECT 1 WHERE EXISTS (SELECT 1 FROM managed_policies WHERE domain='com.apple.screensaver' AND name='askForPassword' AND (value = 1 OR value = 'true'));"
        );
        assert_eq!(policy.spec.purpose, PURPOSE_INFORMATIONAL);
        assert_eq!(policy.spec.contributors, CONTRIBUTORS);
        assert_eq!(
            policy.spec.tags,
            vec!["compliance", "macOS_Security_Compliance", "CIS_2.10.2", "CIS_Level1", "cis_lvl1_custom"]
        );
    }

    #[test]
    fn test_assemble_title_fallback_and_placeholder() {
        let rule = rule("id: os_custom_rule\n");
        let policy = PolicyAssembler::default().assemble(Some(&rule), "800-53r5_low").unwrap();
        assert_eq!(policy.spec.name, "macOS Security - os_custom_rule");
        assert_eq!(policy.spec.query, "SELECT 1;");
        assert_eq!(policy.spec.tags, vec!["compliance", "macOS_Security_Compliance", "800_53r5_low"]);
    }

    #[test]
    fn test_assemble_name_fallback_enabled() {
        let rule = rule("id: audit_auditd_enabled\ntitle: Enable Security Auditing\n");
        let plain = PolicyAssembler::default().assemble(Some(&rule), "b").unwrap();
        assert_eq!(plain.spec.query, "SELECT 1;");

        let assembler = PolicyAssembler::default().with_name_fallback(true);
        let policy = assembler.assemble(Some(&rule), "b").unwrap();
        assert_eq!(
            policy.spec.query,
            "SELECT 1 FROM launchd WHERE name = 'com.apple.auditd' AND state = 'running';"
        );
    }
}
