//! 检查脚本解析器
//! 1. 结构提取：osascript 中 initWithSuiteName + objectForKey 的偏好读取
//! 2. 启发式分类：按信号优先级映射到固定模板，均未命中时返回占位查询

use once_cell::sync::Lazy;
use regex::Regex;

use super::templates::{
    managed_domain_query, AUDITD_SERVICE_QUERY, AUDIT_FILES_QUERY, AUDIT_SERVICE_WILDCARD_QUERY,
    MANAGED_POLICIES_QUERY, RULE_ID_DOMAINS, SOFTWARE_UPDATE_QUERY,
    SYSTEM_FILES_QUERY, SYSTEM_INFO_QUERY,
};
use crate::core::mapping::managed_policy_exists;

static SUITE_NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"initWithSuiteName\('([^']+)'\)").unwrap()
});

static OBJECT_FOR_KEY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"objectForKey\('([^']+)'\)").unwrap()
});

/// 从脚本中提取的偏好读取（域 + 键）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceRead {
    pub domain: String,
    pub key: String,
}

impl PreferenceRead {
    pub fn to_query(&self) -> String {
        managed_policy_exists(&self.domain, &self.key)
    }
}

/// 启发式命中的信号类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeuristicSignal {
    FilePath,
    ServiceManager,
    SystemInventory,
    SoftwareUpdate,
    PreferenceRead,
    RuleIdDomain,
}

/// 检查脚本解析器（无状态）
#[derive(Debug, Default, Clone, Copy)]
pub struct CheckScriptResolver;

impl CheckScriptResolver {
    /// 结构提取：域与键必须同时存在，否则返回 None
    pub fn extract_preference(&self, check_script: &str) -> Option<PreferenceRead> {
        if !check_script.contains("osascript") || !check_script.contains("objectForKey") {
            return None;
        }

        let domain = SUITE_NAME_REGEX.captures(check_script)?.get(1)?.as_str();
        let key = OBJECT_FOR_KEY_REGEX.captures(check_script)?.get(1)?.as_str();

        Some(PreferenceRead {
            domain: domain.to_string(),
            key: key.to_string(),
        })
    }

    /// 启发式分类，返回 (信号, 查询)；无信号时返回 None
    pub fn classify(&self, check_script: &str, rule_id: &str) -> Option<(HeuristicSignal, String)> {
        let rule_is_audit = rule_id.contains("audit");

        // 文件路径字面量
        if check_script.contains("/etc/") || check_script.contains("/var/") {
            // chmod / chown 与普通路径检查共用同一模板
            let query = if rule_is_audit { AUDIT_FILES_QUERY } else { SYSTEM_FILES_QUERY };
            return Some((HeuristicSignal::FilePath, query.to_string()));
        }

        // 服务管理器
        if check_script.contains("launchctl") {
            let query = if rule_is_audit {
                AUDITD_SERVICE_QUERY
            } else {
                AUDIT_SERVICE_WILDCARD_QUERY
            };
            return Some((HeuristicSignal::ServiceManager, query.to_string()));
        }

        if check_script.contains("system_profiler") {
            return Some((HeuristicSignal::SystemInventory, SYSTEM_INFO_QUERY.to_string()));
        }

        if check_script.contains("softwareupdate") {
            return Some((HeuristicSignal::SoftwareUpdate, SOFTWARE_UPDATE_QUERY.to_string()));
        }

        if check_script.contains("defaults") {
            return Some((HeuristicSignal::PreferenceRead, MANAGED_POLICIES_QUERY.to_string()));
        }

        RULE_ID_DOMAINS
            .iter()
            .find(|(keyword, _)| rule_id.contains(keyword))
            .map(|(_, domain)| (HeuristicSignal::RuleIdDomain, managed_domain_query(domain)))
    }
}
