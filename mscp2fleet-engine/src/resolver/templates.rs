//! 启发式分类使用的固定查询模板

/// 恒真占位查询：表示"尚未解析"，修正阶段据此识别
pub const PLACEHOLDER_QUERY: &str = "SELECT 1;";

pub(crate) const AUDIT_FILES_QUERY: &str =
    "SELECT 1 FROM file WHERE path LIKE '/var/audit/%' OR path LIKE '/etc/security/%';";
pub(crate) const SYSTEM_FILES_QUERY: &str =
    "SELECT 1 FROM file WHERE path LIKE '/etc/%' OR path LIKE '/var/%';";
pub(crate) const AUDITD_SERVICE_QUERY: &str =
    "SELECT 1 FROM launchd WHERE name = 'com.apple.auditd';";
pub(crate) const AUDIT_SERVICE_WILDCARD_QUERY: &str =
    "SELECT 1 FROM launchd WHERE name LIKE '%audit%';";
pub(crate) const SYSTEM_INFO_QUERY: &str = "SELECT 1 FROM system_info;";
pub(crate) const SOFTWARE_UPDATE_QUERY: &str =
    "SELECT 1 FROM software_update WHERE software_update_required = '0';";
pub(crate) const MANAGED_POLICIES_QUERY: &str = "SELECT 1 FROM managed_policies;";

/// 按规则ID关键字映射到 managed_policies 域（按顺序判断）
pub(crate) const RULE_ID_DOMAINS: &[(&str, &str)] = &[
    ("firewall", "com.apple.security.firewall"),
    ("gatekeeper", "com.apple.systempolicy.control"),
    ("filevault", "com.apple.MCX"),
];

pub(crate) fn managed_domain_query(domain: &str) -> String {
    format!("SELECT 1 FROM managed_policies WHERE domain = '{}';", domain)
}

/// 是否为恒真占位查询（忽略首尾空白）
pub fn is_placeholder_query(query: &str) -> bool {
    query.trim() == PLACEHOLDER_QUERY
}
