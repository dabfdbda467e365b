//! 领域替换阶段
//! 以标记类别为主键、策略名提示为次键，按表顺序选出唯一一条替换模板

use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::Regex;

use super::marker::{parse_marker, PlaceholderCategory};
use super::RefinementPass;
use crate::core::PolicyRecord;
use crate::utils::preview_compact;

const AUDIT_LOG_ACL_QUERY: &str =
    "SELECT 1 FROM file WHERE (path LIKE '/var/audit/%' OR path LIKE '/etc/security/%') AND extended_attributes LIKE '%com.apple.acl%';";
const AUDIT_FOLDER_ACL_QUERY: &str =
    "SELECT 1 FROM file WHERE (path LIKE '/var/audit/%' OR path LIKE '/etc/security/%') AND type = 'directory' AND extended_attributes LIKE '%com.apple.acl%';";
const AUDIT_SERVICE_RUNNING_QUERY: &str =
    "SELECT 1 FROM launchd WHERE name = 'com.apple.auditd' AND state = 'running';";
const AUDIT_OWNER_QUERY: &str = "SELECT 1 FROM file WHERE path LIKE '/var/audit/%' AND uid = 0;";
const AUDIT_GROUP_QUERY: &str = "SELECT 1 FROM file WHERE path LIKE '/var/audit/%' AND gid = 0;";
const AUDIT_MODE_QUERY: &str = "SELECT 1 FROM file WHERE path LIKE '/var/audit/%' AND mode <= '440';";
const MANAGED_POLICY_QUERY: &str =
    "SELECT 1 FROM managed_policies WHERE domain = 'com.apple.applicationaccess';";

const DIRECTORY_ACL_QUALIFIER: &str = "type = 'directory' AND extended_attributes LIKE '%com.apple.acl%'";
const ACL_QUALIFIER: &str = "extended_attributes LIKE '%com.apple.acl%'";
const FILE_MODE_QUALIFIER: &str = "mode <= '440'";
const FOLDER_MODE_QUALIFIER: &str = "type = 'directory' AND mode <= '700'";
const RUNNING_QUALIFIER: &str = "state = 'running'";

/// 替换动作
#[derive(Debug, Clone, Copy)]
enum FixAction {
    /// 整体替换为固定查询
    Replace(&'static str),
    /// 在原查询 WHERE 条件后追加限定条件
    Qualify(&'static str),
}

/// 替换表条目定义
struct FixSpec {
    label: &'static str,
    category: PlaceholderCategory,
    /// 策略名（小写）提示正则；None 表示该类别的默认条目
    name_hint: Option<&'static str>,
    action: FixAction,
}

static FIX_SPECS: &[FixSpec] = &[
    // generic：恒真占位
    FixSpec { label: "audit-folder-acl", category: PlaceholderCategory::Generic, name_hint: Some(r"audit.*folder.*(access control|acl)"), action: FixAction::Replace(AUDIT_FOLDER_ACL_QUERY) },
    FixSpec { label: "audit-log-acl", category: PlaceholderCategory::Generic, name_hint: Some(r"audit.*(access control|acl)"), action: FixAction::Replace(AUDIT_LOG_ACL_QUERY) },
    FixSpec { label: "file-owner", category: PlaceholderCategory::Generic, name_hint: Some(r"audit.*owned.*root"), action: FixAction::Replace(AUDIT_OWNER_QUERY) },
    FixSpec { label: "file-group", category: PlaceholderCategory::Generic, name_hint: Some(r"audit.*group.*wheel"), action: FixAction::Replace(AUDIT_GROUP_QUERY) },
    FixSpec { label: "file-mode", category: PlaceholderCategory::Generic, name_hint: Some(r"audit.*(mode|permission)"), action: FixAction::Replace(AUDIT_MODE_QUERY) },
    FixSpec { label: "audit-service", category: PlaceholderCategory::Generic, name_hint: Some(r"security.*auditing"), action: FixAction::Replace(AUDIT_SERVICE_RUNNING_QUERY) },
    FixSpec { label: "managed-policy", category: PlaceholderCategory::Generic, name_hint: None, action: FixAction::Replace(MANAGED_POLICY_QUERY) },
    // file：无限定的路径通配
    FixSpec { label: "file-owner", category: PlaceholderCategory::File, name_hint: Some(r"owned.*root"), action: FixAction::Qualify("uid = 0") },
    FixSpec { label: "file-group", category: PlaceholderCategory::File, name_hint: Some(r"group.*wheel"), action: FixAction::Qualify("gid = 0") },
    FixSpec { label: "audit-log-acl", category: PlaceholderCategory::File, name_hint: Some(r"audit.*files.*(access control|acl)"), action: FixAction::Qualify(ACL_QUALIFIER) },
    FixSpec { label: "folder-mode", category: PlaceholderCategory::File, name_hint: Some(r"folder.*(mode|permission)"), action: FixAction::Qualify(FOLDER_MODE_QUALIFIER) },
    FixSpec { label: "file-mode", category: PlaceholderCategory::File, name_hint: Some(r"mode|permission"), action: FixAction::Qualify(FILE_MODE_QUALIFIER) },
    FixSpec { label: "audit-folder-acl", category: PlaceholderCategory::File, name_hint: None, action: FixAction::Qualify(DIRECTORY_ACL_QUALIFIER) },
    // service：无限定的服务名通配
    FixSpec { label: "audit-service", category: PlaceholderCategory::Service, name_hint: None, action: FixAction::Qualify(RUNNING_QUALIFIER) },
];

/// 编译后的替换表条目
struct CompiledFix {
    spec: &'static FixSpec,
    name_hint: Option<Regex>,
}

static COMPILED_FIXES: Lazy<Vec<CompiledFix>> = Lazy::new(|| {
    FIX_SPECS
        .iter()
        .map(|spec| CompiledFix {
            spec,
            name_hint: spec.name_hint.map(|hint| Regex::new(hint).unwrap()),
        })
        .collect()
});

/// 领域替换阶段
#[derive(Debug, Default, Clone, Copy)]
pub struct SpecificQueryPass;

impl SpecificQueryPass {
    /// 为带标记的查询选出替换结果；无标记或无可用条目时返回 None
    pub fn rewrite(&self, policy_name: &str, query: &str) -> Option<String> {
        let (base, category) = parse_marker(query)?;
        let name = policy_name.to_lowercase();

        let fix = COMPILED_FIXES.iter().find(|fix| {
            fix.spec.category == category
                && fix.name_hint.as_ref().map_or(true, |hint| hint.is_match(&name))
        })?;

        trace!("[{}] {} → {}", category, preview_compact(&name, 60), fix.spec.label);

        Some(match fix.spec.action {
            FixAction::Replace(template) => template.to_string(),
            FixAction::Qualify(qualifier) => qualify(base, qualifier),
        })
    }
}

impl RefinementPass for SpecificQueryPass {
    fn name(&self) -> &'static str {
        "fix-specific"
    }

    fn apply(&self, records: &mut [PolicyRecord]) -> usize {
        let mut changes = 0;

        for record in records.iter_mut() {
            if let Some(query) = self.rewrite(&record.spec.name, &record.spec.query) {
                debug!("领域替换：{} → {}", record.spec.name, preview_compact(&query, 80));
                record.spec.query = query;
                changes += 1;
            }
        }

        changes
    }
}

/// 在查询 WHERE 条件后追加限定条件，原条件含 OR 时加括号
fn qualify(base: &str, qualifier: &str) -> String {
    let body = base.trim().trim_end_matches(';').trim_end();
    match body.split_once(" WHERE ") {
        Some((head, condition)) if condition.contains(" OR ") => {
            format!("{} WHERE ({}) AND {};", head, condition, qualifier)
        }
        Some((head, condition)) => format!("{} WHERE {} AND {};", head, condition, qualifier),
        None => format!("{} WHERE {};", body, qualifier),
    }
}
