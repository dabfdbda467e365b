use log::debug;

use super::marker::looks_unresolved;
use super::RefinementPass;
use crate::core::PolicyRecord;
use crate::resolver::QueryResolutionEngine;

/// 名称模式替换阶段：仍未解析的 Informational 记录按策略名匹配映射表
#[derive(Debug, Clone, Default)]
pub struct NamePatternPass {
    engine: QueryResolutionEngine,
}

impl NamePatternPass {
    pub fn new(engine: QueryResolutionEngine) -> Self {
        Self { engine }
    }
}

impl RefinementPass for NamePatternPass {
    fn name(&self) -> &'static str {
        "comprehensive"
    }

    fn apply(&self, records: &mut [PolicyRecord]) -> usize {
        let mut changes = 0;

        for record in records.iter_mut().filter(|r| r.is_informational()) {
            if !looks_unresolved(&record.spec.query) {
                continue;
            }

            let resolved = self.engine.resolve_name(&record.spec.name);
            if resolved.query == record.spec.query {
                continue;
            }

            debug!("名称模式替换：{}（{}）", record.spec.name, resolved.source);
            record.spec.query = resolved.query;
            changes += 1;
        }

        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refine::PlaceholderAnnotatePass;

    fn record(name: &str, query: &str) -> PolicyRecord {
        PolicyRecord::macos(name, String::new(), String::new(), query.to_string(), vec![])
    }

    #[test]
    fn test_replaces_unresolved_by_name() {
        let mut records = vec![
            record("Enable Security Auditing", "SELECT 1;"),
            record("Ensure Bluetooth Is Disabled", "SELECT 1 WHERE 1;"),
            record("Disable AirDrop", "SELECT 1;"),
            record("Enable Firewall", "SELECT 1 FROM system_info;"),
        ];
        PlaceholderAnnotatePass.apply(&mut records);

        let pass = NamePatternPass::default();
        assert_eq!(pass.apply(&mut records), 3);
        assert_eq!(
            records[0].spec.query,
            "SELECT 1 FROM launchd WHERE name = 'com.apple.auditd' AND state = 'running';"
        );
        assert!(records[1].spec.query.contains("domain='com.apple.MCXBluetooth'"));
        assert_eq!(
            records[2].spec.query,
            "SELECT 1 FROM managed_policies WHERE domain = 'com.apple.applicationaccess';"
        );
        // 已有数据源引用的查询保持不变
        assert_eq!(records[3].spec.query, "SELECT 1 FROM system_info;");

        // 再次执行不再产生修改
        assert_eq!(pass.apply(&mut records), 0);
    }
}
