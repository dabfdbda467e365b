use log::debug;

use super::marker::classify_placeholder;
use super::RefinementPass;
use crate::core::PolicyRecord;

/// 占位标注阶段：Informational 记录中的最泛化查询追加类别标记
/// 已标注的查询不再匹配占位形态，重复执行不会重复标注
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderAnnotatePass;

impl RefinementPass for PlaceholderAnnotatePass {
    fn name(&self) -> &'static str {
        "fix-queries"
    }

    fn apply(&self, records: &mut [PolicyRecord]) -> usize {
        let mut changes = 0;

        for record in records.iter_mut().filter(|r| r.is_informational()) {
            let Some(category) = classify_placeholder(&record.spec.query) else {
                continue;
            };

            record.spec.query = category.annotate(&record.spec.query);
            changes += 1;
            debug!("[{}] 标注占位查询：{}", category, record.spec.name);
        }

        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refine::parse_marker;

    fn record(name: &str, query: &str, purpose: &str) -> PolicyRecord {
        let mut record = PolicyRecord::macos(name, String::new(), String::new(), query.to_string(), vec![]);
        record.spec.purpose = purpose.to_string();
        record
    }

    #[test]
    fn test_annotate_only_generic_informational() {
        let mut records = vec![
            record("a", "SELECT 1;", "Informational"),
            record("b", "SELECT 1;", "Enforcement"),
            record("c", "SELECT 1 FROM system_info;", "Informational"),
            record("d", "SELECT 1 FROM launchd WHERE name LIKE '%audit%';", "Informational"),
        ];

        assert_eq!(PlaceholderAnnotatePass.apply(&mut records), 2);
        assert!(parse_marker(&records[0].spec.query).is_some());
        assert_eq!(records[1].spec.query, "SELECT 1;");
        assert_eq!(records[2].spec.query, "SELECT 1 FROM system_info;");
        assert!(parse_marker(&records[3].spec.query).is_some());
    }

    #[test]
    fn test_annotate_is_idempotent() {
        let mut records = vec![record("a", "SELECT 1;", "Informational")];
        assert_eq!(PlaceholderAnnotatePass.apply(&mut records), 1);
        let once = records.clone();
        assert_eq!(PlaceholderAnnotatePass.apply(&mut records), 0);
        assert_eq!(records, once);
    }
}
