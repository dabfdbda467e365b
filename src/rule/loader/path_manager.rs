use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::ConvertConfig;
use crate::error::ConvResult;

/// 规则路径管理器
#[derive(Debug, Clone)]
pub struct RulePathManager {
    rules_dir: PathBuf,
    categories: Vec<String>,
}

impl RulePathManager {
    pub fn new(config: &ConvertConfig) -> Self {
        Self {
            rules_dir: config.rules_dir.clone(),
            categories: config.rule_categories.clone(),
        }
    }

    /// 规则候选路径（按类别顺序：rules/<category>/<id>.yaml）
    pub fn candidate_paths<'a>(&'a self, rule_id: &'a str) -> impl Iterator<Item = PathBuf> + 'a {
        self.categories
            .iter()
            .map(move |category| self.rules_dir.join(category).join(format!("{}.yaml", rule_id)))
    }

    /// 第一个存在的候选路径
    pub fn locate(&self, rule_id: &str) -> Option<PathBuf> {
        self.candidate_paths(rule_id).find(|path| path.is_file())
    }

    /// 枚举基线目录下的 *.yaml（不递归，按文件名排序）
    pub fn discover_baselines(baselines_dir: &Path) -> ConvResult<Vec<PathBuf>> {
        let mut baselines = Vec::new();
        for entry in WalkDir::new(baselines_dir).min_depth(1).max_depth(1) {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type().is_file()
                && path.extension().is_some_and(|ext| ext == "yaml")
            {
                baselines.push(path.to_path_buf());
            }
        }
        baselines.sort();
        Ok(baselines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_locate_follows_category_order() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConvertConfig::builder().project_root(dir.path()).build();
        for category in ["audit", "supplemental"] {
            let category_dir = config.rules_dir.join(category);
            fs::create_dir_all(&category_dir).unwrap();
            fs::write(category_dir.join("dup_rule.yaml"), "id: dup_rule\n").unwrap();
        }

        let paths = RulePathManager::new(&config);
        assert_eq!(
            paths.locate("dup_rule"),
            Some(config.rules_dir.join("audit").join("dup_rule.yaml"))
        );
        assert_eq!(paths.locate("nope"), None);
        assert_eq!(paths.candidate_paths("x").count(), config.rule_categories.len());
    }

    #[test]
    fn test_discover_baselines_sorted_yaml_only() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["stig.yaml", "cis_lvl1.yaml", "README.md", "800-53r5_low.yaml"] {
            fs::write(dir.path().join(name), "title: x\n").unwrap();
        }
        fs::create_dir(dir.path().join("nested.yaml")).unwrap();

        let found = RulePathManager::discover_baselines(dir.path()).unwrap();
        let names: Vec<_> = found
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .collect();
        assert_eq!(names, vec!["800-53r5_low.yaml", "cis_lvl1.yaml", "stig.yaml"]);
    }
}
