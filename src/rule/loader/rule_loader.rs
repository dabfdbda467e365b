//! 规则/基线加载器

use std::fs;
use std::path::Path;

use log::{debug, warn};
use mscp2fleet_engine::{Baseline, Rule};

use super::path_manager::RulePathManager;
use crate::config::ConvertConfig;
use crate::error::{ConvResult, ConverterError};

/// 规则加载器
#[derive(Debug, Clone)]
pub struct RuleLoader {
    paths: RulePathManager,
}

impl RuleLoader {
    pub fn new(config: &ConvertConfig) -> Self {
        Self {
            paths: RulePathManager::new(config),
        }
    }

    pub fn path_manager(&self) -> &RulePathManager {
        &self.paths
    }

    /// 按类别顺序加载规则
    /// 找不到返回 Ok(None)；文件存在但无法解析返回 Err
    pub fn load_rule(&self, rule_id: &str) -> ConvResult<Option<Rule>> {
        let Some(path) = self.paths.locate(rule_id) else {
            warn!("规则[{}] 在所有类别目录中均未找到", rule_id);
            return Ok(None);
        };

        let content = fs::read_to_string(&path).map_err(|e| ConverterError::io(&path, e))?;
        let mut rule: Rule =
            serde_yaml::from_str(&content).map_err(|source| ConverterError::RuleParseError {
                rule_id: rule_id.to_string(),
                path: path.clone(),
                source,
            })?;

        // 文件内缺少 id 时以文件名为准
        if rule.id.trim().is_empty() {
            rule.id = rule_id.to_string();
        }
        debug!("规则[{}] 加载自 {}", rule_id, path.display());
        Ok(Some(rule))
    }

    /// 加载基线文件
    pub fn load_baseline(path: &Path) -> ConvResult<Baseline> {
        let content = fs::read_to_string(path).map_err(|e| ConverterError::io(path, e))?;
        serde_yaml::from_str(&content).map_err(|source| ConverterError::BaselineParseError {
            path: path.to_path_buf(),
            source,
        })
    }
}
