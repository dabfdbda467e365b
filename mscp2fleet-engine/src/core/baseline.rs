use serde::{Deserialize, Serialize};

/// 基线中的一个分组
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BaselineSection {
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub rules: Vec<String>,
}

/// 合规基线（baselines/*.yaml）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub profile: Vec<BaselineSection>,
}

impl Baseline {
    /// 按分组顺序遍历全部规则ID
    pub fn rule_ids(&self) -> impl Iterator<Item = &str> {
        self.profile
            .iter()
            .flat_map(|section| section.rules.iter().map(String::as_str))
    }

    /// 输出文件头使用的标题，标题为空时回退为基线名
    pub fn header_title<'a>(&'a self, baseline_name: &'a str) -> &'a str {
        if self.title.is_empty() {
            baseline_name
        } else {
            &self.title
        }
    }
}
