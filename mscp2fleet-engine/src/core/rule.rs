use log::warn;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

/// mSCP 规则定义（rules/<category>/<id>.yaml）
/// 仅保留转换需要的字段，其余字段反序列化时忽略
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub discussion: String,
    #[serde(default)]
    pub fix: String,
    /// 检查脚本（shell / osascript 片段，无结构）
    #[serde(default)]
    pub check: String,
    /// 合规引用（标准名 → 任意嵌套结构，如 cis → {benchmark, level}）
    #[serde(default)]
    pub references: FxHashMap<String, Value>,
}

/// CIS 引用信息（只取各数组的第一个元素）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CisReference {
    pub benchmark: Option<String>,
    pub level: Option<String>,
}

impl Rule {
    /// 策略标题：标题为空时回退为规则ID
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.id
        } else {
            &self.title
        }
    }

    /// 提取 references.cis.benchmark / references.cis.level
    /// 结构不符时返回空值，不视为错误
    pub fn cis_reference(&self) -> CisReference {
        let Some(cis) = self.references.get("cis") else {
            return CisReference::default();
        };
        let Value::Mapping(cis_map) = cis else {
            warn!("规则[{}] references.cis 不是映射结构，忽略CIS标签", self.id);
            return CisReference::default();
        };

        CisReference {
            benchmark: first_scalar(&self.id, "benchmark", cis_map.get("benchmark")),
            level: first_scalar(&self.id, "level", cis_map.get("level")),
        }
    }
}

/// 取数组首元素并转为字符串（数字等标量直接格式化）
fn first_scalar(rule_id: &str, field: &str, value: Option<&Value>) -> Option<String> {
    let Value::Sequence(items) = value? else {
        return None;
    };
    let first = items.first()?;
    let text = match first {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => {
            warn!("规则[{}] cis.{} 首元素类型不支持：{:?}", rule_id, field, other);
            return None;
        }
    };
    (!text.is_empty()).then_some(text)
}
