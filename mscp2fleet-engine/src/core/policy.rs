use serde::{Deserialize, Serialize};

pub const API_VERSION: &str = "v1";
pub const POLICY_KIND: &str = "policy";
pub const POLICY_NAME_PREFIX: &str = "macOS Security - ";
/// 生成记录的 purpose 固定为 Informational，修正阶段也以此识别生成记录
pub const PURPOSE_INFORMATIONAL: &str = "Informational";
pub const CONTRIBUTORS: &str = "macos_security_compliance_project";

const PLATFORMS: &str = "macOS";
const PLATFORM: &str = "darwin";

/// Fleet 策略记录（输出单元）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRecord {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub spec: PolicySpec,
}

/// 策略主体，字段顺序即序列化顺序
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicySpec {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub platforms: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub resolution: String,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub purpose: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub contributors: String,
}

impl PolicyRecord {
    /// 以 macOS 平台默认值构建策略记录
    pub fn macos(
        title: &str,
        description: String,
        resolution: String,
        query: String,
        tags: Vec<String>,
    ) -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: POLICY_KIND.to_string(),
            spec: PolicySpec {
                name: format!("{}{}", POLICY_NAME_PREFIX, title),
                platforms: PLATFORMS.to_string(),
                platform: PLATFORM.to_string(),
                description,
                resolution,
                query,
                purpose: PURPOSE_INFORMATIONAL.to_string(),
                tags,
                contributors: CONTRIBUTORS.to_string(),
            },
        }
    }

    /// 是否为转换器生成的 Informational 记录（修正阶段只处理此类记录）
    pub fn is_informational(&self) -> bool {
        self.spec.purpose.trim() == PURPOSE_INFORMATIONAL
    }
}
