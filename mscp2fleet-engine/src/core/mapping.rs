use serde::{Deserialize, Serialize};

/// 兜底模式，必须位于映射表末尾
pub const CATCH_ALL_PATTERN: &str = ".*";

/// 名称模式映射：(策略名正则, 查询语句)
/// 表按顺序匹配，首个命中者生效
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternMapping {
    pub pattern: String,
    pub query: String,
}

impl PatternMapping {
    pub fn new(pattern: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            query: query.into(),
        }
    }

    pub fn is_catch_all(&self) -> bool {
        self.pattern == CATCH_ALL_PATTERN
    }
}

/// managed_policies 存在性查询（结构提取与映射表共用的模板）
pub(crate) fn managed_policy_exists(domain: &str, key: &str) -> String {
    format!(
        "SELECT 1 WHERE EXISTS (SELECT 1 FROM managed_policies WHERE domain='{}' AND name='{}' AND (value = 1 OR value = 'true'));",
        domain, key
    )
}

/// 内置映射表
pub fn default_mappings() -> Vec<PatternMapping> {
    // (正则, 查询) 静态对；managed_policies 类条目由 (domain, key) 生成
    const FILE_MAPPINGS: &[(&str, &str)] = &[
        // 审计文件/目录
        (r".*audit.*files.*not.*contain.*access.*control.*lists.*",
            "SELECT 1 FROM file WHERE (path LIKE '/var/audit/%' OR path LIKE '/etc/security/%') AND extended_attributes LIKE '%com.apple.acl%';"),
        (r".*audit.*folder.*not.*contain.*access.*control.*lists.*",
            "SELECT 1 FROM file WHERE (path LIKE '/var/audit/%' OR path LIKE '/etc/security/%') AND type = 'directory' AND extended_attributes LIKE '%com.apple.acl%';"),
        (r".*enable.*security.*auditing.*",
            "SELECT 1 FROM launchd WHERE name = 'com.apple.auditd' AND state = 'running';"),
        (r".*audit.*capacity.*warning.*",
            "SELECT 1 FROM file WHERE path = '/etc/security/audit_control' AND content LIKE '%minfree%';"),
        (r".*shut.*down.*upon.*audit.*failure.*",
            "SELECT 1 FROM file WHERE path = '/etc/security/audit_control' AND content LIKE '%policy: ahlt%';"),
        (r".*audit.*log.*files.*group.*wheel.*",
            "SELECT 1 FROM file WHERE path LIKE '/var/audit/%' AND gid = 0;"),
        (r".*audit.*log.*files.*mode.*440.*",
            "SELECT 1 FROM file WHERE path LIKE '/var/audit/%' AND mode <= '440';"),
        (r".*audit.*log.*files.*owned.*root.*",
            "SELECT 1 FROM file WHERE path LIKE '/var/audit/%' AND uid = 0;"),
        (r".*audit.*folders.*group.*wheel.*",
            "SELECT 1 FROM file WHERE path = '/var/audit' AND type = 'directory' AND gid = 0;"),
        (r".*audit.*folders.*owned.*root.*",
            "SELECT 1 FROM file WHERE path = '/var/audit' AND type = 'directory' AND uid = 0;"),
        (r".*audit.*folders.*mode.*700.*",
            "SELECT 1 FROM file WHERE path = '/var/audit' AND type = 'directory' AND mode <= '700';"),
        // 审计事件标志
        (r".*audit.*authorization.*authentication.*events.*",
            "SELECT 1 FROM file WHERE path = '/etc/security/auditcontrol' AND content LIKE '%aa%';"),
        (r".*audit.*administrative.*action.*events.*",
            "SELECT 1 FROM file WHERE path = '/etc/security/auditcontrol' AND content LIKE '%ad%';"),
        (r".*audit.*failed.*program.*execution.*",
            "SELECT 1 FROM file WHERE path = '/etc/security/auditcontrol' AND content LIKE '%-ex%';"),
        (r".*audit.*deletions.*object.*attributes.*",
            "SELECT 1 FROM file WHERE path = '/etc/security/auditcontrol' AND content LIKE '%-fd%';"),
        (r".*audit.*failed.*change.*object.*attributes.*",
            "SELECT 1 FROM file WHERE path = '/etc/security/auditcontrol' AND content LIKE '%-fm%';"),
        (r".*audit.*failed.*read.*actions.*",
            "SELECT 1 FROM file WHERE path = '/etc/security/auditcontrol' AND content LIKE '%-fr%';"),
        (r".*audit.*failed.*write.*actions.*",
            "SELECT 1 FROM file WHERE path = '/etc/security/auditcontrol' AND content LIKE '%-fw%';"),
        (r".*audit.*log.*in.*log.*out.*events.*",
            "SELECT 1 FROM file WHERE path = '/etc/security/auditcontrol' AND content LIKE '%lo%';"),
        // FileVault
        (r".*filevault.*enabled.*",
            "SELECT 1 FROM disk_encryption WHERE name = 'FileVault' AND encrypted = 1;"),
    ];

    const MANAGED_MAPPINGS: &[(&str, &str, &str)] = &[
        (r".*filevault.*auto.*login.*disabled.*", "com.apple.loginwindow", "DisableFDEAutoLogin"),
        (r".*firewall.*enabled.*", "com.apple.security.firewall", "EnableFirewall"),
        (r".*firewall.*stealth.*mode.*", "com.apple.security.firewall", "EnableStealthMode"),
        (r".*screen.*saver.*password.*required.*", "com.apple.screensaver", "askForPassword"),
        (r".*screen.*saver.*timeout.*", "com.apple.screensaver", "idleTime"),
        (r".*location.*services.*disabled.*", "com.apple.locationd", "LocationServicesEnabled"),
        (r".*bluetooth.*disabled.*", "com.apple.MCXBluetooth", "DisableBluetooth"),
        (r".*guest.*account.*disabled.*", "com.apple.MCX", "DisableGuestAccount"),
    ];

    let mut mappings: Vec<PatternMapping> = FILE_MAPPINGS
        .iter()
        .map(|(pattern, query)| PatternMapping::new(*pattern, *query))
        .collect();

    mappings.extend(
        MANAGED_MAPPINGS
            .iter()
            .map(|(pattern, domain, key)| PatternMapping::new(*pattern, managed_policy_exists(domain, key))),
    );

    mappings.push(PatternMapping::new(
        r".*software.*update.*automatic.*",
        "SELECT 1 FROM software_update WHERE software_update_required = '0';",
    ));
    mappings.push(PatternMapping::new(
        CATCH_ALL_PATTERN,
        "SELECT 1 FROM managed_policies WHERE domain = 'com.apple.applicationaccess';",
    ));

    mappings
}
