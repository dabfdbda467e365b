//! Fleet 策略文档（注释头 + 以 `---` 结尾的记录序列）

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use mscp2fleet_engine::PolicyRecord;
use walkdir::WalkDir;

use crate::config::POLICY_FILE_SUFFIX;
use crate::error::{ConvResult, ConverterError};

pub const GENERATED_BY_HEADER: &str = "# Generated from macOS Security Compliance Project";

const DOCUMENT_SEPARATOR: &str = "---";
const BACKUP_EXTENSION: &str = "bak";

/// 一个策略输出文件
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolicyDocument {
    /// 文件头注释行（含 `#`）
    pub header: Vec<String>,
    pub records: Vec<PolicyRecord>,
}

impl PolicyDocument {
    /// 新建输出文档，使用固定的两行文件头
    pub fn for_baseline(title: &str, records: Vec<PolicyRecord>) -> Self {
        Self {
            header: vec![
                format!("# Fleet policies for {}", title),
                GENERATED_BY_HEADER.to_string(),
            ],
            records,
        }
    }

    /// 解析多文档文本；`path` 仅用于错误信息
    pub fn parse(content: &str, path: &Path) -> ConvResult<Self> {
        let mut header = Vec::new();
        let mut records = Vec::new();
        let mut in_header = true;
        let mut chunk = String::new();
        let mut chunk_index = 0usize;

        for line in content.lines() {
            if line.trim_end() == DOCUMENT_SEPARATOR {
                in_header = false;
                Self::push_chunk(&chunk, chunk_index, path, &mut records)?;
                chunk.clear();
                chunk_index += 1;
                continue;
            }
            if in_header && line.starts_with('#') {
                header.push(line.to_string());
                continue;
            }
            if !line.trim().is_empty() {
                in_header = false;
            }
            chunk.push_str(line);
            chunk.push('\n');
        }
        Self::push_chunk(&chunk, chunk_index, path, &mut records)?;

        Ok(Self { header, records })
    }

    // 空块和纯注释块跳过
    fn push_chunk(
        chunk: &str,
        index: usize,
        path: &Path,
        records: &mut Vec<PolicyRecord>,
    ) -> ConvResult<()> {
        let has_content = chunk
            .lines()
            .any(|l| !l.trim().is_empty() && !l.trim_start().starts_with('#'));
        if !has_content {
            return Ok(());
        }

        let record = serde_yaml::from_str(chunk).map_err(|source| {
            ConverterError::DocumentParseError {
                path: path.to_path_buf(),
                index,
                source,
            }
        })?;
        records.push(record);
        Ok(())
    }

    /// 序列化：文件头、空行、每条记录后跟 `---` 行
    pub fn render(&self) -> ConvResult<String> {
        let mut out = String::new();
        for line in &self.header {
            out.push_str(line);
            out.push('\n');
        }
        if !self.header.is_empty() {
            out.push('\n');
        }
        for record in &self.records {
            out.push_str(&serde_yaml::to_string(record)?);
            out.push_str(DOCUMENT_SEPARATOR);
            out.push('\n');
        }
        Ok(out)
    }

    pub fn read(path: &Path) -> ConvResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConverterError::io(path, e))?;
        Self::parse(&content, path)
    }

    /// 写出文档，父目录不存在时先创建
    pub fn write(&self, path: &Path) -> ConvResult<()> {
        let rendered = self.render()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ConverterError::io(parent, e))?;
        }
        fs::write(path, rendered).map_err(|e| ConverterError::io(path, e))?;
        debug!("写入 {}（{}条记录）", path.display(), self.records.len());
        Ok(())
    }
}

/// 枚举目录下的 `*-fleet-policies.yml`（跳过 .bak 备份，按文件名排序）
pub fn discover_policy_files(dir: &Path) -> ConvResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == BACKUP_EXTENSION) {
            continue;
        }
        let is_policy_file = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(POLICY_FILE_SUFFIX));
        if is_policy_file {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, query: &str) -> PolicyRecord {
        PolicyRecord::macos(
            title,
            "desc".to_string(),
            "fix".to_string(),
            query.to_string(),
            vec!["compliance".to_string()],
        )
    }

    #[test]
    fn test_render_layout() {
        let doc = PolicyDocument::for_baseline("CIS Level 1", vec![record("A", "SELECT 1;")]);
        let text = doc.render().unwrap();
        assert!(text.starts_with(
            "# Fleet policies for CIS Level 1\n# Generated from macOS Security Compliance Project\n\napiVersion: v1\n"
        ));
        assert!(text.ends_with("---\n"));
        assert!(text.contains("name: 'macOS Security - A'") || text.contains("name: macOS Security - A"));
    }

    #[test]
    fn test_parse_render_preserves_records_and_header() {
        let doc = PolicyDocument::for_baseline(
            "stig",
            vec![
                record("A", "SELECT 1 FROM system_info;"),
                record("B", "SELECT 1;  -- TODO[generic]: replace placeholder"),
            ],
        );
        let text = doc.render().unwrap();
        let parsed = PolicyDocument::parse(&text, Path::new("stig-fleet-policies.yml")).unwrap();
        assert_eq!(parsed, doc);
        assert_eq!(parsed.render().unwrap(), text);
    }

    #[test]
    fn test_parse_skips_empty_and_comment_chunks() {
        let text = "# header\n\n---\n# only a comment\n---\n\n---\n";
        let parsed = PolicyDocument::parse(text, Path::new("x")).unwrap();
        assert_eq!(parsed.header, vec!["# header".to_string()]);
        assert!(parsed.records.is_empty());
    }

    #[test]
    fn test_parse_error_reports_index() {
        let text = "# header\n\n---\nspec: [broken\n---\n";
        let err = PolicyDocument::parse(text, Path::new("bad.yml")).unwrap_err();
        assert!(matches!(err, ConverterError::DocumentParseError { index: 1, .. }));
    }

    #[test]
    fn test_write_creates_missing_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fleet").join("nested").join("stig-fleet-policies.yml");
        let doc = PolicyDocument::for_baseline("stig", vec![record("A", "SELECT 1;")]);

        doc.write(&path).unwrap();
        assert_eq!(PolicyDocument::read(&path).unwrap(), doc);
    }

    #[test]
    fn test_discover_policy_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "stig-fleet-policies.yml",
            "cis_lvl1-fleet-policies.yml",
            "cis_lvl1-fleet-policies.yml.bak",
            "notes.yml",
        ] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        let files = discover_policy_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .collect();
        assert_eq!(names, vec!["cis_lvl1-fleet-policies.yml", "stig-fleet-policies.yml"]);
    }
}
