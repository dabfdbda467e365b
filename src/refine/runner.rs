use std::path::{Path, PathBuf};

use log::{error, info};
use mscp2fleet_engine::refine::count_markers;
use mscp2fleet_engine::RefinementPass;

use crate::document::{discover_policy_files, PolicyDocument};
use crate::error::{ConvResult, ConverterError};

/// 一次修正阶段的结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassReport {
    pub pass: &'static str,
    /// (文件, 修改记录数)
    pub files: Vec<(PathBuf, usize)>,
    pub total_changes: usize,
    /// 解析失败被跳过的文件
    pub skipped: Vec<PathBuf>,
    /// 阶段结束后仍带标记注释的记录数
    pub remaining_markers: usize,
}

/// 修正阶段调度器
#[derive(Debug, Clone)]
pub struct PassRunner {
    policy_dir: PathBuf,
}

impl PassRunner {
    pub fn new(policy_dir: impl Into<PathBuf>) -> Self {
        Self {
            policy_dir: policy_dir.into(),
        }
    }

    pub fn policy_dir(&self) -> &Path {
        &self.policy_dir
    }

    /// 对目录下全部策略文件执行一个阶段
    /// 无改动的文件不回写；单个文件解析失败只记录并继续
    pub fn run(&self, pass: &dyn RefinementPass) -> ConvResult<PassReport> {
        let files = discover_policy_files(&self.policy_dir)?;
        info!(
            "[{}] 处理{}个策略文件：{}",
            pass.name(),
            files.len(),
            self.policy_dir.display()
        );

        let mut report = PassReport {
            pass: pass.name(),
            ..Default::default()
        };

        for path in files {
            let mut document = match PolicyDocument::read(&path) {
                Ok(document) => document,
                Err(e @ ConverterError::DocumentParseError { .. }) => {
                    error!("{}，跳过该文件", e);
                    report.skipped.push(path);
                    continue;
                }
                Err(e) => return Err(e),
            };

            let changed = pass.apply(&mut document.records);
            if changed > 0 {
                document.write(&path)?;
            }
            report.remaining_markers += count_markers(&document.records);

            info!("[{}] {}：修改{}条", pass.name(), path.display(), changed);
            report.total_changes += changed;
            report.files.push((path, changed));
        }

        info!("[{}] 共修改{}条记录", report.pass, report.total_changes);
        Ok(report)
    }
}
