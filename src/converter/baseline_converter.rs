//! 基线转换器
//! 基线 → 逐条加载规则 → 组装策略记录 → 写出策略文件

use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info, warn};
use mscp2fleet_engine::{PolicyAssembler, PolicyRecord};

use crate::config::ConvertConfig;
use crate::document::PolicyDocument;
use crate::error::{ConvResult, ConverterError};
use crate::rule::{RuleLoader, RulePathManager};

/// 单个基线的转换结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaselineReport {
    pub baseline: String,
    pub output: PathBuf,
    pub policies: usize,
    /// 所有类别目录中都找不到的规则ID
    pub missing_rules: Vec<String>,
    /// 文件存在但无法解析的规则ID
    pub malformed_rules: Vec<String>,
}

/// 整次转换结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvertReport {
    pub baselines: Vec<BaselineReport>,
    /// 解析失败被跳过的基线文件
    pub failed_baselines: Vec<PathBuf>,
}

impl ConvertReport {
    pub fn total_policies(&self) -> usize {
        self.baselines.iter().map(|b| b.policies).sum()
    }

    pub fn total_missing(&self) -> usize {
        self.baselines.iter().map(|b| b.missing_rules.len()).sum()
    }
}

/// 基线转换器
#[derive(Debug)]
pub struct BaselineConverter {
    config: ConvertConfig,
    loader: RuleLoader,
    assembler: PolicyAssembler,
}

impl BaselineConverter {
    /// 项目根目录不存在或映射表无效时直接失败
    pub fn new(config: ConvertConfig) -> ConvResult<Self> {
        config.ensure_project_root()?;
        let engine = config.resolution_engine()?;
        let assembler = PolicyAssembler::new(engine).with_name_fallback(config.name_fallback);
        Ok(Self {
            loader: RuleLoader::new(&config),
            assembler,
            config,
        })
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// 转换基线目录下的全部基线
    pub fn convert_all(&self) -> ConvResult<ConvertReport> {
        let output_dir = &self.config.output_dir;
        fs::create_dir_all(output_dir).map_err(|e| ConverterError::io(output_dir, e))?;

        let baselines = RulePathManager::discover_baselines(&self.config.baselines_dir)?;
        info!(
            "发现{}个基线文件：{}",
            baselines.len(),
            self.config.baselines_dir.display()
        );

        let mut report = ConvertReport::default();
        for path in baselines {
            match self.convert_baseline(&path) {
                Ok(baseline_report) => report.baselines.push(baseline_report),
                Err(e @ ConverterError::BaselineParseError { .. }) => {
                    error!("{}，跳过该基线", e);
                    report.failed_baselines.push(path);
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "转换完成：基线{}个，策略{}条，缺失规则{}条",
            report.baselines.len(),
            report.total_policies(),
            report.total_missing()
        );
        Ok(report)
    }

    /// 转换单个基线文件，输出 `<output_dir>/<基线名>-fleet-policies.yml`
    pub fn convert_baseline(&self, path: &Path) -> ConvResult<BaselineReport> {
        let baseline_name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default()
            .to_string();
        let baseline = RuleLoader::load_baseline(path)?;

        let mut report = BaselineReport {
            output: self.config.output_file(&baseline_name),
            baseline: baseline_name.clone(),
            ..Default::default()
        };

        let mut records: Vec<PolicyRecord> = Vec::new();
        for rule_id in baseline.rule_ids() {
            let rule = match self.loader.load_rule(rule_id) {
                Ok(rule) => rule,
                Err(e @ ConverterError::RuleParseError { .. }) => {
                    warn!("{}", e);
                    report.malformed_rules.push(rule_id.to_string());
                    continue;
                }
                Err(e) => return Err(e),
            };

            // 缺失规则已由加载器告警，这里只计数
            let Some(rule) = rule else {
                report.missing_rules.push(rule_id.to_string());
                continue;
            };
            if let Some(record) = self.assembler.assemble(Some(&rule), &baseline_name) {
                records.push(record);
            }
        }

        report.policies = records.len();
        let document = PolicyDocument::for_baseline(baseline.header_title(&baseline_name), records);
        document.write(&report.output)?;

        info!(
            "基线[{}] 生成{}条策略 → {}",
            baseline_name,
            report.policies,
            report.output.display()
        );
        Ok(report)
    }
}
