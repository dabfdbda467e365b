//! 命令分发：convert / fix-queries / fix-specific / comprehensive

use std::fmt;
use std::str::FromStr;

use mscp2fleet_engine::{NamePatternPass, PlaceholderAnnotatePass, SpecificQueryPass};

use crate::config::ConvertConfig;
use crate::converter::{BaselineConverter, ConvertReport};
use crate::error::{ConvResult, ConverterError};
use crate::refine::{PassReport, PassRunner};

/// 可执行的操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// 基线 → 策略文件
    Convert,
    /// 占位标注
    FixQueries,
    /// 领域替换
    FixSpecific,
    /// 名称模式替换
    Comprehensive,
}

impl Command {
    pub const ALL: [Command; 4] = [
        Command::Convert,
        Command::FixQueries,
        Command::FixSpecific,
        Command::Comprehensive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Convert => "convert",
            Command::FixQueries => "fix-queries",
            Command::FixSpecific => "fix-specific",
            Command::Comprehensive => "comprehensive",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = ConverterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .into_iter()
            .find(|cmd| cmd.as_str() == s)
            .ok_or_else(|| ConverterError::ConfigError(format!("Unknown command: {}", s)))
    }
}

/// 命令执行结果
#[derive(Debug, Clone, PartialEq)]
pub enum CommandReport {
    Convert(ConvertReport),
    Pass(PassReport),
}

impl fmt::Display for CommandReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandReport::Convert(report) => {
                for baseline in &report.baselines {
                    writeln!(
                        f,
                        "{}: {} policies -> {}",
                        baseline.baseline,
                        baseline.policies,
                        baseline.output.display()
                    )?;
                }
                write!(
                    f,
                    "Converted {} baselines, {} policies ({} missing rules, {} baselines skipped)",
                    report.baselines.len(),
                    report.total_policies(),
                    report.total_missing(),
                    report.failed_baselines.len()
                )
            }
            CommandReport::Pass(report) => {
                for (path, changed) in &report.files {
                    writeln!(f, "{}: {} changed", path.display(), changed)?;
                }
                write!(f, "[{}] total changed: {}", report.pass, report.total_changes)?;
                if report.remaining_markers > 0 {
                    write!(f, ", placeholders still marked: {}", report.remaining_markers)?;
                }
                Ok(())
            }
        }
    }
}

/// 执行一个命令
pub fn run_command(command: Command, config: &ConvertConfig) -> ConvResult<CommandReport> {
    let runner = PassRunner::new(&config.policy_dir);
    let report = match command {
        Command::Convert => {
            CommandReport::Convert(BaselineConverter::new(config.clone())?.convert_all()?)
        }
        Command::FixQueries => CommandReport::Pass(runner.run(&PlaceholderAnnotatePass)?),
        Command::FixSpecific => CommandReport::Pass(runner.run(&SpecificQueryPass)?),
        Command::Comprehensive => {
            let pass = NamePatternPass::new(config.resolution_engine()?);
            CommandReport::Pass(runner.run(&pass)?)
        }
    };
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_parse_command() {
        assert_eq!("fix-specific".parse::<Command>().unwrap(), Command::FixSpecific);
        for cmd in Command::ALL {
            assert_eq!(cmd.to_string().parse::<Command>().unwrap(), cmd);
        }
        assert!("fix_specific".parse::<Command>().is_err());
    }

    #[test]
    fn test_convert_then_refine() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConvertConfig::builder()
            .project_root(dir.path())
            .policy_dir(dir.path().join("fleet"))
            .build();
        fs::create_dir_all(config.rules_dir.join("audit")).unwrap();
        fs::create_dir_all(&config.baselines_dir).unwrap();
        fs::write(
            config.rules_dir.join("audit").join("audit_auditd_enabled.yaml"),
            "id: audit_auditd_enabled\ntitle: Enable Security Auditing\n",
        )
        .unwrap();
        fs::write(
            config.baselines_dir.join("stig.yaml"),
            "title: STIG\nprofile:\n  - section: Audit\n    rules: [audit_auditd_enabled]\n",
        )
        .unwrap();

        let CommandReport::Convert(converted) = run_command(Command::Convert, &config).unwrap() else {
            panic!("expected convert report");
        };
        assert_eq!(converted.total_policies(), 1);

        let CommandReport::Pass(annotated) = run_command(Command::FixQueries, &config).unwrap() else {
            panic!("expected pass report");
        };
        assert_eq!(annotated.total_changes, 1);

        let CommandReport::Pass(specific) = run_command(Command::FixSpecific, &config).unwrap() else {
            panic!("expected pass report");
        };
        assert_eq!(specific.total_changes, 1);
        assert_eq!(specific.remaining_markers, 0);

        let summary = CommandReport::Pass(specific).to_string();
        assert!(summary.contains("[fix-specific] total changed: 1"));
    }
}
