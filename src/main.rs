//! mscp2fleet CLI
//!
//! 将 mSCP 基线转换为 Fleet 策略文件，并对已生成的文件执行分阶段查询修正。

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use log::debug;
use mscp2fleet::{run_command, Command, ConfigFile, ConvertConfig};

/// Convert macOS Security Compliance Project baselines into Fleet policy YAML
#[derive(Parser, Debug)]
#[command(name = "mscp2fleet")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Operation: convert, fix-queries, fix-specific, comprehensive
    #[arg(short, long)]
    command: Option<String>,

    /// Root of the macos_security checkout (contains baselines/ and rules/)
    #[arg(short, long)]
    project_root: Option<PathBuf>,

    /// Configuration file (.json, otherwise YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory for generated policy files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Directory scanned by the refinement passes
    #[arg(long)]
    policy_dir: Option<PathBuf>,

    /// Custom name-pattern mapping table (.json, otherwise YAML)
    #[arg(long)]
    mappings: Option<PathBuf>,

    /// Fall back to the name-pattern table when a check script gives no query
    #[arg(long)]
    name_fallback: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(selector) = cli.command.as_deref() else {
        print_help();
        return ExitCode::SUCCESS;
    };

    let command: Command = match selector.parse() {
        Ok(command) => command,
        Err(_) => {
            eprintln!("Unknown command: {}", selector);
            print_help();
            return ExitCode::FAILURE;
        }
    };

    match run(&cli, command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, command: Command) -> anyhow::Result<()> {
    let config = build_config(cli)?;
    debug!("{:?}", config);

    let report = run_command(command, &config)
        .with_context(|| format!("command `{}` failed", command))?;
    println!("{}", report);
    Ok(())
}

/// 命令行参数优先于配置文件
fn build_config(cli: &Cli) -> anyhow::Result<ConvertConfig> {
    let mut builder = ConvertConfig::builder().name_fallback(cli.name_fallback);
    if let Some(root) = &cli.project_root {
        builder = builder.project_root(root);
    }
    if let Some(dir) = &cli.output_dir {
        builder = builder.output_dir(dir);
    }
    if let Some(dir) = &cli.policy_dir {
        builder = builder.policy_dir(dir);
    }
    if let Some(path) = &cli.mappings {
        builder = builder.mappings_file(path);
    }
    if let Some(path) = &cli.config {
        let file = ConfigFile::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?;
        builder = builder.merge_file(file);
    }
    Ok(builder.build())
}

fn print_help() {
    // 输出到 stdout 失败时无需处理
    let _ = Cli::command().print_help();
    println!();
}

#[cfg(not(feature = "tracing"))]
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

#[cfg(feature = "tracing")]
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .finish();

    // log 记录桥接到 tracing
    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("log bridge init failed: {}", e);
    }
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("tracing init failed: {}", e);
    }
}
