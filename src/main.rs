// ==========================================
// NCR 质量系统 - 命令行入口
// ==========================================
// 职责: 以命令行驱动表单提交与分析面板（演示/人工验证）
// 命令:
//   ncr-qc fields                 列出 18 个字段
//   ncr-qc submit <record.json>   提交记录并输出分析结果
// ==========================================

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use ncr_qc::api::ApiError;
use ncr_qc::config::{config_keys, AppConfig};
use ncr_qc::domain::{FieldKey, NcrFields};
use ncr_qc::engine::{Notifier, RecordingNotifier, TokioClock};
use ncr_qc::{i18n, logging, AppState};

#[derive(Debug, Parser)]
#[command(name = "ncr-qc", version, about = "NCR intake and root-cause analysis")]
struct Cli {
    /// 配置文件路径
    #[arg(long, global = true, env = config_keys::CONFIG_PATH)]
    config: Option<PathBuf>,

    /// 界面语言（en / zh-CN）
    #[arg(long, global = true)]
    locale: Option<String>,

    /// JSON 格式日志
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 列出表单字段
    Fields,
    /// 提交 NCR 记录（JSON，字段名与表单一致）
    Submit {
        input: PathBuf,
        /// 以 JSON 输出分析视图
        #[arg(long)]
        json: bool,
    },
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = AppConfig::load(path)?;
            config.apply_env_overrides()?;
            config
        }
        None => AppConfig::load_or_default()?,
    };
    if let Some(locale) = &cli.locale {
        config.locale = locale.clone();
        config.validate()?;
    }
    Ok(config)
}

fn print_fields() {
    for key in FieldKey::ALL {
        println!(
            "{:<28} {:<32} {:<24} {}",
            key.name(),
            key.label(),
            key.section().title(),
            key.kind()
        );
    }
}

async fn submit(config: AppConfig, input: PathBuf, json: bool) -> Result<ExitCode> {
    let raw = std::fs::read_to_string(&input)
        .with_context(|| format!("读取输入文件失败: {}", input.display()))?;
    let fields: NcrFields = serde_json::from_str(&raw)
        .with_context(|| format!("解析输入文件失败: {}", input.display()))?;

    let notifier = RecordingNotifier::new();
    let app = AppState::new(
        config,
        Arc::new(TokioClock),
        Arc::new(notifier.clone()) as Arc<dyn Notifier>,
    );

    match app.submit(fields).await {
        Ok(record) => {
            tracing::info!(job_order = %record.job_order, "提交完成，等待分析");
        }
        Err(ApiError::Validation(err)) => {
            for (key, message) in &err.field_errors {
                eprintln!("{}: {}", key.name(), message);
            }
            return Ok(ExitCode::from(2));
        }
        Err(e) => return Err(e.into()),
    }

    app.settle().await;

    for notification in notifier.drain() {
        eprintln!("[{}] {}", notification.kind.as_str(), notification.message);
    }

    let view = app.analysis_view();
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", view.render_text());
    }
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.log_json);

    let config = load_config(&cli)?;
    i18n::set_locale(&config.locale);

    tracing::debug!("{} v{}", ncr_qc::APP_NAME, ncr_qc::VERSION);

    match cli.command {
        Command::Fields => {
            print_fields();
            Ok(ExitCode::SUCCESS)
        }
        Command::Submit { input, json } => submit(config, input, json).await,
    }
}
