// ==========================================
// 商品目录服务 - 命令行导入工具
// ==========================================
// 用法:
//   catalog-import --file products.csv [--db-path catalog.db] [--default-currency EUR]
// 说明:
// - 命令行参数优先于环境变量 / .env
// - Ctrl-C 取消导入，已落库的行保留
// - 只有致命错误（文件无法读取 / 缺必填表头 / 取消）返回非 0
// ==========================================

use anyhow::Context;
use catalog_service::app::AppState;
use catalog_service::config::{AppConfig, ImportConfig};
use catalog_service::domain::ImportReport;
use catalog_service::importer::ProductImporter;
use catalog_service::logging;
use clap::Parser;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "catalog-import", version, about = "从 CSV 文件导入商品数据")]
struct Args {
    /// CSV 文件路径（第一行为表头）
    #[arg(long, short = 'f')]
    file: PathBuf,

    /// SQLite 数据库路径（覆盖 CATALOG_DB_PATH）
    #[arg(long)]
    db_path: Option<String>,

    /// 行内 currency 为空时使用的币种（覆盖 CSV_DEFAULT_CURRENCY）
    #[arg(long)]
    default_currency: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init();

    let args = Args::parse();
    let config = AppConfig::from_env().context("读取配置失败")?;

    let db_path = args.db_path.clone().unwrap_or(config.db_path);
    let import_config = match args.default_currency.as_deref() {
        Some(currency) => ImportConfig::with_default_currency(currency),
        None => config.import,
    };

    let state = AppState::new(&db_path, import_config)
        .with_context(|| format!("无法初始化数据库: {}", db_path))?;
    let importer = state.importer();

    let cancel = CancellationToken::new();
    let ctrl_c_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("收到中断信号，正在取消导入");
            ctrl_c_token.cancel();
        }
    });

    info!(file = %args.file.display(), db_path = %db_path, "开始导入");
    let report = importer
        .import_from_csv(&args.file, &cancel)
        .await
        .with_context(|| format!("导入失败: {}", args.file.display()))?;

    print_report(&report);
    Ok(())
}

fn print_report(report: &ImportReport) {
    println!("run_id     = {}", report.run_id);
    println!("total_rows = {}", report.total_rows);
    println!("imported   = {}", report.imported);
    println!("rejected   = {}", report.rejected);
    println!("duplicates = {}", report.duplicates);
    println!("malformed  = {}", report.malformed);
    println!("failed     = {}", report.failed);
    println!("elapsed_ms = {}", report.elapsed_ms);

    if report.issues_dropped > 0 {
        println!("（另有 {} 条问题未保留明细）", report.issues_dropped);
    }
    for issue in &report.issues {
        println!(
            "  line {:>6} [{:?}] {}{}",
            issue.line,
            issue.kind,
            issue
                .sku
                .as_deref()
                .map(|s| format!("sku={} ", s))
                .unwrap_or_default(),
            issue.message
        );
    }
}
