// ==========================================
// 商品目录服务 - HTTP 服务主入口
// ==========================================
// 技术栈: actix-web + Rust + SQLite
// 启动顺序: .env → 日志 → 配置 → 数据库建表 → HTTP 服务
// 停止: actix 处理 SIGINT / SIGTERM 优雅退出
// ==========================================

use actix_web::web;
use anyhow::Context;
use catalog_service::app::AppState;
use catalog_service::config::AppConfig;
use catalog_service::{http, logging};
use tracing::info;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // 初始化日志系统
    logging::init();

    info!("==================================================");
    info!("{} v{}", catalog_service::APP_NAME, catalog_service::VERSION);
    info!("==================================================");

    let config = AppConfig::from_env().context("读取配置失败")?;
    info!(db_path = %config.db_path, "使用数据库");

    let state = AppState::new(&config.db_path, config.import.clone())
        .with_context(|| format!("无法初始化数据库: {}", config.db_path))?;

    let server = http::start_server(web::Data::new(state), &config.bind_addr, config.port)
        .with_context(|| format!("无法绑定地址 {}:{}", config.bind_addr, config.port))?;

    info!(bind_addr = %config.bind_addr, port = config.port, "HTTP 服务已启动");
    server.await.context("HTTP 服务异常退出")?;

    info!("HTTP 服务已停止");
    Ok(())
}
