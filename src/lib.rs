// ==========================================
// 商品目录服务 - 核心库
// ==========================================
// 技术栈: Rust + SQLite + actix-web
// 系统定位: CSV 批量导入 + 商品查询 API
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - CSV 导入管道
pub mod importer;

// 配置层 - 环境变量配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// HTTP 层 - 路由与响应
pub mod http;

// 应用层 - 共享状态装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{ImportReport, Product, ProductPage, ProductSummary};
pub use importer::{ImportError, ProductImporter, ProductImporterImpl, ProductSink};
pub use repository::ProductRepository;
pub use api::ProductApi;
pub use config::{AppConfig, ImportConfig};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "商品目录服务";
