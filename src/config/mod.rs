// ==========================================
// 商品目录服务 - 配置层
// ==========================================
// 职责: 从环境变量读取配置（.env 由二进制入口通过 dotenvy 加载）
// 约束: 配置在 main 中读取一次后显式传递，不使用全局单例
// ==========================================

pub mod app_config;
pub mod import_config;

// 重导出核心配置
pub use app_config::{config_keys, get_default_db_path, AppConfig, ConfigError, ConfigResult};
pub use import_config::ImportConfig;
