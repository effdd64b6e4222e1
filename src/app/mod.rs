// ==========================================
// 商品目录服务 - 应用层
// ==========================================
// 职责: 组装仓储 / API / 导入器，供 HTTP 服务与命令行共用
// ==========================================

pub mod state;

// 重导出
pub use state::AppState;
