// ==========================================
// 商品目录服务 - API 层
// ==========================================
// 职责: 业务查询入口，供 HTTP 层调用
// ==========================================

pub mod error;
pub mod product_api;

// 重导出
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use product_api::{Pagination, ProductApi};
