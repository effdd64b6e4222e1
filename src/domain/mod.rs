// ==========================================
// 商品目录服务 - 领域模型层
// ==========================================
// 职责: 定义领域实体、导入报告、查询结果类型
// 红线: 不含数据访问逻辑,不含导入逻辑
// ==========================================

pub mod import;
pub mod product;

// 重导出核心类型
pub use import::{ImportReport, IssueKind, RowIssue};
pub use product::{Product, ProductPage, ProductSummary};
