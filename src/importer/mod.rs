// ==========================================
// 商品目录服务 - 导入层
// ==========================================
// 职责: CSV 商品数据 → 校验后的 Product → 落库
// 流程: 表头解析 → 单行切分 → 标准化 → 运行内去重 → upsert
// ==========================================

// 模块声明
pub mod dedup;
pub mod error;
pub mod field_resolver;
pub mod line_parser;
pub mod product_importer_impl;
pub mod product_importer_trait;
pub mod row_normalizer;

// 重导出核心类型
pub use dedup::SkuDeduplicator;
pub use error::{ImportError, ImportResult};
pub use field_resolver::{ColumnIndex, ColumnRole};
pub use line_parser::LineParseError;
pub use product_importer_impl::ProductImporterImpl;
pub use row_normalizer::{ProductNormalizer, RawProductRow, RowRejection};

// 重导出 Trait 接口
pub use product_importer_trait::{ProductImporter, ProductSink};
