// ==========================================
// 商品目录服务 - 商品导入 Trait
// ==========================================
// 职责: 定义导入接口与落库边界（不包含实现）
// ==========================================

use crate::domain::import::ImportReport;
use crate::domain::product::Product;
use crate::importer::error::ImportResult;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use std::io::Read;
use std::path::Path;
use tokio_util::sync::CancellationToken;

// ==========================================
// ProductSink Trait
// ==========================================
// 用途: 导入管道的落库边界
// 实现者: ProductRepository（rusqlite）
#[async_trait]
pub trait ProductSink: Send + Sync {
    /// 按 SKU 幂等写入
    ///
    /// # 约定
    /// - SKU 不存在: 插入整条记录
    /// - SKU 已存在: 覆盖可变字段并刷新 updated_at，保持 id / created_at 不变
    async fn upsert(&self, product: &Product) -> RepositoryResult<()>;
}

#[async_trait]
impl<T: ProductSink + ?Sized> ProductSink for std::sync::Arc<T> {
    async fn upsert(&self, product: &Product) -> RepositoryResult<()> {
        ProductSink::upsert(&**self, product).await
    }
}

// ==========================================
// ProductImporter Trait
// ==========================================
// 用途: 商品导入主接口
// 实现者: ProductImporterImpl
#[async_trait]
pub trait ProductImporter: Send + Sync {
    /// 从 CSV 文件导入
    ///
    /// # 返回
    /// - Ok(ImportReport): 运行完成（行级问题记录在报告中）
    /// - Err: 文件无法打开/读取、必填表头缺失、运行被取消
    async fn import_from_csv<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
        cancel: &CancellationToken,
    ) -> ImportResult<ImportReport>;

    /// 从任意字节流导入（第一行为表头）
    async fn import_from_reader<R: Read + Send>(
        &self,
        reader: R,
        cancel: &CancellationToken,
    ) -> ImportResult<ImportReport>;
}
