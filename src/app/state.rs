// ==========================================
// 商品目录服务 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::Arc;
use tracing::info;

use crate::api::ProductApi;
use crate::config::ImportConfig;
use crate::importer::ProductImporterImpl;
use crate::repository::error::RepositoryResult;
use crate::repository::product_repo::ProductRepository;

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 导入配置
    pub import_config: ImportConfig,

    /// 商品仓储（导入落库与查询共用同一连接）
    pub product_repo: Arc<ProductRepository>,

    /// 商品API
    pub product_api: Arc<ProductApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径（不存在时自动创建并建表）
    /// - import_config: 导入配置
    pub fn new(db_path: &str, import_config: ImportConfig) -> RepositoryResult<Self> {
        info!(db_path = %db_path, "初始化AppState");

        let product_repo = Arc::new(ProductRepository::new(db_path)?);
        let product_api = Arc::new(ProductApi::new(product_repo.clone()));

        Ok(Self {
            db_path: db_path.to_string(),
            import_config,
            product_repo,
            product_api,
        })
    }

    /// 基于当前仓储创建导入器
    pub fn importer(&self) -> ProductImporterImpl<Arc<ProductRepository>> {
        ProductImporterImpl::new(self.product_repo.clone(), &self.import_config)
    }
}
