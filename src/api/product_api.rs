// ==========================================
// 商品目录服务 - 商品 API
// ==========================================
// 职责: 商品分页查询、按 id 查询、汇总统计
// 分页: page ≤ 0 → 1；page_size ≤ 0 → 20；offset = (page - 1) * page_size
// ==========================================

use std::sync::Arc;
use tracing::debug;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::product::{Product, ProductPage, ProductSummary};
use crate::repository::product_repo::ProductRepository;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// 生效的分页参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub page_size: i64,
}

impl Pagination {
    /// 归一化分页参数（缺省 / 非正数时取默认值）
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        Self {
            page: page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE),
            page_size: page_size.filter(|s| *s > 0).unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }

    /// 偏移量；溢出时视为无效输入
    pub fn offset(&self) -> ApiResult<i64> {
        (self.page - 1)
            .checked_mul(self.page_size)
            .ok_or_else(|| {
                ApiError::InvalidInput(format!(
                    "分页参数过大: page={}, page_size={}",
                    self.page, self.page_size
                ))
            })
    }
}

// ==========================================
// ProductApi - 商品 API
// ==========================================
pub struct ProductApi {
    product_repo: Arc<ProductRepository>,
}

impl ProductApi {
    /// 创建新的ProductApi实例
    pub fn new(product_repo: Arc<ProductRepository>) -> Self {
        Self { product_repo }
    }

    /// 分页查询商品（created_at 倒序）
    pub fn list_products(&self, page: Option<i64>, page_size: Option<i64>) -> ApiResult<ProductPage> {
        let pagination = Pagination::new(page, page_size);
        let offset = pagination.offset()?;

        debug!(page = pagination.page, page_size = pagination.page_size, offset, "查询商品列表");
        let (items, total) = self
            .product_repo
            .list_paginated(pagination.page_size, offset)?;

        Ok(ProductPage {
            items,
            total,
            page: pagination.page,
            page_size: pagination.page_size,
        })
    }

    /// 按 id 查询商品
    pub fn get_product(&self, id: &str) -> ApiResult<Product> {
        self.product_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("Product(id={})不存在", id)))
    }

    /// 汇总统计
    pub fn get_summary(&self) -> ApiResult<ProductSummary> {
        Ok(self.product_repo.summary()?)
    }
}
