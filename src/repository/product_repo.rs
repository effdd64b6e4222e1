// ==========================================
// 商品目录服务 - 商品数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 写入: 按 sku 幂等 upsert（跨运行后写覆盖）
// 读取: 分页列表 / 按 id 查询 / 汇总统计
// ==========================================

use crate::db::{configure_sqlite_connection, read_schema_version, run_migrations, CURRENT_SCHEMA_VERSION};
use crate::domain::product::{Product, ProductSummary};
use crate::importer::product_importer_trait::ProductSink;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument};

const PRODUCT_COLUMNS: &str = r#"
    id, sku, product_name, product_category, product_description,
    brand_name, manufacturer, color,
    stock_quantity, weight_grams, price_cents, currency,
    created_at, updated_at
"#;

// ==========================================
// ProductRepository - 商品仓储
// ==========================================
/// 商品仓储
/// 职责: 管理 products 表的读写
/// 红线: 不含业务逻辑，只负责数据访问
#[derive(Clone)]
pub struct ProductRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductRepository {
    /// 创建新的 ProductRepository 实例（打开连接并建表）
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = Connection::open(db_path)?;
        configure_sqlite_connection(&conn)?;
        let repo = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        repo.migrate()?;
        Ok(repo)
    }

    /// 从已有连接创建仓储实例（不建表）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 建表（幂等）
    ///
    /// 数据库版本高于程序支持的版本时拒绝运行
    pub fn migrate(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        if let Some(version) = read_schema_version(&conn)? {
            if version > CURRENT_SCHEMA_VERSION {
                return Err(RepositoryError::InternalError(format!(
                    "数据库 schema_version={} 高于程序支持的版本 {}",
                    version, CURRENT_SCHEMA_VERSION
                )));
            }
        }
        Ok(run_migrations(&conn)?)
    }

    /// 按 sku 幂等写入
    ///
    /// # 规则
    /// - sku 不存在: 插入整条记录
    /// - sku 已存在: 覆盖可变字段 + updated_at，id / created_at 保持不变
    #[instrument(skip(self, product), fields(sku = %product.sku))]
    pub fn upsert(&self, product: &Product) -> RepositoryResult<()> {
        if product.sku.trim().is_empty() {
            return Err(RepositoryError::ValidationError("sku 不能为空".to_string()));
        }
        if product.price_cents < 0 {
            return Err(RepositoryError::ValidationError(format!(
                "price_cents 不能为负数: {}",
                product.price_cents
            )));
        }

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO products (
                id, sku, product_name, product_category, product_description,
                brand_name, manufacturer, color,
                stock_quantity, weight_grams, price_cents, currency,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            ON CONFLICT(sku) DO UPDATE SET
                product_name = excluded.product_name,
                product_category = excluded.product_category,
                product_description = excluded.product_description,
                brand_name = excluded.brand_name,
                manufacturer = excluded.manufacturer,
                color = excluded.color,
                stock_quantity = excluded.stock_quantity,
                weight_grams = excluded.weight_grams,
                price_cents = excluded.price_cents,
                currency = excluded.currency,
                updated_at = excluded.updated_at
            "#,
            params![
                product.id,
                product.sku,
                product.name,
                product.category,
                product.description,
                product.brand_name,
                product.manufacturer,
                product.color,
                product.stock_quantity,
                product.weight_grams,
                product.price_cents,
                product.currency,
                format_timestamp(&product.created_at),
                format_timestamp(&product.updated_at),
            ],
        )?;
        debug!("商品已写入");
        Ok(())
    }

    /// 分页查询（created_at 倒序，同一时间按 sku 正序）
    ///
    /// # 返回
    /// - (当前页记录, 总记录数)
    pub fn list_paginated(&self, limit: i64, offset: i64) -> RepositoryResult<(Vec<Product>, i64)> {
        let conn = self.get_conn()?;

        let total: i64 = conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;

        let sql = format!(
            "SELECT {} FROM products ORDER BY created_at DESC, sku ASC LIMIT ?1 OFFSET ?2",
            PRODUCT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let products = stmt
            .query_map(params![limit, offset], map_product_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok((products, total))
    }

    /// 按 id 查询
    ///
    /// # 返回
    /// - Ok(Some(Product)): 找到
    /// - Ok(None): 未找到
    /// - Err: 数据库错误
    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Product>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM products WHERE id = ?1", PRODUCT_COLUMNS);
        let product = conn
            .query_row(&sql, params![id], map_product_row)
            .optional()?;
        Ok(product)
    }

    /// 按 sku 查询
    pub fn find_by_sku(&self, sku: &str) -> RepositoryResult<Option<Product>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM products WHERE sku = ?1", PRODUCT_COLUMNS);
        let product = conn
            .query_row(&sql, params![sku], map_product_row)
            .optional()?;
        Ok(product)
    }

    /// 汇总统计（空表时全部为 0）
    pub fn summary(&self) -> RepositoryResult<ProductSummary> {
        let conn = self.get_conn()?;
        let summary = conn.query_row(
            r#"
            SELECT
                COUNT(*),
                COALESCE(AVG(price_cents), 0.0),
                COALESCE(MIN(price_cents), 0),
                COALESCE(MAX(price_cents), 0),
                COUNT(DISTINCT product_category)
            FROM products
            "#,
            [],
            |row| {
                Ok(ProductSummary {
                    total_products: row.get(0)?,
                    avg_price_cents: row.get(1)?,
                    min_price_cents: row.get(2)?,
                    max_price_cents: row.get(3)?,
                    categories_count: row.get(4)?,
                })
            },
        )?;
        Ok(summary)
    }

    /// 记录总数
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
        Ok(count)
    }
}

// 导入管道的落库实现
// rusqlite 为同步调用且持有 std Mutex，放到阻塞线程池执行，不占用 async 工作线程
#[async_trait]
impl ProductSink for ProductRepository {
    async fn upsert(&self, product: &Product) -> RepositoryResult<()> {
        let repo = self.clone();
        let product = product.clone();
        tokio::task::spawn_blocking(move || repo.upsert(&product))
            .await
            .map_err(|e| RepositoryError::InternalError(format!("落库任务异常退出: {}", e)))?
    }
}

// ==========================================
// 行映射
// ==========================================

fn map_product_row(row: &Row) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        sku: row.get(1)?,
        name: row.get(2)?,
        category: row.get(3)?,
        description: row.get(4)?,
        brand_name: row.get(5)?,
        manufacturer: row.get(6)?,
        color: row.get(7)?,
        stock_quantity: row.get(8)?,
        weight_grams: row.get(9)?,
        price_cents: row.get(10)?,
        currency: row.get(11)?,
        created_at: parse_timestamp(12, &row.get::<_, String>(12)?)?,
        updated_at: parse_timestamp(13, &row.get::<_, String>(13)?)?,
    })
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(idx: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
