// ==========================================
// 商品目录服务 - 商品领域模型
// ==========================================
// 对齐: db.rs 中 products 表结构
// JSON 字段名与对外 HTTP 契约保持一致
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Product - 商品主数据
// ==========================================
// 用途: 导入层写入,查询层只读
// 不变量: 只在所有必填约束满足后才会被构造（见 importer::row_normalizer）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    // ===== 主键 =====
    pub id: String,  // 记录 ID（UUID，导入时生成，不来自输入）
    pub sku: String, // 业务唯一键（upsert 冲突键）

    // ===== 必填信息 =====
    #[serde(rename = "product_name")]
    pub name: String,
    #[serde(rename = "product_category")]
    pub category: String,

    // ===== 可选信息（默认空串）=====
    #[serde(rename = "product_description")]
    pub description: String,
    pub brand_name: String,
    pub manufacturer: String,
    pub color: String,

    // ===== 数值字段 =====
    pub stock_quantity: i64, // 库存数量（>= 0）
    pub weight_grams: i64,   // 重量（克，>= 0）
    pub price_cents: i64,    // 价格（最小货币单位，>= 0）
    pub currency: String,    // 币种代码（大写）

    // ===== 审计字段 =====
    pub created_at: DateTime<Utc>, // 首次写入时间（upsert 冲突时保持不变）
    pub updated_at: DateTime<Utc>, // 最后更新时间
}

// ==========================================
// ProductSummary - 商品汇总统计
// ==========================================
// 空表时所有字段为 0
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub total_products: i64,
    pub avg_price_cents: f64,
    pub min_price_cents: i64,
    pub max_price_cents: i64,
    pub categories_count: i64,
}

// ==========================================
// ProductPage - 分页查询结果
// ==========================================
/// page / page_size 为实际生效的分页参数（已应用默认值）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}
