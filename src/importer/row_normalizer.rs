// ==========================================
// 商品目录服务 - 行标准化器
// ==========================================
// 职责: 原始字符串行 → 校验后的 Product
// 规则:
// - 必填字段（sku / 名称 / 类目 / 价格）为空 → 拒绝整行
// - 价格无法解析或为负 → 拒绝整行
// - 库存 / 重量无法解析或为负 → 置 0，不拒绝
// - 币种 TRIM + UPPER，为空时使用配置的默认币种
// 舍入: 四舍五入，0.5 远离零（f64::round）
// ==========================================

use crate::domain::product::Product;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// 默认币种（未配置时）
pub const FALLBACK_CURRENCY: &str = "USD";

const THOUSANDS_SEPARATOR: char = ',';

// ==========================================
// RawProductRow - 导入中间结构体
// ==========================================
// 用途: 表头解析后的单行原始值（未 TRIM）
// 生命周期: 仅在一行的处理过程内
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawProductRow {
    pub sku: String,
    pub name: String,
    pub category: String,
    pub price: String,
    pub description: String,
    pub brand_name: String,
    pub stock_quantity: String,
    pub manufacturer: String,
    pub weight: String,
    pub color: String,
    pub currency: String,
}

/// 行被拒绝的原因
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowRejection {
    #[error("必填字段为空: {0}")]
    MissingRequired(&'static str),

    #[error("价格无法解析: {0}")]
    InvalidPrice(String),

    #[error("价格为负数: {0}")]
    NegativePrice(String),
}

// ==========================================
// ProductNormalizer
// ==========================================
#[derive(Debug, Clone)]
pub struct ProductNormalizer {
    default_currency: String,
}

impl Default for ProductNormalizer {
    fn default() -> Self {
        Self::new(FALLBACK_CURRENCY)
    }
}

impl ProductNormalizer {
    /// 创建标准化器
    ///
    /// 默认币种同样做 TRIM + UPPER；为空时回退为 USD
    pub fn new(default_currency: &str) -> Self {
        let default_currency = clean_currency(default_currency)
            .unwrap_or_else(|| FALLBACK_CURRENCY.to_string());
        Self { default_currency }
    }

    pub fn default_currency(&self) -> &str {
        &self.default_currency
    }

    /// 标准化一行，时间戳取当前 UTC 时间
    pub fn normalize(&self, row: &RawProductRow) -> Result<Product, RowRejection> {
        self.normalize_at(row, Utc::now())
    }

    /// 标准化一行，使用指定的时间戳（created_at = updated_at = now）
    pub fn normalize_at(
        &self,
        row: &RawProductRow,
        now: DateTime<Utc>,
    ) -> Result<Product, RowRejection> {
        let sku = required(&row.sku, "sku")?;
        let name = required(&row.name, "product_name")?;
        let category = required(&row.category, "product_category")?;
        let price_raw = required(&row.price, "product_price")?;

        let price_cents = match parse_price_to_cents(price_raw) {
            None => return Err(RowRejection::InvalidPrice(price_raw.to_string())),
            Some(cents) if cents < 0 => {
                return Err(RowRejection::NegativePrice(price_raw.to_string()))
            }
            Some(cents) => cents,
        };

        let currency =
            clean_currency(&row.currency).unwrap_or_else(|| self.default_currency.clone());

        Ok(Product {
            id: Uuid::new_v4().to_string(),
            sku: sku.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            description: row.description.trim().to_string(),
            brand_name: row.brand_name.trim().to_string(),
            manufacturer: row.manufacturer.trim().to_string(),
            color: row.color.trim().to_string(),
            stock_quantity: parse_quantity(&row.stock_quantity),
            weight_grams: parse_weight_grams(&row.weight),
            price_cents,
            currency,
            created_at: now,
            updated_at: now,
        })
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, RowRejection> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(RowRejection::MissingRequired(field))
    } else {
        Ok(trimmed)
    }
}

fn clean_currency(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_uppercase())
    }
}

/// 去千分位 + TRIM
fn strip_separators(value: &str) -> String {
    value.replace(THOUSANDS_SEPARATOR, "").trim().to_string()
}

/// 解析十进制数并四舍五入为整数（0.5 远离零）
///
/// 返回 None: 空值 / 无法解析 / 非有限值 / 超出 i64 范围
fn parse_decimal_rounded(value: &str, scale: f64) -> Option<i64> {
    let cleaned = strip_separators(value);
    if cleaned.is_empty() {
        return None;
    }
    let parsed: f64 = cleaned.parse().ok()?;
    if !parsed.is_finite() {
        return None;
    }
    let rounded = (parsed * scale).round();
    if rounded < i64::MIN as f64 || rounded >= i64::MAX as f64 {
        return None;
    }
    Some(rounded as i64)
}

/// 价格 → 最小货币单位（分）
///
/// "19.999" → 2000, "19.99" → 1999, "1,234.50" → 123450
pub fn parse_price_to_cents(value: &str) -> Option<i64> {
    parse_decimal_rounded(value, 100.0)
}

/// 库存数量：整数；无法解析或为负时置 0
pub fn parse_quantity(value: &str) -> i64 {
    match strip_separators(value).parse::<i64>() {
        Ok(qty) if qty >= 0 => qty,
        _ => 0,
    }
}

/// 重量（克）：十进制四舍五入；无法解析或为负时置 0
pub fn parse_weight_grams(value: &str) -> i64 {
    match parse_decimal_rounded(value, 1.0) {
        Some(grams) if grams >= 0 => grams,
        _ => 0,
    }
}
