// ==========================================
// 商品目录服务 - 表头解析器
// ==========================================
// 职责: 源表头 → 逻辑列角色 → 列位置
// 规则: 大小写不敏感 + 去除首尾空白；未知表头忽略；重复表头以最后一次为准
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::row_normalizer::RawProductRow;
use std::collections::HashMap;

// ==========================================
// ColumnRole - 逻辑列角色
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    Sku,
    ProductName,
    ProductCategory,
    ProductPrice,
    ProductDescription,
    BrandName,
    StockQuantity,
    Manufacturer,
    Weight,
    Color,
    Currency,
}

impl ColumnRole {
    pub const ALL: [ColumnRole; 11] = [
        ColumnRole::Sku,
        ColumnRole::ProductName,
        ColumnRole::ProductCategory,
        ColumnRole::ProductPrice,
        ColumnRole::ProductDescription,
        ColumnRole::BrandName,
        ColumnRole::StockQuantity,
        ColumnRole::Manufacturer,
        ColumnRole::Weight,
        ColumnRole::Color,
        ColumnRole::Currency,
    ];

    /// 必填列（缺任意一个则整次导入失败）
    pub const REQUIRED: [ColumnRole; 4] = [
        ColumnRole::Sku,
        ColumnRole::ProductName,
        ColumnRole::ProductCategory,
        ColumnRole::ProductPrice,
    ];

    /// 标准表头名（小写）
    pub fn header_name(self) -> &'static str {
        match self {
            ColumnRole::Sku => "sku",
            ColumnRole::ProductName => "product_name",
            ColumnRole::ProductCategory => "product_category",
            ColumnRole::ProductPrice => "product_price",
            ColumnRole::ProductDescription => "product_description",
            ColumnRole::BrandName => "brand_name",
            ColumnRole::StockQuantity => "stock_quantity",
            ColumnRole::Manufacturer => "manufacturer",
            ColumnRole::Weight => "weight",
            ColumnRole::Color => "color",
            ColumnRole::Currency => "currency",
        }
    }

    /// 源表头 → 角色（TRIM + 小写匹配）
    pub fn from_header(header: &str) -> Option<Self> {
        let key = header.trim().trim_start_matches('\u{feff}').trim().to_lowercase();
        Self::ALL.into_iter().find(|role| role.header_name() == key)
    }

    pub fn is_required(self) -> bool {
        Self::REQUIRED.contains(&self)
    }
}

// ==========================================
// ColumnIndex - 角色到列位置的映射
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ColumnIndex {
    positions: HashMap<ColumnRole, usize>,
}

impl ColumnIndex {
    /// 解析表头并校验必填列
    ///
    /// # 返回
    /// - Ok(ColumnIndex): 所有必填列都已找到
    /// - Err(MissingRequiredHeaders): 列出全部缺失的必填表头
    pub fn resolve<I, S>(headers: I) -> ImportResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut positions = HashMap::new();
        for (idx, header) in headers.into_iter().enumerate() {
            if let Some(role) = ColumnRole::from_header(header.as_ref()) {
                positions.insert(role, idx);
            }
        }

        let missing: Vec<String> = ColumnRole::REQUIRED
            .iter()
            .filter(|role| !positions.contains_key(*role))
            .map(|role| role.header_name().to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ImportError::MissingRequiredHeaders(missing));
        }

        Ok(Self { positions })
    }

    pub fn position(&self, role: ColumnRole) -> Option<usize> {
        self.positions.get(&role).copied()
    }

    /// 按角色取单元格；列缺失或行过短时返回空串
    pub fn field<'r, S: AsRef<str>>(&self, cells: &'r [S], role: ColumnRole) -> &'r str {
        self.position(role)
            .and_then(|idx| cells.get(idx))
            .map(|cell| cell.as_ref())
            .unwrap_or("")
    }

    /// 提取一行的全部逻辑字段
    pub fn extract<S: AsRef<str>>(&self, cells: &[S]) -> RawProductRow {
        let get = |role| self.field(cells, role).to_string();
        RawProductRow {
            sku: get(ColumnRole::Sku),
            name: get(ColumnRole::ProductName),
            category: get(ColumnRole::ProductCategory),
            price: get(ColumnRole::ProductPrice),
            description: get(ColumnRole::ProductDescription),
            brand_name: get(ColumnRole::BrandName),
            stock_quantity: get(ColumnRole::StockQuantity),
            manufacturer: get(ColumnRole::Manufacturer),
            weight: get(ColumnRole::Weight),
            color: get(ColumnRole::Color),
            currency: get(ColumnRole::Currency),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_case_insensitive_and_trimmed() {
        let index = ColumnIndex::resolve([" SKU ", "Product_Name", "PRODUCT_CATEGORY", "product_price"])
            .unwrap();
        assert_eq!(index.position(ColumnRole::Sku), Some(0));
        assert_eq!(index.position(ColumnRole::ProductName), Some(1));
        assert_eq!(index.position(ColumnRole::ProductCategory), Some(2));
        assert_eq!(index.position(ColumnRole::ProductPrice), Some(3));
        assert_eq!(index.position(ColumnRole::Color), None);
    }

    #[test]
    fn test_resolve_order_independent() {
        let a = ColumnIndex::resolve(["sku", "product_name", "product_category", "product_price"])
            .unwrap();
        let b = ColumnIndex::resolve(["Product_Price", "PRODUCT_CATEGORY", "product_name", "Sku"])
            .unwrap();

        let row_a = a.extract(&["A1", "Widget", "Tools", "9.5"]);
        let row_b = b.extract(&["9.5", "Tools", "Widget", "A1"]);
        assert_eq!(row_a, row_b);
    }

    #[test]
    fn test_resolve_missing_required_lists_all() {
        let err = ColumnIndex::resolve(["sku", "product_name", "color"]).unwrap_err();
        match err {
            ImportError::MissingRequiredHeaders(missing) => {
                assert_eq!(missing, vec!["product_category", "product_price"]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_headers_ignored() {
        let index = ColumnIndex::resolve([
            "internal_code",
            "sku",
            "product_name",
            "product_category",
            "product_price",
            "notes",
        ])
        .unwrap();
        assert_eq!(index.position(ColumnRole::Sku), Some(1));
        assert_eq!(index.position(ColumnRole::ProductPrice), Some(4));
    }

    #[test]
    fn test_duplicate_header_last_wins() {
        let index = ColumnIndex::resolve([
            "sku",
            "product_name",
            "product_category",
            "product_price",
            "SKU",
        ])
        .unwrap();
        assert_eq!(index.position(ColumnRole::Sku), Some(4));
    }

    #[test]
    fn test_bom_on_first_header() {
        let index = ColumnIndex::resolve(["\u{feff}sku", "product_name", "product_category", "product_price"])
            .unwrap();
        assert_eq!(index.position(ColumnRole::Sku), Some(0));
    }

    #[test]
    fn test_short_row_yields_empty_fields() {
        let index = ColumnIndex::resolve([
            "sku",
            "product_name",
            "product_category",
            "product_price",
            "stock_quantity",
            "color",
        ])
        .unwrap();
        let row = index.extract(&["A1", "Widget"]);
        assert_eq!(row.sku, "A1");
        assert_eq!(row.category, "");
        assert_eq!(row.stock_quantity, "");
        assert_eq!(row.color, "");
    }
}
