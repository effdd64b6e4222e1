// ==========================================
// 商品目录服务 - 导入配置
// ==========================================

use crate::importer::row_normalizer::FALLBACK_CURRENCY;
use serde::{Deserialize, Serialize};

/// 导入配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// 行内 currency 为空时使用的币种
    pub default_currency: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            default_currency: FALLBACK_CURRENCY.to_string(),
        }
    }
}

impl ImportConfig {
    pub fn with_default_currency(currency: impl Into<String>) -> Self {
        Self {
            default_currency: currency.into(),
        }
    }
}
