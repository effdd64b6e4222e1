// ==========================================
// 商品目录服务 - 运行内去重器
// ==========================================
// 职责: 检测同一次导入运行内重复的 SKU
// 策略: 首条生效，后续同 SKU 行静默跳过
// 说明: 跨运行的重复由落库层 upsert 处理（后写覆盖），这里不查库
// ==========================================

use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct SkuDeduplicator {
    seen: HashSet<String>,
}

impl SkuDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen(&self, sku: &str) -> bool {
        self.seen.contains(sku)
    }

    pub fn mark_seen(&mut self, sku: &str) {
        self.seen.insert(sku.to_string());
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
