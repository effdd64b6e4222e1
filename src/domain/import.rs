// ==========================================
// 商品目录服务 - 导入报告模型
// ==========================================
// 用途: 导入接口返回值（汇总统计 + 行级问题明细）
// 生命周期: 一次导入运行
// ==========================================

use serde::{Deserialize, Serialize};

/// 单次运行最多保留的行级问题明细条数（计数不受限制）
pub const MAX_RECORDED_ISSUES: usize = 1_000;

// ==========================================
// IssueKind - 行级问题类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueKind {
    Malformed,   // 行格式错误（引号不匹配等）
    Rejected,    // 必填字段缺失 / 价格非法
    Duplicate,   // 同一次运行内 SKU 重复（首条生效）
    SinkFailure, // 落库失败
}

// ==========================================
// RowIssue - 行级问题记录
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowIssue {
    pub line: usize,         // 源文件行号（表头为第 1 行）
    pub sku: Option<String>, // SKU（如果可解析）
    pub kind: IssueKind,
    pub message: String,
}

// ==========================================
// ImportReport - 导入结果
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportReport {
    pub run_id: String,     // 运行 ID（UUID）
    pub total_rows: usize,  // 数据行数（不含表头和空行）
    pub imported: usize,    // 成功落库
    pub rejected: usize,    // 校验拒绝
    pub duplicates: usize,  // 运行内重复
    pub malformed: usize,   // 行格式错误
    pub failed: usize,      // 落库失败
    pub issues: Vec<RowIssue>,     // 前 MAX_RECORDED_ISSUES 条问题明细
    #[serde(default)]
    pub issues_dropped: usize,     // 超出上限未保留明细的问题数
    pub elapsed_ms: u64,
}

impl ImportReport {
    pub fn new(run_id: String) -> Self {
        Self {
            run_id,
            ..Default::default()
        }
    }

    /// 记录一条行级问题并累加对应计数
    pub fn record_issue(
        &mut self,
        line: usize,
        sku: Option<String>,
        kind: IssueKind,
        message: impl Into<String>,
    ) {
        match kind {
            IssueKind::Malformed => self.malformed += 1,
            IssueKind::Rejected => self.rejected += 1,
            IssueKind::Duplicate => self.duplicates += 1,
            IssueKind::SinkFailure => self.failed += 1,
        }
        if self.issues.len() >= MAX_RECORDED_ISSUES {
            self.issues_dropped += 1;
            return;
        }
        self.issues.push(RowIssue {
            line,
            sku,
            kind,
            message: message.into(),
        });
    }

    /// 跳过的行数（拒绝 + 重复 + 格式错误）
    pub fn skipped(&self) -> usize {
        self.rejected + self.duplicates + self.malformed
    }

    pub fn issues_of(&self, kind: IssueKind) -> impl Iterator<Item = &RowIssue> {
        self.issues.iter().filter(move |i| i.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_issue_counts() {
        let mut report = ImportReport::new("run-1".to_string());
        report.record_issue(2, None, IssueKind::Malformed, "未闭合的引号");
        report.record_issue(3, Some("A1".to_string()), IssueKind::Duplicate, "重复");
        report.record_issue(4, Some("B2".to_string()), IssueKind::SinkFailure, "db");

        assert_eq!(report.malformed, 1);
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.skipped(), 2);
        assert_eq!(report.issues_of(IssueKind::Duplicate).count(), 1);
    }

    #[test]
    fn test_issue_details_are_capped() {
        let mut report = ImportReport::new("run-2".to_string());
        for line in 0..MAX_RECORDED_ISSUES + 5 {
            report.record_issue(line + 2, Some("A1".to_string()), IssueKind::Duplicate, "重复");
        }

        assert_eq!(report.duplicates, MAX_RECORDED_ISSUES + 5);
        assert_eq!(report.issues.len(), MAX_RECORDED_ISSUES);
        assert_eq!(report.issues_dropped, 5);
        assert_eq!(report.issues[0].line, 2);
    }
}
