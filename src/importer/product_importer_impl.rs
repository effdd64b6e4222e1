// ==========================================
// 商品目录服务 - 商品导入器实现
// ==========================================
// 职责: 整合导入流程，从 CSV 到落库
// 流程: 读表头 → 解析列 → 逐行（切分 → 标准化 → 去重 → 落库）
// 约束:
// - 单线程顺序处理，一行完全处理完再读下一行
// - 单行问题只记录、不中断；只有读源失败 / 缺必填表头 / 取消会中断整次运行
// - 已落库的行不回滚（尽力而为的流式导入，不是事务）
// ==========================================

use crate::config::ImportConfig;
use crate::domain::import::{ImportReport, IssueKind};
use crate::importer::dedup::SkuDeduplicator;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_resolver::ColumnIndex;
use crate::importer::line_parser::{is_blank, parse_line_bytes};
use crate::importer::product_importer_trait::{ProductImporter, ProductSink};
use crate::importer::row_normalizer::ProductNormalizer;
use async_trait::async_trait;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// ProductImporterImpl - 商品导入器实现
// ==========================================
pub struct ProductImporterImpl<S>
where
    S: ProductSink,
{
    // 落库边界
    sink: S,

    // 行标准化器（持有默认币种）
    normalizer: ProductNormalizer,
}

impl<S> ProductImporterImpl<S>
where
    S: ProductSink,
{
    /// 创建新的 ProductImporter 实例
    ///
    /// # 参数
    /// - sink: 落库实现（upsert by sku）
    /// - config: 导入配置（默认币种）
    pub fn new(sink: S, config: &ImportConfig) -> Self {
        Self {
            sink,
            normalizer: ProductNormalizer::new(&config.default_currency),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn normalizer(&self) -> &ProductNormalizer {
        &self.normalizer
    }

    /// 单次导入运行
    async fn run<R: BufRead + Send>(
        &self,
        mut reader: R,
        cancel: &CancellationToken,
    ) -> ImportResult<ImportReport> {
        let start_time = Instant::now();
        let run_id = Uuid::new_v4().to_string();
        let mut report = ImportReport::new(run_id.clone());
        let mut buf = Vec::new();
        let mut line_number = 0usize;

        // === 步骤 1: 表头解析 ===
        let index = loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                error!(run_id = %run_id, "文件为空，缺少表头行");
                return Err(ImportError::MissingHeaderRow);
            }
            line_number += 1;
            if is_blank(&buf) {
                continue;
            }
            let headers = parse_line_bytes(&buf)
                .map_err(|e| ImportError::HeaderParseError(e.to_string()))?;
            match ColumnIndex::resolve(&headers) {
                Ok(index) => break index,
                Err(e) => {
                    error!(run_id = %run_id, error = %e, "表头校验失败，终止导入");
                    return Err(e);
                }
            }
        };
        debug!(run_id = %run_id, header_line = line_number, "表头解析完成");

        // === 步骤 2: 逐行处理 ===
        let mut dedup = SkuDeduplicator::new();
        loop {
            if cancel.is_cancelled() {
                warn!(
                    run_id = %run_id,
                    line = line_number,
                    imported = report.imported,
                    "导入已取消，已落库的行保持不变"
                );
                return Err(ImportError::Cancelled { line: line_number });
            }

            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_number += 1;
            if is_blank(&buf) {
                continue;
            }
            report.total_rows += 1;

            // 2a. 切分
            let cells = match parse_line_bytes(&buf) {
                Ok(cells) => cells,
                Err(e) => {
                    warn!(line = line_number, error = %e, "跳过格式错误的行");
                    report.record_issue(line_number, None, IssueKind::Malformed, e.to_string());
                    continue;
                }
            };

            // 2b/2c. 取字段 + 标准化
            let raw = index.extract(&cells);
            let product = match self.normalizer.normalize(&raw) {
                Ok(product) => product,
                Err(rejection) => {
                    debug!(line = line_number, reason = %rejection, "行校验未通过，跳过");
                    let sku = Some(raw.sku.trim().to_string()).filter(|s| !s.is_empty());
                    report.record_issue(line_number, sku, IssueKind::Rejected, rejection.to_string());
                    continue;
                }
            };

            // 2d/2e. 运行内去重（首条生效）
            if dedup.seen(&product.sku) {
                debug!(line = line_number, sku = %product.sku, "SKU 在本次运行中重复，跳过");
                report.record_issue(
                    line_number,
                    Some(product.sku.clone()),
                    IssueKind::Duplicate,
                    "SKU 重复（本次运行已导入首条）",
                );
                continue;
            }
            dedup.mark_seen(&product.sku);

            // 2f. 落库
            match self.sink.upsert(&product).await {
                Ok(()) => report.imported += 1,
                Err(e) => {
                    warn!(line = line_number, sku = %product.sku, error = %e, "落库失败，继续处理后续行");
                    report.record_issue(
                        line_number,
                        Some(product.sku.clone()),
                        IssueKind::SinkFailure,
                        e.to_string(),
                    );
                }
            }
        }

        // === 步骤 3: 汇总 ===
        report.elapsed_ms = start_time.elapsed().as_millis() as u64;
        info!(
            run_id = %run_id,
            total_rows = report.total_rows,
            imported = report.imported,
            rejected = report.rejected,
            duplicates = report.duplicates,
            malformed = report.malformed,
            failed = report.failed,
            issues_dropped = report.issues_dropped,
            elapsed_ms = report.elapsed_ms,
            "导入完成"
        );
        Ok(report)
    }
}

#[async_trait]
impl<S> ProductImporter for ProductImporterImpl<S>
where
    S: ProductSink,
{
    #[instrument(skip(self, file_path, cancel))]
    async fn import_from_csv<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
        cancel: &CancellationToken,
    ) -> ImportResult<ImportReport> {
        let path = file_path.as_ref();
        if !path.exists() {
            error!(file_path = %path.display(), "导入文件不存在");
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        info!(file_path = %path.display(), "开始导入商品数据");
        let file = File::open(path)?;
        self.run(BufReader::new(file), cancel).await
    }

    async fn import_from_reader<R: Read + Send>(
        &self,
        reader: R,
        cancel: &CancellationToken,
    ) -> ImportResult<ImportReport> {
        self.run(BufReader::new(reader), cancel).await
    }
}
