// ==========================================
// 商品目录服务 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 这里只放“整次运行失败”的错误；
//       行级问题（格式错误/校验拒绝/落库失败）记录在 ImportReport 中
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    // ===== 表头错误 =====
    #[error("缺少表头行（文件为空）")]
    MissingHeaderRow,

    #[error("表头无法解析: {0}")]
    HeaderParseError(String),

    #[error("缺少必填表头: {}", .0.join(","))]
    MissingRequiredHeaders(Vec<String>),

    // ===== 运行控制 =====
    #[error("导入已取消 (行 {line})")]
    Cancelled { line: usize },
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => ImportError::FileNotFound(err.to_string()),
            _ => ImportError::FileReadError(err.to_string()),
        }
    }
}

impl ImportError {
    /// 是否为配置类错误（表头缺失）
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            ImportError::MissingRequiredHeaders(_)
                | ImportError::MissingHeaderRow
                | ImportError::HeaderParseError(_)
        )
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
