// ==========================================
// 商品目录服务 - 单行解析器
// ==========================================
// 职责: 一个物理行 → 单元格列表
// 规则: 标准双引号转义（"" 表示一个引号），不支持跨行的引号字段
//       字段开头的空格 / 制表符忽略（`A1, "Widget, large"` 与 `A1,"Widget, large"` 等价）
// 说明: csv crate 对不规范引号是宽松的（会把引号当普通字符或吞掉后续内容），
//       因此先做一次严格的引号检查并去掉字段前导空白，再交给 csv crate 切分
// ==========================================

use csv::{ReaderBuilder, StringRecord, Trim};
use thiserror::Error;

const DELIMITER: u8 = b',';
const QUOTE: char = '"';

/// 行格式错误（行级问题，不会中断整次导入）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineParseError {
    #[error("第 {column} 列引号未闭合")]
    UnterminatedQuote { column: usize },

    #[error("第 {column} 列非引号字段中出现裸引号")]
    BareQuote { column: usize },

    #[error("第 {column} 列闭合引号后出现多余字符")]
    TrailingAfterQuote { column: usize },

    #[error("行内容不是合法的 UTF-8")]
    InvalidUtf8,

    #[error("CSV 解析失败: {0}")]
    Csv(String),
}

impl From<csv::Error> for LineParseError {
    fn from(err: csv::Error) -> Self {
        LineParseError::Csv(err.to_string())
    }
}

/// 将原始字节行解码并切分为单元格
///
/// 行尾的 `\n` / `\r\n` 会被去掉
pub fn parse_line_bytes(raw: &[u8]) -> Result<Vec<String>, LineParseError> {
    let line = std::str::from_utf8(raw).map_err(|_| LineParseError::InvalidUtf8)?;
    parse_line(line)
}

/// 切分一行文本为单元格
pub fn parse_line(line: &str) -> Result<Vec<String>, LineParseError> {
    let line = normalize_fields(strip_line_ending(line))?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::None)
        .delimiter(DELIMITER)
        .from_reader(line.as_bytes());

    let mut record = StringRecord::new();
    if !reader.read_record(&mut record)? {
        return Ok(Vec::new());
    }
    Ok(record.iter().map(str::to_string).collect())
}

/// 空白行（去掉行尾后只剩空白字符）
pub fn is_blank(line: &[u8]) -> bool {
    line.iter().all(|b| b.is_ascii_whitespace())
}

fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// 严格引号检查（RFC 4180，单行）+ 去掉每个字段的前导空白
///
/// 返回可直接交给 csv crate 切分的行
fn normalize_fields(line: &str) -> Result<String, LineParseError> {
    let delimiter = DELIMITER as char;
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    let mut column = 1;

    loop {
        while matches!(chars.peek(), Some(&' ') | Some(&'\t')) {
            chars.next();
        }

        if chars.peek() == Some(&QUOTE) {
            // 引号字段，原样保留（含转义）
            chars.next();
            out.push(QUOTE);
            loop {
                match chars.next() {
                    None => return Err(LineParseError::UnterminatedQuote { column }),
                    Some(QUOTE) if chars.peek() == Some(&QUOTE) => {
                        chars.next();
                        out.push(QUOTE);
                        out.push(QUOTE);
                    }
                    Some(QUOTE) => {
                        out.push(QUOTE);
                        break;
                    }
                    Some(c) => out.push(c),
                }
            }
            match chars.next() {
                None => return Ok(out),
                Some(c) if c == delimiter => {
                    out.push(c);
                    column += 1;
                }
                Some(_) => return Err(LineParseError::TrailingAfterQuote { column }),
            }
        } else {
            // 非引号字段
            loop {
                match chars.next() {
                    None => return Ok(out),
                    Some(c) if c == delimiter => {
                        out.push(c);
                        column += 1;
                        break;
                    }
                    Some(QUOTE) => return Err(LineParseError::BareQuote { column }),
                    Some(c) => out.push(c),
                }
            }
        }
    }
}
