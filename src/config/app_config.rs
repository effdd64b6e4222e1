// ==========================================
// 商品目录服务 - 应用配置
// ==========================================
// 来源: 进程环境变量
// | 变量                  | 默认值                                  |
// | CSV_DEFAULT_CURRENCY | USD                                     |
// | PORT                 | 8080                                    |
// | BIND_ADDR            | 0.0.0.0                                 |
// | CATALOG_DB_PATH      | <data_dir>/catalog-service/catalog.db   |
// ==========================================

use crate::config::import_config::ImportConfig;
use crate::importer::row_normalizer::FALLBACK_CURRENCY;
use std::path::PathBuf;
use thiserror::Error;

/// 配置键
pub mod config_keys {
    pub const DEFAULT_CURRENCY: &str = "CSV_DEFAULT_CURRENCY";
    pub const PORT: &str = "PORT";
    pub const BIND_ADDR: &str = "BIND_ADDR";
    pub const DB_PATH: &str = "CATALOG_DB_PATH";
}

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("配置项 {key} 的值无效: {value} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 应用配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub bind_addr: String,
    pub db_path: String,
    pub import: ImportConfig,
}

impl AppConfig {
    /// 从进程环境变量读取
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取（便于测试）
    ///
    /// 空白值视为未设置
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match get(config_keys::PORT) {
            None => DEFAULT_PORT,
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                key: config_keys::PORT,
                value: raw.clone(),
                reason: e.to_string(),
            })?,
        };

        let bind_addr = get(config_keys::BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let default_currency = get(config_keys::DEFAULT_CURRENCY)
            .map(|c| c.to_uppercase())
            .unwrap_or_else(|| FALLBACK_CURRENCY.to_string());

        let db_path = get(config_keys::DB_PATH).unwrap_or_else(get_default_db_path);

        Ok(Self {
            port,
            bind_addr,
            db_path,
            import: ImportConfig::with_default_currency(default_currency),
        })
    }
}

/// 默认数据库路径
///
/// 优先用户数据目录（<data_dir>/catalog-service/catalog.db），拿不到时回退到当前目录
pub fn get_default_db_path() -> String {
    let mut path = PathBuf::from("./catalog.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("catalog-service");
        // 确保目录存在；失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("catalog.db");
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[(config_keys::DB_PATH, "/tmp/c.db")])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.bind_addr, "0.0.0.0");
        assert_eq!(config.db_path, "/tmp/c.db");
        assert_eq!(config.import.default_currency, "USD");
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("PORT", "9090"),
            ("BIND_ADDR", "127.0.0.1"),
            ("CSV_DEFAULT_CURRENCY", " eur "),
            ("CATALOG_DB_PATH", "/data/catalog.db"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.bind_addr, "127.0.0.1");
        assert_eq!(config.import.default_currency, "EUR");
        assert_eq!(config.db_path, "/data/catalog.db");
    }

    #[test]
    fn test_invalid_port() {
        let err = AppConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "PORT", .. }));
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = AppConfig::from_lookup(lookup(&[
            ("PORT", "  "),
            ("CSV_DEFAULT_CURRENCY", ""),
            ("CATALOG_DB_PATH", "/tmp/c.db"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.import.default_currency, "USD");
    }
}
