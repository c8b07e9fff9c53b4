use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::fetcher::FetcherConfig;

/// 本機開發模式的綁定位址
const LOCAL_DEV_ADDR: &str = "127.0.0.1:5000";

/// 允許的跨域來源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<String>),
}

impl AllowedOrigins {
    fn parse(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            AllowedOrigins::Any
        } else {
            AllowedOrigins::List(origins)
        }
    }
}

/// 服務設定（啟動時讀取一次）
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub allowed_origins: AllowedOrigins,
    pub fetcher: FetcherConfig,
}

impl Config {
    /// 從環境變數讀取設定（有 .env 檔時先載入）
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 以任意查詢函式讀取設定
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let local_dev = lookup("LOCAL_DEV")
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);

        let bind_addr = if local_dev {
            LOCAL_DEV_ADDR.to_string()
        } else {
            let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
            let port: u16 = lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?;
            format!("{}:{}", host, port)
        };
        let bind_addr: SocketAddr = bind_addr
            .parse()
            .with_context(|| format!("無效的綁定位址: {}", bind_addr))?;

        let allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|raw| AllowedOrigins::parse(&raw))
            .unwrap_or(AllowedOrigins::Any);

        let mut fetcher = FetcherConfig::default();
        if let Some(base) = lookup("SEARCH_BASE_URL") {
            fetcher.base_url = base;
        }
        if let Some(secs) = lookup("FETCH_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .context("FETCH_TIMEOUT_SECS must be a valid number")?;
            fetcher.timeout = Duration::from_secs(secs);
        }

        Ok(Self {
            bind_addr,
            allowed_origins,
            fetcher,
        })
    }
}
