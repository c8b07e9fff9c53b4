use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, REFERER, USER_AGENT};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// 固定的桌面瀏覽器 User-Agent
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
/// 固定的 Referer
pub const DEFAULT_REFERER: &str = "https://www.naver.com/";
pub const DEFAULT_BASE_URL: &str = "https://search.naver.com/search.naver";

/// Fetcher 設定
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// 搜尋端點，關鍵字以 `query=` 附加
    pub base_url: String,
    pub user_agent: String,
    pub referer: String,
    pub timeout: Duration,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// 取得的搜尋結果頁
#[derive(Debug, Clone)]
pub struct SearchPage {
    pub status: StatusCode,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP 錯誤: {status}")]
    Status { status: StatusCode },
    #[error("請求失敗: {0}")]
    Request(#[from] reqwest::Error),
}

/// 搜尋頁 Fetcher trait
#[async_trait]
pub trait SearchFetcher: Send + Sync {
    /// 以關鍵字取得搜尋結果頁（單次 GET，不重試）
    async fn fetch_results(&self, keyword: &str) -> Result<SearchPage, FetchError>;
}

/// HTTP 實作
pub struct HttpFetcher {
    client: Client,
    base_url: String,
}

impl HttpFetcher {
    /// 建立新的 HTTP Fetcher
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).context("無效的 User-Agent")?,
        );
        headers.insert(
            REFERER,
            HeaderValue::from_str(&config.referer).context("無效的 Referer")?,
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .context("無法建立 HTTP 客戶端")?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// 組出查詢 URL
    pub fn query_url(&self, keyword: &str) -> String {
        format!("{}?query={}", self.base_url, urlencoding::encode(keyword))
    }
}

#[async_trait]
impl SearchFetcher for HttpFetcher {
    async fn fetch_results(&self, keyword: &str) -> Result<SearchPage, FetchError> {
        let url = self.query_url(keyword);
        tracing::debug!(%url, "取得搜尋結果頁");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { status });
        }

        let body = response.text().await?;
        Ok(SearchPage { status, body })
    }
}
