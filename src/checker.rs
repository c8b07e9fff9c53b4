use crate::fetcher::SearchFetcher;
use crate::parser::ResultParser;
use crate::types::{MatchRecord, SearchRequest};
use std::sync::Arc;
use tracing::{error, info};

/// 搜尋排名檢查：Fetcher + 解析器
pub struct RankChecker {
    fetcher: Arc<dyn SearchFetcher>,
    parser: Arc<ResultParser>,
}

impl RankChecker {
    pub fn new(fetcher: Arc<dyn SearchFetcher>, parser: Arc<ResultParser>) -> Self {
        Self { fetcher, parser }
    }

    /// 檢查單一關鍵字；取得頁面失敗時記錄錯誤並回傳空結果
    pub async fn check(&self, request: &SearchRequest) -> Vec<MatchRecord> {
        let page = match self.fetcher.fetch_results(&request.keyword).await {
            Ok(page) => page,
            Err(e) => {
                error!(keyword = %request.keyword, error = %e, "取得搜尋結果失敗");
                return Vec::new();
            }
        };

        let records = self
            .parser
            .extract(&page.body, &request.keyword, &request.blog_ids);

        info!(
            keyword = %request.keyword,
            status = %page.status,
            matches = records.len(),
            "檢查完成"
        );
        records
    }

    /// 依序檢查多個關鍵字並串接結果
    pub async fn check_all(&self, requests: &[SearchRequest]) -> Vec<MatchRecord> {
        let mut records = Vec::new();
        for request in requests {
            records.extend(self.check(request).await);
        }
        records
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::fetcher::{FetchError, SearchFetcher, SearchPage};
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// 測試用 Fetcher：依關鍵字回傳固定頁面，沒有設定的關鍵字回傳 HTTP 500
    #[derive(Default)]
    pub struct StaticFetcher {
        pages: HashMap<String, String>,
        pub calls: Mutex<Vec<String>>,
    }

    impl StaticFetcher {
        pub fn with_page(mut self, keyword: &str, html: &str) -> Self {
            self.pages.insert(keyword.to_string(), html.to_string());
            self
        }
    }

    #[async_trait]
    impl SearchFetcher for StaticFetcher {
        async fn fetch_results(&self, keyword: &str) -> Result<SearchPage, FetchError> {
            self.calls.lock().unwrap().push(keyword.to_string());
            match self.pages.get(keyword) {
                Some(body) => Ok(SearchPage {
                    status: StatusCode::OK,
                    body: body.clone(),
                }),
                None => Err(FetchError::Status {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                }),
            }
        }
    }

    pub const GENERAL_PAGE: &str = r#"
    <div class="spw_rerank _rra_body"><ul>
        <li class="bx"><a class="user_thumb" href="https://blog.naver.com/other/1"></a><a class="title_link">Other</a></li>
        <li class="bx"><a class="user_thumb" href="https://blog.naver.com/alpha/2"></a><a class="title_link">Mine</a></li>
    </ul></div>"#;
}
