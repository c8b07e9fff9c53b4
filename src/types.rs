use serde::{Deserialize, Serialize};

/// 單一關鍵字的查詢請求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// 搜尋關鍵字
    pub keyword: String,
    /// 要比對的部落格 ID（去除前後空白、去重、依請求順序）
    pub blog_ids: Vec<String>,
}

impl SearchRequest {
    /// 建立請求；關鍵字空白或沒有可用的 ID 時回傳 None
    pub fn new<I, S>(keyword: &str, blog_ids: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if keyword.trim().is_empty() {
            return None;
        }

        let mut ids: Vec<String> = Vec::new();
        for id in blog_ids {
            let id: String = id.into();
            let id = id.trim();
            if !id.is_empty() && !ids.iter().any(|existing| existing == id) {
                ids.push(id.to_string());
            }
        }

        if ids.is_empty() {
            return None;
        }

        Some(Self {
            keyword: keyword.to_string(),
            blog_ids: ids,
        })
    }
}

/// `/crawl` 的請求內容，接受兩種格式
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CrawlRequest {
    /// `{"keyword": "...", "blog_ids": ["...", ...]}`
    Single {
        keyword: Option<String>,
        blog_ids: Option<Vec<String>>,
    },
    /// 舊格式：`[["keyword", "blog_id"], ...]`
    Pairs(Vec<(String, String)>),
}

impl CrawlRequest {
    /// 轉成每個關鍵字一筆的查詢（依關鍵字第一次出現的順序）
    pub fn into_searches(self) -> Vec<SearchRequest> {
        match self {
            CrawlRequest::Single { keyword, blog_ids } => match (keyword, blog_ids) {
                (Some(keyword), Some(ids)) => {
                    SearchRequest::new(&keyword, ids).into_iter().collect()
                }
                _ => Vec::new(),
            },
            CrawlRequest::Pairs(pairs) => {
                let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
                for (keyword, blog_id) in pairs {
                    match grouped.iter_mut().find(|(k, _)| *k == keyword) {
                        Some((_, ids)) => ids.push(blog_id),
                        None => grouped.push((keyword, vec![blog_id])),
                    }
                }

                grouped
                    .into_iter()
                    .filter_map(|(keyword, ids)| SearchRequest::new(&keyword, ids))
                    .collect()
            }
        }
    }
}

/// 一筆比對結果（輸出單位）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    #[serde(rename = "Keyword")]
    pub keyword: String,
    #[serde(rename = "Blog ID")]
    pub blog_id: String,
    /// 區塊名稱或主題
    #[serde(rename = "Section")]
    pub section: String,
    /// 區塊內的名次，從 1 開始
    #[serde(rename = "Position")]
    pub position: usize,
    #[serde(rename = "Title")]
    pub title: String,
}
