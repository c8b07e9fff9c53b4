use crate::checker::RankChecker;
use crate::types::{CrawlRequest, MatchRecord, SearchRequest};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::Path;

/// 讀取請求檔（與 `/crawl` 相同的兩種格式）
pub fn load_requests(path: &Path) -> Result<Vec<SearchRequest>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("無法讀取 {}", path.display()))?;
    let request: CrawlRequest = serde_json::from_str(&content)
        .with_context(|| format!("無法解析 {}", path.display()))?;
    Ok(request.into_searches())
}

/// 依序檢查所有關鍵字，顯示進度條
pub async fn run_batch(
    checker: &RankChecker,
    requests: &[SearchRequest],
) -> Result<Vec<MatchRecord>> {
    let pb = ProgressBar::new(requests.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{msg}\n[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} 個關鍵字 ({percent}%) {eta}",
            )?
            .progress_chars("=>-"),
    );

    let mut records = Vec::new();
    for request in requests {
        pb.set_message(format!("🔎 {}", request.keyword));
        let found = checker.check(request).await;
        records.extend(found);
        pb.inc(1);
    }

    pb.finish_with_message(format!("✨ 完成，共 {} 筆結果", records.len()));
    Ok(records)
}

/// 寫出結果：有指定路徑就寫檔，否則輸出到 stdout
pub fn write_records(records: &[MatchRecord], output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("無法寫入 {}", path.display()))?;
            tracing::info!(path = %path.display(), records = records.len(), "結果已寫入");
        }
        None => println!("{}", json),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::testing::{GENERAL_PAGE, StaticFetcher};
    use crate::parser::ResultParser;
    use std::sync::Arc;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("blog-rank-crawler-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_load_pairs_file() {
        let path = temp_path("pairs.json");
        fs::write(&path, r#"[["cafe", "alpha"], ["bakery", "beta"]]"#).unwrap();

        let requests = load_requests(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].keyword, "bakery");
    }

    #[test]
    fn test_load_invalid_file() {
        let path = temp_path("invalid.json");
        fs::write(&path, "nope").unwrap();

        let result = load_requests(&path);
        fs::remove_file(&path).ok();

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_run_batch_and_write() {
        let checker = RankChecker::new(
            Arc::new(StaticFetcher::default().with_page("cafe", GENERAL_PAGE)),
            Arc::new(ResultParser::new().unwrap()),
        );
        let requests = vec![
            SearchRequest::new("cafe", ["alpha"]).unwrap(),
            SearchRequest::new("missing", ["alpha"]).unwrap(),
        ];

        let records = run_batch(&checker, &requests).await.unwrap();
        assert_eq!(records.len(), 1);

        let path = temp_path("out.json");
        write_records(&records, Some(&path)).unwrap();
        let written: Vec<MatchRecord> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(written, records);
    }
}
