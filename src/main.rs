mod batch;
mod checker;
mod config;
mod fetcher;
mod parser;
mod server;
mod types;

use anyhow::{Context, Result};
use checker::RankChecker;
use config::Config;
use fetcher::HttpFetcher;
use parser::ResultParser;
use server::{AppState, build_app};
use std::env;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use types::SearchRequest;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,blog_rank_crawler=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        None | Some("serve") => run_server().await?,
        Some("check") => run_check(&args[2..]).await?,
        Some("batch") => run_batch(&args[2..]).await?,
        Some("--help") | Some("-h") => print_help(),
        Some(other) => {
            println!("未知命令: {}", other);
            print_help();
        }
    }

    Ok(())
}

fn build_checker(config: &Config) -> Result<RankChecker> {
    let fetcher = HttpFetcher::new(&config.fetcher)?;
    let parser = ResultParser::new().context("無法建立解析器")?;
    Ok(RankChecker::new(Arc::new(fetcher), Arc::new(parser)))
}

async fn run_server() -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    let checker = build_checker(&config)?;

    let app = build_app(
        AppState {
            checker: Arc::new(checker),
        },
        &config.allowed_origins,
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("Starting server on {}", config.bind_addr);
    tracing::info!("Crawl endpoint: POST http://{}/crawl", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

/// 等待 Ctrl-C；無法安裝訊號處理時持續執行
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("收到中斷訊號，停止服務"),
        Err(e) => {
            tracing::error!(error = %e, "無法監聽中斷訊號");
            std::future::pending::<()>().await;
        }
    }
}

async fn run_check(args: &[String]) -> Result<()> {
    let Some((keyword, blog_ids)) = args.split_first() else {
        print_help();
        return Ok(());
    };
    let Some(request) = SearchRequest::new(keyword, blog_ids.iter().cloned()) else {
        println!("❌ 需要關鍵字與至少一個部落格 ID");
        return Ok(());
    };

    let config = Config::from_env().context("Failed to load configuration")?;
    let checker = build_checker(&config)?;

    let records = checker.check(&request).await;
    batch::write_records(&records, None)
}

async fn run_batch(args: &[String]) -> Result<()> {
    let Some(input) = args.first() else {
        print_help();
        return Ok(());
    };
    let output = args.get(1).map(Path::new);

    let config = Config::from_env().context("Failed to load configuration")?;
    let checker = build_checker(&config)?;

    let requests = batch::load_requests(Path::new(input))?;
    if requests.is_empty() {
        println!("⚠️  請求檔中沒有可檢查的關鍵字");
        return Ok(());
    }

    let records = batch::run_batch(&checker, &requests).await?;
    batch::write_records(&records, output)
}

fn print_help() {
    println!("Blog Rank Crawler - 部落格搜尋排名檢查\n");
    println!("用法:");
    println!("  blog-rank-crawler                                 # 啟動 HTTP 服務");
    println!("  blog-rank-crawler serve                           # 啟動 HTTP 服務");
    println!("  blog-rank-crawler check <keyword> <blog_id>...    # 檢查單一關鍵字");
    println!("  blog-rank-crawler batch <request.json> [out.json] # 批次檢查");
    println!("  blog-rank-crawler --help                          # 顯示此幫助\n");
    println!("請求檔格式:");
    println!("  {{\"keyword\": \"...\", \"blog_ids\": [\"...\"]}}");
    println!("  [[\"keyword\", \"blog_id\"], ...]\n");
    println!("環境變數:");
    println!("  LOCAL_DEV              # 設為 true 時綁定 127.0.0.1:5000");
    println!("  HOST / PORT            # 綁定位址 (預設 0.0.0.0:8080)");
    println!("  CORS_ALLOWED_ORIGINS   # * 或以逗號分隔的來源 (預設 *)");
    println!("  SEARCH_BASE_URL        # 搜尋端點");
    println!("  FETCH_TIMEOUT_SECS     # 請求逾時秒數 (預設 30)");
    println!("  RUST_LOG               # 日誌層級");
}
