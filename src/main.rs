use receipt_rateio_rust::{api, AppConfig, MatcherService};
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 使用本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::from_env();
    info!("Starting server with config: {:?}", config);

    // 匹配服务 (阈值可由 MATCH_THRESHOLD 覆盖)
    let matcher = Arc::new(MatcherService::new(config.matching.auto_link_threshold));

    // 构建路由
    let app = api::build_router(matcher).layer(ServiceBuilder::new());

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /api/match/manual                   - Match one manual item");
    info!("  POST /api/match/batch                    - Match imported preview items");
    info!("  POST /api/allocation/tree/cost-centers   - Cost center tree");
    info!("  POST /api/allocation/tree/chart-accounts - Chart of accounts tree");
    info!("  POST /api/allocation/summary             - Allocation sum check");
    info!("  POST /api/allocation/fill                - Fill missing allocation values");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
