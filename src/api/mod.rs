pub mod handlers;

use crate::service::MatcherService;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

pub use handlers::*;

/// 组装全部路由: 匹配路由带服务状态, 分摊路由无状态
pub fn build_router(matcher: Arc<MatcherService>) -> Router {
    let match_routes = Router::new()
        .route("/api/match/manual", post(handlers::match_manual))
        .route("/api/match/batch", post(handlers::batch_match))
        .with_state(matcher);

    let allocation_routes = Router::new()
        .route(
            "/api/allocation/tree/cost-centers",
            post(handlers::cost_center_tree),
        )
        .route(
            "/api/allocation/tree/chart-accounts",
            post(handlers::chart_account_tree),
        )
        .route("/api/allocation/summary", post(handlers::allocation_summary))
        .route("/api/allocation/fill", post(handlers::allocation_fill));

    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(match_routes)
        .merge(allocation_routes)
}
