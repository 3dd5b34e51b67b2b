use crate::models::{
    AllocationRow, DimensionRule, ExpandSets, ManualLineItem, MatchOutcome, PurchaseOrderItem,
    ReceiptMode, TreeGroup,
};
use crate::service::allocation::{
    allocations_sum, allocations_sum_ok, base_total_for_allocation,
    fill_missing_allocation_values,
};
use crate::service::matcher::{ItemMatchResult, MatchStats, MatcherService};
use crate::service::tree::{
    build_chart_account_tree, build_cost_center_tree, compute_initial_expand,
    valid_allocation_ids,
};
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// 请求体: 单行匹配
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualMatchRequest {
    #[serde(default)]
    pub item: Option<ManualLineItem>,
    #[serde(default)]
    pub po_items: Vec<PurchaseOrderItem>,
}

/// 响应体: 单行匹配
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualMatchResponse {
    pub success: bool,
    pub message: String,
    pub matched: Option<MatchOutcome>,
    pub linked: bool,
}

/// 请求体: 批量匹配 (XML导入预览行)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchMatchRequest {
    #[serde(default)]
    pub items: Vec<ManualLineItem>,
    #[serde(default)]
    pub po_items: Vec<PurchaseOrderItem>,
}

/// 响应体: 批量匹配 (含统计信息)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchMatchResponse {
    pub success: bool,
    pub message: String,
    pub results: Vec<ItemMatchResult>,
    pub stats: MatchStats,
}

/// 响应体: 维度树
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeResponse {
    pub tree: Vec<TreeGroup>,
    pub expand: ExpandSets,
    pub valid_ids: Vec<i64>,
}

/// 请求体: 分摊汇总
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationSummaryRequest {
    #[serde(default)]
    pub rows: Vec<AllocationRow>,
    pub mode: ReceiptMode,
}

/// 响应体: 分摊汇总
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationSummaryResponse {
    pub base_total: f64,
    pub sum: f64,
    pub sum_ok: bool,
}

/// 请求体: 自动填充
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationFillRequest {
    #[serde(default)]
    pub rows: Vec<AllocationRow>,
    pub mode: ReceiptMode,
    pub rule: DimensionRule,
}

/// 响应体: 自动填充 (失败时行原样返回)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationFillResponse {
    pub success: bool,
    pub message: String,
    pub rows: Vec<AllocationRow>,
    pub sum: f64,
    pub sum_ok: bool,
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 单行匹配接口 (手工录入行)
pub async fn match_manual(
    State(service): State<Arc<MatcherService>>,
    Json(req): Json<ManualMatchRequest>,
) -> Response {
    let (matched, linked) = match &req.item {
        Some(item) => service.match_manual_item(item, &req.po_items),
        None => (None, false),
    };

    let message = match (&matched, linked) {
        (Some(m), true) => format!("Matched with score {:.2}", m.score),
        (Some(m), false) => format!(
            "Score {:.2} below threshold {:.2}, manual confirmation required",
            m.score,
            service.threshold()
        ),
        (None, _) => "No candidate available".to_string(),
    };

    let response = ManualMatchResponse {
        success: true,
        message,
        matched,
        linked,
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// 批量匹配接口
pub async fn batch_match(
    State(service): State<Arc<MatcherService>>,
    Json(req): Json<BatchMatchRequest>,
) -> Response {
    let (results, stats) = service.batch_match(&req.items, &req.po_items);

    let response = BatchMatchResponse {
        success: true,
        message: format!(
            "Matched {} items: {} auto-linked, {} need manual confirmation",
            stats.total_items, stats.linked_items, stats.unlinked_items
        ),
        results,
        stats,
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// 成本中心树接口 (非数组请求体按空列表处理)
pub async fn cost_center_tree(Json(body): Json<Value>) -> Response {
    let list = body.as_array().cloned().unwrap_or_default();
    let tree = build_cost_center_tree(&list);
    let expand = compute_initial_expand(&tree);
    let valid_ids = valid_allocation_ids(&tree);
    (StatusCode::OK, Json(TreeResponse { tree, expand, valid_ids })).into_response()
}

/// 会计科目树接口
pub async fn chart_account_tree(Json(body): Json<Value>) -> Response {
    let list = body.as_array().cloned().unwrap_or_default();
    let tree = build_chart_account_tree(&list);
    let expand = compute_initial_expand(&tree);
    let valid_ids = valid_allocation_ids(&tree);
    (StatusCode::OK, Json(TreeResponse { tree, expand, valid_ids })).into_response()
}

/// 分摊汇总接口: 行金额合计是否与基数到分对平
pub async fn allocation_summary(Json(req): Json<AllocationSummaryRequest>) -> Response {
    let base_total = base_total_for_allocation(&req.mode);
    let sum = allocations_sum(&req.rows);
    let response = AllocationSummaryResponse {
        base_total,
        sum,
        sum_ok: allocations_sum_ok(&req.rows, base_total),
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// 自动填充接口: 校验失败时 422, 行原样返回
pub async fn allocation_fill(Json(req): Json<AllocationFillRequest>) -> Response {
    let AllocationFillRequest { mut rows, mode, rule } = req;
    let base_total = base_total_for_allocation(&mode);

    match fill_missing_allocation_values(&mut rows, base_total, rule) {
        Ok(summary) => {
            let sum = allocations_sum(&rows);
            let sum_ok = allocations_sum_ok(&rows, base_total);
            let response = AllocationFillResponse {
                success: true,
                message: format!(
                    "Distributed {:.2} across {} rows",
                    summary.distributed, summary.filled_rows
                ),
                rows,
                sum,
                sum_ok,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            let sum = allocations_sum(&rows);
            let sum_ok = allocations_sum_ok(&rows, base_total);
            let response = AllocationFillResponse {
                success: false,
                message: e.to_string(),
                rows,
                sum,
                sum_ok,
            };
            (StatusCode::UNPROCESSABLE_ENTITY, Json(response)).into_response()
        }
    }
}
