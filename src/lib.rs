pub mod api;
pub mod config;
pub mod models;
pub mod service;

pub use config::AppConfig;
pub use models::{AllocationRow, DimensionRule, FillError, ManualLineItem, MatchOutcome,
    PurchaseOrderItem, ReceiptMode};
pub use service::allocation::{
    allocations_sum, allocations_sum_ok, base_total_for_allocation,
    fill_missing_allocation_values, round2,
};
pub use service::matcher::{
    calculate_token_score, find_best_purchase_order_match, normalize_text,
    MANUAL_ITEM_MATCH_THRESHOLD,
};
pub use service::tree::{
    build_chart_account_tree, build_cost_center_tree, compute_initial_expand,
    valid_allocation_ids,
};
pub use service::MatcherService;
