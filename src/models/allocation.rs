use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::coerce::{id_of, parse_decimal_lenient, text_of};

/// 财务分摊行 (rateio)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AllocationRow {
    pub cost_center_id: Value,
    pub chart_of_accounts_id: Value,
    pub amount: Value,     // 字符串小数, 逗号/点分隔
    pub percentage: Value,
}

impl AllocationRow {
    pub fn parsed_amount(&self) -> f64 {
        parse_decimal_lenient(&text_of(&self.amount))
    }

    pub fn parsed_percentage(&self) -> f64 {
        parse_decimal_lenient(&text_of(&self.percentage))
    }

    /// 成本中心是否已选 (遗留行为: id 0 视为未选)
    pub fn has_cost_center(&self) -> bool {
        id_of(&self.cost_center_id).is_some_and(|id| id != 0)
    }

    /// 会计科目是否已选
    pub fn has_chart_account(&self) -> bool {
        id_of(&self.chart_of_accounts_id).is_some_and(|id| id != 0)
    }
}

/// 收货模式: 决定分摊基数来源
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum ReceiptMode {
    /// 手工发票: 基数取录入的发票总额 (宽松解析)
    Invoice { total: Value },
    /// 采购订单: 基数取订单总额
    PurchaseOrder { total: Value },
}

/// 分摊行有效性规则 (两种收货界面的差异)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DimensionRule {
    /// 成本中心 + 会计科目 都必须选
    CostCenterAndChartAccount,
    /// 仅会计科目
    ChartAccountOnly,
}

/// 自动填充的校验失败: 提示性, 不修改任何行
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillError {
    NoValidRows,
    NothingToFill,
    NothingToDistribute,
}

impl fmt::Display for FillError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            FillError::NoValidRows => "No allocation row has the required dimensions selected",
            FillError::NothingToFill => "All valid rows already have an amount",
            FillError::NothingToDistribute => "Filled amounts already cover the base total",
        };
        f.write_str(message)
    }
}

impl std::error::Error for FillError {}
