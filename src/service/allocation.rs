use serde_json::Value;

use crate::models::coerce::{parse_decimal_lenient, text_of};
use crate::models::{AllocationRow, DimensionRule, FillError, ReceiptMode};

/// 四舍五入到分
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 分摊基数: 发票模式取录入总额, 订单模式取订单总额 (均宽松解析)
pub fn base_total_for_allocation(mode: &ReceiptMode) -> f64 {
    match mode {
        ReceiptMode::Invoice { total } | ReceiptMode::PurchaseOrder { total } => {
            parse_decimal_lenient(&text_of(total))
        }
    }
}

/// 全部行金额之和 (与维度有效性无关)
pub fn allocations_sum(rows: &[AllocationRow]) -> f64 {
    rows.iter().map(AllocationRow::parsed_amount).sum()
}

/// 对账通过: 四舍五入到分后完全相等
pub fn allocations_sum_ok(rows: &[AllocationRow], base_total: f64) -> bool {
    round2(allocations_sum(rows)) == round2(base_total)
}

fn row_has_required_dimensions(row: &AllocationRow, rule: DimensionRule) -> bool {
    match rule {
        DimensionRule::CostCenterAndChartAccount => {
            row.has_cost_center() && row.has_chart_account()
        }
        DimensionRule::ChartAccountOnly => row.has_chart_account(),
    }
}

/// 填充汇总 (用于响应消息)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillSummary {
    pub filled_rows: usize,
    pub distributed: f64,
}

/// 自动填充缺失金额: 把剩余基数按权重摊给缺失行, 逐行舍入到分,
/// 末个缺失行吸收舍入余数, 保证整组与基数到分对平.
/// 任何失败路径都不修改行列表.
pub fn fill_missing_allocation_values(
    rows: &mut [AllocationRow],
    base_total: f64,
    rule: DimensionRule,
) -> Result<FillSummary, FillError> {
    // 1. 过滤出维度齐全的行
    let valid: Vec<usize> = (0..rows.len())
        .filter(|&i| row_has_required_dimensions(&rows[i], rule))
        .collect();
    if valid.is_empty() {
        return Err(FillError::NoValidRows);
    }

    // 2. 区分已填 (金额 > 0) 与缺失
    let mut filled_sum = 0.0;
    let mut missing: Vec<usize> = Vec::new();
    for &i in &valid {
        let amount = rows[i].parsed_amount();
        if amount > 0.0 {
            filled_sum += amount;
        } else {
            missing.push(i);
        }
    }
    if missing.is_empty() {
        return Err(FillError::NothingToFill);
    }

    // 3. 可分配余额
    let remaining = (base_total - filled_sum).max(0.0);
    if remaining <= 0.0 {
        return Err(FillError::NothingToDistribute);
    }

    // 4. 行权重: 自带百分比为正且有限则用之, 否则该行权重1;
    //    总权重退化时丢弃全部权重改为均分
    let mut weights: Vec<f64> = missing
        .iter()
        .map(|&i| {
            let p = rows[i].parsed_percentage();
            if p > 0.0 && p.is_finite() {
                p
            } else {
                1.0
            }
        })
        .collect();
    let mut total_weight: f64 = weights.iter().sum();
    if !(total_weight > 0.0) || !total_weight.is_finite() {
        weights = vec![1.0; missing.len()];
        total_weight = missing.len() as f64;
    }

    // 5. 分配: 前面各行按权重份额舍入, 末行吸收余数
    let mut assigned = 0.0;
    let last = missing.len() - 1;
    for (pos, &i) in missing.iter().enumerate() {
        let portion = if pos == last {
            round2(remaining - assigned)
        } else {
            round2(remaining * weights[pos] / total_weight)
        };
        assigned += portion;

        // 6. 写回金额并重算该行百分比
        rows[i].amount = Value::String(format!("{portion:.2}"));
        let percentage = round2(portion / base_total * 100.0);
        rows[i].percentage = Value::String(format!("{percentage:.2}"));
    }

    Ok(FillSummary {
        filled_rows: missing.len(),
        distributed: remaining,
    })
}
