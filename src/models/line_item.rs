use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::coerce::{parse_decimal_lenient, text_of};

/// 发票行 (手工录入或XML导入预览)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManualLineItem {
    pub code: Value,        // 商品编码 (可空, 任意标量)
    pub description: Value, // 描述
    pub quantity: Value,    // 数量
    pub unit_price: Value,  // 单价
}

impl ManualLineItem {
    pub fn code_text(&self) -> String {
        text_of(&self.code)
    }

    pub fn description_text(&self) -> String {
        text_of(&self.description)
    }

    pub fn quantity(&self) -> f64 {
        parse_decimal_lenient(&text_of(&self.quantity))
    }

    pub fn unit_price(&self) -> f64 {
        parse_decimal_lenient(&text_of(&self.unit_price))
    }

    /// 行总价 = 数量 * 单价
    pub fn total_price(&self) -> f64 {
        self.quantity() * self.unit_price()
    }
}

/// 采购订单候选行 (匹配侧只读)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PurchaseOrderItem {
    pub id: Value,
    pub product_code: Value,
    pub item_code: Value,
    pub code: Value,
    pub description: Value,
}

impl PurchaseOrderItem {
    /// 候选编码: 按 productCode > itemCode > code 取第一个非空
    pub fn candidate_code(&self) -> String {
        for field in [&self.product_code, &self.item_code, &self.code] {
            let text = text_of(field);
            if !text.is_empty() {
                return text;
            }
        }
        String::new()
    }

    pub fn description_text(&self) -> String {
        text_of(&self.description)
    }
}

/// 匹配结果: 命中的订单行ID原样回传 + 置信度
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchOutcome {
    pub id: Value,
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn candidate_code_priority() {
        let item = PurchaseOrderItem {
            product_code: json!("P-1"),
            item_code: json!("I-1"),
            code: json!("C-1"),
            ..Default::default()
        };
        assert_eq!(item.candidate_code(), "P-1");

        let item = PurchaseOrderItem {
            item_code: json!("I-1"),
            code: json!("C-1"),
            ..Default::default()
        };
        assert_eq!(item.candidate_code(), "I-1");

        let item = PurchaseOrderItem {
            code: json!(42),
            ..Default::default()
        };
        assert_eq!(item.candidate_code(), "42");

        assert_eq!(PurchaseOrderItem::default().candidate_code(), "");
    }

    #[test]
    fn total_price_is_quantity_times_unit_price() {
        let item = ManualLineItem {
            quantity: json!("2"),
            unit_price: json!("10,50"),
            ..Default::default()
        };
        assert_eq!(item.total_price(), 21.0);
    }
}
