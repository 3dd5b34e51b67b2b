use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::Serialize;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::models::{ManualLineItem, MatchOutcome, PurchaseOrderItem};

/// 自动关联阈值: score >= 0.45 才自动挂接, 低于则标记待人工确认
pub const MANUAL_ITEM_MATCH_THRESHOLD: f64 = 0.45;

/// 文本归一化: NFD分解去变音符 -> 小写 -> 非字母数字的连续段折叠为单空格 -> 去首尾
pub fn normalize_text(value: &str) -> String {
    let stripped: String = value.nfd().filter(|c| !is_combining_mark(*c)).collect();
    let lowered = stripped.to_lowercase();

    let mut out = String::with_capacity(lowered.len());
    for c in lowered.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else if !out.ends_with(' ') {
            out.push(' ');
        }
    }
    out.trim().to_string()
}

/// 词集重叠评分: |交集| / max(|左|, |右|), 任一侧为空词集 -> 0
pub fn calculate_token_score(left: &str, right: &str) -> f64 {
    let left_norm = normalize_text(left);
    let right_norm = normalize_text(right);

    let left_tokens: IndexSet<&str> = left_norm.split_whitespace().collect();
    let right_tokens: IndexSet<&str> = right_norm.split_whitespace().collect();
    if left_tokens.is_empty() || right_tokens.is_empty() {
        return 0.0;
    }

    let overlap = left_tokens.iter().filter(|t| right_tokens.contains(**t)).count();
    overlap as f64 / left_tokens.len().max(right_tokens.len()) as f64
}

/// 在订单候选行里找最优匹配.
/// 编码规则先算 (完全相等=1.0 封顶, 包含关系 >= 0.85),
/// 描述规则只升不降 (相等 >= 0.9, 包含 >= 0.7, 否则词集评分);
/// 严格大于才替换当前最优, 平分保留先出现者.
pub fn find_best_purchase_order_match(
    manual_item: &ManualLineItem,
    po_items: &[PurchaseOrderItem],
) -> Option<MatchOutcome> {
    if po_items.is_empty() {
        return None;
    }

    // 1. 手工行只归一化一次
    let manual_code = normalize_text(&manual_item.code_text());
    let manual_desc = normalize_text(&manual_item.description_text());

    let mut best: Option<MatchOutcome> = None;
    for item in po_items {
        let candidate_code = normalize_text(&item.candidate_code());
        let candidate_desc = normalize_text(&item.description_text());

        // 2. 编码规则
        let mut score = 0.0_f64;
        if !manual_code.is_empty() && !candidate_code.is_empty() {
            if manual_code == candidate_code {
                score = 1.0;
            } else if manual_code.contains(&candidate_code) || candidate_code.contains(&manual_code)
            {
                score = score.max(0.85);
            }
        }

        // 3. 描述规则
        if !manual_desc.is_empty() && !candidate_desc.is_empty() {
            if manual_desc == candidate_desc {
                score = score.max(0.9);
            } else if manual_desc.contains(&candidate_desc) || candidate_desc.contains(&manual_desc)
            {
                score = score.max(0.7);
            } else {
                score = score.max(calculate_token_score(&manual_desc, &candidate_desc));
            }
        }

        // 4. 严格大于才替换
        let is_better = match &best {
            None => true,
            Some(b) => score > b.score,
        };
        if is_better {
            best = Some(MatchOutcome {
                id: item.id.clone(),
                score,
            });
        }
    }

    best
}

/// 批量匹配统计
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchStats {
    pub total_items: usize,
    pub linked_items: usize,
    pub unlinked_items: usize,
    pub matched_at: DateTime<Utc>,
}

/// 单行批量匹配结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemMatchResult {
    pub index: usize,
    pub matched: Option<MatchOutcome>,
    pub linked: bool,
}

/// 匹配服务: 持有自动关联阈值
pub struct MatcherService {
    threshold: f64,
}

impl MatcherService {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// 单行匹配: 最优结果 + 是否达到自动关联阈值
    pub fn match_manual_item(
        &self,
        item: &ManualLineItem,
        po_items: &[PurchaseOrderItem],
    ) -> (Option<MatchOutcome>, bool) {
        let outcome = find_best_purchase_order_match(item, po_items);
        let linked = outcome.as_ref().is_some_and(|m| m.score >= self.threshold);
        (outcome, linked)
    }

    /// 批量匹配入口 (XML导入预览行)
    pub fn batch_match(
        &self,
        items: &[ManualLineItem],
        po_items: &[PurchaseOrderItem],
    ) -> (Vec<ItemMatchResult>, MatchStats) {
        let total_items = items.len();
        tracing::info!("批量匹配开始: {} 行, {} 个候选", total_items, po_items.len());

        let mut results = Vec::with_capacity(total_items);
        let mut linked_items = 0;
        for (index, item) in items.iter().enumerate() {
            let (matched, linked) = self.match_manual_item(item, po_items);
            if linked {
                linked_items += 1;
            }
            results.push(ItemMatchResult {
                index,
                matched,
                linked,
            });
        }

        let stats = MatchStats {
            total_items,
            linked_items,
            unlinked_items: total_items - linked_items,
            matched_at: Utc::now(),
        };
        tracing::info!(
            "批量匹配完成: 总行数: {}, 自动关联: {}, 待人工: {}",
            stats.total_items,
            stats.linked_items,
            stats.unlinked_items
        );

        (results, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manual(code: &str, description: &str) -> ManualLineItem {
        ManualLineItem {
            code: json!(code),
            description: json!(description),
            ..Default::default()
        }
    }

    fn po(id: i64, code: &str, description: &str) -> PurchaseOrderItem {
        PurchaseOrderItem {
            id: json!(id),
            code: json!(code),
            description: json!(description),
            ..Default::default()
        }
    }

    #[test]
    fn normalize_strips_accents_and_punctuation() {
        assert_eq!(normalize_text("Válvula aço-inox 1/2\""), "valvula aco inox 1 2");
        assert_eq!(normalize_text("  Cabo   HDMI 2,0  "), "cabo hdmi 2 0");
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text("!!!"), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize_text("Parafuso Ø6 (Métrico)");
        assert_eq!(normalize_text(&once), once);
    }

    #[test]
    fn token_score_bounds() {
        assert_eq!(calculate_token_score("", "abc def"), 0.0);
        assert_eq!(calculate_token_score("abc", ""), 0.0);
        assert_eq!(calculate_token_score("abc def", "abc def"), 1.0);

        let score = calculate_token_score("cabo hdmi preto", "cabo vga branco longo");
        assert!(score >= 0.0 && score <= 1.0);
        assert_eq!(score, 0.25); // 1 词重叠 / max(3, 4)
    }

    #[test]
    fn exact_code_wins_outright() {
        // 场景: 编码完全相等, 描述完全不同, 仍为 1.0
        let result = find_best_purchase_order_match(
            &manual("ABC-1", "Parafuso M6"),
            &[po(10, "ABC-1", "Different")],
        );
        assert_eq!(result, Some(MatchOutcome { id: json!(10), score: 1.0 }));
    }

    #[test]
    fn description_substring_scores_at_least_point_seven() {
        let result = find_best_purchase_order_match(
            &manual("", "Cabo HDMI 2.0"),
            &[po(5, "", "Cabo hdmi 2,0 preto")],
        )
        .unwrap();
        assert_eq!(result.id, json!(5));
        assert!(result.score >= 0.7);
    }

    #[test]
    fn code_substring_scores_at_least_point_eighty_five() {
        let result = find_best_purchase_order_match(
            &manual("ABC-123", "x"),
            &[po(2, "ABC-123-B", "y")],
        )
        .unwrap();
        assert!(result.score >= 0.85);
        assert!(result.score < 1.0);
    }

    #[test]
    fn best_score_is_maximal_over_candidates() {
        let candidates = vec![
            po(1, "", "parafuso sextavado m6"),
            po(2, "", "parafuso m6 zincado"),
            po(3, "", "porca m8"),
        ];
        let item = manual("", "Parafuso M6");
        let best = find_best_purchase_order_match(&item, &candidates).unwrap();

        for candidate in &candidates {
            let single = find_best_purchase_order_match(&item, std::slice::from_ref(candidate))
                .unwrap();
            assert!(best.score >= single.score);
        }
    }

    #[test]
    fn ties_keep_first_seen_candidate() {
        let result = find_best_purchase_order_match(
            &manual("XYZ", "mesmo texto"),
            &[po(7, "", "mesmo texto"), po(8, "", "mesmo texto")],
        )
        .unwrap();
        assert_eq!(result.id, json!(7));
    }

    #[test]
    fn deterministic_across_calls() {
        let item = manual("AB-9", "Luva nitrílica M");
        let candidates = vec![po(1, "AB-9", "Luva"), po(2, "", "Luva nitrilica M")];
        let first = find_best_purchase_order_match(&item, &candidates);
        let second = find_best_purchase_order_match(&item, &candidates);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_candidates_return_none() {
        assert_eq!(find_best_purchase_order_match(&manual("A", "B"), &[]), None);
    }

    #[test]
    fn empty_fields_never_match_as_equal() {
        // 双方编码/描述都为空时不能触发相等规则
        let result = find_best_purchase_order_match(&manual("", ""), &[po(1, "", "")]).unwrap();
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn service_applies_threshold() {
        let service = MatcherService::new(MANUAL_ITEM_MATCH_THRESHOLD);

        let (outcome, linked) =
            service.match_manual_item(&manual("ABC-1", ""), &[po(1, "ABC-1", "")]);
        assert!(linked);
        assert_eq!(outcome.unwrap().score, 1.0);

        let (outcome, linked) = service.match_manual_item(
            &manual("", "bomba centrifuga"),
            &[po(2, "", "valvula esfera inox tripartida")],
        );
        assert!(!linked);
        assert!(outcome.unwrap().score < MANUAL_ITEM_MATCH_THRESHOLD);
    }

    #[test]
    fn batch_match_counts_linked_and_unlinked() {
        let service = MatcherService::new(MANUAL_ITEM_MATCH_THRESHOLD);
        let po_items = vec![po(1, "ABC-1", "Parafuso M6"), po(2, "DEF-2", "Porca M8")];
        let items = vec![
            manual("ABC-1", "qualquer"),
            manual("", "algo sem relacao nenhuma"),
        ];

        let (results, stats) = service.batch_match(&items, &po_items);
        assert_eq!(results.len(), 2);
        assert_eq!(stats.total_items, 2);
        assert_eq!(stats.linked_items, 1);
        assert_eq!(stats.unlinked_items, 1);
        assert!(results[0].linked);
        assert_eq!(results[0].matched.as_ref().unwrap().id, json!(1));
        assert!(!results[1].linked);
    }
}
