use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

use crate::models::{DimensionKind, DimensionNode, ExpandSets, TreeChild, TreeGroup};

/// 成本中心树: 3层 (根 -> 子 -> 孙), 子节点无孙节点即为叶子可选
pub fn build_cost_center_tree(list: &[Value]) -> Vec<TreeGroup> {
    build_tree(DimensionKind::CostCenter, list)
}

/// 会计科目树: 孙层先按 isPayable 过滤;
/// 子节点可选需自身可付且无可付孙节点;
/// 既不可选又无孙节点的子节点剔除, 剔空的根分组整组丢弃
pub fn build_chart_account_tree(list: &[Value]) -> Vec<TreeGroup> {
    build_tree(DimensionKind::ChartAccount, list)
}

fn build_tree(kind: DimensionKind, list: &[Value]) -> Vec<TreeGroup> {
    // 1. 边界归一化, 划分根/非根
    let nodes: Vec<DimensionNode> = list
        .iter()
        .map(|record| DimensionNode::from_record(kind, record))
        .collect();
    let (roots, rest): (Vec<_>, Vec<_>) = nodes.into_iter().partition(|n| n.is_root);

    // 2. 单趟建立 父ID -> 直接子节点 (保序)
    let mut children_by_parent: IndexMap<Option<i64>, Vec<DimensionNode>> = IndexMap::new();
    for node in rest {
        children_by_parent.entry(node.parent_id).or_default().push(node);
    }

    // 3. 逐根收集两层, 每层按名称升序
    let mut groups = Vec::with_capacity(roots.len());
    for root in roots {
        let mut children = Vec::new();
        for child in sorted_bucket(&children_by_parent, root.id) {
            let mut grandchildren = sorted_bucket(&children_by_parent, child.id);
            let selectable = match kind {
                DimensionKind::CostCenter => grandchildren.is_empty(),
                DimensionKind::ChartAccount => {
                    grandchildren.retain(|g| g.payable);
                    child.payable && grandchildren.is_empty()
                }
            };

            if kind == DimensionKind::ChartAccount && !selectable && grandchildren.is_empty() {
                continue;
            }
            children.push(TreeChild {
                node: child,
                grandchildren,
                selectable,
            });
        }

        if kind == DimensionKind::ChartAccount && children.is_empty() {
            continue;
        }
        groups.push(TreeGroup {
            parent: root,
            children,
        });
    }

    // 4. 根分组自身也按名称升序
    groups.sort_by(|a, b| a.parent.sort_key().cmp(&b.parent.sort_key()));
    groups
}

fn sorted_bucket(
    children_by_parent: &IndexMap<Option<i64>, Vec<DimensionNode>>,
    key: Option<i64>,
) -> Vec<DimensionNode> {
    let mut bucket = children_by_parent.get(&key).cloned().unwrap_or_default();
    bucket.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    bucket
}

/// 首次渲染全量展开: lv1=根节点ID, lv2=子节点ID.
/// 遗留行为: 缺失/不可解析/为0的ID被过滤
pub fn compute_initial_expand(tree: &[TreeGroup]) -> ExpandSets {
    let mut expand = ExpandSets::default();
    for group in tree {
        if let Some(id) = group.parent.id.filter(|&id| id != 0) {
            expand.lv1.push(id);
        }
        for child in &group.children {
            if let Some(id) = child.node.id.filter(|&id| id != 0) {
                expand.lv2.push(id);
            }
        }
    }
    expand
}

/// 合法分摊目标ID集合: 可选子节点 + 全部孙节点 (保序去重)
pub fn valid_allocation_ids(tree: &[TreeGroup]) -> Vec<i64> {
    let mut ids: IndexSet<i64> = IndexSet::new();
    for group in tree {
        for child in &group.children {
            if child.selectable {
                if let Some(id) = child.node.id.filter(|&id| id != 0) {
                    ids.insert(id);
                }
            }
            for grandchild in &child.grandchildren {
                if let Some(id) = grandchild.id.filter(|&id| id != 0) {
                    ids.insert(id);
                }
            }
        }
    }
    ids.into_iter().collect()
}
