use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use super::coerce::{id_of, text_of};

/// 维度种类: 成本中心 / 会计科目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionKind {
    CostCenter,
    ChartAccount,
}

/// 规范化后的维度节点: 异构外部记录在边界处收敛成统一形状,
/// 原始记录保留用于回显
#[derive(Debug, Clone)]
pub struct DimensionNode {
    pub id: Option<i64>,
    pub parent_id: Option<i64>,
    pub is_root: bool, // 原始 parentId 为 null/缺失
    pub name: String,
    pub payable: bool, // 仅会计科目: isPayable === true
    pub record: Value,
}

impl DimensionNode {
    /// 原始记录 -> 规范节点
    pub fn from_record(kind: DimensionKind, record: &Value) -> Self {
        let primary = match kind {
            DimensionKind::CostCenter => pick(record, &["idCostCenter", "id"]),
            DimensionKind::ChartAccount => pick(record, &["idChartOfAccounts", "id"]),
        };
        let name = match kind {
            DimensionKind::CostCenter => pick(record, &["name"]),
            DimensionKind::ChartAccount => pick(record, &["accountName", "name"]),
        };
        let parent_raw = &record["parentId"];

        Self {
            id: id_of(primary),
            parent_id: id_of(parent_raw),
            is_root: parent_raw.is_null(),
            name: text_of(name),
            payable: record["isPayable"] == Value::Bool(true),
            record: record.clone(),
        }
    }

    /// 排序键: 大小写无关, 原文兜底保证确定性
    pub fn sort_key(&self) -> (String, String) {
        (self.name.to_lowercase(), self.name.clone())
    }
}

// 节点对外序列化时只回显原始记录
impl Serialize for DimensionNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.record.serialize(serializer)
    }
}

static NULL: Value = Value::Null;

/// 取第一个非null字段 (?? 链的边界化)
fn pick<'a>(record: &'a Value, fields: &[&str]) -> &'a Value {
    for field in fields {
        let value = &record[*field];
        if !value.is_null() {
            return value;
        }
    }
    &NULL
}

/// 树的子节点 (第二层)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeChild {
    pub node: DimensionNode,
    pub grandchildren: Vec<DimensionNode>,
    pub selectable: bool,
}

/// 根分组 (第一层)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeGroup {
    pub parent: DimensionNode,
    pub children: Vec<TreeChild>,
}

/// 首次渲染的展开集合
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandSets {
    pub lv1: Vec<i64>,
    pub lv2: Vec<i64>,
}
