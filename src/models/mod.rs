pub mod allocation;
pub mod coerce;
pub mod dimension;
pub mod line_item;

pub use allocation::{AllocationRow, DimensionRule, FillError, ReceiptMode};
pub use dimension::{DimensionKind, DimensionNode, ExpandSets, TreeChild, TreeGroup};
pub use line_item::{ManualLineItem, MatchOutcome, PurchaseOrderItem};
