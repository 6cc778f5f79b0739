//! # Recipe Calculation Engine
//!
//! 成本彙算（由葉到根）與用量展開（由根到葉）引擎

pub mod consolidation;
pub mod costing;
pub mod expansion;
pub mod loader;
pub mod validate;

// Re-export 主要類型
pub use costing::CostCalculator;
pub use expansion::{ExpansionCalculator, SaleLine};
pub use validate::GraphValidator;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 展開結果：彙總後的葉節點用量
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Consumption {
    /// 彙總明細，依 (食材ID, 單位) 排序，每組恰好一筆
    pub lines: Vec<ConsumptionLine>,

    /// 展開過程的稽核軌跡（依走訪順序）
    pub breakdown: Vec<BreakdownEntry>,
}

impl Consumption {
    /// 是否沒有任何葉節點用量
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// 查找指定 (食材ID, 單位) 的明細
    pub fn line(&self, ingredient_id: &str, unit: &str) -> Option<&ConsumptionLine> {
        self.lines
            .iter()
            .find(|l| l.ingredient_id == ingredient_id && l.unit == unit)
    }
}

/// 單一食材的彙總用量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionLine {
    /// 食材ID
    pub ingredient_id: String,

    /// 單位（食材的 base_unit）
    pub unit: String,

    /// 彙總用量（同一 key 的所有路徑相加）
    pub qty: Decimal,
}

/// 稽核軌跡的節點類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreakdownKind {
    /// 產品（根）
    Product,
    /// 半成品
    Preparation,
    /// 食材（葉）
    Ingredient,
}

/// 稽核軌跡的一筆紀錄
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakdownEntry {
    /// 由根到此節點的半成品路徑
    pub path: Vec<String>,

    /// 節點ID
    pub node_id: String,

    /// 節點類型
    pub kind: BreakdownKind,

    /// 該節點被要求的數量
    pub qty: Decimal,

    /// 數量單位
    pub unit: String,
}
