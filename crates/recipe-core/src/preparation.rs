//! 半成品模型（中間批次節點）

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::item::RecipeItem;

/// 上一次成本彙算的快取（反正規化，可能過期）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostSnapshot {
    /// 食材成本合計（未含損耗與額外成本）
    pub ingredients_cost: Decimal,

    /// 每批總成本 = ingredients_cost × (1 + waste_pct) + extra_cost
    pub total_cost: Decimal,

    /// 每 1 個 yield_unit 的成本 = total_cost / yield_qty
    pub unit_cost: Decimal,

    /// 幣別
    pub currency: String,

    /// 彙算時間
    pub computed_at: DateTime<Utc>,
}

/// 半成品（複合節點）
///
/// 一批半成品產出 `yield_qty` 個 `yield_unit`；項目用量皆以「每批」計。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preparation {
    /// 半成品ID
    pub id: String,

    /// 名稱
    pub name: String,

    /// 每批產出數量（> 0）
    pub yield_qty: Decimal,

    /// 產出單位（父節點引用此半成品時的數量單位）
    pub yield_unit: String,

    /// 損耗率（0..=1，僅作用於食材成本）
    pub waste_pct: Decimal,

    /// 每批固定額外成本（如人工，>= 0）
    pub extra_cost: Decimal,

    /// 幣別
    pub currency: String,

    /// 配方項目（有序）
    pub items: Vec<RecipeItem>,

    /// 成本快取（彙算時回寫；目錄異動後即過期）
    pub cost_cache: Option<CostSnapshot>,
}

impl Preparation {
    /// 創建新的半成品
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        yield_qty: Decimal,
        yield_unit: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            yield_qty,
            yield_unit: yield_unit.into(),
            waste_pct: Decimal::ZERO,
            extra_cost: Decimal::ZERO,
            currency: "TWD".to_string(),
            items: Vec::new(),
            cost_cache: None,
        }
    }

    /// 建構器模式：設置損耗率
    pub fn with_waste_pct(mut self, waste_pct: Decimal) -> Self {
        self.waste_pct = waste_pct;
        self
    }

    /// 建構器模式：設置每批額外成本
    pub fn with_extra_cost(mut self, extra_cost: Decimal) -> Self {
        self.extra_cost = extra_cost;
        self
    }

    /// 建構器模式：設置幣別
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// 加入配方項目；qty <= 0 的項目直接丟棄（不儲存）
    pub fn add_item(mut self, item: RecipeItem) -> Self {
        if item.qty <= Decimal::ZERO {
            tracing::debug!(
                "丟棄零用量項目: {} → {}",
                self.id,
                item.component.node_id()
            );
            return self;
        }
        let sequence = (self.items.len() as u32 + 1) * 10;
        self.items.push(item.with_sequence(sequence));
        self
    }

    /// 快取可用時返回其 unit_cost（必須存在且為正值）
    pub fn cached_unit_cost(&self) -> Option<Decimal> {
        self.cost_cache
            .as_ref()
            .filter(|c| c.unit_cost > Decimal::ZERO)
            .map(|c| c.unit_cost)
    }

    /// 寫入時驗證
    pub fn validate(&self) -> crate::Result<()> {
        if self.id.is_empty() {
            return Err(crate::RecipeError::InvalidNode(
                "半成品ID不可為空".to_string(),
            ));
        }
        if self.yield_qty <= Decimal::ZERO {
            return Err(crate::RecipeError::InvalidNode(format!(
                "半成品 {} 每批產出必須 > 0: {}",
                self.id, self.yield_qty
            )));
        }
        if self.waste_pct < Decimal::ZERO || self.waste_pct > Decimal::ONE {
            return Err(crate::RecipeError::InvalidNode(format!(
                "半成品 {} 損耗率必須在 0..=1: {}",
                self.id, self.waste_pct
            )));
        }
        if self.extra_cost < Decimal::ZERO {
            return Err(crate::RecipeError::InvalidNode(format!(
                "半成品 {} 額外成本不可為負: {}",
                self.id, self.extra_cost
            )));
        }
        for item in &self.items {
            if item.qty <= Decimal::ZERO {
                return Err(crate::RecipeError::InvalidNode(format!(
                    "半成品 {} 含零用量項目: {}",
                    self.id,
                    item.component.node_id()
                )));
            }
        }
        Ok(())
    }
}
