//! 食材模型（葉節點）

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 食材成本（每 1 個 base_unit 的單價）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientCost {
    /// 最近一次進貨單價
    pub last_cost: Decimal,

    /// 幣別
    pub currency: String,
}

impl IngredientCost {
    /// 創建新的食材成本
    pub fn new(last_cost: Decimal, currency: impl Into<String>) -> Self {
        Self {
            last_cost,
            currency: currency.into(),
        }
    }
}

/// 食材（葉節點，不再向下分解，也不引用其他節點）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    /// 食材ID
    pub id: String,

    /// 名稱
    pub name: String,

    /// 本身數量所使用的單位（引用此食材的 qty 一律以此單位表示）
    pub base_unit: String,

    /// 成本資訊
    pub cost: IngredientCost,
}

impl Ingredient {
    /// 創建新的食材（成本預設為 0）
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        base_unit: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            base_unit: base_unit.into(),
            cost: IngredientCost::new(Decimal::ZERO, "TWD"),
        }
    }

    /// 建構器模式：設置成本
    pub fn with_cost(mut self, last_cost: Decimal, currency: impl Into<String>) -> Self {
        self.cost = IngredientCost::new(last_cost, currency);
        self
    }

    /// 寫入時驗證
    pub fn validate(&self) -> crate::Result<()> {
        if self.id.is_empty() {
            return Err(crate::RecipeError::InvalidNode("食材ID不可為空".to_string()));
        }
        if self.base_unit.is_empty() {
            return Err(crate::RecipeError::InvalidNode(format!(
                "食材 {} 缺少基礎單位",
                self.id
            )));
        }
        if self.cost.last_cost < Decimal::ZERO {
            return Err(crate::RecipeError::InvalidNode(format!(
                "食材 {} 成本不可為負: {}",
                self.id, self.cost.last_cost
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_ingredient() {
        let flour = Ingredient::new("ING-FLOUR", "麵粉", "kg")
            .with_cost(Decimal::from(2), "TWD");

        assert_eq!(flour.id, "ING-FLOUR");
        assert_eq!(flour.base_unit, "kg");
        assert_eq!(flour.cost.last_cost, Decimal::from(2));
        assert!(flour.validate().is_ok());
    }

    #[test]
    fn test_negative_cost_rejected() {
        let bad = Ingredient::new("ING-X", "X", "kg").with_cost(Decimal::from(-1), "TWD");
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_missing_base_unit_rejected() {
        let bad = Ingredient::new("ING-X", "X", "");
        assert!(bad.validate().is_err());
    }
}
