//! 產品模型（可銷售的根節點）

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::item::RecipeItem;

/// 產品（根節點，不會被其他節點巢狀引用）
///
/// 項目用量以「每 1 個銷售單位」計，沒有批次產出的概念。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// 產品ID
    pub id: String,

    /// 名稱
    pub name: String,

    /// 配方項目（有序，形狀與半成品相同）
    pub items: Vec<RecipeItem>,
}

impl Product {
    /// 創建新的產品
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            items: Vec::new(),
        }
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

    /// 寫入時驗證
    pub fn validate(&self) -> crate::Result<()> {
        if self.id.is_empty() {
            return Err(crate::RecipeError::InvalidNode(
                "產品ID不可為空".to_string(),
            ));
        }
        for item in &self.items {
            if item.qty <= Decimal::ZERO {
                return Err(crate::RecipeError::InvalidNode(format!(
                    "產品 {} 含零用量項目: {}",
                    self.id,
                    item.component.node_id()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_product() {
        let pizza = Product::new("PROD-PIZZA", "瑪格麗特披薩")
            .add_item(RecipeItem::preparation("PREP-DOUGH", Decimal::new(3, 1)))
            .add_item(RecipeItem::ingredient("ING-CHEESE", Decimal::new(12, 2)));

        assert_eq!(pizza.items.len(), 2);
        assert_eq!(pizza.items[0].sequence, 10);
        assert_eq!(pizza.items[1].sequence, 20);
        assert!(pizza.validate().is_ok());
    }

    #[test]
    fn test_zero_qty_item_dropped() {
        let product = Product::new("PROD-X", "X")
            .add_item(RecipeItem::ingredient("ING-A", Decimal::ZERO));
        assert!(product.items.is_empty());
    }
}
