//! 配方項目模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 項目引用（食材或半成品，恰為其中一種）
///
/// 單位契約：
/// - `Ingredient`：qty 以該食材的 base_unit 表示
/// - `Preparation`：qty 以子半成品的 yield_unit 表示
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "ref", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemRef {
    /// 引用食材
    Ingredient(String),
    /// 引用另一個半成品
    Preparation(String),
}

impl ItemRef {
    /// 被引用節點的 ID
    pub fn node_id(&self) -> &str {
        match self {
            Self::Ingredient(id) | Self::Preparation(id) => id,
        }
    }

    /// 是否引用半成品
    pub fn is_preparation(&self) -> bool {
        matches!(self, Self::Preparation(_))
    }
}

/// 配方項目（半成品與產品共用同一形狀）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeItem {
    /// 項目ID
    pub id: Uuid,

    /// 引用的節點
    pub component: ItemRef,

    /// 每批（半成品）或每一銷售單位（產品）的用量
    pub qty: Decimal,

    /// 排序序號
    pub sequence: u32,
}

impl RecipeItem {
    /// 創建食材項目
    pub fn ingredient(ingredient_id: impl Into<String>, qty: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            component: ItemRef::Ingredient(ingredient_id.into()),
            qty,
            sequence: 0,
        }
    }

    /// 創建半成品項目
    pub fn preparation(preparation_id: impl Into<String>, qty: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            component: ItemRef::Preparation(preparation_id.into()),
            qty,
            sequence: 0,
        }
    }

    /// 建構器模式：設置排序序號
    pub fn with_sequence(mut self, sequence: u32) -> Self {
        self.sequence = sequence;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_ref_node_id() {
        let item = RecipeItem::ingredient("ING-FLOUR", Decimal::from(6));
        assert_eq!(item.component.node_id(), "ING-FLOUR");
        assert!(!item.component.is_preparation());

        let item = RecipeItem::preparation("PREP-DOUGH", Decimal::from(1));
        assert_eq!(item.component.node_id(), "PREP-DOUGH");
        assert!(item.component.is_preparation());
    }

    #[test]
    fn test_item_ref_serde_tagging() {
        let item = RecipeItem::ingredient("ING-FLOUR", Decimal::from(6));
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"type\":\"INGREDIENT\""));
        assert!(json.contains("\"ref\":\"ING-FLOUR\""));

        let back: RecipeItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back.component, item.component);
    }
}
