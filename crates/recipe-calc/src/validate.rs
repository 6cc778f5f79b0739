//! 圖結構驗證
//!
//! 與兩個引擎相同的走訪規則，但只驗證結構（循環、深度、懸空
//! 引用），不做任何成本或數量計算。目錄編輯處理器在寫入前用它
//! 攔下無效的圖，讓銷售熱路徑上的循環/深度錯誤只可能來自資料
//! 完整性問題。

use recipe_core::{CatalogStore, EngineConfig, ItemRef, RecipeError, Result};

use crate::loader;

/// 圖結構驗證器
pub struct GraphValidator<'a, S: CatalogStore> {
    store: &'a S,
    config: EngineConfig,
}

impl<'a, S: CatalogStore> GraphValidator<'a, S> {
    /// 創建新的驗證器（預設配置）
    pub fn new(store: &'a S) -> Self {
        Self::with_config(store, EngineConfig::new())
    }

    /// 創建新的驗證器
    pub fn with_config(store: &'a S, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// 驗證半成品子圖
    pub fn check_preparation(&self, prep_id: &str) -> Result<()> {
        let mut path: Vec<String> = Vec::new();
        self.walk_preparation(prep_id, &mut path)
    }

    /// 驗證產品的直接項目與其下的半成品子圖
    pub fn check_product(&self, product_id: &str) -> Result<()> {
        let product = self
            .store
            .product(product_id)?
            .ok_or_else(|| RecipeError::ProductNotFound(product_id.to_string()))?;

        let loaded = loader::load_items(self.store, &product.items)?;
        for item in &product.items {
            if let ItemRef::Preparation(child_id) = &item.component {
                loaded.preparation(child_id)?;
                self.check_preparation(child_id)?;
            }
        }
        Ok(())
    }

    fn walk_preparation(&self, prep_id: &str, path: &mut Vec<String>) -> Result<()> {
        if path.iter().any(|id| id == prep_id) {
            let chain = format!("{} → {}", path.join(" → "), prep_id);
            return Err(RecipeError::CycleDetected(chain));
        }
        if path.len() as u32 >= self.config.max_depth {
            return Err(RecipeError::DepthExceeded {
                node_id: prep_id.to_string(),
                max_depth: self.config.max_depth,
            });
        }

        let preparation = self
            .store
            .preparation(prep_id)?
            .ok_or_else(|| RecipeError::PreparationNotFound(prep_id.to_string()))?;

        // 懸空引用在這裡被攔下
        let _loaded = loader::load_items(self.store, &preparation.items)?;

        path.push(prep_id.to_string());
        let mut result = Ok(());
        for item in &preparation.items {
            if let ItemRef::Preparation(child_id) = &item.component {
                result = self.walk_preparation(child_id, path);
                if result.is_err() {
                    break;
                }
            }
        }
        path.pop();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipe_core::{InMemoryCatalog, Ingredient, Preparation, Product, RecipeItem};
    use rust_decimal::Decimal;

    fn catalog() -> InMemoryCatalog {
        let catalog = InMemoryCatalog::new();
        catalog
            .upsert_ingredient(
                Ingredient::new("ING-FLOUR", "麵粉", "kg").with_cost(Decimal::from(2), "TWD"),
            )
            .unwrap();
        catalog
            .upsert_preparation(
                Preparation::new("PREP-DOUGH", "麵糰", Decimal::from(10), "kg")
                    .add_item(RecipeItem::ingredient("ING-FLOUR", Decimal::from(6))),
            )
            .unwrap();
        catalog
    }

    #[test]
    fn test_valid_graph() {
        let catalog = catalog();
        catalog
            .upsert_product(
                Product::new("PROD-PIZZA", "披薩")
                    .add_item(RecipeItem::preparation("PREP-DOUGH", Decimal::new(3, 1))),
            )
            .unwrap();

        let validator = GraphValidator::new(&catalog);
        assert!(validator.check_preparation("PREP-DOUGH").is_ok());
        assert!(validator.check_product("PROD-PIZZA").is_ok());
    }

    #[test]
    fn test_self_reference_rejected() {
        let catalog = catalog();
        catalog
            .upsert_preparation(
                Preparation::new("PREP-SELF", "自我引用", Decimal::from(1), "kg")
                    .add_item(RecipeItem::preparation("PREP-SELF", Decimal::from(1))),
            )
            .unwrap();

        let validator = GraphValidator::new(&catalog);
        assert!(matches!(
            validator.check_preparation("PREP-SELF").unwrap_err(),
            RecipeError::CycleDetected(_)
        ));
    }

    #[test]
    fn test_dangling_reference_rejected() {
        let catalog = catalog();
        catalog
            .upsert_preparation(
                Preparation::new("PREP-BROKEN", "壞配方", Decimal::from(1), "kg")
                    .add_item(RecipeItem::ingredient("ING-NONE", Decimal::from(1))),
            )
            .unwrap();

        let validator = GraphValidator::new(&catalog);
        assert!(matches!(
            validator.check_preparation("PREP-BROKEN").unwrap_err(),
            RecipeError::IngredientNotFound(_)
        ));
    }

    #[test]
    fn test_depth_cap_applied() {
        let catalog = catalog();
        catalog
            .upsert_preparation(
                Preparation::new("PREP-L1", "L1", Decimal::from(1), "kg")
                    .add_item(RecipeItem::preparation("PREP-L2", Decimal::from(1))),
            )
            .unwrap();
        catalog
            .upsert_preparation(
                Preparation::new("PREP-L2", "L2", Decimal::from(1), "kg")
                    .add_item(RecipeItem::preparation("PREP-DOUGH", Decimal::from(1))),
            )
            .unwrap();

        let validator =
            GraphValidator::with_config(&catalog, EngineConfig::new().with_max_depth(2));
        assert!(matches!(
            validator.check_preparation("PREP-L1").unwrap_err(),
            RecipeError::DepthExceeded { max_depth: 2, .. }
        ));
    }
}
