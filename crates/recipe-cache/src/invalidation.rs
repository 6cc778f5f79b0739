//! 成本快取失效
//!
//! 目錄異動後把受影響半成品的快取清掉，讓下一次彙算惰性修復。
//! 不清的話，祖先的彙算會繼續信任過期的子快取。

use std::collections::BTreeSet;

use recipe_core::{CatalogStore, Result};

use crate::where_used::WhereUsedIndex;

/// 快取失效器
pub struct CacheInvalidator;

impl CacheInvalidator {
    /// 食材成本異動：清除所有（直接或間接）用到它的半成品快取
    ///
    /// 返回被清除的半成品ID（排序後）。
    pub fn on_ingredient_change<S: CatalogStore>(
        store: &S,
        ingredient_id: &str,
    ) -> Result<Vec<String>> {
        let index = WhereUsedIndex::build(store)?;

        let mut stale: BTreeSet<String> = BTreeSet::new();
        for parent in index.preparations_using_ingredient(ingredient_id) {
            stale.insert(parent.clone());
            stale.extend(index.ancestors_of_preparation(parent));
        }

        Self::clear_all(store, &stale)?;
        tracing::info!(
            "食材 {} 異動，清除 {} 個半成品快取",
            ingredient_id,
            stale.len()
        );
        Ok(stale.into_iter().collect())
    }

    /// 半成品異動（項目、產出、損耗、額外成本）：清除自身與全部祖先的快取
    ///
    /// 返回被清除的半成品ID（排序後）。
    pub fn on_preparation_change<S: CatalogStore>(store: &S, prep_id: &str) -> Result<Vec<String>> {
        let index = WhereUsedIndex::build(store)?;

        let mut stale: BTreeSet<String> = BTreeSet::new();
        stale.insert(prep_id.to_string());
        stale.extend(index.ancestors_of_preparation(prep_id));

        Self::clear_all(store, &stale)?;
        tracing::info!(
            "半成品 {} 異動，清除 {} 個半成品快取",
            prep_id,
            stale.len()
        );
        Ok(stale.into_iter().collect())
    }

    fn clear_all<S: CatalogStore>(store: &S, prep_ids: &BTreeSet<String>) -> Result<()> {
        for prep_id in prep_ids {
            store.clear_cost_snapshot(prep_id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use recipe_core::{CostSnapshot, InMemoryCatalog, Ingredient, Preparation, RecipeItem};
    use rust_decimal::Decimal;

    fn snapshot() -> CostSnapshot {
        CostSnapshot {
            ingredients_cost: Decimal::ONE,
            total_cost: Decimal::ONE,
            unit_cost: Decimal::ONE,
            currency: "TWD".to_string(),
            computed_at: Utc::now(),
        }
    }

    /// FLOUR ← DOUGH ← FILLING，加一個不相關的 SYRUP
    fn chain_catalog() -> InMemoryCatalog {
        let catalog = InMemoryCatalog::new();
        catalog
            .upsert_ingredient(
                Ingredient::new("ING-FLOUR", "麵粉", "kg").with_cost(Decimal::from(2), "TWD"),
            )
            .unwrap();
        catalog
            .upsert_ingredient(
                Ingredient::new("ING-SUGAR", "糖", "kg").with_cost(Decimal::from(1), "TWD"),
            )
            .unwrap();
        catalog
            .upsert_preparation(
                Preparation::new("PREP-DOUGH", "麵糰", Decimal::from(10), "kg")
                    .add_item(RecipeItem::ingredient("ING-FLOUR", Decimal::from(6))),
            )
            .unwrap();
        catalog
            .upsert_preparation(
                Preparation::new("PREP-FILLING", "內餡", Decimal::from(5), "kg")
                    .add_item(RecipeItem::preparation("PREP-DOUGH", Decimal::from(2))),
            )
            .unwrap();
        catalog
            .upsert_preparation(
                Preparation::new("PREP-SYRUP", "糖漿", Decimal::from(1), "L")
                    .add_item(RecipeItem::ingredient("ING-SUGAR", Decimal::from(1))),
            )
            .unwrap();
        for id in ["PREP-DOUGH", "PREP-FILLING", "PREP-SYRUP"] {
            catalog.save_cost_snapshot(id, &snapshot()).unwrap();
        }
        catalog
    }

    #[test]
    fn test_ingredient_change_clears_ancestors() {
        let catalog = chain_catalog();

        let cleared = CacheInvalidator::on_ingredient_change(&catalog, "ING-FLOUR").unwrap();
        assert_eq!(
            cleared,
            vec!["PREP-DOUGH".to_string(), "PREP-FILLING".to_string()]
        );

        // 受影響的快取被清除，無關的保留
        assert!(catalog
            .preparation("PREP-DOUGH")
            .unwrap()
            .unwrap()
            .cost_cache
            .is_none());
        assert!(catalog
            .preparation("PREP-FILLING")
            .unwrap()
            .unwrap()
            .cost_cache
            .is_none());
        assert!(catalog
            .preparation("PREP-SYRUP")
            .unwrap()
            .unwrap()
            .cost_cache
            .is_some());
    }

    #[test]
    fn test_preparation_change_clears_self_and_ancestors() {
        let catalog = chain_catalog();

        let cleared = CacheInvalidator::on_preparation_change(&catalog, "PREP-DOUGH").unwrap();
        assert_eq!(
            cleared,
            vec!["PREP-DOUGH".to_string(), "PREP-FILLING".to_string()]
        );
    }

    #[test]
    fn test_unused_ingredient_clears_nothing() {
        let catalog = chain_catalog();
        catalog
            .upsert_ingredient(
                Ingredient::new("ING-UNUSED", "未使用", "kg").with_cost(Decimal::ONE, "TWD"),
            )
            .unwrap();

        let cleared = CacheInvalidator::on_ingredient_change(&catalog, "ING-UNUSED").unwrap();
        assert!(cleared.is_empty());
    }
}
