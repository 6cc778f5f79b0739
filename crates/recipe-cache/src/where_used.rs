//! 反向引用索引（where-used）
//!
//! 由目錄建立「被誰引用」的反向鄰接表，供快取失效向上游走。

use std::collections::{HashMap, HashSet, VecDeque};

use recipe_core::{CatalogStore, ItemRef, Result};

/// 反向引用索引
pub struct WhereUsedIndex {
    /// 食材ID → 直接引用它的半成品ID
    ingredient_parents: HashMap<String, Vec<String>>,

    /// 半成品ID → 直接引用它的半成品ID
    preparation_parents: HashMap<String, Vec<String>>,
}

impl WhereUsedIndex {
    /// 掃描目錄中全部半成品建立索引
    pub fn build<S: CatalogStore>(store: &S) -> Result<Self> {
        let mut ingredient_parents: HashMap<String, Vec<String>> = HashMap::new();
        let mut preparation_parents: HashMap<String, Vec<String>> = HashMap::new();

        for preparation in store.all_preparations()? {
            for item in &preparation.items {
                match &item.component {
                    ItemRef::Ingredient(id) => ingredient_parents
                        .entry(id.clone())
                        .or_default()
                        .push(preparation.id.clone()),
                    ItemRef::Preparation(id) => preparation_parents
                        .entry(id.clone())
                        .or_default()
                        .push(preparation.id.clone()),
                }
            }
        }

        Ok(Self {
            ingredient_parents,
            preparation_parents,
        })
    }

    /// 直接引用某食材的半成品
    pub fn preparations_using_ingredient(&self, ingredient_id: &str) -> &[String] {
        self.ingredient_parents
            .get(ingredient_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// 直接引用某半成品的半成品
    pub fn parents_of_preparation(&self, prep_id: &str) -> &[String] {
        self.preparation_parents
            .get(prep_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// 某半成品的全部上游祖先（不含自身），BFS 向上、結果排序
    pub fn ancestors_of_preparation(&self, prep_id: &str) -> Vec<String> {
        let mut visited: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        queue.push_back(prep_id);

        while let Some(current) = queue.pop_front() {
            for parent in self.parents_of_preparation(current) {
                if visited.insert(parent.clone()) {
                    queue.push_back(parent);
                }
            }
        }

        let mut ancestors: Vec<String> = visited.into_iter().collect();
        ancestors.sort();
        ancestors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipe_core::{InMemoryCatalog, Ingredient, Preparation, RecipeItem};
    use rust_decimal::Decimal;

    /// DOUGH(麵粉) ← B ← D，DOUGH ← C ← D（菱形）
    fn diamond_catalog() -> InMemoryCatalog {
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
            .upsert_preparation(
                Preparation::new("PREP-B", "B", Decimal::from(1), "kg")
                    .add_item(RecipeItem::preparation("PREP-DOUGH", Decimal::from(1))),
            )
            .unwrap();
        catalog
            .upsert_preparation(
                Preparation::new("PREP-C", "C", Decimal::from(1), "kg")
                    .add_item(RecipeItem::preparation("PREP-DOUGH", Decimal::from(1))),
            )
            .unwrap();
        catalog
            .upsert_preparation(
                Preparation::new("PREP-D", "D", Decimal::from(1), "kg")
                    .add_item(RecipeItem::preparation("PREP-B", Decimal::from(1)))
                    .add_item(RecipeItem::preparation("PREP-C", Decimal::from(1))),
            )
            .unwrap();
        catalog
    }

    #[test]
    fn test_direct_parents() {
        let catalog = diamond_catalog();
        let index = WhereUsedIndex::build(&catalog).unwrap();

        assert_eq!(
            index.preparations_using_ingredient("ING-FLOUR"),
            &["PREP-DOUGH".to_string()]
        );

        let mut parents = index.parents_of_preparation("PREP-DOUGH").to_vec();
        parents.sort();
        assert_eq!(parents, vec!["PREP-B".to_string(), "PREP-C".to_string()]);
    }

    #[test]
    fn test_transitive_ancestors() {
        let catalog = diamond_catalog();
        let index = WhereUsedIndex::build(&catalog).unwrap();

        let ancestors = index.ancestors_of_preparation("PREP-DOUGH");
        assert_eq!(
            ancestors,
            vec![
                "PREP-B".to_string(),
                "PREP-C".to_string(),
                "PREP-D".to_string()
            ]
        );

        // 根節點沒有祖先
        assert!(index.ancestors_of_preparation("PREP-D").is_empty());
    }

    #[test]
    fn test_unknown_node_has_no_parents() {
        let catalog = diamond_catalog();
        let index = WhereUsedIndex::build(&catalog).unwrap();
        assert!(index.preparations_using_ingredient("ING-NONE").is_empty());
        assert!(index.ancestors_of_preparation("PREP-NONE").is_empty());
    }
}
