//! 圖節點批次載入
//!
//! 將項目清單依引用類型分組後批次載入；懸空引用一律回報
//! NotFound，不可當作零成本或零用量處理。

use std::collections::{HashMap, HashSet};

use recipe_core::{CatalogStore, Ingredient, ItemRef, Preparation, RecipeError, RecipeItem, Result};

/// 一個項目清單所引用到的節點
#[derive(Debug)]
pub struct LoadedItems {
    /// 引用到的食材
    pub ingredients: HashMap<String, Ingredient>,

    /// 引用到的半成品
    pub preparations: HashMap<String, Preparation>,
}

impl LoadedItems {
    /// 取得食材，缺漏視為懸空引用
    pub fn ingredient(&self, id: &str) -> Result<&Ingredient> {
        self.ingredients
            .get(id)
            .ok_or_else(|| RecipeError::IngredientNotFound(id.to_string()))
    }

    /// 取得半成品，缺漏視為懸空引用
    pub fn preparation(&self, id: &str) -> Result<&Preparation> {
        self.preparations
            .get(id)
            .ok_or_else(|| RecipeError::PreparationNotFound(id.to_string()))
    }
}

/// 批次載入一個項目清單引用到的所有節點
pub fn load_items<S: CatalogStore>(store: &S, items: &[RecipeItem]) -> Result<LoadedItems> {
    let mut ingredient_ids: Vec<String> = Vec::new();
    let mut preparation_ids: Vec<String> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for item in items {
        let node_id = item.component.node_id();
        if !seen.insert(node_id) {
            continue;
        }
        match &item.component {
            ItemRef::Ingredient(id) => ingredient_ids.push(id.clone()),
            ItemRef::Preparation(id) => preparation_ids.push(id.clone()),
        }
    }

    let ingredients = store.ingredients_by_ids(&ingredient_ids)?;
    for id in &ingredient_ids {
        if !ingredients.contains_key(id) {
            return Err(RecipeError::IngredientNotFound(id.clone()));
        }
    }

    let preparations = store.preparations_by_ids(&preparation_ids)?;
    for id in &preparation_ids {
        if !preparations.contains_key(id) {
            return Err(RecipeError::PreparationNotFound(id.clone()));
        }
    }

    Ok(LoadedItems {
        ingredients,
        preparations,
    })
}
