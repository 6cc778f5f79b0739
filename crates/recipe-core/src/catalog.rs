//! 目錄存取層（Catalog Store）
//!
//! 引擎對外部文件庫的讀寫接縫：讀取節點、回寫成本快取。
//! 真實儲存層的故障原樣以 `Storage` 傳遞，不做重試或轉譯。

use std::collections::HashMap;
use std::sync::RwLock;

use crate::{CostSnapshot, Ingredient, Preparation, Product, RecipeError, Result};

/// 目錄存取介面
///
/// 批次載入有預設實作（逐筆讀取），真實儲存層可覆寫為單次查詢。
pub trait CatalogStore: Send + Sync {
    /// 讀取食材
    fn ingredient(&self, id: &str) -> Result<Option<Ingredient>>;

    /// 讀取半成品
    fn preparation(&self, id: &str) -> Result<Option<Preparation>>;

    /// 讀取產品
    fn product(&self, id: &str) -> Result<Option<Product>>;

    /// 批次讀取食材（缺漏的 ID 不出現在結果中）
    fn ingredients_by_ids(&self, ids: &[String]) -> Result<HashMap<String, Ingredient>> {
        let mut found = HashMap::new();
        for id in ids {
            if let Some(ingredient) = self.ingredient(id)? {
                found.insert(id.clone(), ingredient);
            }
        }
        Ok(found)
    }

    /// 批次讀取半成品（缺漏的 ID 不出現在結果中）
    fn preparations_by_ids(&self, ids: &[String]) -> Result<HashMap<String, Preparation>> {
        let mut found = HashMap::new();
        for id in ids {
            if let Some(preparation) = self.preparation(id)? {
                found.insert(id.clone(), preparation);
            }
        }
        Ok(found)
    }

    /// 讀取全部半成品（供反向引用索引建立）
    fn all_preparations(&self) -> Result<Vec<Preparation>>;

    /// 回寫半成品的成本快取（write-through 記憶化）
    fn save_cost_snapshot(&self, prep_id: &str, snapshot: &CostSnapshot) -> Result<()>;

    /// 清除半成品的成本快取（目錄異動後失效）
    fn clear_cost_snapshot(&self, prep_id: &str) -> Result<()>;
}

/// 記憶體目錄（參考實作，供測試與範例使用）
#[derive(Default)]
pub struct InMemoryCatalog {
    ingredients: RwLock<HashMap<String, Ingredient>>,
    preparations: RwLock<HashMap<String, Preparation>>,
    products: RwLock<HashMap<String, Product>>,
}

impl InMemoryCatalog {
    /// 創建空目錄
    pub fn new() -> Self {
        Self::default()
    }

    /// 寫入食材（寫入時驗證）
    pub fn upsert_ingredient(&self, ingredient: Ingredient) -> Result<()> {
        ingredient.validate()?;
        self.write_locked(&self.ingredients)?
            .insert(ingredient.id.clone(), ingredient);
        Ok(())
    }

    /// 寫入半成品（寫入時驗證）
    pub fn upsert_preparation(&self, preparation: Preparation) -> Result<()> {
        preparation.validate()?;
        self.write_locked(&self.preparations)?
            .insert(preparation.id.clone(), preparation);
        Ok(())
    }

    /// 寫入產品（寫入時驗證）
    pub fn upsert_product(&self, product: Product) -> Result<()> {
        product.validate()?;
        self.write_locked(&self.products)?
            .insert(product.id.clone(), product);
        Ok(())
    }

    fn read_locked<'a, T>(
        &self,
        lock: &'a RwLock<HashMap<String, T>>,
    ) -> Result<std::sync::RwLockReadGuard<'a, HashMap<String, T>>> {
        lock.read()
            .map_err(|_| RecipeError::Storage("讀寫鎖中毒".to_string()))
    }

    fn write_locked<'a, T>(
        &self,
        lock: &'a RwLock<HashMap<String, T>>,
    ) -> Result<std::sync::RwLockWriteGuard<'a, HashMap<String, T>>> {
        lock.write()
            .map_err(|_| RecipeError::Storage("讀寫鎖中毒".to_string()))
    }
}

impl CatalogStore for InMemoryCatalog {
    fn ingredient(&self, id: &str) -> Result<Option<Ingredient>> {
        Ok(self.read_locked(&self.ingredients)?.get(id).cloned())
    }

    fn preparation(&self, id: &str) -> Result<Option<Preparation>> {
        Ok(self.read_locked(&self.preparations)?.get(id).cloned())
    }

    fn product(&self, id: &str) -> Result<Option<Product>> {
        Ok(self.read_locked(&self.products)?.get(id).cloned())
    }

    fn all_preparations(&self) -> Result<Vec<Preparation>> {
        Ok(self
            .read_locked(&self.preparations)?
            .values()
            .cloned()
            .collect())
    }

    fn save_cost_snapshot(&self, prep_id: &str, snapshot: &CostSnapshot) -> Result<()> {
        let mut preparations = self.write_locked(&self.preparations)?;
        let preparation = preparations
            .get_mut(prep_id)
            .ok_or_else(|| RecipeError::PreparationNotFound(prep_id.to_string()))?;
        preparation.cost_cache = Some(snapshot.clone());
        Ok(())
    }

    fn clear_cost_snapshot(&self, prep_id: &str) -> Result<()> {
        let mut preparations = self.write_locked(&self.preparations)?;
        let preparation = preparations
            .get_mut(prep_id)
            .ok_or_else(|| RecipeError::PreparationNotFound(prep_id.to_string()))?;
        preparation.cost_cache = None;
        Ok(())
    }
}
