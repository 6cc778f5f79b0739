//! # Recipe Engine
//!
//! 複合商品目錄的成本彙算與用量展開引擎。
//!
//! 可銷售的產品由半成品與食材組成，半成品之間可以再巢狀引用，
//! 形成有界深度的無環圖。引擎回答兩個問題：
//!
//! 1. 以目前的葉食材成本，生產一個半成品的單位成本是多少（彙算）
//! 2. 銷售/生產某數量的產品或半成品，各葉食材要消耗多少（展開）
//!
//! ## 範例
//!
//! ```
//! use recipe::{InMemoryCatalog, Ingredient, Preparation, Product, RecipeEngine, RecipeItem};
//! use rust_decimal::Decimal;
//!
//! let catalog = InMemoryCatalog::new();
//! catalog.upsert_ingredient(
//!     Ingredient::new("ING-FLOUR", "麵粉", "kg").with_cost(Decimal::from(2), "TWD"),
//! )?;
//! catalog.upsert_preparation(
//!     Preparation::new("PREP-DOUGH", "麵糰", Decimal::from(10), "kg")
//!         .with_waste_pct(Decimal::new(1, 1))
//!         .with_extra_cost(Decimal::from(3))
//!         .add_item(RecipeItem::ingredient("ING-FLOUR", Decimal::from(6))),
//! )?;
//! catalog.upsert_product(
//!     Product::new("PROD-PIZZA", "披薩")
//!         .add_item(RecipeItem::preparation("PREP-DOUGH", Decimal::new(3, 1))),
//! )?;
//!
//! let engine = RecipeEngine::new(catalog);
//!
//! let snapshot = engine.compute_cost("PREP-DOUGH")?;
//! assert_eq!(snapshot.unit_cost, Decimal::new(162, 2)); // 1.62 / kg
//!
//! let consumption = engine.expand_product("PROD-PIZZA", Decimal::from(5))?;
//! assert_eq!(
//!     consumption.line("ING-FLOUR", "kg").unwrap().qty,
//!     Decimal::new(9, 1), // 0.9 kg
//! );
//! # Ok::<(), recipe::RecipeError>(())
//! ```

// Re-export 主要類型
pub use recipe_cache::{CacheInvalidator, WhereUsedIndex};
pub use recipe_calc::{
    BreakdownEntry, BreakdownKind, Consumption, ConsumptionLine, CostCalculator,
    ExpansionCalculator, GraphValidator, SaleLine,
};
pub use recipe_core::{
    CatalogStore, CostSnapshot, EngineConfig, InMemoryCatalog, Ingredient, IngredientCost,
    ItemRef, Preparation, Product, RecipeError, RecipeItem, Result,
};

use rust_decimal::Decimal;

/// 引擎門面：把四個核心操作與驗證、快取失效綁在同一個目錄上
///
/// 目錄編輯處理器與銷售/生產流程都透過這層呼叫，沒有自己的
/// 網路協定——這是函式庫層級的邊界。
pub struct RecipeEngine<S: CatalogStore> {
    store: S,
    config: EngineConfig,
}

impl<S: CatalogStore> RecipeEngine<S> {
    /// 創建新的引擎（預設配置）
    pub fn new(store: S) -> Self {
        Self::with_config(store, EngineConfig::new())
    }

    /// 創建新的引擎
    pub fn with_config(store: S, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// 目錄存取層
    pub fn store(&self) -> &S {
        &self.store
    }

    /// 引擎配置
    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// 彙算半成品的單位成本（會沿途回寫快取的讀取）
    pub fn compute_cost(&self, prep_id: &str) -> Result<CostSnapshot> {
        CostCalculator::with_config(&self.store, self.config).compute_cost(prep_id)
    }

    /// 清除根快取後重新彙算並回寫（目錄異動後的主動刷新）
    pub fn recompute_and_persist(&self, prep_id: &str) -> Result<CostSnapshot> {
        CostCalculator::with_config(&self.store, self.config).recompute_and_persist(prep_id)
    }

    /// 展開半成品用量
    pub fn expand_preparation(&self, prep_id: &str, use_qty: Decimal) -> Result<Consumption> {
        ExpansionCalculator::with_config(&self.store, self.config)
            .expand_preparation(prep_id, use_qty)
    }

    /// 展開產品用量
    pub fn expand_product(&self, product_id: &str, qty: Decimal) -> Result<Consumption> {
        ExpansionCalculator::with_config(&self.store, self.config).expand_product(product_id, qty)
    }

    /// 展開一張銷售單（逐明細並行展開後合併）
    pub fn expand_sale(&self, lines: &[SaleLine]) -> Result<Consumption> {
        ExpansionCalculator::with_config(&self.store, self.config).expand_sale(lines)
    }

    /// 驗證半成品子圖結構（目錄編輯時使用）
    pub fn validate_preparation(&self, prep_id: &str) -> Result<()> {
        GraphValidator::with_config(&self.store, self.config).check_preparation(prep_id)
    }

    /// 驗證產品結構（目錄編輯時使用）
    pub fn validate_product(&self, product_id: &str) -> Result<()> {
        GraphValidator::with_config(&self.store, self.config).check_product(product_id)
    }

    /// 食材成本異動：失效下游快取，返回被清除的半成品ID
    pub fn ingredient_cost_changed(&self, ingredient_id: &str) -> Result<Vec<String>> {
        CacheInvalidator::on_ingredient_change(&self.store, ingredient_id)
    }

    /// 半成品異動：失效自身與上游快取，返回被清除的半成品ID
    pub fn preparation_changed(&self, prep_id: &str) -> Result<Vec<String>> {
        CacheInvalidator::on_preparation_change(&self.store, prep_id)
    }
}
