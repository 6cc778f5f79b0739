//! 成本彙算引擎（由葉到根）
//!
//! 遞迴加總半成品的食材與子半成品成本，套用損耗率與每批額外
//! 成本後回寫成本快取（write-through 記憶化）。呼叫方必須把
//! `compute_cost` 視為「會寫入的讀取」。

use chrono::Utc;
use rust_decimal::Decimal;

use recipe_core::{
    CatalogStore, CostSnapshot, EngineConfig, ItemRef, Preparation, RecipeError, Result,
};

use crate::loader;

/// 成本彙算計算器
pub struct CostCalculator<'a, S: CatalogStore> {
    store: &'a S,
    config: EngineConfig,
}

impl<'a, S: CatalogStore> CostCalculator<'a, S> {
    /// 創建新的計算器（預設配置）
    pub fn new(store: &'a S) -> Self {
        Self::with_config(store, EngineConfig::new())
    }

    /// 創建新的計算器
    pub fn with_config(store: &'a S, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// 彙算半成品的單位成本
    ///
    /// 沿途修復過期的子快取並回寫根快取，屬於會寫入的讀取。
    pub fn compute_cost(&self, prep_id: &str) -> Result<CostSnapshot> {
        let start_time = std::time::Instant::now();

        let mut path: Vec<String> = Vec::new();
        let snapshot = self.roll_up(prep_id, &mut path)?;

        tracing::info!(
            "成本彙算完成: {} 單位成本 {} {}，耗時 {:?}",
            prep_id,
            snapshot.unit_cost,
            snapshot.currency,
            start_time.elapsed()
        );

        Ok(snapshot)
    }

    /// 清除根快取後重新彙算並回寫
    ///
    /// 目錄異動後的主動刷新入口；引擎本身也會惰性自癒，
    /// 此呼叫是效率最佳化而非正確性需求。
    pub fn recompute_and_persist(&self, prep_id: &str) -> Result<CostSnapshot> {
        self.store.clear_cost_snapshot(prep_id)?;
        self.compute_cost(prep_id)
    }

    /// 單一半成品的遞迴彙算；path 為呼叫鏈上的半成品ID（push/pop 紀律）
    fn roll_up(&self, prep_id: &str, path: &mut Vec<String>) -> Result<CostSnapshot> {
        // 真循環檢查：只比對目前呼叫鏈，菱形（同一子件經不同父件到達）合法
        if path.iter().any(|id| id == prep_id) {
            let chain = format!("{} → {}", path.join(" → "), prep_id);
            tracing::warn!("偵測到循環引用: {}", chain);
            return Err(RecipeError::CycleDetected(chain));
        }
        if path.len() as u32 >= self.config.max_depth {
            tracing::warn!(
                "超過最大巢狀深度 {}: {}",
                self.config.max_depth,
                prep_id
            );
            return Err(RecipeError::DepthExceeded {
                node_id: prep_id.to_string(),
                max_depth: self.config.max_depth,
            });
        }

        path.push(prep_id.to_string());
        let result = self.roll_up_current(prep_id, path);
        path.pop();
        result
    }

    fn roll_up_current(&self, prep_id: &str, path: &mut Vec<String>) -> Result<CostSnapshot> {
        let preparation = self
            .store
            .preparation(prep_id)?
            .ok_or_else(|| RecipeError::PreparationNotFound(prep_id.to_string()))?;

        let loaded = loader::load_items(self.store, &preparation.items)?;

        let mut ingredients_cost = Decimal::ZERO;
        for item in &preparation.items {
            match &item.component {
                ItemRef::Ingredient(ingredient_id) => {
                    let ingredient = loaded.ingredient(ingredient_id)?;
                    self.check_currency(&preparation, &ingredient.cost.currency, ingredient_id);
                    ingredients_cost += item.qty * ingredient.cost.last_cost;
                }
                ItemRef::Preparation(child_id) => {
                    let child = loaded.preparation(child_id)?;
                    self.check_currency(&preparation, &child.currency, child_id);

                    // qty 以子件的 yield_unit 表示，直接乘以每 yield_unit 成本
                    let child_unit_cost = self.child_unit_cost(child, path)?;
                    ingredients_cost += item.qty * child_unit_cost;
                }
            }
        }

        // yield_qty 由寫入時驗證保證 > 0，此除法不會為零
        let total_cost =
            ingredients_cost * (Decimal::ONE + preparation.waste_pct) + preparation.extra_cost;
        let unit_cost = total_cost / preparation.yield_qty;

        let snapshot = CostSnapshot {
            ingredients_cost,
            total_cost,
            unit_cost,
            currency: preparation.currency.clone(),
            computed_at: Utc::now(),
        };
        self.store.save_cost_snapshot(prep_id, &snapshot)?;

        tracing::debug!(
            "彙算 {}: 食材成本 {}，總成本 {}，單位成本 {}",
            prep_id,
            ingredients_cost,
            total_cost,
            unit_cost
        );

        Ok(snapshot)
    }

    /// 子件快取有效時直接使用；過期則遞迴重算（遞迴內會回寫子快取）
    fn child_unit_cost(&self, child: &Preparation, path: &mut Vec<String>) -> Result<Decimal> {
        if self.config.use_cached_costs {
            if let Some(unit_cost) = child.cached_unit_cost() {
                tracing::debug!("成本快取命中: {}", child.id);
                return Ok(unit_cost);
            }
        }
        let snapshot = self.roll_up(&child.id, path)?;
        Ok(snapshot.unit_cost)
    }

    fn check_currency(&self, parent: &Preparation, child_currency: &str, child_id: &str) {
        // 引擎不做幣別換算；不一致屬於目錄資料問題，僅告警
        if parent.currency != child_currency {
            tracing::warn!(
                "幣別不一致: {} ({}) 引用 {} ({})",
                parent.id,
                parent.currency,
                child_id,
                child_currency
            );
        }
    }
}
