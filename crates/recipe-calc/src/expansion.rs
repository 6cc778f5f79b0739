//! 用量展開引擎（由根到葉）
//!
//! 依要求數量沿圖向下換算，輸出彙總後的葉食材用量。
//! 純讀取走訪，不寫入任何快取；銷售與成本走同一張圖，
//! 只是方向與量綱不同。

use rayon::prelude::*;
use rust_decimal::Decimal;

use recipe_core::{CatalogStore, EngineConfig, ItemRef, Preparation, RecipeError, Result};

use crate::consolidation::ConsumptionAccumulator;
use crate::loader;
use crate::{BreakdownEntry, BreakdownKind, Consumption};

/// 一條銷售明細
#[derive(Debug, Clone)]
pub struct SaleLine {
    /// 產品ID
    pub product_id: String,

    /// 銷售數量（1 = 一個銷售單位）
    pub qty: Decimal,
}

impl SaleLine {
    /// 創建新的銷售明細
    pub fn new(product_id: impl Into<String>, qty: Decimal) -> Self {
        Self {
            product_id: product_id.into(),
            qty,
        }
    }
}

/// 用量展開計算器
pub struct ExpansionCalculator<'a, S: CatalogStore> {
    store: &'a S,
    config: EngineConfig,
}

impl<'a, S: CatalogStore> ExpansionCalculator<'a, S> {
    /// 創建新的計算器（預設配置）
    pub fn new(store: &'a S) -> Self {
        Self::with_config(store, EngineConfig::new())
    }

    /// 創建新的計算器
    pub fn with_config(store: &'a S, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// 展開半成品：產出 `use_qty` 個 yield_unit 需要的葉食材用量
    pub fn expand_preparation(&self, prep_id: &str, use_qty: Decimal) -> Result<Consumption> {
        check_quantity(use_qty)?;

        let preparation = self
            .store
            .preparation(prep_id)?
            .ok_or_else(|| RecipeError::PreparationNotFound(prep_id.to_string()))?;
        if preparation.items.is_empty() {
            return Err(RecipeError::EmptyRecipe(prep_id.to_string()));
        }

        let mut accumulator = ConsumptionAccumulator::new();
        let mut path: Vec<String> = Vec::new();
        self.expand_prep_into(&preparation, use_qty, &mut path, &mut accumulator)?;

        let consumption = accumulator.finish();
        tracing::info!(
            "展開完成: {} × {} → {} 種食材",
            prep_id,
            use_qty,
            consumption.lines.len()
        );
        Ok(consumption)
    }

    /// 展開產品：銷售 `qty` 個單位需要的葉食材用量
    ///
    /// 產品沒有批次產出概念（賣一個就是一個），項目用量直接乘
    /// 以要求數量，不做除法。
    pub fn expand_product(&self, product_id: &str, qty: Decimal) -> Result<Consumption> {
        check_quantity(qty)?;

        let product = self
            .store
            .product(product_id)?
            .ok_or_else(|| RecipeError::ProductNotFound(product_id.to_string()))?;
        if product.items.is_empty() {
            return Err(RecipeError::EmptyRecipe(product_id.to_string()));
        }

        let mut accumulator = ConsumptionAccumulator::new();
        let mut path: Vec<String> = Vec::new();

        accumulator.record(BreakdownEntry {
            path: Vec::new(),
            node_id: product.id.clone(),
            kind: BreakdownKind::Product,
            qty,
            unit: "unit".to_string(),
        });

        let loaded = loader::load_items(self.store, &product.items)?;
        for item in &product.items {
            let scaled_qty = item.qty * qty;
            match &item.component {
                ItemRef::Ingredient(ingredient_id) => {
                    let ingredient = loaded.ingredient(ingredient_id)?;
                    accumulator.record(BreakdownEntry {
                        path: path.clone(),
                        node_id: ingredient.id.clone(),
                        kind: BreakdownKind::Ingredient,
                        qty: scaled_qty,
                        unit: ingredient.base_unit.clone(),
                    });
                    accumulator.add(&ingredient.id, &ingredient.base_unit, scaled_qty);
                }
                ItemRef::Preparation(child_id) => {
                    let child = loaded.preparation(child_id)?;
                    self.expand_prep_into(child, scaled_qty, &mut path, &mut accumulator)?;
                }
            }
        }

        let consumption = accumulator.finish();
        tracing::info!(
            "展開完成: {} × {} → {} 種食材",
            product_id,
            qty,
            consumption.lines.len()
        );
        Ok(consumption)
    }

    /// 展開一張銷售單：逐明細並行展開後按 key 合併
    pub fn expand_sale(&self, lines: &[SaleLine]) -> Result<Consumption> {
        if lines.is_empty() {
            return Err(RecipeError::EmptyRecipe("sale".to_string()));
        }

        // 展開是純讀取走訪，明細之間可以安全並行
        let partials: Vec<Consumption> = lines
            .par_iter()
            .map(|line| self.expand_product(&line.product_id, line.qty))
            .collect::<Result<Vec<_>>>()?;

        let mut accumulator = ConsumptionAccumulator::new();
        for partial in partials {
            accumulator.absorb(partial);
        }
        Ok(accumulator.finish())
    }

    /// 遞迴展開半成品；path 為呼叫鏈上的半成品ID（push/pop 紀律）
    fn expand_prep_into(
        &self,
        preparation: &Preparation,
        use_qty: Decimal,
        path: &mut Vec<String>,
        accumulator: &mut ConsumptionAccumulator,
    ) -> Result<()> {
        if path.iter().any(|id| id == &preparation.id) {
            let chain = format!("{} → {}", path.join(" → "), preparation.id);
            tracing::warn!("偵測到循環引用: {}", chain);
            return Err(RecipeError::CycleDetected(chain));
        }
        if path.len() as u32 >= self.config.max_depth {
            tracing::warn!(
                "超過最大巢狀深度 {}: {}",
                self.config.max_depth,
                preparation.id
            );
            return Err(RecipeError::DepthExceeded {
                node_id: preparation.id.clone(),
                max_depth: self.config.max_depth,
            });
        }

        path.push(preparation.id.clone());
        let result = self.expand_items(preparation, use_qty, path, accumulator);
        path.pop();
        result
    }

    fn expand_items(
        &self,
        preparation: &Preparation,
        use_qty: Decimal,
        path: &mut Vec<String>,
        accumulator: &mut ConsumptionAccumulator,
    ) -> Result<()> {
        accumulator.record(BreakdownEntry {
            path: path.clone(),
            node_id: preparation.id.clone(),
            kind: BreakdownKind::Preparation,
            qty: use_qty,
            unit: preparation.yield_unit.clone(),
        });

        // use_qty 佔一批的比例；yield_qty 由寫入時驗證保證 > 0
        let factor = use_qty / preparation.yield_qty;
        tracing::debug!(
            "展開 {}: 要求 {} {}，批次比例 {}",
            preparation.id,
            use_qty,
            preparation.yield_unit,
            factor
        );

        let loaded = loader::load_items(self.store, &preparation.items)?;
        for item in &preparation.items {
            let scaled_qty = item.qty * factor;
            match &item.component {
                ItemRef::Ingredient(ingredient_id) => {
                    let ingredient = loaded.ingredient(ingredient_id)?;
                    accumulator.record(BreakdownEntry {
                        path: path.clone(),
                        node_id: ingredient.id.clone(),
                        kind: BreakdownKind::Ingredient,
                        qty: scaled_qty,
                        unit: ingredient.base_unit.clone(),
                    });
                    accumulator.add(&ingredient.id, &ingredient.base_unit, scaled_qty);
                }
                ItemRef::Preparation(child_id) => {
                    let child = loaded.preparation(child_id)?;
                    self.expand_prep_into(child, scaled_qty, path, accumulator)?;
                }
            }
        }
        Ok(())
    }
}

fn check_quantity(qty: Decimal) -> Result<()> {
    if qty <= Decimal::ZERO {
        return Err(RecipeError::InvalidQuantity(qty));
    }
    Ok(())
}
