//! 用量彙總

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::{BreakdownEntry, Consumption, ConsumptionLine};

/// 用量累加器
///
/// 以 (食材ID, 單位) 為 key 累加，同 key 相加、不覆蓋；
/// `finish` 時丟棄非正值並輸出排序後的明細。
#[derive(Default)]
pub struct ConsumptionAccumulator {
    totals: BTreeMap<(String, String), Decimal>,
    breakdown: Vec<BreakdownEntry>,
}

impl ConsumptionAccumulator {
    /// 創建空的累加器
    pub fn new() -> Self {
        Self::default()
    }

    /// 累加一筆葉節點用量
    pub fn add(&mut self, ingredient_id: &str, unit: &str, qty: Decimal) {
        let key = (ingredient_id.to_string(), unit.to_string());
        *self.totals.entry(key).or_insert(Decimal::ZERO) += qty;
    }

    /// 記錄一筆稽核軌跡
    pub fn record(&mut self, entry: BreakdownEntry) {
        self.breakdown.push(entry);
    }

    /// 併入另一份展開結果（多條銷售明細合併用）
    pub fn absorb(&mut self, other: Consumption) {
        for line in other.lines {
            self.add(&line.ingredient_id, &line.unit, line.qty);
        }
        self.breakdown.extend(other.breakdown);
    }

    /// 產出彙總結果
    pub fn finish(self) -> Consumption {
        let lines = self
            .totals
            .into_iter()
            .filter(|(_, qty)| *qty > Decimal::ZERO)
            .map(|((ingredient_id, unit), qty)| ConsumptionLine {
                ingredient_id,
                unit,
                qty,
            })
            .collect();

        Consumption {
            lines,
            breakdown: self.breakdown,
        }
    }
}
