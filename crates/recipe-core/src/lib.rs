//! # Recipe Core
//!
//! 核心資料模型與類型定義

pub mod catalog;
pub mod config;
pub mod ingredient;
pub mod item;
pub mod preparation;
pub mod product;

// Re-export 主要類型
pub use catalog::{CatalogStore, InMemoryCatalog};
pub use config::EngineConfig;
pub use ingredient::{Ingredient, IngredientCost};
pub use item::{ItemRef, RecipeItem};
pub use preparation::{CostSnapshot, Preparation};
pub use product::Product;

/// 引擎錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum RecipeError {
    #[error("找不到食材: {0}")]
    IngredientNotFound(String),

    #[error("找不到半成品: {0}")]
    PreparationNotFound(String),

    #[error("找不到產品: {0}")]
    ProductNotFound(String),

    #[error("偵測到循環引用: {0}")]
    CycleDetected(String),

    #[error("超過最大巢狀深度 {max_depth}: {node_id}")]
    DepthExceeded { node_id: String, max_depth: u32 },

    #[error("無效的數量: {0}")]
    InvalidQuantity(rust_decimal::Decimal),

    #[error("配方為空: {0}")]
    EmptyRecipe(String),

    #[error("無效的節點資料: {0}")]
    InvalidNode(String),

    #[error("儲存層錯誤: {0}")]
    Storage(String),
}

impl RecipeError {
    /// 是否為「找不到節點」類錯誤
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::IngredientNotFound(_) | Self::PreparationNotFound(_) | Self::ProductNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, RecipeError>;
