//! # Recipe Cache
//!
//! 成本快取失效與反向引用索引

pub mod invalidation;
pub mod where_used;

// Re-export 主要類型
pub use invalidation::CacheInvalidator;
pub use where_used::WhereUsedIndex;
