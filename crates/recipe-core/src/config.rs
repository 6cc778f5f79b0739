//! 引擎配置模型

use serde::{Deserialize, Serialize};

/// 預設最大巢狀深度
pub const DEFAULT_MAX_DEPTH: u32 = 12;

/// 引擎參數配置
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EngineConfig {
    /// 半成品巢狀的最大深度（超過即硬錯誤，防止漏網的循環）
    pub max_depth: u32,

    /// 是否使用半成品上的成本快取
    /// - true: 子半成品快取有效時直接使用（預設）
    /// - false: 一律重新彙算（用於驗證快取與強制重算結果一致）
    pub use_cached_costs: bool,
}

impl EngineConfig {
    /// 創建預設配置
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            use_cached_costs: true,
        }
    }

    /// 建構器模式：設置最大巢狀深度
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// 建構器模式：設置是否使用成本快取
    pub fn with_cached_costs(mut self, use_cached_costs: bool) -> Self {
        self.use_cached_costs = use_cached_costs;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::new();
        assert_eq!(config.max_depth, 12);
        assert!(config.use_cached_costs);
    }

    #[test]
    fn test_config_builder() {
        let config = EngineConfig::new()
            .with_max_depth(4)
            .with_cached_costs(false);

        assert_eq!(config.max_depth, 4);
        assert!(!config.use_cached_costs);
    }
}
