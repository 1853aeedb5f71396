//! 覆蓋天數結果模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 單一產品的覆蓋天數結果（計算後不可變）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageResult {
    /// 產品ID
    pub product_id: String,

    /// 前向覆蓋天數
    pub days_forward_coverage: u32,

    /// 參考日時未過期的總庫存（模擬前）
    pub total_inventory: Decimal,

    /// 預測時界長度（參考日起的不同預測日期數）
    pub horizon_days: u32,
}

impl CoverageResult {
    /// 創建新的覆蓋結果
    pub fn new(
        product_id: impl Into<String>,
        days_forward_coverage: u32,
        total_inventory: Decimal,
        horizon_days: u32,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            days_forward_coverage,
            total_inventory,
            horizon_days,
        }
    }

    /// 是否覆蓋整個預測時界
    pub fn covers_full_horizon(&self) -> bool {
        self.days_forward_coverage == self.horizon_days
    }

    /// 是否低於臨界天數
    pub fn is_critical(&self, threshold_days: u32) -> bool {
        self.days_forward_coverage < threshold_days
    }

    /// 是否完全沒有可用庫存
    pub fn has_no_inventory(&self) -> bool {
        self.total_inventory <= Decimal::ZERO
    }
}
