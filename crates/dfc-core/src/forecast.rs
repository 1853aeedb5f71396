//! 需求預測模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 單日需求預測
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastRecord {
    /// 產品ID
    pub product_id: String,

    /// 預測日期
    pub date: NaiveDate,

    /// 預測需求量（非負）
    pub forecasted_demand: Decimal,
}

impl ForecastRecord {
    /// 創建新的預測記錄
    pub fn new(product_id: impl Into<String>, date: NaiveDate, forecasted_demand: Decimal) -> Self {
        Self {
            product_id: product_id.into(),
            date,
            forecasted_demand,
        }
    }

    /// 檢查是否落在預測時界內（日期不早於參考日）
    pub fn is_on_or_after(&self, reference_date: NaiveDate) -> bool {
        self.date >= reference_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_forecast_record() {
        let record = ForecastRecord::new(
            "P0001",
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            Decimal::from(4),
        );

        assert_eq!(record.product_id, "P0001");
        assert_eq!(record.forecasted_demand, Decimal::from(4));
    }

    #[test]
    fn test_horizon_membership() {
        let record = ForecastRecord::new(
            "P0001",
            NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            Decimal::ZERO,
        );

        assert!(record.is_on_or_after(NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()));
        assert!(!record.is_on_or_after(NaiveDate::from_ymd_opt(2025, 1, 3).unwrap()));
    }
}
