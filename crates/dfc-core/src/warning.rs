//! 資料一致性警告（不中止計算）

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 資料一致性警告
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataConsistencyWarning {
    /// 同產品同日期有多筆預測，已加總合併
    DuplicateForecastDate {
        product_id: String,
        date: NaiveDate,
        merged_rows: usize,
    },

    /// 同產品內批次ID重複，兩個批次皆保留
    DuplicateBatchId { product_id: String, batch_id: String },
}

impl DataConsistencyWarning {
    /// 相關產品ID
    pub fn product_id(&self) -> &str {
        match self {
            DataConsistencyWarning::DuplicateForecastDate { product_id, .. }
            | DataConsistencyWarning::DuplicateBatchId { product_id, .. } => product_id,
        }
    }
}

impl fmt::Display for DataConsistencyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataConsistencyWarning::DuplicateForecastDate {
                product_id,
                date,
                merged_rows,
            } => write!(
                f,
                "產品 {} 在 {} 有 {} 筆預測，已加總合併",
                product_id, date, merged_rows
            ),
            DataConsistencyWarning::DuplicateBatchId {
                product_id,
                batch_id,
            } => write!(f, "產品 {} 的批次ID {} 重複", product_id, batch_id),
        }
    }
}
