//! # DFC Calculation Engine
//!
//! 依效期先進先出的覆蓋天數模擬引擎

pub mod aggregator;
pub mod calculator;
pub mod engine;
pub mod forecast_stream;
pub mod ledger;
pub mod timeline;

// Re-export 主要類型
pub use aggregator::{CoverageSummary, DistributionStats, ResultAggregator};
pub use calculator::CoverageCalculator;
pub use engine::CoverageEngine;
pub use forecast_stream::{ForecastBook, ForecastDay, ForecastStream};
pub use ledger::{InventoryLedger, LedgerBook};
pub use timeline::{CoverageTimeline, TimelinePoint};

use chrono::NaiveDate;
use dfc_core::{CoverageResult, DataConsistencyWarning};
use serde::Serialize;

/// 單次 DFC 計算結果
///
/// 每次計算產生新的結果，輸入變更時以重新計算取代，不做原地修改。
#[derive(Debug, Clone, Serialize)]
pub struct CoverageRun {
    /// 計算批次ID
    pub run_id: uuid::Uuid,

    /// 參考日
    pub reference_date: NaiveDate,

    /// 各產品覆蓋結果（依產品ID排序）
    pub results: Vec<CoverageResult>,

    /// 資料一致性警告
    pub warnings: Vec<DataConsistencyWarning>,

    /// 有庫存但不在預測表中的產品
    pub products_without_forecast: Vec<String>,

    /// 計算耗時（毫秒）
    pub calculation_time_ms: Option<u64>,
}

impl CoverageRun {
    /// 創建空的計算結果
    pub fn new(reference_date: NaiveDate) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4(),
            reference_date,
            results: Vec::new(),
            warnings: Vec::new(),
            products_without_forecast: Vec::new(),
            calculation_time_ms: None,
        }
    }

    /// 查找產品結果
    pub fn result(&self, product_id: &str) -> Option<&CoverageResult> {
        self.results
            .binary_search_by(|r| r.product_id.as_str().cmp(product_id))
            .ok()
            .map(|idx| &self.results[idx])
    }

    /// 彙總本次結果
    pub fn summarize(&self, aggregator: &ResultAggregator) -> CoverageSummary {
        aggregator.aggregate(&self.results)
    }
}
