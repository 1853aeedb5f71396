//! # DFC IO
//!
//! 輸入表格來源（CSV、模擬生成、記憶體）與結果輸出

pub mod reader;
pub mod source;
pub mod synthetic;
pub mod writer;

// Re-export 主要類型
pub use reader::{read_forecast_table, read_inventory_table};
pub use source::{CsvTableSource, InMemoryTableSource, InputTables, TableSource};
pub use synthetic::{SyntheticSettings, SyntheticTableSource};
pub use writer::{write_coverage_table, write_forecast_table, write_inventory_table, write_timeline};

use chrono::NaiveDate;
use dfc_calc::{CoverageCalculator, CoverageRun};
use dfc_core::DfcConfig;

/// 從任意來源載入表格並計算覆蓋天數
///
/// 表格驗證失敗時直接返回錯誤，不進入計算。
pub fn compute_from_source(
    source: &dyn TableSource,
    config: &DfcConfig,
    reference_date: NaiveDate,
) -> dfc_core::Result<CoverageRun> {
    let tables = source.load_tables(config)?;
    CoverageCalculator::new(config.clone()).calculate(
        &tables.forecasts,
        &tables.batches,
        reference_date,
    )
}
