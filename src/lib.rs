//! # DFC
//!
//! Days Forward Coverage：以效期先進先出模擬現有庫存能連續滿足多少天的預測需求

pub mod logging;

pub use dfc_calc::{
    CoverageCalculator, CoverageEngine, CoverageRun, CoverageSummary, CoverageTimeline,
    DistributionStats, ForecastStream, InventoryLedger, ResultAggregator, TimelinePoint,
};
pub use dfc_core::{
    CoverageResult, DataConsistencyWarning, DfcConfig, DfcError, ForecastRecord, InventoryBatch,
    Result, ValidationError,
};
pub use dfc_io::{
    compute_from_source, CsvTableSource, InMemoryTableSource, InputTables, SyntheticSettings,
    SyntheticTableSource, TableSource,
};
