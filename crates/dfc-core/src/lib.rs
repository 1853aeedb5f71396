//! # DFC Core
//!
//! 核心資料模型與類型定義（預測、庫存批次、覆蓋結果、配置）

pub mod batch;
pub mod config;
pub mod coverage;
pub mod forecast;
pub mod validation;
pub mod warning;

// Re-export 主要類型
pub use batch::InventoryBatch;
pub use config::{ColumnMapping, CoverageColumns, DfcConfig, ForecastColumns, InventoryColumns};
pub use coverage::CoverageResult;
pub use forecast::ForecastRecord;
pub use validation::{TableKind, ValidationError};
pub use warning::DataConsistencyWarning;

/// DFC 錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum DfcError {
    #[error("資料驗證失敗: {0}")]
    Validation(#[from] ValidationError),

    #[error("配置錯誤: {0}")]
    Config(String),

    #[error("檔案不存在: {0}")]
    FileNotFound(String),

    #[error("檔案讀寫錯誤: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV 處理錯誤: {0}")]
    Csv(String),
}

pub type Result<T> = std::result::Result<T, DfcError>;
