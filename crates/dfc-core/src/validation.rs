//! 輸入表格驗證錯誤

use std::fmt;

/// 輸入表格種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// 預測表
    Forecast,
    /// 庫存表
    Inventory,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKind::Forecast => write!(f, "forecast"),
            TableKind::Inventory => write!(f, "inventory"),
        }
    }
}

/// 驗證錯誤（載入表格時即中止，不進入計算）
///
/// `row` 為資料列序號（從 1 開始，不含表頭）。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{table} 表缺少必要欄位: {column}")]
    MissingColumn { table: TableKind, column: String },

    #[error("{table} 表第 {row} 列欄位 {field} 為空")]
    EmptyField {
        table: TableKind,
        row: usize,
        field: String,
    },

    #[error("{table} 表第 {row} 列欄位 {field} 不是數值: {value}")]
    InvalidNumber {
        table: TableKind,
        row: usize,
        field: String,
        value: String,
    },

    #[error("{table} 表第 {row} 列欄位 {field} 日期格式錯誤（期望 YYYY-MM-DD）: {value}")]
    InvalidDate {
        table: TableKind,
        row: usize,
        field: String,
        value: String,
    },

    #[error("{table} 表第 {row} 列欄位 {field} 不可為負數: {value}")]
    NegativeValue {
        table: TableKind,
        row: usize,
        field: String,
        value: String,
    },

    #[error("{table} 表產品 {product_id} 的 {field} 加總超出可表示範圍")]
    QuantityOverflow {
        table: TableKind,
        product_id: String,
        field: String,
    },
}

impl ValidationError {
    /// 取得出錯的資料列（欄位缺失與加總溢位時無列號）
    pub fn row(&self) -> Option<usize> {
        match self {
            ValidationError::MissingColumn { .. } | ValidationError::QuantityOverflow { .. } => {
                None
            }
            ValidationError::EmptyField { row, .. }
            | ValidationError::InvalidNumber { row, .. }
            | ValidationError::InvalidDate { row, .. }
            | ValidationError::NegativeValue { row, .. } => Some(*row),
        }
    }
}
