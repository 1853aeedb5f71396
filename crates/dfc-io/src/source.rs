//! 輸入表格來源
//!
//! 計算只依賴 [`TableSource`]，不關心表格是上傳、生成或沿用既有檔案。

use chrono::NaiveDate;
use dfc_core::{DfcConfig, DfcError, ForecastRecord, InventoryBatch};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::reader::{read_forecast_table, read_inventory_table};

/// 一次計算所需的兩張輸入表
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputTables {
    /// 預測表
    pub forecasts: Vec<ForecastRecord>,
    /// 庫存表
    pub batches: Vec<InventoryBatch>,
}

impl InputTables {
    /// 創建輸入表
    pub fn new(forecasts: Vec<ForecastRecord>, batches: Vec<InventoryBatch>) -> Self {
        Self { forecasts, batches }
    }

    /// 預測表中最早的日期
    pub fn earliest_forecast_date(&self) -> Option<NaiveDate> {
        self.forecasts.iter().map(|r| r.date).min()
    }
}

/// 提供預測表與庫存表的來源
pub trait TableSource {
    /// 載入並驗證兩張表
    fn load_tables(&self, config: &DfcConfig) -> dfc_core::Result<InputTables>;
}

/// CSV 檔案來源
#[derive(Debug, Clone)]
pub struct CsvTableSource {
    forecast_path: PathBuf,
    inventory_path: PathBuf,
}

impl CsvTableSource {
    /// 創建 CSV 來源
    pub fn new(forecast_path: impl Into<PathBuf>, inventory_path: impl Into<PathBuf>) -> Self {
        Self {
            forecast_path: forecast_path.into(),
            inventory_path: inventory_path.into(),
        }
    }

    fn open(path: &Path) -> dfc_core::Result<BufReader<File>> {
        if !path.exists() {
            return Err(DfcError::FileNotFound(path.display().to_string()));
        }
        Ok(BufReader::new(File::open(path)?))
    }
}

impl TableSource for CsvTableSource {
    fn load_tables(&self, config: &DfcConfig) -> dfc_core::Result<InputTables> {
        tracing::info!(
            "載入 CSV：預測 {}，庫存 {}",
            self.forecast_path.display(),
            self.inventory_path.display()
        );

        let forecasts = read_forecast_table(
            Self::open(&self.forecast_path)?,
            &config.columns.forecast,
        )?;
        let batches = read_inventory_table(
            Self::open(&self.inventory_path)?,
            &config.columns.inventory,
        )?;

        Ok(InputTables::new(forecasts, batches))
    }
}

/// 記憶體內來源（測試或已載入的資料）
#[derive(Debug, Clone, Default)]
pub struct InMemoryTableSource {
    tables: InputTables,
}

impl InMemoryTableSource {
    /// 創建記憶體來源
    pub fn new(tables: InputTables) -> Self {
        Self { tables }
    }
}

impl TableSource for InMemoryTableSource {
    fn load_tables(&self, _config: &DfcConfig) -> dfc_core::Result<InputTables> {
        Ok(self.tables.clone())
    }
}
