//! DFC 配置模型

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{DfcError, Result};

/// 預設臨界覆蓋天數
pub const DEFAULT_CRITICAL_THRESHOLD_DAYS: u32 = 7;

/// 預設排行榜筆數
pub const DEFAULT_TOP_N: usize = 10;

/// DFC 計算配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DfcConfig {
    /// 欄位名稱映射
    pub columns: ColumnMapping,

    /// 臨界覆蓋天數（低於此值視為缺貨風險）
    pub critical_threshold_days: u32,

    /// 最高/最低覆蓋排行筆數
    pub top_n: usize,

    /// 是否按產品並行計算
    /// - false: 逐產品依序計算（預設）
    /// - true: 以 rayon 跨產品並行；同產品內仍依日期順序
    pub parallel: bool,
}

impl Default for DfcConfig {
    fn default() -> Self {
        Self {
            columns: ColumnMapping::default(),
            critical_threshold_days: DEFAULT_CRITICAL_THRESHOLD_DAYS,
            top_n: DEFAULT_TOP_N,
            parallel: false,
        }
    }
}

impl DfcConfig {
    /// 創建預設配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 從 TOML 字串解析，缺少的鍵使用預設值
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| DfcError::Config(e.to_string()))
    }

    /// 從 TOML 檔案載入
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// 建構器模式：設置臨界覆蓋天數
    pub fn with_critical_threshold_days(mut self, days: u32) -> Self {
        self.critical_threshold_days = days;
        self
    }

    /// 建構器模式：設置排行筆數
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// 建構器模式：設置是否並行
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// 建構器模式：設置欄位映射
    pub fn with_columns(mut self, columns: ColumnMapping) -> Self {
        self.columns = columns;
        self
    }
}

/// 三張表的欄位名稱映射
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub forecast: ForecastColumns,
    pub inventory: InventoryColumns,
    pub coverage: CoverageColumns,
}

/// 預測表欄位
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastColumns {
    pub product_id: String,
    pub date: String,
    pub forecasted_sales: String,
}

impl Default for ForecastColumns {
    fn default() -> Self {
        Self {
            product_id: "product_id".to_string(),
            date: "date".to_string(),
            forecasted_sales: "forecasted_sales".to_string(),
        }
    }
}

/// 庫存表欄位
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryColumns {
    pub product_id: String,
    pub batch_id: String,
    pub expiry_date: String,
    pub inventory: String,
}

impl Default for InventoryColumns {
    fn default() -> Self {
        Self {
            product_id: "product_id".to_string(),
            batch_id: "batch_id".to_string(),
            expiry_date: "expiry_date".to_string(),
            inventory: "inventory".to_string(),
        }
    }
}

/// 覆蓋結果表欄位
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageColumns {
    pub product_id: String,
    pub days_forward_coverage: String,
    pub total_inventory: String,
}

impl Default for CoverageColumns {
    fn default() -> Self {
        Self {
            product_id: "product_id".to_string(),
            days_forward_coverage: "days_forward_coverage".to_string(),
            total_inventory: "total_inventory".to_string(),
        }
    }
}
