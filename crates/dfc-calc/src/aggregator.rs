//! 結果彙總與統計

use dfc_core::{CoverageResult, DfcConfig};
use serde::{Deserialize, Serialize};

/// 覆蓋天數分佈統計
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionStats {
    pub count: usize,
    pub mean: f64,
    /// 樣本標準差（少於兩筆時為 0）
    pub std: f64,
    pub min: u32,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub max: u32,
}

impl DistributionStats {
    /// 由覆蓋天數計算分佈統計，空集合返回 None
    pub fn from_values(values: &[u32]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_unstable();

        let count = sorted.len();
        let mean = sorted.iter().map(|&v| v as f64).sum::<f64>() / count as f64;
        let std = if count > 1 {
            let variance = sorted
                .iter()
                .map(|&v| (v as f64 - mean).powi(2))
                .sum::<f64>()
                / (count - 1) as f64;
            variance.sqrt()
        } else {
            0.0
        };

        Some(Self {
            count,
            mean,
            std,
            min: sorted[0],
            p25: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            p75: quantile(&sorted, 0.75),
            max: sorted[count - 1],
        })
    }
}

/// 線性插值分位數，`sorted` 需已排序且非空
fn quantile(sorted: &[u32], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    let low = sorted[lower] as f64;
    let high = sorted[upper] as f64;
    low + (high - low) * fraction
}

/// 彙總結果（唯讀視圖）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageSummary {
    /// 完整結果表（依產品ID排序）
    pub table: Vec<CoverageResult>,
    /// 分佈統計（無結果時為 None）
    pub statistics: Option<DistributionStats>,
    /// 覆蓋天數最高的產品
    pub top: Vec<CoverageResult>,
    /// 覆蓋天數最低的產品
    pub bottom: Vec<CoverageResult>,
    /// 臨界天數
    pub critical_threshold_days: u32,
    /// 低於臨界天數的產品（缺貨風險）
    pub critical: Vec<CoverageResult>,
    /// 參考日時無可用庫存的產品
    pub zero_inventory: Vec<CoverageResult>,
}

/// 結果彙總器
#[derive(Debug, Clone)]
pub struct ResultAggregator {
    critical_threshold_days: u32,
    top_n: usize,
}

impl ResultAggregator {
    /// 創建新的彙總器
    pub fn new(critical_threshold_days: u32, top_n: usize) -> Self {
        Self {
            critical_threshold_days,
            top_n,
        }
    }

    /// 從配置創建
    pub fn from_config(config: &DfcConfig) -> Self {
        Self::new(config.critical_threshold_days, config.top_n)
    }

    /// 彙總覆蓋結果；同覆蓋天數時依產品ID升序
    pub fn aggregate(&self, results: &[CoverageResult]) -> CoverageSummary {
        let mut table = results.to_vec();
        table.sort_by(|a, b| a.product_id.cmp(&b.product_id));

        let values: Vec<u32> = table.iter().map(|r| r.days_forward_coverage).collect();
        let statistics = DistributionStats::from_values(&values);

        let mut ascending = table.clone();
        ascending.sort_by(|a, b| {
            a.days_forward_coverage
                .cmp(&b.days_forward_coverage)
                .then_with(|| a.product_id.cmp(&b.product_id))
        });

        let mut descending = table.clone();
        descending.sort_by(|a, b| {
            b.days_forward_coverage
                .cmp(&a.days_forward_coverage)
                .then_with(|| a.product_id.cmp(&b.product_id))
        });

        let critical: Vec<CoverageResult> = ascending
            .iter()
            .filter(|r| r.is_critical(self.critical_threshold_days))
            .cloned()
            .collect();

        let zero_inventory: Vec<CoverageResult> = table
            .iter()
            .filter(|r| r.has_no_inventory())
            .cloned()
            .collect();

        CoverageSummary {
            top: descending.into_iter().take(self.top_n).collect(),
            bottom: ascending.into_iter().take(self.top_n).collect(),
            critical_threshold_days: self.critical_threshold_days,
            critical,
            zero_inventory,
            statistics,
            table,
        }
    }
}

impl Default for ResultAggregator {
    fn default() -> Self {
        Self::from_config(&DfcConfig::default())
    }
}
