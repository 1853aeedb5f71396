//! 模擬資料集生成
//!
//! 以固定種子生成可重現的預測表與庫存表，用於示範與壓力測試。

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use dfc_core::{DfcConfig, DfcError, ForecastRecord, InventoryBatch};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Normal;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::source::{InputTables, TableSource};

/// 生成參數
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticSettings {
    /// 產品數量
    pub num_products: usize,
    /// 預測天數
    pub forecast_days: u32,
    /// 預測起始日
    pub start_date: NaiveDate,
    /// 效期上限日
    pub end_date: NaiveDate,
    /// 每日基礎需求範圍 [min, max)
    pub base_demand_min: u32,
    pub base_demand_max: u32,
    /// 每產品批次數範圍 [min, max]
    pub min_batches_per_product: u32,
    pub max_batches_per_product: u32,
    /// 每產品基礎庫存範圍 [min, max)
    pub base_inventory_min: u32,
    pub base_inventory_max: u32,
    /// 隨機種子
    pub seed: u64,
}

impl Default for SyntheticSettings {
    fn default() -> Self {
        Self {
            num_products: 100,
            forecast_days: 30,
            start_date: NaiveDate::from_ymd_opt(2024, 8, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2024, 8, 31).unwrap_or_default(),
            base_demand_min: 10,
            base_demand_max: 50,
            min_batches_per_product: 2,
            max_batches_per_product: 5,
            base_inventory_min: 100,
            base_inventory_max: 1000,
            seed: 42,
        }
    }
}

impl SyntheticSettings {
    /// 檢查參數範圍
    pub fn validate(&self) -> dfc_core::Result<()> {
        if self.base_demand_min >= self.base_demand_max {
            return Err(DfcError::Config(
                "base_demand_min 必須小於 base_demand_max".to_string(),
            ));
        }
        if self.base_inventory_min >= self.base_inventory_max {
            return Err(DfcError::Config(
                "base_inventory_min 必須小於 base_inventory_max".to_string(),
            ));
        }
        if self.min_batches_per_product == 0
            || self.min_batches_per_product > self.max_batches_per_product
        {
            return Err(DfcError::Config("每產品批次數範圍無效".to_string()));
        }
        if self.end_date <= self.start_date {
            return Err(DfcError::Config("end_date 必須晚於 start_date".to_string()));
        }
        Ok(())
    }
}

/// 模擬資料來源
#[derive(Debug, Clone, Default)]
pub struct SyntheticTableSource {
    settings: SyntheticSettings,
}

impl SyntheticTableSource {
    /// 創建模擬資料來源
    pub fn new(settings: SyntheticSettings) -> Self {
        Self { settings }
    }

    /// 生成參數
    pub fn settings(&self) -> &SyntheticSettings {
        &self.settings
    }

    /// 生成兩張表；相同參數永遠得到相同結果
    pub fn generate(&self) -> dfc_core::Result<InputTables> {
        self.settings.validate()?;
        let s = &self.settings;
        let mut rng = StdRng::seed_from_u64(s.seed);

        let product_ids: Vec<String> = (1..=s.num_products).map(|i| format!("P{:04}", i)).collect();

        let mut forecasts = Vec::with_capacity(product_ids.len() * s.forecast_days as usize);
        for product_id in &product_ids {
            let base_demand = rng.gen_range(s.base_demand_min..s.base_demand_max) as f64;
            let variability = rng.gen_range(0.1f64..0.5);
            let noise = Normal::new(1.0, variability)
                .map_err(|err| DfcError::Config(format!("需求波動參數無效: {err}")))?;

            for day in 0..s.forecast_days {
                let date = s.start_date + Duration::days(day as i64);
                let weekday_factor = match date.weekday() {
                    Weekday::Thu | Weekday::Fri | Weekday::Sat => 1.3,
                    _ => 1.0,
                };
                let random_factor = rng.sample::<f64, _>(noise).clamp(0.5, 1.5);
                let quantity = (base_demand * weekday_factor * random_factor).round() as i64;

                forecasts.push(ForecastRecord::new(
                    product_id.clone(),
                    date,
                    Decimal::from(quantity),
                ));
            }
        }

        let span = (s.end_date - s.start_date).num_days().max(1);
        let mut batches = Vec::new();
        for product_id in &product_ids {
            let num_batches =
                rng.gen_range(s.min_batches_per_product..=s.max_batches_per_product) as i64;
            let base_inventory = rng.gen_range(s.base_inventory_min..s.base_inventory_max) as f64;

            for batch_idx in 0..num_batches {
                // 越早的批次越可能較早到期
                let low = (1 + batch_idx).min(span);
                let days_until_expiry = rng.gen_range(low..span + 1);
                let expiry_date = s.end_date - Duration::days(days_until_expiry);

                let quantity_factor = rng.gen_range(0.5f64..1.5) / num_batches as f64;
                let quantity = ((base_inventory * quantity_factor) as i64).max(1);

                batches.push(InventoryBatch::new(
                    product_id.clone(),
                    format!("{}_B{}", product_id, batch_idx + 1),
                    expiry_date,
                    Decimal::from(quantity),
                ));
            }
        }

        tracing::info!(
            "生成模擬資料：{} 個產品，預測 {} 筆，庫存批次 {} 筆",
            product_ids.len(),
            forecasts.len(),
            batches.len()
        );

        Ok(InputTables::new(forecasts, batches))
    }
}

impl TableSource for SyntheticTableSource {
    fn load_tables(&self, _config: &DfcConfig) -> dfc_core::Result<InputTables> {
        self.generate()
    }
}
