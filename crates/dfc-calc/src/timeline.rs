//! 覆蓋天數時間序列：以每個預測日為參考日重新計算

use chrono::NaiveDate;
use dfc_core::{ForecastRecord, InventoryBatch};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::engine::CoverageEngine;
use crate::forecast_stream::ForecastStream;
use crate::ledger::InventoryLedger;

/// 時間序列上的一點
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelinePoint {
    /// 作為參考日的預測日期
    pub date: NaiveDate,
    /// 以該日為參考日的覆蓋天數
    pub days_forward_coverage: u32,
    /// 該日未過期的總庫存
    pub total_inventory: Decimal,
}

/// 覆蓋天數時間序列計算器
pub struct CoverageTimeline;

impl CoverageTimeline {
    /// 計算單一產品在各預測日的覆蓋天數
    ///
    /// 每個點都從原始批次重新建帳，彼此互不影響。
    /// 產品沒有預測或沒有任何庫存批次時返回空序列。
    pub fn compute(
        product_id: &str,
        forecasts: &[ForecastRecord],
        batches: &[InventoryBatch],
    ) -> dfc_core::Result<Vec<TimelinePoint>> {
        let product_forecasts: Vec<&ForecastRecord> = forecasts
            .iter()
            .filter(|r| r.product_id == product_id)
            .collect();
        let product_batches: Vec<&InventoryBatch> = batches
            .iter()
            .filter(|b| b.product_id == product_id)
            .collect();

        if product_forecasts.is_empty() || product_batches.is_empty() {
            tracing::debug!("產品 {} 缺少預測或庫存，時間序列為空", product_id);
            return Ok(Vec::new());
        }

        let dates: BTreeSet<NaiveDate> = product_forecasts.iter().map(|r| r.date).collect();
        let mut points = Vec::with_capacity(dates.len());

        for date in dates {
            let (stream, _) =
                ForecastStream::from_records(product_id, product_forecasts.iter().copied(), date)?;
            let mut ledger = InventoryLedger::from_batches(
                product_id,
                product_batches.iter().map(|b| (*b).clone()),
                date,
            )?;
            let total_inventory = ledger.available_quantity(date);
            let days = CoverageEngine::compute(product_id, &stream, &mut ledger, date);

            points.push(TimelinePoint {
                date,
                days_forward_coverage: days,
                total_inventory,
            });
        }

        tracing::debug!("產品 {} 時間序列: {} 點", product_id, points.len());
        Ok(points)
    }
}
