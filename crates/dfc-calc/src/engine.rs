//! 覆蓋天數模擬引擎

use chrono::NaiveDate;
use dfc_core::CoverageResult;

use crate::forecast_stream::ForecastStream;
use crate::ledger::InventoryLedger;

/// 覆蓋天數引擎
///
/// 逐日依日期升序從庫存帳出庫，計算連續完全滿足需求的天數。
/// 一旦出現缺口即停止，已發生的部分出庫不回滾。
pub struct CoverageEngine;

impl CoverageEngine {
    /// 計算單一產品的前向覆蓋天數
    ///
    /// 結果不會超過預測時界長度。
    pub fn compute(
        product_id: &str,
        forecast: &ForecastStream,
        ledger: &mut InventoryLedger,
        reference_date: NaiveDate,
    ) -> u32 {
        let mut covered_days = 0;

        for day in forecast {
            if day.date < reference_date {
                continue;
            }

            if day.is_zero_demand() {
                covered_days += 1;
                continue;
            }

            let withdrawn = ledger.withdraw(day.demand, day.date);
            if withdrawn == day.demand {
                covered_days += 1;
            } else {
                tracing::debug!(
                    "產品 {} 於 {} 缺口：需求 {}，可出庫 {}",
                    product_id,
                    day.date,
                    day.demand,
                    withdrawn
                );
                break;
            }
        }

        covered_days
    }

    /// 計算單一產品的完整覆蓋結果（庫存帳於計算後釋放）
    pub fn evaluate(
        forecast: &ForecastStream,
        mut ledger: InventoryLedger,
        reference_date: NaiveDate,
    ) -> CoverageResult {
        let product_id = forecast.product_id();
        let total_inventory = ledger.available_quantity(reference_date);
        let days = Self::compute(product_id, forecast, &mut ledger, reference_date);

        CoverageResult::new(product_id, days, total_inventory, forecast.horizon_days())
    }
}
