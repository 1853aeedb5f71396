//! DFC 主計算器

use chrono::NaiveDate;
use dfc_core::{CoverageResult, DfcConfig, ForecastRecord, InventoryBatch};
use rayon::prelude::*;

use crate::engine::CoverageEngine;
use crate::forecast_stream::{ForecastBook, ForecastStream};
use crate::ledger::{InventoryLedger, LedgerBook};
use crate::CoverageRun;

/// DFC 計算器
pub struct CoverageCalculator {
    /// 計算配置
    config: DfcConfig,
}

impl CoverageCalculator {
    /// 創建新的 DFC 計算器
    pub fn new(config: DfcConfig) -> Self {
        Self { config }
    }

    /// 主計算入口
    ///
    /// `reference_date` 決定哪些批次已過期以及預測時界的起點，由呼叫端注入。
    pub fn calculate(
        &self,
        forecasts: &[ForecastRecord],
        batches: &[InventoryBatch],
        reference_date: NaiveDate,
    ) -> dfc_core::Result<CoverageRun> {
        tracing::info!(
            "開始 DFC 計算：預測 {} 筆，庫存批次 {} 筆，參考日 {}",
            forecasts.len(),
            batches.len(),
            reference_date
        );

        let start_time = std::time::Instant::now();

        // Step 1: 建立預測序列
        tracing::debug!("Step 1: 建立預測序列");
        let forecast_book = ForecastStream::build(forecasts, reference_date)?;
        tracing::debug!("預測產品數量: {}", forecast_book.streams.len());

        // Step 2: 建立庫存帳（排除已過期批次）
        tracing::debug!("Step 2: 建立庫存帳");
        let ledger_book = InventoryLedger::build(batches, reference_date)?;
        tracing::debug!("有效庫存產品數量: {}", ledger_book.ledgers.len());

        let mut run = CoverageRun::new(reference_date);
        run.warnings.extend(forecast_book.warnings.iter().cloned());
        run.warnings.extend(ledger_book.warnings.iter().cloned());
        for warning in &run.warnings {
            tracing::warn!("{}", warning);
        }

        // 只有庫存、沒有預測的產品不計算覆蓋
        run.products_without_forecast = ledger_book
            .product_ids()
            .filter(|id| !forecast_book.contains(id))
            .map(str::to_string)
            .collect();
        if !run.products_without_forecast.is_empty() {
            tracing::info!(
                "{} 個產品有庫存但無預測，不計算覆蓋",
                run.products_without_forecast.len()
            );
        }

        // Step 3: 逐產品模擬
        tracing::debug!("Step 3: 逐產品模擬（並行: {}）", self.config.parallel);
        run.results = self.simulate(forecast_book, ledger_book, reference_date);

        run.calculation_time_ms = Some(start_time.elapsed().as_millis() as u64);

        tracing::info!("DFC 計算完成，耗時 {:?}", start_time.elapsed());
        tracing::info!("產品數量: {}", run.results.len());

        Ok(run)
    }

    /// 每個產品獨佔自己的庫存帳；結果依產品ID排序，與是否並行無關
    fn simulate(
        &self,
        forecast_book: ForecastBook,
        mut ledger_book: LedgerBook,
        reference_date: NaiveDate,
    ) -> Vec<CoverageResult> {
        let work: Vec<(ForecastStream, InventoryLedger)> = forecast_book
            .streams
            .into_values()
            .map(|stream| {
                let ledger = ledger_book.take(stream.product_id());
                (stream, ledger)
            })
            .collect();

        let mut results: Vec<CoverageResult> = if self.config.parallel {
            work.into_par_iter()
                .map(|(stream, ledger)| CoverageEngine::evaluate(&stream, ledger, reference_date))
                .collect()
        } else {
            work.into_iter()
                .map(|(stream, ledger)| {
                    tracing::debug!("計算產品覆蓋: {}", stream.product_id());
                    CoverageEngine::evaluate(&stream, ledger, reference_date)
                })
                .collect()
        };

        results.sort_by(|a, b| a.product_id.cmp(&b.product_id));
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dfc_core::DataConsistencyWarning;
    use rust_decimal::Decimal;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    fn forecasts() -> Vec<ForecastRecord> {
        vec![
            ForecastRecord::new("P2", date(1), Decimal::from(5)),
            ForecastRecord::new("P1", date(1), Decimal::from(4)),
            ForecastRecord::new("P1", date(2), Decimal::from(4)),
            ForecastRecord::new("P1", date(3), Decimal::from(4)),
            ForecastRecord::new("P2", date(2), Decimal::from(5)),
            ForecastRecord::new("P3", date(1), Decimal::from(1)),
        ]
    }

    fn batches() -> Vec<InventoryBatch> {
        vec![
            InventoryBatch::new("P1", "P1_B1", date(10), Decimal::from(10)),
            InventoryBatch::new("P2", "P2_B2", date(20), Decimal::from(100)),
            InventoryBatch::new("P2", "P2_B1", date(2), Decimal::from(5)),
            InventoryBatch::new("P9", "P9_B1", date(30), Decimal::from(7)),
        ]
    }

    #[test]
    fn test_calculate_all_products() {
        let calculator = CoverageCalculator::new(DfcConfig::default());
        let run = calculator.calculate(&forecasts(), &batches(), date(1)).unwrap();

        let coverage: Vec<(&str, u32)> = run
            .results
            .iter()
            .map(|r| (r.product_id.as_str(), r.days_forward_coverage))
            .collect();
        assert_eq!(coverage, vec![("P1", 2), ("P2", 2), ("P3", 0)]);
        assert_eq!(run.products_without_forecast, vec!["P9".to_string()]);
        assert_eq!(run.reference_date, date(1));
        assert!(run.warnings.is_empty());
        assert!(run.calculation_time_ms.is_some());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sequential = CoverageCalculator::new(DfcConfig::default())
            .calculate(&forecasts(), &batches(), date(1))
            .unwrap();
        let parallel = CoverageCalculator::new(DfcConfig::default().with_parallel(true))
            .calculate(&forecasts(), &batches(), date(1))
            .unwrap();

        assert_eq!(sequential.results, parallel.results);
    }

    #[test]
    fn test_row_order_does_not_change_results() {
        let calculator = CoverageCalculator::new(DfcConfig::default());
        let mut reversed_forecasts = forecasts();
        reversed_forecasts.reverse();
        let mut reversed_batches = batches();
        reversed_batches.reverse();

        let a = calculator.calculate(&forecasts(), &batches(), date(1)).unwrap();
        let b = calculator
            .calculate(&reversed_forecasts, &reversed_batches, date(1))
            .unwrap();

        assert_eq!(a.results, b.results);
        assert_ne!(a.run_id, b.run_id);
    }

    #[test]
    fn test_duplicate_forecast_rows_reported() {
        let mut records = forecasts();
        records.push(ForecastRecord::new("P3", date(1), Decimal::from(2)));

        let run = CoverageCalculator::new(DfcConfig::default())
            .calculate(&records, &batches(), date(1))
            .unwrap();

        assert_eq!(
            run.warnings,
            vec![DataConsistencyWarning::DuplicateForecastDate {
                product_id: "P3".to_string(),
                date: date(1),
                merged_rows: 2,
            }]
        );
    }

    #[test]
    fn test_later_reference_date_drops_expired_and_past_days() {
        let run = CoverageCalculator::new(DfcConfig::default())
            .calculate(&forecasts(), &batches(), date(2))
            .unwrap();

        let p1 = run.result("P1").unwrap();
        assert_eq!(p1.horizon_days, 2);
        assert_eq!(p1.days_forward_coverage, 2);

        // P2_B1 在 1/2 仍有效
        let p2 = run.result("P2").unwrap();
        assert_eq!(p2.total_inventory, Decimal::from(105));

        // P3 只有 1/1 的預測，時界為空
        let p3 = run.result("P3").unwrap();
        assert_eq!(p3.horizon_days, 0);
        assert_eq!(p3.days_forward_coverage, 0);
    }
}
