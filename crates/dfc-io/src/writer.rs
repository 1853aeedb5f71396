//! CSV 表格輸出

use dfc_calc::TimelinePoint;
use dfc_core::config::{CoverageColumns, ForecastColumns, InventoryColumns};
use dfc_core::{CoverageResult, ForecastRecord, InventoryBatch};
use std::io::Write;

use crate::reader::csv_error;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// 輸出覆蓋結果表
pub fn write_coverage_table<W: Write>(
    writer: W,
    results: &[CoverageResult],
    columns: &CoverageColumns,
) -> dfc_core::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record([
        columns.product_id.as_str(),
        columns.days_forward_coverage.as_str(),
        columns.total_inventory.as_str(),
    ])
    .map_err(csv_error)?;

    for result in results {
        csv.write_record([
            result.product_id.clone(),
            result.days_forward_coverage.to_string(),
            result.total_inventory.normalize().to_string(),
        ])
        .map_err(csv_error)?;
    }

    csv.flush()?;
    Ok(())
}

/// 輸出預測表
pub fn write_forecast_table<W: Write>(
    writer: W,
    records: &[ForecastRecord],
    columns: &ForecastColumns,
) -> dfc_core::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record([
        columns.product_id.as_str(),
        columns.date.as_str(),
        columns.forecasted_sales.as_str(),
    ])
    .map_err(csv_error)?;

    for record in records {
        csv.write_record([
            record.product_id.clone(),
            record.date.format(DATE_FORMAT).to_string(),
            record.forecasted_demand.normalize().to_string(),
        ])
        .map_err(csv_error)?;
    }

    csv.flush()?;
    Ok(())
}

/// 輸出庫存表
pub fn write_inventory_table<W: Write>(
    writer: W,
    batches: &[InventoryBatch],
    columns: &InventoryColumns,
) -> dfc_core::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record([
        columns.product_id.as_str(),
        columns.batch_id.as_str(),
        columns.expiry_date.as_str(),
        columns.inventory.as_str(),
    ])
    .map_err(csv_error)?;

    for batch in batches {
        csv.write_record([
            batch.product_id.clone(),
            batch.batch_id.clone(),
            batch.expiry_date.format(DATE_FORMAT).to_string(),
            batch.quantity.normalize().to_string(),
        ])
        .map_err(csv_error)?;
    }

    csv.flush()?;
    Ok(())
}

/// 輸出單一產品的覆蓋時間序列
pub fn write_timeline<W: Write>(
    writer: W,
    product_id: &str,
    points: &[TimelinePoint],
) -> dfc_core::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["product_id", "date", "days_forward_coverage", "total_inventory"])
        .map_err(csv_error)?;

    for point in points {
        csv.write_record([
            product_id.to_string(),
            point.date.format(DATE_FORMAT).to_string(),
            point.days_forward_coverage.to_string(),
            point.total_inventory.normalize().to_string(),
        ])
        .map_err(csv_error)?;
    }

    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn test_write_coverage_table() {
        let results = vec![
            CoverageResult::new("P1", 2, Decimal::from(10), 3),
            CoverageResult::new("P2", 0, Decimal::from_str("2.50").unwrap(), 1),
        ];
        let mut buffer = Vec::new();

        write_coverage_table(&mut buffer, &results, &CoverageColumns::default()).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text,
            "product_id,days_forward_coverage,total_inventory\nP1,2,10\nP2,0,2.5\n"
        );
    }

    #[test]
    fn test_custom_coverage_headers() {
        let columns = CoverageColumns {
            product_id: "sku".to_string(),
            days_forward_coverage: "dfc".to_string(),
            total_inventory: "stock".to_string(),
        };
        let mut buffer = Vec::new();

        write_coverage_table(&mut buffer, &[], &columns).unwrap();

        assert_eq!(String::from_utf8(buffer).unwrap(), "sku,dfc,stock\n");
    }
}
