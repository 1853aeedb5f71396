//! CSV 表格讀取與驗證

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use dfc_core::config::{ForecastColumns, InventoryColumns};
use dfc_core::{DfcError, ForecastRecord, InventoryBatch, TableKind, ValidationError};
use rust_decimal::Decimal;
use std::io::Read;
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// 讀取預測表
///
/// 欄位名稱依 `columns` 映射；任一列驗證失敗即返回錯誤，不返回部分結果。
pub fn read_forecast_table<R: Read>(
    reader: R,
    columns: &ForecastColumns,
) -> dfc_core::Result<Vec<ForecastRecord>> {
    let mut table = TableReader::new(reader, TableKind::Forecast)?;
    let product_idx = table.column(&columns.product_id)?;
    let date_idx = table.column(&columns.date)?;
    let demand_idx = table.column(&columns.forecasted_sales)?;

    let mut records = Vec::new();
    for row in table.rows() {
        let row = row?;
        records.push(ForecastRecord::new(
            row.text(product_idx, &columns.product_id)?,
            row.date(date_idx, &columns.date)?,
            row.quantity(demand_idx, &columns.forecasted_sales)?,
        ));
    }

    tracing::debug!("讀取預測表 {} 筆", records.len());
    Ok(records)
}

/// 讀取庫存表
pub fn read_inventory_table<R: Read>(
    reader: R,
    columns: &InventoryColumns,
) -> dfc_core::Result<Vec<InventoryBatch>> {
    let mut table = TableReader::new(reader, TableKind::Inventory)?;
    let product_idx = table.column(&columns.product_id)?;
    let batch_idx = table.column(&columns.batch_id)?;
    let expiry_idx = table.column(&columns.expiry_date)?;
    let qty_idx = table.column(&columns.inventory)?;

    let mut batches = Vec::new();
    for row in table.rows() {
        let row = row?;
        batches.push(InventoryBatch::new(
            row.text(product_idx, &columns.product_id)?,
            row.text(batch_idx, &columns.batch_id)?,
            row.date(expiry_idx, &columns.expiry_date)?,
            row.quantity(qty_idx, &columns.inventory)?,
        ));
    }

    tracing::debug!("讀取庫存表 {} 筆", batches.len());
    Ok(batches)
}

pub(crate) fn csv_error(err: csv::Error) -> DfcError {
    match err.into_kind() {
        csv::ErrorKind::Io(io) => DfcError::Io(io),
        other => DfcError::Csv(format!("{:?}", other)),
    }
}

struct TableReader<R: Read> {
    kind: TableKind,
    headers: Vec<String>,
    reader: csv::Reader<R>,
}

impl<R: Read> TableReader<R> {
    fn new(reader: R, kind: TableKind) -> dfc_core::Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允許行長度不一致，缺欄於取值時報錯
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
            .collect();

        Ok(Self {
            kind,
            headers,
            reader,
        })
    }

    fn column(&self, name: &str) -> dfc_core::Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| {
                ValidationError::MissingColumn {
                    table: self.kind,
                    column: name.to_string(),
                }
                .into()
            })
    }

    /// 逐列讀取，跳過空白列
    ///
    /// 列號取自檔案實際行號減去表頭行，空白列仍計入。
    fn rows(&mut self) -> impl Iterator<Item = dfc_core::Result<Row>> + '_ {
        let kind = self.kind;
        self.reader
            .records()
            .enumerate()
            .filter_map(move |(idx, result)| match result {
                Ok(record) if record.iter().all(|v| v.trim().is_empty()) => None,
                Ok(record) => {
                    let number = record
                        .position()
                        .map(|pos| pos.line().saturating_sub(1) as usize)
                        .unwrap_or(idx + 1);
                    Some(Ok(Row {
                        kind,
                        number,
                        record,
                    }))
                }
                Err(err) => Some(Err(csv_error(err))),
            })
    }
}

struct Row {
    kind: TableKind,
    number: usize,
    record: StringRecord,
}

impl Row {
    fn raw(&self, idx: usize, field: &str) -> dfc_core::Result<&str> {
        match self.record.get(idx).map(str::trim) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(ValidationError::EmptyField {
                table: self.kind,
                row: self.number,
                field: field.to_string(),
            }
            .into()),
        }
    }

    fn text(&self, idx: usize, field: &str) -> dfc_core::Result<String> {
        self.raw(idx, field).map(str::to_string)
    }

    fn date(&self, idx: usize, field: &str) -> dfc_core::Result<NaiveDate> {
        let value = self.raw(idx, field)?;
        NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
            ValidationError::InvalidDate {
                table: self.kind,
                row: self.number,
                field: field.to_string(),
                value: value.to_string(),
            }
            .into()
        })
    }

    /// 非負數量；接受整數、小數與科學記號
    fn quantity(&self, idx: usize, field: &str) -> dfc_core::Result<Decimal> {
        let value = self.raw(idx, field)?;
        let number = Decimal::from_str(value)
            .or_else(|_| Decimal::from_scientific(value))
            .map_err(|_| ValidationError::InvalidNumber {
                table: self.kind,
                row: self.number,
                field: field.to_string(),
                value: value.to_string(),
            })?;

        if number < Decimal::ZERO {
            return Err(ValidationError::NegativeValue {
                table: self.kind,
                row: self.number,
                field: field.to_string(),
                value: value.to_string(),
            }
            .into());
        }

        Ok(number.normalize())
    }
}
