//! 預測序列

use chrono::NaiveDate;
use dfc_core::{DataConsistencyWarning, ForecastRecord, TableKind, ValidationError};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// 單日需求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub demand: Decimal,
}

impl ForecastDay {
    /// 零需求日視為必然覆蓋
    pub fn is_zero_demand(&self) -> bool {
        self.demand <= Decimal::ZERO
    }
}

/// 單一產品依日期升序的預測序列（僅含參考日及之後）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForecastStream {
    product_id: String,
    days: Vec<ForecastDay>,
}

impl ForecastStream {
    /// 由單一產品的預測記錄建立序列
    ///
    /// 早於參考日的記錄被略過；同日多筆記錄加總，並返回對應警告。
    /// 同日加總超出 `Decimal` 範圍時返回 `QuantityOverflow`。
    pub fn from_records<'a, I>(
        product_id: impl Into<String>,
        records: I,
        reference_date: NaiveDate,
    ) -> dfc_core::Result<(Self, Vec<DataConsistencyWarning>)>
    where
        I: IntoIterator<Item = &'a ForecastRecord>,
    {
        let product_id = product_id.into();
        let mut merged: BTreeMap<NaiveDate, (Decimal, usize)> = BTreeMap::new();

        for record in records {
            if !record.is_on_or_after(reference_date) {
                continue;
            }
            let entry = merged.entry(record.date).or_insert((Decimal::ZERO, 0));
            entry.0 = entry
                .0
                .checked_add(record.forecasted_demand)
                .ok_or_else(|| ValidationError::QuantityOverflow {
                    table: TableKind::Forecast,
                    product_id: product_id.clone(),
                    field: "forecasted_sales".to_string(),
                })?;
            entry.1 += 1;
        }

        let warnings = merged
            .iter()
            .filter(|(_, (_, rows))| *rows > 1)
            .map(|(date, (_, rows))| DataConsistencyWarning::DuplicateForecastDate {
                product_id: product_id.clone(),
                date: *date,
                merged_rows: *rows,
            })
            .collect();

        let days = merged
            .into_iter()
            .map(|(date, (demand, _))| ForecastDay { date, demand })
            .collect();

        Ok((Self { product_id, days }, warnings))
    }

    /// 由原始預測記錄建立各產品的預測序列
    ///
    /// 預測表中出現過的產品都會有序列，即使參考日後沒有任何日期。
    pub fn build(
        records: &[ForecastRecord],
        reference_date: NaiveDate,
    ) -> dfc_core::Result<ForecastBook> {
        let mut grouped: BTreeMap<&str, Vec<&ForecastRecord>> = BTreeMap::new();

        for (idx, record) in records.iter().enumerate() {
            if record.forecasted_demand < Decimal::ZERO {
                return Err(ValidationError::NegativeValue {
                    table: TableKind::Forecast,
                    row: idx + 1,
                    field: "forecasted_sales".to_string(),
                    value: record.forecasted_demand.to_string(),
                }
                .into());
            }
            grouped
                .entry(record.product_id.as_str())
                .or_default()
                .push(record);
        }

        let mut book = ForecastBook::default();
        for (product_id, product_records) in grouped {
            let (stream, warnings) =
                Self::from_records(product_id, product_records, reference_date)?;
            book.warnings.extend(warnings);
            book.streams.insert(product_id.to_string(), stream);
        }

        Ok(book)
    }

    /// 產品ID
    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    /// 依日期升序的每日需求
    pub fn days(&self) -> &[ForecastDay] {
        &self.days
    }

    /// 預測時界長度（不同日期數）
    pub fn horizon_days(&self) -> u32 {
        self.days.len() as u32
    }

    /// 是否沒有任何預測日
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl<'a> IntoIterator for &'a ForecastStream {
    type Item = &'a ForecastDay;
    type IntoIter = std::slice::Iter<'a, ForecastDay>;

    fn into_iter(self) -> Self::IntoIter {
        self.days.iter()
    }
}

/// 各產品預測序列集合
#[derive(Debug, Clone, Default)]
pub struct ForecastBook {
    /// 產品ID → 預測序列
    pub streams: BTreeMap<String, ForecastStream>,

    /// 合併同日預測時產生的警告
    pub warnings: Vec<DataConsistencyWarning>,
}

impl ForecastBook {
    /// 預測表中的產品
    pub fn product_ids(&self) -> impl Iterator<Item = &str> {
        self.streams.keys().map(String::as_str)
    }

    /// 是否包含指定產品
    pub fn contains(&self, product_id: &str) -> bool {
        self.streams.contains_key(product_id)
    }
}
