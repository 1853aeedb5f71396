//! 批次庫存帳（依效期先進先出）

use chrono::NaiveDate;
use dfc_core::{DataConsistencyWarning, InventoryBatch, TableKind, ValidationError};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashSet};

/// 單一產品的批次庫存帳
///
/// 批次恆按（效期升序、批次ID升序）排列，出庫一律依此順序，
/// 不受輸入順序或批量大小影響。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryLedger {
    product_id: String,
    batches: Vec<InventoryBatch>,
}

impl InventoryLedger {
    /// 創建空的庫存帳
    pub fn new(product_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            batches: Vec::new(),
        }
    }

    /// 由單一產品的批次建立庫存帳，排除參考日前已過期的批次
    pub fn from_batches<I>(
        product_id: impl Into<String>,
        batches: I,
        reference_date: NaiveDate,
    ) -> dfc_core::Result<Self>
    where
        I: IntoIterator<Item = InventoryBatch>,
    {
        let mut ledger = Self::new(product_id);
        for (idx, batch) in batches.into_iter().enumerate() {
            check_quantity(&batch, idx + 1)?;
            if !batch.is_expired(reference_date) {
                ledger.batches.push(batch);
            }
        }
        ledger.sort_batches();
        ledger.check_total()?;
        Ok(ledger)
    }

    /// 由原始批次記錄建立各產品的庫存帳
    ///
    /// 全部批次皆已過期的產品不會出現在結果中。
    pub fn build(
        batches: &[InventoryBatch],
        reference_date: NaiveDate,
    ) -> dfc_core::Result<LedgerBook> {
        let mut book = LedgerBook::default();
        let mut seen: HashSet<(&str, &str)> = HashSet::new();
        let mut reported: HashSet<(&str, &str)> = HashSet::new();

        for (idx, batch) in batches.iter().enumerate() {
            check_quantity(batch, idx + 1)?;

            let key = (batch.product_id.as_str(), batch.batch_id.as_str());
            if !seen.insert(key) && reported.insert(key) {
                book.warnings.push(DataConsistencyWarning::DuplicateBatchId {
                    product_id: batch.product_id.clone(),
                    batch_id: batch.batch_id.clone(),
                });
            }

            if batch.is_expired(reference_date) {
                continue;
            }

            book.ledgers
                .entry(batch.product_id.clone())
                .or_insert_with(|| InventoryLedger::new(batch.product_id.clone()))
                .batches
                .push(batch.clone());
        }

        for ledger in book.ledgers.values_mut() {
            ledger.sort_batches();
            ledger.check_total()?;
        }

        Ok(book)
    }

    /// 產品ID
    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    /// 依出庫順序排列的批次
    pub fn batches(&self) -> &[InventoryBatch] {
        &self.batches
    }

    /// 是否沒有任何批次
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// 指定日期仍未過期、未耗盡的總數量
    ///
    /// 建帳時已確認總量不溢位，任何子集或出庫後的加總都在範圍內。
    pub fn available_quantity(&self, as_of: NaiveDate) -> Decimal {
        self.batches.iter().map(|b| b.available(as_of)).sum()
    }

    /// 依效期先進先出出庫
    ///
    /// 只有效期不早於 `as_of` 的批次可出庫；先耗盡最早到期的批次，
    /// 再溢出到下一批。返回實際出庫量（庫存不足時小於請求量）。
    pub fn withdraw(&mut self, amount: Decimal, as_of: NaiveDate) -> Decimal {
        if amount <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let mut remaining = amount;
        for batch in self
            .batches
            .iter_mut()
            .filter(|b| !b.is_expired(as_of) && !b.is_exhausted())
        {
            if remaining <= Decimal::ZERO {
                break;
            }
            remaining -= batch.take_up_to(remaining);
        }

        amount - remaining
    }

    fn check_total(&self) -> dfc_core::Result<()> {
        self.batches
            .iter()
            .try_fold(Decimal::ZERO, |total, b| total.checked_add(b.quantity))
            .map(|_| ())
            .ok_or_else(|| {
                ValidationError::QuantityOverflow {
                    table: TableKind::Inventory,
                    product_id: self.product_id.clone(),
                    field: "inventory".to_string(),
                }
                .into()
            })
    }

    fn sort_batches(&mut self) {
        // 穩定排序：效期與批次ID都相同時保留輸入順序
        self.batches.sort_by(|a, b| {
            a.expiry_date
                .cmp(&b.expiry_date)
                .then_with(|| a.batch_id.cmp(&b.batch_id))
        });
    }
}

fn check_quantity(batch: &InventoryBatch, row: usize) -> dfc_core::Result<()> {
    if batch.quantity < Decimal::ZERO {
        return Err(ValidationError::NegativeValue {
            table: TableKind::Inventory,
            row,
            field: "inventory".to_string(),
            value: batch.quantity.to_string(),
        }
        .into());
    }
    Ok(())
}

/// 各產品庫存帳集合
#[derive(Debug, Clone, Default)]
pub struct LedgerBook {
    /// 產品ID → 庫存帳
    pub ledgers: BTreeMap<String, InventoryLedger>,

    /// 建帳時發現的資料一致性問題
    pub warnings: Vec<DataConsistencyWarning>,
}

impl LedgerBook {
    /// 取出產品的庫存帳（沒有則為空帳）
    pub fn take(&mut self, product_id: &str) -> InventoryLedger {
        self.ledgers
            .remove(product_id)
            .unwrap_or_else(|| InventoryLedger::new(product_id))
    }

    /// 有未過期庫存的產品
    pub fn product_ids(&self) -> impl Iterator<Item = &str> {
        self.ledgers.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dfc_core::DfcError;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    fn batch(batch_id: &str, expiry_day: u32, qty: i64) -> InventoryBatch {
        InventoryBatch::new("P1", batch_id, date(expiry_day), Decimal::from(qty))
    }

    #[test]
    fn test_build_excludes_expired_batches() {
        let batches = vec![
            InventoryBatch::new(
                "P4",
                "P4_B1",
                NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
                Decimal::from(50),
            ),
            batch("P1_B1", 10, 10),
        ];

        let book = InventoryLedger::build(&batches, date(1)).unwrap();

        assert_eq!(book.ledgers.len(), 1);
        assert!(book.ledgers.contains_key("P1"));
        assert!(!book.ledgers.contains_key("P4"));
        assert!(book.warnings.is_empty());
    }

    #[test]
    fn test_batches_ordered_by_expiry_then_batch_id() {
        let ledger = InventoryLedger::from_batches(
            "P1",
            vec![
                batch("B3", 20, 1),
                batch("B2", 5, 1),
                batch("B1", 20, 1),
            ],
            date(1),
        )
        .unwrap();

        let order: Vec<&str> = ledger.batches().iter().map(|b| b.batch_id.as_str()).collect();
        assert_eq!(order, vec!["B2", "B1", "B3"]);
    }

    #[test]
    fn test_withdraw_exhausts_earliest_expiry_first() {
        // 晚到期批次先插入，仍應先從早到期批次出庫
        let mut ledger = InventoryLedger::from_batches(
            "P1",
            vec![batch("LATE", 20, 10), batch("EARLY", 10, 10)],
            date(1),
        )
        .unwrap();

        let withdrawn = ledger.withdraw(Decimal::from(6), date(1));

        assert_eq!(withdrawn, Decimal::from(6));
        assert_eq!(ledger.batches()[0].batch_id, "EARLY");
        assert_eq!(ledger.batches()[0].quantity, Decimal::from(4));
        assert_eq!(ledger.batches()[1].quantity, Decimal::from(10));
    }

    #[test]
    fn test_withdraw_spills_into_next_batch() {
        let mut ledger = InventoryLedger::from_batches(
            "P1",
            vec![batch("B1", 10, 5), batch("B2", 20, 10)],
            date(1),
        )
        .unwrap();

        let withdrawn = ledger.withdraw(Decimal::from(8), date(1));

        assert_eq!(withdrawn, Decimal::from(8));
        assert_eq!(ledger.batches()[0].quantity, Decimal::ZERO);
        assert_eq!(ledger.batches()[1].quantity, Decimal::from(7));
        assert_eq!(ledger.available_quantity(date(1)), Decimal::from(7));
    }

    #[test]
    fn test_withdraw_skips_batches_expired_as_of_date() {
        let mut ledger = InventoryLedger::from_batches(
            "P1",
            vec![batch("B1", 2, 5), batch("B2", 20, 10)],
            date(1),
        )
        .unwrap();

        // 1/3 時 B1 已過期，只能從 B2 出庫
        let withdrawn = ledger.withdraw(Decimal::from(4), date(3));

        assert_eq!(withdrawn, Decimal::from(4));
        assert_eq!(ledger.batches()[0].quantity, Decimal::from(5));
        assert_eq!(ledger.batches()[1].quantity, Decimal::from(6));
        assert_eq!(ledger.available_quantity(date(3)), Decimal::from(6));
    }

    #[test]
    fn test_withdraw_shortfall_returns_partial_amount() {
        let mut ledger =
            InventoryLedger::from_batches("P1", vec![batch("B1", 10, 3)], date(1)).unwrap();

        let withdrawn = ledger.withdraw(Decimal::from(5), date(1));

        assert_eq!(withdrawn, Decimal::from(3));
        assert_eq!(ledger.available_quantity(date(1)), Decimal::ZERO);
    }

    #[test]
    fn test_withdraw_zero_is_noop() {
        let mut ledger =
            InventoryLedger::from_batches("P1", vec![batch("B1", 10, 3)], date(1)).unwrap();

        assert_eq!(ledger.withdraw(Decimal::ZERO, date(1)), Decimal::ZERO);
        assert_eq!(ledger.available_quantity(date(1)), Decimal::from(3));
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let err = InventoryLedger::build(&[batch("B1", 10, 1), batch("B2", 10, -1)], date(1))
            .unwrap_err();

        match err {
            DfcError::Validation(ValidationError::NegativeValue { row, .. }) => assert_eq!(row, 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_total_overflow_is_an_error() {
        let huge = |id: &str| InventoryBatch::new("P1", id, date(10), Decimal::MAX);

        let err = InventoryLedger::build(&[huge("B1"), huge("B2")], date(1)).unwrap_err();
        assert!(matches!(
            err,
            DfcError::Validation(ValidationError::QuantityOverflow {
                table: TableKind::Inventory,
                ..
            })
        ));

        let err = InventoryLedger::from_batches("P1", vec![huge("B1"), huge("B2")], date(1))
            .unwrap_err();
        assert!(matches!(err, DfcError::Validation(ValidationError::QuantityOverflow { .. })));
    }

    #[test]
    fn test_expired_batches_do_not_count_toward_overflow() {
        let batches = vec![
            InventoryBatch::new("P1", "B0", date(1), Decimal::MAX),
            InventoryBatch::new("P1", "B1", date(10), Decimal::MAX),
        ];

        let book = InventoryLedger::build(&batches, date(2)).unwrap();
        assert_eq!(book.ledgers["P1"].available_quantity(date(2)), Decimal::MAX);
    }

    #[test]
    fn test_duplicate_batch_id_warns_and_keeps_both() {
        let book = InventoryLedger::build(
            &[batch("B1", 10, 3), batch("B1", 12, 4), batch("B1", 14, 5)],
            date(1),
        )
        .unwrap();

        assert_eq!(book.warnings.len(), 1);
        assert_eq!(book.warnings[0].product_id(), "P1");
        assert_eq!(book.ledgers["P1"].batches().len(), 3);
        assert_eq!(book.ledgers["P1"].available_quantity(date(1)), Decimal::from(12));
    }

    #[test]
    fn test_take_missing_product_gives_empty_ledger() {
        let mut book = InventoryLedger::build(&[], date(1)).unwrap();
        let ledger = book.take("P3");

        assert!(ledger.is_empty());
        assert_eq!(ledger.product_id(), "P3");
        assert_eq!(ledger.available_quantity(date(1)), Decimal::ZERO);
    }
}
