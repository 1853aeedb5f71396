//! 庫存批次模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 庫存批次
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryBatch {
    /// 產品ID
    pub product_id: String,

    /// 批次ID（同產品內唯一）
    pub batch_id: String,

    /// 效期
    pub expiry_date: NaiveDate,

    /// 剩餘數量（只會因出庫而減少，不會為負）
    pub quantity: Decimal,
}

impl InventoryBatch {
    /// 創建新的庫存批次
    pub fn new(
        product_id: impl Into<String>,
        batch_id: impl Into<String>,
        expiry_date: NaiveDate,
        quantity: Decimal,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            batch_id: batch_id.into(),
            expiry_date,
            quantity,
        }
    }

    /// 檢查在指定日期是否已過期（效期當天仍可用）
    pub fn is_expired(&self, as_of: NaiveDate) -> bool {
        self.expiry_date < as_of
    }

    /// 檢查是否已耗盡
    pub fn is_exhausted(&self) -> bool {
        self.quantity <= Decimal::ZERO
    }

    /// 指定日期的可用數量
    pub fn available(&self, as_of: NaiveDate) -> Decimal {
        if self.is_expired(as_of) {
            Decimal::ZERO
        } else {
            self.quantity
        }
    }

    /// 從本批次取出最多 `amount`，返回實際取出量
    pub fn take_up_to(&mut self, amount: Decimal) -> Decimal {
        if amount <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let taken = amount.min(self.quantity);
        self.quantity -= taken;
        taken
    }
}
