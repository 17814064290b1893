//! Donation certificates ("捐赠证书").

use chrono::{Datelike, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::money::Amount;

/// Simulated "save to photos" delay.
pub const SAVE_DELAY: std::time::Duration = std::time::Duration::from_millis(1500);

pub const SAVED_NOTICE: &str = "证书已成功保存至相册！";
pub const SHARED_NOTICE: &str = "已同步到公益秀！";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    /// `SN` + issue year + six random digits.
    pub number: String,
    pub issue_date: String,
    pub amount: Amount,
}

impl Certificate {
    pub fn issue<R: Rng + ?Sized>(amount: Amount, today: NaiveDate, rng: &mut R) -> Self {
        let serial: u32 = rng.random_range(100_000..=999_999);
        Self::with_serial(amount, today, serial)
    }

    pub fn with_serial(amount: Amount, today: NaiveDate, serial: u32) -> Self {
        Self {
            number: format!("SN{}{serial:06}", today.year()),
            issue_date: format!("{}年{}月{}日", today.year(), today.month(), today.day()),
            amount,
        }
    }
}
