//! Payment instruction rendering.
//!
//! The shop never touches money: the buyer performs an out-of-band SBP
//! transfer to the configured phone number and the operator verifies it by
//! hand. Instructions are a pure function of the requested amount, the
//! package name and static routing config, so the buyer can reopen the
//! payment view any number of times and see the same data.

use crate::{setting::Payment, Error, Result};
use serde::{Deserialize, Serialize};

/// Human-readable transfer routing handed to the buyer. Ephemeral: derived
/// per request, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentInstructions {
    pub bank: String,
    pub phone: String,
    /// amount as a display string, matching what the buyer must type in
    pub amount: String,
    pub package: String,
    /// SBP (NSPK) deep link opening the transfer form in a banking app
    pub sbp_link: String,
    /// short memo the buyer can attach to the transfer
    pub qr_data: String,
}

impl Payment {
    /// Render instructions for a transfer of `amount` for `package`.
    /// Pure and idempotent; fails on non-positive amount or empty package.
    pub fn instructions(&self, amount: i64, package: &str) -> Result<PaymentInstructions> {
        if amount <= 0 {
            return Err(Error::InvalidParam(format!(
                "amount must be positive, got {}",
                amount
            )));
        }
        let package = package.trim();
        if package.is_empty() {
            return Err(Error::InvalidParam("package is empty".to_owned()));
        }

        let sbp_link = format!(
            "https://qr.nspk.ru/proxyapp?type=01&bank={}&sum={}&cur=RUB&crc=1234",
            self.sbp_bank_id, amount
        );

        Ok(PaymentInstructions {
            bank: self.bank.clone(),
            phone: self.phone.clone(),
            amount: amount.to_string(),
            package: package.to_owned(),
            sbp_link,
            qr_data: format!("Transfer {} RUB for {}", amount, package),
        })
    }
}
