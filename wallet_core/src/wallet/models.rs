//! Wallet data models.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::{WalletError, WalletResult};

/// Number of fractional digits a balance carries.
pub const BALANCE_SCALE: u32 = 2;

/// Largest balance a `NUMERIC(18, 2)` column can hold: 9999999999999999.99
pub const MAX_BALANCE: Decimal = Decimal::from_parts(0xA763_FFFF, 0x0DE0_B6B3, 0, false, 2);

/// Maximum length of a wallet id, in bytes.
pub const MAX_WALLET_ID_LEN: usize = 255;

/// Round to two decimal places, midpoint away from zero.
///
/// This is the rounding PostgreSQL applies for `ROUND(numeric, 2)`, so the
/// in-memory and database stores quantize identically.
///
/// ```
/// use rust_decimal::Decimal;
/// use wallet_core::wallet::round2;
///
/// assert_eq!(round2("10.004".parse::<Decimal>().unwrap()).to_string(), "10.00");
/// assert_eq!(round2("10.005".parse::<Decimal>().unwrap()).to_string(), "10.01");
/// ```
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(BALANCE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Render a balance with exactly two decimals, truncating any extra digits.
pub fn format_balance(balance: Decimal) -> String {
    let floored = balance.round_dp_with_strategy(BALANCE_SCALE, RoundingStrategy::ToZero);
    format!("{floored:.2}")
}

/// Caller-supplied wallet identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletId(String);

impl WalletId {
    /// Validate and wrap a raw identifier.
    ///
    /// # Errors
    ///
    /// * `WalletError::InvalidWalletId` - Empty, longer than
    ///   [`MAX_WALLET_ID_LEN`], or containing `/` or control characters
    pub fn parse(raw: impl Into<String>) -> WalletResult<Self> {
        let raw = raw.into();

        if raw.is_empty() {
            return Err(WalletError::InvalidWalletId("wallet id is empty".to_string()));
        }
        if raw.len() > MAX_WALLET_ID_LEN {
            return Err(WalletError::InvalidWalletId(format!(
                "wallet id longer than {MAX_WALLET_ID_LEN} bytes"
            )));
        }
        if raw.chars().any(|c| c == '/' || c.is_control()) {
            return Err(WalletError::InvalidWalletId(format!(
                "wallet id {raw:?} contains forbidden characters"
            )));
        }

        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for WalletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for WalletId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for WalletId {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for WalletId {
    type Error = WalletError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<WalletId> for String {
    fn from(id: WalletId) -> Self {
        id.0
    }
}

/// Result of an atomic balance adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustOutcome {
    /// The delta was applied; carries the balance after the adjustment.
    Applied { balance: Decimal },
    /// The delta would have taken the balance below zero; nothing changed.
    InsufficientFunds,
}

impl AdjustOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, AdjustOutcome::Applied { .. })
    }
}
