//! Fixed-point token amounts.
//!
//! User input is decimal text ("1.5"); contracts speak smallest units
//! (wei-like integers). Every price comparison happens on the integer form so
//! that "1", "1.0" and "1.000" are the same amount.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AmountError;

/// Smallest-unit token amount. Serialized as a decimal string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TokenAmount(pub u128);

impl TokenAmount {
    pub const ZERO: TokenAmount = TokenAmount(0);

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for TokenAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for TokenAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = <String as Deserialize>::deserialize(deserializer)?;
        raw.parse::<u128>()
            .map(TokenAmount)
            .map_err(serde::de::Error::custom)
    }
}

fn scale(decimals: u8) -> Result<u128, AmountError> {
    10u128
        .checked_pow(u32::from(decimals))
        .ok_or(AmountError::Overflow)
}

/// Parse decimal text into smallest units.
///
/// Accepts `"1"`, `"1.5"`, `"1."` and `".5"`. Trailing fractional zeros are
/// insignificant, so `"0.10"` parses with one decimal place available.
pub fn parse_units(input: &str, decimals: u8) -> Result<TokenAmount, AmountError> {
    if input.is_empty() {
        return Err(AmountError::Empty);
    }
    if input.starts_with('-') {
        return Err(AmountError::Negative);
    }

    let (whole, fraction) = match input.split_once('.') {
        Some((w, f)) => (w, f),
        None => (input, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(AmountError::Empty);
    }
    if let Some(c) = whole
        .chars()
        .chain(fraction.chars())
        .find(|c| !c.is_ascii_digit())
    {
        return Err(AmountError::InvalidCharacter(c));
    }

    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > usize::from(decimals) {
        return Err(AmountError::TooPrecise { decimals });
    }

    let unit = scale(decimals)?;
    let whole_value = if whole.is_empty() {
        0
    } else {
        whole.parse::<u128>().map_err(|_| AmountError::Overflow)?
    };
    let fraction_value = if fraction.is_empty() {
        0
    } else {
        // Left-aligned: ".25" with 18 decimals is 25 * 10^16.
        let digits = fraction.parse::<u128>().map_err(|_| AmountError::Overflow)?;
        digits * scale(decimals - fraction.len() as u8)?
    };

    whole_value
        .checked_mul(unit)
        .and_then(|w| w.checked_add(fraction_value))
        .map(TokenAmount)
        .ok_or(AmountError::Overflow)
}

/// Render smallest units as decimal text, keeping at least one fractional
/// digit (`"1.0"`, `"0.25"`). Zero decimals renders the bare integer.
pub fn format_units(amount: TokenAmount, decimals: u8) -> String {
    let Ok(unit) = scale(decimals) else {
        return amount.0.to_string();
    };
    if decimals == 0 {
        return amount.0.to_string();
    }
    let whole = amount.0 / unit;
    let fraction = amount.0 % unit;
    let padded = format!("{fraction:0width$}", width = usize::from(decimals));
    let trimmed = padded.trim_end_matches('0');
    let shown = if trimmed.is_empty() { "0" } else { trimmed };
    format!("{whole}.{shown}")
}

/// A denomination: symbol plus the number of decimals its contract uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub symbol: String,
    pub decimals: u8,
}

impl Currency {
    pub fn new(symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            symbol: symbol.into(),
            decimals,
        }
    }

    pub fn parse(&self, input: &str) -> Result<CurrencyValue, AmountError> {
        Ok(self.value(parse_units(input, self.decimals)?))
    }

    pub fn value(&self, amount: TokenAmount) -> CurrencyValue {
        CurrencyValue {
            value: amount,
            decimals: self.decimals,
            symbol: self.symbol.clone(),
        }
    }
}

/// Amount tagged with its denomination, as contracts report prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyValue {
    pub value: TokenAmount,
    pub decimals: u8,
    pub symbol: String,
}

impl CurrencyValue {
    pub fn display_value(&self) -> String {
        format_units(self.value, self.decimals)
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Another amount in the same denomination.
    pub fn with_value(&self, value: TokenAmount) -> CurrencyValue {
        CurrencyValue {
            value,
            decimals: self.decimals,
            symbol: self.symbol.clone(),
        }
    }
}

impl std::fmt::Display for CurrencyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.display_value(), self.symbol)
    }
}
