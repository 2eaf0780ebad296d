// Currency/amount tokens as delivered by the airline feed, e.g. "GBP 84.82"
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::TransformError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrencyAmount {
    pub currency: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,
}

impl CurrencyAmount {
    pub fn new(currency: impl Into<String>, amount: Decimal) -> Self {
        Self {
            currency: currency.into(),
            amount,
        }
    }
}

impl FromStr for CurrencyAmount {
    type Err = TransformError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        parse_money_token(token)
    }
}

/// Splits `"<code> <amount>"` into its currency code and exact decimal amount.
///
/// The code is returned verbatim; the amount keeps the scale it was written
/// with, so `"USD 123.40"` yields `123.40`.
pub fn parse_money_token(token: &str) -> Result<CurrencyAmount, TransformError> {
    let malformed = || TransformError::MalformedMoneyToken(token.to_string());

    let mut fields = token.split_whitespace();
    let (currency, amount) = match (fields.next(), fields.next(), fields.next()) {
        (Some(currency), Some(amount), None) => (currency, amount),
        _ => return Err(malformed()),
    };

    // rust_decimal skips '_' as a digit separator; the feed never uses one
    if amount.contains('_') {
        return Err(malformed());
    }
    let amount = if amount.contains(['e', 'E']) {
        Decimal::from_scientific(amount)
    } else {
        Decimal::from_str_exact(amount)
    }
    .map_err(|_| malformed())?;

    Ok(CurrencyAmount::new(currency, amount))
}
