// Fare decomposition: per-class money tokens bucketed into cabin tiers
use serde::Serialize;
use tracing::warn;

use crate::error::TransformError;
use crate::money::{parse_money_token, CurrencyAmount};
use crate::supplier::RawFare;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CabinTier {
    First,
    Business,
    Economy,
}

// Fare class codes the airline feed uses for each cabin
static FARE_CLASS_TIERS: [(&str, CabinTier); 3] = [
    ("FIF", CabinTier::First),
    ("CIF", CabinTier::Business),
    ("YIF", CabinTier::Economy),
];

impl CabinTier {
    pub fn from_fare_class(code: &str) -> Option<Self> {
        FARE_CLASS_TIERS
            .iter()
            .find(|(class, _)| *class == code)
            .map(|(_, tier)| *tier)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FareClassPrices {
    pub ticket: CurrencyAmount,
    pub booking_fee: CurrencyAmount,
    pub tax: CurrencyAmount,
}

impl TryFrom<&RawFare> for FareClassPrices {
    type Error = TransformError;

    fn try_from(fare: &RawFare) -> Result<Self, Self::Error> {
        Ok(FareClassPrices {
            ticket: parse_money_token(&fare.base_price)?,
            booking_fee: parse_money_token(&fare.fees)?,
            tax: parse_money_token(&fare.tax)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FarePrices {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<FareClassPrices>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business: Option<FareClassPrices>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub economy: Option<FareClassPrices>,
}

impl FarePrices {
    pub fn get(&self, tier: CabinTier) -> Option<&FareClassPrices> {
        match tier {
            CabinTier::First => self.first.as_ref(),
            CabinTier::Business => self.business.as_ref(),
            CabinTier::Economy => self.economy.as_ref(),
        }
    }

    // Replaces whatever the tier held before
    pub fn set(&mut self, tier: CabinTier, prices: FareClassPrices) {
        let slot = match tier {
            CabinTier::First => &mut self.first,
            CabinTier::Business => &mut self.business,
            CabinTier::Economy => &mut self.economy,
        };
        *slot = Some(prices);
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_none() && self.business.is_none() && self.economy.is_none()
    }
}

/// Buckets a flight's fares by cabin tier.
///
/// Unknown class codes are skipped. When a tier's code appears more than once,
/// the later fare wins. Fares with unknown codes are not parsed at all.
pub fn decompose_fares(fares: &[RawFare]) -> Result<FarePrices, TransformError> {
    let mut prices = FarePrices::default();

    for fare in fares {
        let Some(tier) = CabinTier::from_fare_class(&fare.class) else {
            warn!(fare_class = %fare.class, "skipping fare with unknown class code");
            continue;
        };
        prices.set(tier, FareClassPrices::try_from(fare)?);
    }

    Ok(prices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use test_case::test_case;

    fn fare(class: &str, base: &str, tax: &str, fees: &str) -> RawFare {
        RawFare {
            class: class.to_string(),
            base_price: base.to_string(),
            tax: tax.to_string(),
            fees: fees.to_string(),
        }
    }

    #[test_case("FIF", Some(CabinTier::First); "#1 first")]
    #[test_case("CIF", Some(CabinTier::Business); "#2 business")]
    #[test_case("YIF", Some(CabinTier::Economy); "#3 economy")]
    #[test_case("ZIF", None; "#4 unknown")]
    #[test_case("yif", None; "#5 codes are case sensitive")]
    fn test_fare_class_table(code: &str, expected: Option<CabinTier>) {
        assert_eq!(CabinTier::from_fare_class(code), expected);
    }

    #[test]
    fn test_all_three_tiers_populated() {
        let fares = vec![
            fare("FIF", "AED 2000.00", "AED 150.00", "AED 300.00"),
            fare("CIF", "AED 1500.00", "AED 100.00", "AED 200.00"),
            fare("YIF", "AED 500.00", "AED 50.00", "AED 30.00"),
        ];

        let prices = decompose_fares(&fares).unwrap();

        let first = prices.get(CabinTier::First).unwrap();
        assert_eq!(first.ticket, CurrencyAmount::new("AED", Decimal::new(200000, 2)));
        assert_eq!(first.tax, CurrencyAmount::new("AED", Decimal::new(15000, 2)));
        assert_eq!(first.booking_fee, CurrencyAmount::new("AED", Decimal::new(30000, 2)));
        assert!(prices.business.is_some());
        assert!(prices.economy.is_some());
    }

    #[test]
    fn test_unknown_class_is_skipped() {
        let fares = vec![
            fare("ZIF", "not money", "at all", ""),
            fare("YIF", "GBP 80.00", "GBP 10.00", "GBP 5.00"),
        ];

        let prices = decompose_fares(&fares).unwrap();

        assert!(prices.first.is_none());
        assert!(prices.business.is_none());
        assert_eq!(
            prices.economy.unwrap().ticket.amount,
            Decimal::new(8000, 2)
        );
    }

    #[test]
    fn test_duplicate_tier_keeps_later_fare() {
        let fares = vec![
            fare("CIF", "USD 900.00", "USD 90.00", "USD 9.00"),
            fare("CIF", "USD 950.00", "USD 95.00", "USD 9.50"),
        ];

        let prices = decompose_fares(&fares).unwrap();

        let business = prices.business.unwrap();
        assert_eq!(business.ticket.amount, Decimal::new(95000, 2));
        assert_eq!(business.tax.amount, Decimal::new(9500, 2));
        assert_eq!(business.booking_fee.amount, Decimal::new(950, 2));
        assert!(prices.first.is_none());
        assert!(prices.economy.is_none());
    }

    #[test]
    fn test_empty_fare_list() {
        let prices = decompose_fares(&[]).unwrap();
        assert!(prices.is_empty());
    }

    #[test]
    fn test_malformed_money_propagates() {
        let fares = vec![
            fare("FIF", "AED 2000.00", "AED 150.00", "AED 300.00"),
            fare("YIF", "AED 500.00", "AED", "AED 30.00"),
        ];

        let err = decompose_fares(&fares).unwrap_err();
        assert_eq!(err, TransformError::MalformedMoneyToken("AED".to_string()));
    }

    #[test]
    fn test_absent_tiers_are_omitted_from_json() {
        let fares = vec![fare("FIF", "AED 2000.00", "AED 150.00", "AED 300.00")];
        let json = serde_json::to_string(&decompose_fares(&fares).unwrap()).unwrap();

        assert!(json.starts_with("{\"first\":{\"ticket\":"));
        assert!(json.contains("\"bookingFee\":"));
        assert!(!json.contains("business"));
        assert!(!json.contains("economy"));
    }
}
