//! Minor-unit exponents per currency.
//!
//! Ledger amounts are integers in a currency's smallest unit, so every
//! conversion has to know how many of those make one major unit.

use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::constants::DEFAULT_MINOR_UNIT_EXPONENT;

static MINOR_UNIT_EXPONENTS: OnceLock<HashMap<&'static str, u32>> = OnceLock::new();

fn get_exponents() -> &'static HashMap<&'static str, u32> {
    MINOR_UNIT_EXPONENTS.get_or_init(|| {
        let mut map = HashMap::new();
        // Zero-decimal currencies
        map.insert("VND", 0);
        map.insert("JPY", 0);
        map.insert("KRW", 0);
        map.insert("IDR", 0);
        map.insert("CLP", 0);
        // Three-decimal currencies
        map.insert("KWD", 3);
        map.insert("BHD", 3);
        map.insert("OMR", 3);
        // Crypto quoted as a currency
        map.insert("BTC", 8);
        map
    })
}

/// Number of decimal places of the currency's smallest unit.
pub fn minor_unit_exponent(code: &str) -> u32 {
    get_exponents()
        .get(code)
        .copied()
        .unwrap_or(DEFAULT_MINOR_UNIT_EXPONENT)
}

/// Smallest units per major unit (`10^exponent`).
pub fn minor_unit_factor(code: &str) -> Decimal {
    Decimal::from(10_i64.pow(minor_unit_exponent(code)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_known_and_default_exponents() {
        assert_eq!(minor_unit_exponent("VND"), 0);
        assert_eq!(minor_unit_exponent("BTC"), 8);
        assert_eq!(minor_unit_exponent("USD"), 2);
        assert_eq!(minor_unit_exponent("XYZ"), 2);
        assert_eq!(minor_unit_factor("KWD"), dec!(1000));
        assert_eq!(minor_unit_factor("JPY"), Decimal::ONE);
    }
}
