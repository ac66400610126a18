//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., reais, not centavos).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Format for display using the currency's local conventions
    /// (e.g., `R$ 1.299,90` or `$1,299.90`).
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let fixed = format!("{:.2}", rounded.abs());
        let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
        let (group_sep, decimal_sep) = self.currency_code.separators();

        let digits: Vec<char> = whole.chars().collect();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, digit) in digits.iter().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(group_sep);
            }
            grouped.push(*digit);
        }

        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };

        format!(
            "{sign}{}{grouped}{decimal_sep}{cents}",
            self.currency_code.symbol()
        )
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    BRL,
    USD,
    EUR,
}

impl CurrencyCode {
    /// Display prefix, including any separating space.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::BRL => "R$ ",
            Self::USD => "$",
            Self::EUR => "€",
        }
    }

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BRL => "BRL",
            Self::USD => "USD",
            Self::EUR => "EUR",
        }
    }

    /// Thousands and decimal separators.
    const fn separators(self) -> (char, char) {
        match self {
            Self::BRL | Self::EUR => ('.', ','),
            Self::USD => (',', '.'),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_brl() {
        let price = Price::new(Decimal::new(17990, 2), CurrencyCode::BRL);
        assert_eq!(price.display(), "R$ 179,90");
    }

    #[test]
    fn test_display_groups_thousands() {
        let price = Price::new(Decimal::new(129_990, 2), CurrencyCode::BRL);
        assert_eq!(price.display(), "R$ 1.299,90");

        let price = Price::new(Decimal::new(123_456_789, 2), CurrencyCode::USD);
        assert_eq!(price.display(), "$1,234,567.89");
    }

    #[test]
    fn test_display_pads_cents() {
        let price = Price::new(Decimal::new(1399, 1), CurrencyCode::BRL);
        assert_eq!(price.display(), "R$ 139,90");

        assert_eq!(Price::new(Decimal::ZERO, CurrencyCode::BRL).display(), "R$ 0,00");
    }

    #[test]
    fn test_display_rounds_half_cents_up() {
        let price = Price::new(Decimal::new(125, 3), CurrencyCode::BRL);
        assert_eq!(price.display(), "R$ 0,13");

        let price = Price::new(Decimal::new(-1_005, 3), CurrencyCode::BRL);
        assert_eq!(price.display(), "-R$ 1,01");
    }

    #[test]
    fn test_currency_code() {
        assert_eq!(CurrencyCode::default().code(), "BRL");
        assert_eq!(CurrencyCode::EUR.code(), "EUR");
    }
}
