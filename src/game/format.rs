//! Numeric helpers: logarithms, multiplier folding and display formatting.
//!
//! Everything here is pure. The formatting functions are display-only and
//! never fail: NaN, infinities and negative values produce a best-effort
//! string instead of an error.

use super::config::DAYS_PER_YEAR;

/// SI-style suffixes, one per power of 1000.
const UNITS: [&str; 10] = ["", "k", "M", "B", "T", "q", "Q", "Sx", "Sp", "Oc"];

/// Logarithm of `value` in an arbitrary `base`.
pub fn log_base(base: f64, value: f64) -> f64 {
    value.ln() / base.ln()
}

/// Multiply `value` by every factor and round to the nearest integer.
pub fn apply_multipliers<I>(value: f64, factors: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let multiplier: f64 = factors.into_iter().product();
    (value * multiplier).round()
}

/// Compact number formatting: values of 1000 and above get one decimal and a
/// suffix (`1500` → `"1.5k"`), smaller values are returned unsuffixed.
pub fn format(number: f64) -> String {
    if !number.is_finite() {
        return number.to_string();
    }
    let magnitude = number.abs();
    if magnitude < 1000.0 {
        return number.to_string();
    }
    let tier = ((magnitude.log10() / 3.0).floor() as usize).min(UNITS.len() - 1);
    let scaled = number / 10f64.powi(3 * tier as i32);
    format!("{:.1}{}", scaled, UNITS[tier])
}

/// Coin denominations, largest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum Denomination {
    Platinum,
    Gold,
    Silver,
    Copper,
}

impl Denomination {
    pub const ALL: [Denomination; 4] = [
        Denomination::Platinum,
        Denomination::Gold,
        Denomination::Silver,
        Denomination::Copper,
    ];

    /// Value of one coin of this denomination, in copper.
    pub fn value(self) -> f64 {
        match self {
            Denomination::Platinum => 1e6,
            Denomination::Gold => 1e4,
            Denomination::Silver => 1e2,
            Denomination::Copper => 1.0,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Denomination::Platinum => "p",
            Denomination::Gold => "g",
            Denomination::Silver => "s",
            Denomination::Copper => "c",
        }
    }

    /// Colour the renderer paints this denomination with.
    pub fn color(self) -> &'static str {
        match self {
            Denomination::Platinum => "#79b9c7",
            Denomination::Gold => "#E5C100",
            Denomination::Silver => "#a8a8a8",
            Denomination::Copper => "#a15c2f",
        }
    }
}

/// One visible chunk of a coin amount, e.g. `12g`.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CoinPart {
    pub amount: f64,
    pub denomination: Denomination,
    pub color: &'static str,
}

impl CoinPart {
    fn new(amount: f64, denomination: Denomination) -> Self {
        Self {
            amount,
            denomination,
            color: denomination.color(),
        }
    }

    pub fn text(&self) -> String {
        format!("{}{}", format(self.amount), self.denomination.symbol())
    }
}

/// Split a coin amount into denominations. Zero chunks are omitted, except
/// that copper is always present when nothing else is.
pub fn coin_parts(coins: f64) -> Vec<CoinPart> {
    if !coins.is_finite() {
        return Vec::new();
    }
    let mut left_over = coins.abs().floor();
    let mut parts = Vec::new();
    for denomination in &Denomination::ALL[..3] {
        let amount = (left_over / denomination.value()).floor();
        left_over -= amount * denomination.value();
        if amount > 0.0 {
            parts.push(CoinPart::new(amount, *denomination));
        }
    }
    if left_over > 0.0 || parts.is_empty() {
        parts.push(CoinPart::new(left_over, Denomination::Copper));
    }
    parts
}

/// Coins as text, e.g. `"1p 20g 5s"`.
pub fn format_coins(coins: f64) -> String {
    if !coins.is_finite() {
        return format!("{}c", coins);
    }
    let text = coin_parts(coins)
        .iter()
        .map(CoinPart::text)
        .collect::<Vec<_>>()
        .join(" ");
    if coins < 0.0 {
        format!("-{}", text)
    } else {
        text
    }
}

/// Whole years contained in `days`.
pub fn days_to_years(days: f64) -> u32 {
    if days.is_finite() && days > 0.0 {
        (days / DAYS_PER_YEAR).floor() as u32
    } else {
        0
    }
}

/// Day within the current year.
pub fn day_of_year(days: f64) -> u32 {
    if !days.is_finite() || days <= 0.0 {
        return 0;
    }
    (days - days_to_years(days) as f64 * DAYS_PER_YEAR).floor() as u32
}

/// `"Age 14 Day 0"`.
pub fn format_age(days: f64) -> String {
    format!("Age {} Day {}", days_to_years(days), day_of_year(days))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_format_never_panics(n in proptest::num::f64::ANY) {
            let _ = format(n);
            let _ = format_coins(n);
        }

        #[test]
        fn prop_format_below_thousand_is_unsuffixed(n in 0u32..1000) {
            prop_assert_eq!(format(n as f64), n.to_string());
        }

        #[test]
        fn prop_format_above_thousand_has_one_decimal_and_suffix(n in 1000.0f64..1e29) {
            let s = format(n);
            let suffix_start = s.find(|c: char| c.is_ascii_alphabetic()).unwrap();
            let (number, suffix) = s.split_at(suffix_start);
            prop_assert!(UNITS.contains(&suffix), "got: {}", s);
            let decimals = number.split('.').nth(1).unwrap_or("");
            prop_assert_eq!(decimals.len(), 1, "got: {}", s);
        }

        #[test]
        fn prop_coin_parts_sum_to_floor(coins in 0.0f64..1e12) {
            let total: f64 = coin_parts(coins)
                .iter()
                .map(|p| p.amount * p.denomination.value())
                .sum();
            prop_assert_eq!(total, coins.floor());
        }
    }
}
