//! Cross-platform ratios with explicit zero-denominator variants.

use std::fmt;

/// Rounds to four decimal places, exact ties to even.
///
/// Rounds the exact decimal expansion of `value` rather than `value * 1e4`,
/// so `1/32 = 0.03125` becomes `0.0312`. Applied wherever a value is
/// computed so repeated runs over the same input produce bit-identical
/// output. Non-finite values come back unchanged.
pub fn round4(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.4}", value).parse().unwrap_or(value)
}

/// Platform A value divided by platform B value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ratio {
    /// `b > 0`: the quotient rounded to four decimals.
    Defined(f64),
    /// `b == 0` while `a > 0`. Conceptually infinite; A dominates.
    Undefined,
    /// Both values are zero. Reads as exactly 0.
    ZeroOverZero,
}

impl Ratio {
    /// A quotient too large for an `f64` is `Undefined` as well.
    pub fn of(a: f64, b: f64) -> Ratio {
        if b > 0.0 {
            let quotient = a / b;
            if quotient.is_finite() {
                Ratio::Defined(round4(quotient))
            } else {
                Ratio::Undefined
            }
        } else if a > 0.0 {
            Ratio::Undefined
        } else {
            Ratio::ZeroOverZero
        }
    }

    /// Numeric reading of the ratio. `Undefined` reads as infinity.
    pub fn value(self) -> f64 {
        match self {
            Ratio::Defined(v) => v,
            Ratio::Undefined => f64::INFINITY,
            Ratio::ZeroOverZero => 0.0,
        }
    }

    /// The value to feed into an average, if this ratio takes part in one.
    ///
    /// Sentinels never do, and neither does a defined ratio of exactly zero.
    pub fn averageable(self) -> Option<f64> {
        match self {
            Ratio::Defined(v) if v != 0.0 => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ratio::Defined(v) => write!(f, "{:.4}", v),
            Ratio::Undefined => f.write_str("inf"),
            Ratio::ZeroOverZero => f.write_str("0"),
        }
    }
}

/// Arithmetic mean of the averageable ratios, rounded to four decimals.
/// Returns 0 when nothing is eligible.
pub fn mean_ratio<I>(ratios: I) -> f64
where
    I: IntoIterator<Item = Ratio>,
{
    let values: Vec<f64> = ratios.into_iter().filter_map(Ratio::averageable).collect();
    if values.is_empty() {
        return 0.0;
    }
    let count = values.len() as f64;
    let sum: f64 = values.iter().sum();
    let mean = if sum.is_finite() {
        sum / count
    } else {
        // The sum of huge ratios overflowed; the scaled sum cannot.
        values.iter().map(|v| v / count).sum()
    };
    round4(mean)
}
