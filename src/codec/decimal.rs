//! Decimal columns
//!
//! Decimals cross the bridge as text. The canonical form has no exponent,
//! no leading zeros in the integer part, exactly `scale` fractional digits
//! (rounded half away from zero), and no sign on zero.
//!
//! `DECIMAL(p, s)` holds at most `p - s` integer digits; `p = 0` leaves the
//! integer part unbounded.

use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode};

/// Declared shape of a decimal column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalColumn {
    precision: u32,
    scale: u32,
    unsigned: bool,
}

/// Why a value does not fit its column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecimalFit {
    /// Not a decimal literal
    Malformed,
    /// More integer digits than the column holds, or negative for unsigned
    OutOfRange,
}

impl DecimalColumn {
    /// `None` for a negative precision or scale
    pub fn new(precision: i32, scale: i32, unsigned: bool) -> Option<Self> {
        Some(Self {
            precision: u32::try_from(precision).ok()?,
            scale: u32::try_from(scale).ok()?,
            unsigned,
        })
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    fn integer_digits(&self) -> Option<u32> {
        (self.precision > 0).then(|| self.precision.saturating_sub(self.scale))
    }

    /// Canonical text of `text` rounded to the column scale; out-of-range
    /// values are rejected.
    pub fn canonical(&self, text: &str) -> Result<String, DecimalFit> {
        let value = self.rounded(text).ok_or(DecimalFit::Malformed)?;
        if self.unsigned && value < BigDecimal::from(0) {
            return Err(DecimalFit::OutOfRange);
        }
        if let Some(limit) = self.integer_digits() {
            if integer_digit_count(&value, self.scale) > limit {
                return Err(DecimalFit::OutOfRange);
            }
        }
        Ok(render(&value, self.scale))
    }

    /// Canonical text of `text` rounded to the column scale and saturated at
    /// the column's bounds.
    pub fn clamped(&self, text: &str) -> Option<String> {
        let value = self.rounded(text)?;
        let value = match self.bounds() {
            Some((min, max)) => value.clamp(min, max),
            None if self.unsigned => value.max(BigDecimal::from(0)),
            None => value,
        };
        Some(render(&value, self.scale))
    }

    fn rounded(&self, text: &str) -> Option<BigDecimal> {
        let value = BigDecimal::from_str(text.trim()).ok()?;
        Some(value.with_scale_round(i64::from(self.scale), RoundingMode::HalfUp))
    }

    /// Smallest and largest values the column holds, when bounded
    fn bounds(&self) -> Option<(BigDecimal, BigDecimal)> {
        let integer = "9".repeat(self.integer_digits()? as usize);
        let fraction = "9".repeat(self.scale as usize);
        let literal = match (integer.is_empty(), fraction.is_empty()) {
            (true, true) => "0".to_string(),
            (false, true) => integer,
            (true, false) => format!("0.{}", fraction),
            (false, false) => format!("{}.{}", integer, fraction),
        };
        let max = BigDecimal::from_str(&literal).ok()?;
        let min = if self.unsigned {
            BigDecimal::from(0)
        } else {
            -max.clone()
        };
        Some((min, max))
    }
}

/// Canonicalises `text` at `scale` fractional digits, without a precision
/// limit.
///
/// Returns `None` when `text` is not a decimal literal.
pub fn canonical_decimal(text: &str, scale: usize) -> Option<String> {
    let scale = u32::try_from(scale).ok()?;
    let column = DecimalColumn {
        precision: 0,
        scale,
        unsigned: false,
    };
    column.canonical(text).ok()
}

/// Unscaled digits of `value` at `scale`, and whether it is negative
fn digits_at(value: &BigDecimal, scale: u32) -> (bool, String) {
    let (digits, _) = value.with_scale(i64::from(scale)).as_bigint_and_exponent();
    let text = digits.to_string();
    match text.strip_prefix('-') {
        Some(magnitude) => (true, magnitude.to_string()),
        None => (false, text),
    }
}

/// Digits left of the point in `value` at `scale`
fn integer_digit_count(value: &BigDecimal, scale: u32) -> u32 {
    let (_, magnitude) = digits_at(value, scale);
    if magnitude == "0" {
        return 0;
    }
    u32::try_from(magnitude.len())
        .unwrap_or(u32::MAX)
        .saturating_sub(scale)
}

/// Plain positional rendering of `value` at `scale`
fn render(value: &BigDecimal, scale: u32) -> String {
    let (negative, magnitude) = digits_at(value, scale);

    let scale = scale as usize;
    let padded = if magnitude.len() <= scale {
        format!("{}{}", "0".repeat(scale + 1 - magnitude.len()), magnitude)
    } else {
        magnitude
    };
    let (int_part, frac_part) = padded.split_at(padded.len() - scale);

    let mut out = String::with_capacity(padded.len() + 2);
    if negative {
        out.push('-');
    }
    out.push_str(int_part);
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}
