use crate::errors::{PoolScaleError, Result};
use alloy_primitives::U256;

fn malformed(value: &str, reason: &str) -> PoolScaleError {
    PoolScaleError::MalformedSnapshot(format!("{reason}: {value:?}"))
}

/// Parses a non-negative decimal numeral into a raw integer with `decimals`
/// implied decimal places, so `parse_fixed("1.05", 18)` is `1.05e18`.
///
/// Trailing fractional zeros are ignored; any remaining fractional digit past
/// `decimals` is an error rather than a silent truncation.
pub fn parse_fixed(value: &str, decimals: u8) -> Result<U256> {
    let value = value.trim();
    if value.starts_with('-') {
        return Err(malformed(value, "negative value"));
    }

    let (whole, fraction) = match value.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (value, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(malformed(value, "missing value"));
    }
    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(whole) || !is_digits(fraction) {
        return Err(malformed(value, "invalid decimal numeral"));
    }

    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > decimals as usize {
        return Err(malformed(value, "fractional component exceeds decimals"));
    }

    let mut digits = String::with_capacity(whole.len() + decimals as usize);
    digits.push_str(if whole.is_empty() { "0" } else { whole });
    digits.push_str(fraction);
    digits.extend(std::iter::repeat_n('0', decimals as usize - fraction.len()));

    U256::from_str_radix(&digits, 10).map_err(|_| malformed(value, "value exceeds 256 bits"))
}

/// Renders a raw integer with `decimals` implied decimal places, dropping
/// trailing fractional zeros (`format_fixed(1.5e18, 18) == "1.5"`).
pub fn format_fixed(value: U256, decimals: u8) -> String {
    let digits = value.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return digits;
    }

    let padded = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals - digits.len() + 1), digits)
    } else {
        digits
    };
    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{fraction}")
    }
}
