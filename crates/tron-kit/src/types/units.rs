//! Token amount formatting.

use alloy_primitives::U256;

/// Default number of decimals assumed when a token does not report one.
pub const DEFAULT_DECIMALS: u8 = 18;

/// Format a raw token amount with the given number of decimals.
///
/// Trailing fractional zeros are trimmed.
///
/// ```
/// use alloy_primitives::U256;
/// use tron_kit::format_units;
///
/// assert_eq!(format_units(U256::from(1_500_000u64), 6), "1.5");
/// assert_eq!(format_units(U256::from(42u64), 0), "42");
/// ```
pub fn format_units(raw: U256, decimals: u8) -> String {
    let digits = raw.to_string();
    if decimals == 0 {
        return digits;
    }

    let decimals = decimals as usize;
    let padded = format!("{:0>width$}", digits, width = decimals + 1);
    let (whole, frac) = padded.split_at(padded.len() - decimals);
    let trimmed = frac.trim_end_matches('0');

    if trimmed.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, trimmed)
    }
}
