use alloy::primitives::U256;

/// Renders a raw token amount as a human decimal string, `amount / 10^decimals`.
///
/// Works on the decimal digits directly so any `decimals` value keeps full precision.
/// Trailing fractional zeros are trimmed, but at least one fractional digit is kept
/// (`1.0`, never `1` or `1.`).
pub fn format_units(amount: U256, decimals: u8) -> String {
    let digits = amount.to_string();
    let decimals = decimals as usize;

    let (integer, fraction) = if digits.len() > decimals {
        let (i, f) = digits.split_at(digits.len() - decimals);
        (i.to_owned(), f.to_owned())
    } else {
        ("0".to_owned(), format!("{digits:0>decimals$}"))
    };

    let fraction = fraction.trim_end_matches('0');
    let fraction = if fraction.is_empty() { "0" } else { fraction };

    format!("{integer}.{fraction}")
}
