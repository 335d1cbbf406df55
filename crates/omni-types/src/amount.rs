//! Decimal amount parsing.
//!
//! Divisible tokens are expressed with up to 8 fractional digits and scaled
//! by 10^8; indivisible tokens are whole numbers. Signs are never accepted:
//! protocol amounts are magnitudes.

use crate::entities::MAX_INT_8_BYTES;
use crate::errors::AmountError;

/// Fractional digits carried by divisible tokens.
pub const DIVISIBLE_DECIMALS: usize = 8;

/// Parses a decimal string into minor units.
///
/// Zero is accepted here; whether zero is meaningful is decided by the
/// caller's validation rules.
pub fn parse_amount(input: &str, divisible: bool) -> Result<i64, AmountError> {
    let value = parse_scaled(input, divisible)?;
    i64::try_from(value).map_err(|_| AmountError::Overflow(input.trim().to_string()))
}

/// Parses a decimal string into minor units without applying the protocol
/// range.
///
/// Offer and trade commands range-check their amounts as a validation rule,
/// so their parser only rejects values wider than 8 bytes.
pub fn parse_amount_unchecked(input: &str, divisible: bool) -> Result<u64, AmountError> {
    let value = parse_scaled(input, divisible)?;
    u64::try_from(value).map_err(|_| AmountError::Overflow(input.trim().to_string()))
}

fn parse_scaled(input: &str, divisible: bool) -> Result<u128, AmountError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(AmountError::Empty);
    }

    let (int_part, frac_part) = s.split_once('.').unwrap_or((s, ""));

    let digits_only = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if (int_part.is_empty() && frac_part.is_empty())
        || !digits_only(int_part)
        || !digits_only(frac_part)
    {
        return Err(AmountError::Malformed(s.to_string()));
    }

    let max_decimals = if divisible { DIVISIBLE_DECIMALS } else { 0 };
    let significant_frac = frac_part.trim_end_matches('0');
    if significant_frac.len() > max_decimals {
        return Err(AmountError::TooManyDecimals {
            places: significant_frac.len(),
            max: max_decimals,
        });
    }

    let overflow = || AmountError::Overflow(s.to_string());
    let whole: u128 = if int_part.is_empty() {
        0
    } else {
        int_part.parse::<u64>().map_err(|_| overflow())?.into()
    };

    let mut fraction: u128 = 0;
    if max_decimals > 0 {
        let padded = format!("{:0<width$}", significant_frac, width = max_decimals);
        fraction = padded.parse::<u128>().map_err(|_| overflow())?;
    }

    Ok(whole * 10u128.pow(max_decimals as u32) + fraction)
}

/// True when `value` fits the protocol's representable range.
pub fn is_range_ok(value: u64) -> bool {
    value <= MAX_INT_8_BYTES as u64
}
