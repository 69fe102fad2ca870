//! Account hash total carried in the batch trailer.
//!
//! Each account is reduced to an 11-digit number, the absolute differences
//! between every receiving account and the originating account are summed,
//! and the sum is cut down to its leading 11 digits.

use crate::error::{GiroError, Result};
use crate::records::{BatchHeader, DetailRecord};

/// Length of a normalized account number.
pub const NORMALIZED_ACCOUNT_LEN: usize = 11;

/// Number of leading digits of the summed differences kept in the trailer.
pub const HASH_DIGITS: u32 = 11;

/// Maps an account identifier to an 11-character numeric string.
///
/// Keeps at most the first 11 characters, replaces letters with `0` and
/// right-pads with `0`.
///
/// ```
/// use giro_batch::checksum::normalize_account;
///
/// assert_eq!(normalize_account("AB1234"), "00123400000");
/// assert_eq!(normalize_account("0259001103"), "02590011030");
/// ```
pub fn normalize_account(account: &str) -> String {
    let mut normalized: String = account
        .chars()
        .take(NORMALIZED_ACCOUNT_LEN)
        .map(|c| if c.is_alphabetic() { '0' } else { c })
        .collect();
    let len = normalized.chars().count();
    normalized.extend(std::iter::repeat('0').take(NORMALIZED_ACCOUNT_LEN - len));
    normalized
}

/// Normalized account as an integer.
///
/// Fails if anything other than a digit is left after normalization.
pub fn account_number(field: &'static str, account: &str) -> Result<u64> {
    let normalized = normalize_account(account);
    if !normalized.bytes().all(|b| b.is_ascii_digit()) {
        return Err(GiroError::InvalidField {
            field,
            value: account.to_string(),
            reason: format!("normalized account {:?} is not numeric", normalized),
        });
    }
    normalized.parse::<u64>().map_err(|e| GiroError::InvalidField {
        field,
        value: account.to_string(),
        reason: e.to_string(),
    })
}

/// Keeps the leading `digits` decimal digits of `value`.
///
/// This drops trailing digits; it is not a modulo. `123456789012` truncated
/// to 11 digits is `12345678901`.
pub fn truncate_leading_digits(value: u128, digits: u32) -> u128 {
    let limit = 10u128.pow(digits);
    let mut truncated = value;
    while truncated >= limit {
        truncated /= 10;
    }
    truncated
}

/// Computes the account hash total for a header and its details.
pub fn compute_ac_hash_total(header: &BatchHeader, details: &[DetailRecord]) -> Result<u64> {
    let originating = account_number("originating_account", &header.originating_account)?;

    let mut sum: u128 = 0;
    for detail in details {
        let receiving = account_number("receiving_account", &detail.receiving_account)?;
        sum += u128::from(receiving.abs_diff(originating));
    }

    let hash = truncate_leading_digits(sum, HASH_DIGITS);
    // Below 10^11 after truncation.
    u64::try_from(hash).map_err(|_| GiroError::Overflow("account hash total"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(account: &str) -> BatchHeader {
        BatchHeader {
            originating_account: account.to_string(),
            ..Default::default()
        }
    }

    fn detail(account: &str) -> DetailRecord {
        DetailRecord {
            receiving_account: account.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_replaces_letters_and_pads() {
        assert_eq!(normalize_account("AB1234"), "00123400000");
        assert_eq!(normalize_account("0259001103"), "02590011030");
        assert_eq!(normalize_account(""), "00000000000");
    }

    #[test]
    fn test_normalize_keeps_first_eleven_characters() {
        assert_eq!(normalize_account("123456789012345"), "12345678901");
        assert_eq!(normalize_account("12345678901X"), "12345678901");
        assert_eq!(normalize_account("X2345678901"), "02345678901");
    }

    #[test]
    fn test_account_number_rejects_symbols() {
        assert_eq!(account_number("ac", "AB1234").unwrap(), 123_400_000);
        assert!(matches!(
            account_number("ac", "12-34"),
            Err(GiroError::InvalidField { field: "ac", .. })
        ));
    }

    #[test]
    fn test_truncation_keeps_leading_digits() {
        assert_eq!(truncate_leading_digits(123_456_789_012, 11), 12_345_678_901);
        assert_eq!(
            truncate_leading_digits(12_345_678_901_234, 11),
            12_345_678_901
        );
        assert_eq!(truncate_leading_digits(99_999_999_999, 11), 99_999_999_999);
        assert_eq!(truncate_leading_digits(0, 11), 0);
    }

    #[test]
    fn test_truncation_is_not_modulo() {
        let sum = 123_456_789_012u128;
        assert_ne!(truncate_leading_digits(sum, 11), sum % 100_000_000_000);
    }

    #[test]
    fn test_hash_single_detail() {
        // 01502502080 vs 19890416300
        let hash = compute_ac_hash_total(&header("0150250208"), &[detail("198904163")]).unwrap();
        assert_eq!(hash, 18_387_914_220);
    }

    #[test]
    fn test_hash_sum_is_truncated() {
        // 9755667870 + 96175421070 = 105931088940
        let hash = compute_ac_hash_total(
            &header("0259001103"),
            &[detail("1234567890"), detail("9876543210")],
        )
        .unwrap();
        assert_eq!(hash, 10_593_108_894);
    }

    #[test]
    fn test_hash_uses_absolute_difference() {
        let below = compute_ac_hash_total(&header("5"), &[detail("3")]).unwrap();
        let above = compute_ac_hash_total(&header("3"), &[detail("5")]).unwrap();
        assert_eq!(below, above);
        assert_eq!(below, 20_000_000_000);
    }

    #[test]
    fn test_hash_without_details_is_zero() {
        assert_eq!(compute_ac_hash_total(&header("0259001103"), &[]).unwrap(), 0);
    }
}
