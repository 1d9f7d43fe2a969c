//! Currency formatting and parsing.
//!
//! Amounts are rendered with a dollar sign, thousands separators and exactly
//! two decimal places, e.g. "$1,234.50" and "-$100.00". [parse_currency]
//! accepts anything [format_currency] produces, so a value survives a round
//! trip to cent precision.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::Error;

/// Format `amount` as a dollar amount rounded to the nearest cent.
pub fn format_currency(amount: Decimal) -> String {
    let mut cents = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    if cents.is_zero() {
        // Avoid "-$0.00" for small negative amounts.
        return "$0.00".to_owned();
    }

    let sign = if cents.is_sign_negative() { "-" } else { "" };
    cents.set_sign_positive(true);
    cents.rescale(2);

    let digits = cents.to_string();
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    format!("{sign}${}.{fraction}", group_thousands(whole))
}

/// Insert a comma between every group of three digits, counting from the right.
fn group_thousands(whole: &str) -> String {
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);

    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    grouped
}

/// Parse a currency string such as "$1,234.50", "-$100.00" or "1234.5".
///
/// # Errors
///
/// Returns an [Error::InvalidCurrency] if `text` is not a plain or
/// dollar-formatted decimal number.
pub fn parse_currency(text: &str) -> Result<Decimal, Error> {
    let invalid = || Error::InvalidCurrency(text.to_owned());

    let trimmed = text.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let digits = unsigned.strip_prefix('$').unwrap_or(unsigned);

    if digits.is_empty() || digits.starts_with('-') || digits.starts_with('+') {
        return Err(invalid());
    }

    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (digits, None),
    };

    if !has_valid_grouping(whole)
        || !is_digits(whole.replace(',', "").as_str())
        || !fraction.is_none_or(is_digits)
    {
        return Err(invalid());
    }

    let mut normalized = whole.replace(',', "");
    if let Some(fraction) = fraction {
        normalized.push('.');
        normalized.push_str(fraction);
    }

    let value = Decimal::from_str(&normalized).map_err(|_| invalid())?;

    Ok(if negative { -value } else { value })
}

fn is_digits(part: &str) -> bool {
    part.chars().all(|c| c.is_ascii_digit())
}

/// Thousands separators are optional, but when present every group after the
/// first must have exactly three digits.
fn has_valid_grouping(whole: &str) -> bool {
    if !whole.contains(',') {
        return true;
    }

    let mut groups = whole.split(',');
    let first_is_valid = groups
        .next()
        .is_some_and(|group| (1..=3).contains(&group.len()));

    first_is_valid && groups.all(|group| group.len() == 3)
}
