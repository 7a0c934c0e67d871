//! Rhythm token grammar
//!
//! A rhythm token is an optional run of digits giving the note value as a
//! fraction of a whole note (`4` = quarter, `0` = breve, `00` = long), an
//! optional `%N` numerator, any number of augmentation dots, and an optional
//! `q` marking a grace note of zero duration. Only the first sub-token (up to
//! the first space) of a chord counts.

use once_cell::sync::Lazy;
use std::collections::HashSet;

use crate::diagnostics::BestEffort;
use crate::models::Rational;

/// Exclusive interpretations whose data tokens carry durations
pub static RHYTHM_TYPES: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["**kern", "**recip"].into_iter().collect());

pub fn is_rhythm_type(data_type: &str) -> bool {
    RHYTHM_TYPES.contains(data_type)
}

/// Duration as a fraction of a whole note.
///
/// Text without digits has no duration and gives an inexact 0.
pub fn whole_note_fraction(text: &str) -> BestEffort<Rational> {
    let subtoken = text.split(' ').next().unwrap_or("");
    if subtoken.contains('q') {
        return BestEffort::exact(Rational::zero());
    }

    let Some(start) = subtoken.find(|c: char| c.is_ascii_digit()) else {
        return BestEffort::fallback(Rational::zero());
    };
    let digits = &subtoken[start..];
    let len = digits.bytes().take_while(|b| b.is_ascii_digit()).count();
    let number = &digits[..len];

    let Ok(bottom) = number.parse::<i64>() else {
        return BestEffort::fallback(Rational::zero());
    };

    let base = if let Some(top) = numerator_override(&digits[len..]) {
        if bottom == 0 {
            top.checked_mul(2).map(Rational::from_integer)
        } else {
            Some(Rational::new(top, bottom))
        }
    } else if bottom == 0 {
        // Each zero doubles the breve: 0 = 2, 00 = 4, 000 = 8
        u32::try_from(number.len())
            .ok()
            .and_then(|zeros| 1i64.checked_shl(zeros))
            .filter(|value| *value > 0)
            .map(Rational::from_integer)
    } else {
        Some(Rational::new(1, bottom))
    };

    let dots = subtoken.matches('.').count();
    match base.zip(dot_factor(dots)) {
        Some((base, factor)) => finite_or_fallback(base * factor),
        None => BestEffort::fallback(Rational::zero()),
    }
}

/// Duration in units of `scale` per whole note (4 gives quarter notes).
///
/// A value too large to represent gives 0.
pub fn recip_to_duration(text: &str, scale: Rational) -> Rational {
    finite_or_fallback(whole_note_fraction(text).into_value() * scale).into_value()
}

/// Duration in quarter notes.
pub fn quarter_duration(text: &str) -> Rational {
    recip_to_duration(text, Rational::from_integer(4))
}

/// `(2^(d+1) - 1) / 2^d`, or `None` once `2^(d+1)` leaves `i64`.
fn dot_factor(dots: usize) -> Option<Rational> {
    let power = 1i64.checked_shl(u32::try_from(dots).ok()?)?;
    let top = power.checked_mul(2)?;
    Some(Rational::new(top - 1, power))
}

fn finite_or_fallback(value: Rational) -> BestEffort<Rational> {
    if value.is_finite() {
        BestEffort::exact(value)
    } else {
        BestEffort::fallback(Rational::zero())
    }
}

fn numerator_override(rest: &str) -> Option<i64> {
    let rest = rest.strip_prefix('%')?;
    let len = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    match rest[..len].parse::<i64>() {
        Ok(value) if value > 0 => Some(value),
        _ => None,
    }
}
