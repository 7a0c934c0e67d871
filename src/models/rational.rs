//! Exact rational numbers for timing arithmetic
//!
//! Finite values are always stored reduced, with a positive denominator, so
//! equality is a plain field comparison. A zero denominator is a sentinel for
//! non-finite results: `1/0` is +infinity, `-1/0` is -infinity and `0/0` is NaN.
//! Dividing by zero yields one of these sentinels instead of panicking.
//!
//! Finite arithmetic is carried out in 128 bits and narrowed afterwards. A
//! result that does not fit back into `i64` becomes NaN.

use num_rational::Ratio;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::diagnostics::BestEffort;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(from = "RationalRepr")]
pub struct Rational {
    numerator: i64,
    denominator: i64,
}

/// Wire form accepted on deserialization; normalized on the way in.
#[derive(Deserialize)]
struct RationalRepr {
    numerator: i64,
    denominator: i64,
}

impl From<RationalRepr> for Rational {
    fn from(repr: RationalRepr) -> Self {
        Rational::new(repr.numerator, repr.denominator)
    }
}

impl Rational {
    /// Build a reduced value. A zero denominator produces the matching sentinel.
    pub fn new(numerator: i64, denominator: i64) -> Self {
        if denominator == 0 {
            return Self {
                numerator: numerator.signum(),
                denominator: 0,
            };
        }
        Self::from_wide(Ratio::new(numerator as i128, denominator as i128))
    }

    pub fn from_integer(value: i64) -> Self {
        Self {
            numerator: value,
            denominator: 1,
        }
    }

    pub fn zero() -> Self {
        Self::from_integer(0)
    }

    pub fn one() -> Self {
        Self::from_integer(1)
    }

    pub fn infinity() -> Self {
        Self {
            numerator: 1,
            denominator: 0,
        }
    }

    pub fn neg_infinity() -> Self {
        Self {
            numerator: -1,
            denominator: 0,
        }
    }

    pub fn nan() -> Self {
        Self {
            numerator: 0,
            denominator: 0,
        }
    }

    pub fn numerator(&self) -> i64 {
        self.numerator
    }

    pub fn denominator(&self) -> i64 {
        self.denominator
    }

    pub fn is_finite(&self) -> bool {
        self.denominator != 0
    }

    pub fn is_infinite(&self) -> bool {
        self.denominator == 0 && self.numerator != 0
    }

    pub fn is_nan(&self) -> bool {
        self.denominator == 0 && self.numerator == 0
    }

    pub fn is_zero(&self) -> bool {
        self.is_finite() && self.numerator == 0
    }

    /// True for values greater than zero, including +infinity.
    pub fn is_positive(&self) -> bool {
        self.numerator > 0
    }

    /// True for values less than zero, including -infinity.
    pub fn is_negative(&self) -> bool {
        self.numerator < 0
    }

    pub fn is_non_negative(&self) -> bool {
        !self.is_nan() && self.numerator >= 0
    }

    pub fn is_integer(&self) -> bool {
        self.denominator == 1
    }

    /// True for 2^n with n possibly negative (1/8, 1, 4, ...).
    pub fn is_power_of_two(&self) -> bool {
        if !self.is_finite() || self.numerator <= 0 {
            return false;
        }
        match (self.numerator, self.denominator) {
            (n, 1) => n.count_ones() == 1,
            (1, d) => d.count_ones() == 1,
            _ => false,
        }
    }

    pub fn to_float(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Integer part, truncated toward zero after adding `bias` away from zero.
    ///
    /// A bias of 0.5 rounds to the nearest integer. Non-finite values give 0.
    pub fn to_integer(&self, bias: f64) -> i64 {
        if !self.is_finite() {
            return 0;
        }
        let value = self.to_float();
        if value < 0.0 {
            -((-value + bias) as i64)
        } else {
            (value + bias) as i64
        }
    }

    /// Fractional part left over after truncation toward zero.
    pub fn remainder(&self) -> Rational {
        if !self.is_finite() {
            return *self;
        }
        *self - Rational::from_integer(self.numerator / self.denominator)
    }

    pub fn abs(&self) -> Rational {
        if self.is_negative() {
            -*self
        } else {
            *self
        }
    }

    /// Render as a mixed fraction: `1_1/2`, `-2_3/4`, `5`, `1/3`.
    pub fn to_mixed_string(&self) -> String {
        if !self.is_finite() || self.is_integer() {
            return self.to_string();
        }
        let whole = self.numerator / self.denominator;
        if whole == 0 {
            return self.to_string();
        }
        let rest = self.numerator.unsigned_abs() % self.denominator.unsigned_abs();
        format!("{}_{}/{}", whole, rest, self.denominator)
    }

    /// Parse `N`, `-N`, `N/D` or `-N/D`.
    ///
    /// Parsing stops at the first character that does not fit. Malformed
    /// input produces an inexact result: no leading digits gives 0, a missing
    /// or zero denominator gives 1.
    pub fn parse(text: &str) -> BestEffort<Rational> {
        let text = text.trim();
        let (negative, body) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };

        let top_len = leading_digits(body);
        if top_len == 0 {
            return BestEffort::fallback(Rational::zero());
        }
        let top: i64 = match body[..top_len].parse() {
            Ok(value) => value,
            Err(_) => return BestEffort::fallback(Rational::zero()),
        };
        let top = if negative { -top } else { top };

        let rest = &body[top_len..];
        if rest.is_empty() {
            return BestEffort::exact(Rational::from_integer(top));
        }
        let Some(bottom_text) = rest.strip_prefix('/') else {
            return BestEffort::fallback(Rational::from_integer(top));
        };

        let bottom_len = leading_digits(bottom_text);
        let bottom: i64 = bottom_text[..bottom_len].parse().unwrap_or(0);
        if bottom == 0 {
            return BestEffort::fallback(Rational::from_integer(top));
        }
        let value = Rational::new(top, bottom);
        if bottom_len == bottom_text.len() {
            BestEffort::exact(value)
        } else {
            BestEffort::fallback(value)
        }
    }

    /// Narrow a reduced 128-bit result; NaN when it does not fit.
    fn from_wide(ratio: Ratio<i128>) -> Self {
        match (i64::try_from(*ratio.numer()), i64::try_from(*ratio.denom())) {
            (Ok(numerator), Ok(denominator)) => Self {
                numerator,
                denominator,
            },
            _ => {
                log::debug!("rational overflow: {}/{}", ratio.numer(), ratio.denom());
                Self::nan()
            }
        }
    }

    fn wide(&self) -> Ratio<i128> {
        Ratio::new_raw(self.numerator as i128, self.denominator as i128)
    }

    /// Result of an operation involving a sentinel, following IEEE rules.
    fn from_special(value: f64) -> Self {
        if value.is_nan() {
            Self::nan()
        } else if value.is_infinite() {
            if value > 0.0 {
                Self::infinity()
            } else {
                Self::neg_infinity()
            }
        } else {
            Self::zero()
        }
    }

    fn class_rank(&self) -> u8 {
        match (self.denominator, self.numerator.signum()) {
            (0, -1) => 0,
            (0, 1) => 2,
            (0, _) => 3,
            _ => 1,
        }
    }
}

fn leading_digits(text: &str) -> usize {
    text.bytes().take_while(|b| b.is_ascii_digit()).count()
}

impl Default for Rational {
    fn default() -> Self {
        Rational::zero()
    }
}

impl From<i64> for Rational {
    fn from(value: i64) -> Self {
        Rational::from_integer(value)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.denominator, self.numerator) {
            (0, 0) => write!(f, "nan"),
            (0, n) if n > 0 => write!(f, "inf"),
            (0, _) => write!(f, "-inf"),
            (1, n) => write!(f, "{}", n),
            (d, n) => write!(f, "{}/{}", n, d),
        }
    }
}

/// Total order: -inf < finite values < +inf < NaN.
impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        let rank = self.class_rank().cmp(&other.class_rank());
        if rank != Ordering::Equal || self.denominator == 0 {
            return rank;
        }
        let left = self.numerator as i128 * other.denominator as i128;
        let right = other.numerator as i128 * self.denominator as i128;
        left.cmp(&right)
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq<i64> for Rational {
    fn eq(&self, other: &i64) -> bool {
        *self == Rational::from_integer(*other)
    }
}

impl PartialOrd<i64> for Rational {
    fn partial_cmp(&self, other: &i64) -> Option<Ordering> {
        Some(self.cmp(&Rational::from_integer(*other)))
    }
}

impl Neg for Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        match self.numerator.checked_neg() {
            Some(numerator) => Self {
                numerator,
                denominator: self.denominator,
            },
            None => Self::nan(),
        }
    }
}

impl Add for Rational {
    type Output = Rational;

    fn add(self, rhs: Rational) -> Rational {
        if self.is_finite() && rhs.is_finite() {
            Rational::from_wide(self.wide() + rhs.wide())
        } else {
            Rational::from_special(self.to_float() + rhs.to_float())
        }
    }
}

impl Sub for Rational {
    type Output = Rational;

    fn sub(self, rhs: Rational) -> Rational {
        self + (-rhs)
    }
}

impl Mul for Rational {
    type Output = Rational;

    fn mul(self, rhs: Rational) -> Rational {
        if self.is_finite() && rhs.is_finite() {
            Rational::from_wide(self.wide() * rhs.wide())
        } else {
            Rational::from_special(self.to_float() * rhs.to_float())
        }
    }
}

impl Div for Rational {
    type Output = Rational;

    fn div(self, rhs: Rational) -> Rational {
        if self.is_finite() && rhs.is_finite() && !rhs.is_zero() {
            Rational::from_wide(self.wide() / rhs.wide())
        } else if rhs.is_zero() && self.is_finite() {
            Rational::new(self.numerator, 0)
        } else {
            Rational::from_special(self.to_float() / rhs.to_float())
        }
    }
}

macro_rules! integer_ops {
    ($($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident;)*) => {
        $(
            impl $trait<i64> for Rational {
                type Output = Rational;

                fn $method(self, rhs: i64) -> Rational {
                    <Rational as $trait<Rational>>::$method(self, Rational::from_integer(rhs))
                }
            }

            impl $assign_trait for Rational {
                fn $assign_method(&mut self, rhs: Rational) {
                    *self = <Rational as $trait<Rational>>::$method(*self, rhs);
                }
            }

            impl $assign_trait<i64> for Rational {
                fn $assign_method(&mut self, rhs: i64) {
                    *self = <Rational as $trait<Rational>>::$method(*self, Rational::from_integer(rhs));
                }
            }
        )*
    };
}

integer_ops! {
    Add, add, AddAssign, add_assign;
    Sub, sub, SubAssign, sub_assign;
    Mul, mul, MulAssign, mul_assign;
    Div, div, DivAssign, div_assign;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduction() {
        let r = Rational::new(6, 4);
        assert_eq!(r.numerator(), 3);
        assert_eq!(r.denominator(), 2);

        let r = Rational::new(3, -6);
        assert_eq!(r.numerator(), -1);
        assert_eq!(r.denominator(), 2);

        assert_eq!(Rational::new(0, 7), Rational::zero());
    }

    #[test]
    fn test_arithmetic() {
        let a = Rational::new(1, 2);
        let b = Rational::new(1, 3);
        assert_eq!(a + b, Rational::new(5, 6));
        assert_eq!(a - b, Rational::new(1, 6));
        assert_eq!(a * b, Rational::new(1, 6));
        assert_eq!(a / b, Rational::new(3, 2));
        assert_eq!(a + 1, Rational::new(3, 2));
        assert_eq!(a * 4, Rational::from_integer(2));

        let mut sum = Rational::zero();
        sum += a;
        sum += 2;
        assert_eq!(sum, Rational::new(5, 2));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(Rational::new(3, 1) / Rational::zero(), Rational::infinity());
        assert_eq!(Rational::new(-3, 1) / 0, Rational::neg_infinity());
        assert!((Rational::zero() / 0).is_nan());
        assert!(!Rational::new(1, 0).is_finite());
        assert!((Rational::infinity() - Rational::infinity()).is_nan());
        assert_eq!(Rational::new(1, 2) / Rational::infinity(), Rational::zero());
    }

    #[test]
    fn test_predicates() {
        assert!(Rational::zero().is_zero());
        assert!(Rational::new(1, 4).is_positive());
        assert!(Rational::new(-1, 4).is_negative());
        assert!(Rational::from_integer(-1).is_negative());
        assert!(Rational::from_integer(3).is_integer());
        assert!(!Rational::new(3, 2).is_integer());
        assert!(Rational::new(1, 8).is_power_of_two());
        assert!(Rational::from_integer(4).is_power_of_two());
        assert!(!Rational::new(3, 8).is_power_of_two());
        assert!(!Rational::nan().is_non_negative());
    }

    #[test]
    fn test_ordering() {
        let values = [
            Rational::nan(),
            Rational::infinity(),
            Rational::new(1, 2),
            Rational::neg_infinity(),
            Rational::new(-3, 2),
        ];
        let mut sorted = values.to_vec();
        sorted.sort();
        assert_eq!(
            sorted,
            vec![
                Rational::neg_infinity(),
                Rational::new(-3, 2),
                Rational::new(1, 2),
                Rational::infinity(),
                Rational::nan(),
            ]
        );
        assert!(Rational::new(1, 3) < 1);
        assert!(Rational::new(7, 2) > 3);
    }

    #[test]
    fn test_to_integer() {
        assert_eq!(Rational::new(7, 2).to_integer(0.0), 3);
        assert_eq!(Rational::new(7, 2).to_integer(0.5), 4);
        assert_eq!(Rational::new(-7, 2).to_integer(0.0), -3);
        assert_eq!(Rational::new(-7, 2).to_integer(0.5), -4);
        assert_eq!(Rational::infinity().to_integer(0.0), 0);
        assert_eq!(Rational::new(7, 2).remainder(), Rational::new(1, 2));
        assert_eq!(Rational::new(-7, 2).remainder(), Rational::new(-1, 2));
    }

    #[test]
    fn test_overflow_becomes_nan() {
        let big = Rational::new(1, i64::MAX);
        assert!((big + Rational::new(1, i64::MAX - 1)).is_nan());
        assert!((Rational::from_integer(i64::MAX) * 2).is_nan());
        assert!((-Rational::from_integer(i64::MIN)).is_nan());
        assert_eq!(Rational::new(i64::MIN, -2), Rational::from_integer(1 << 62));

        // Intermediate products wider than i64 still reduce exactly.
        let product = Rational::new(i64::MAX, 2) * Rational::new(2, i64::MAX);
        assert_eq!(product, Rational::one());
    }

    #[test]
    fn test_display() {
        assert_eq!(Rational::new(3, 2).to_string(), "3/2");
        assert_eq!(Rational::from_integer(5).to_string(), "5");
        assert_eq!(Rational::new(3, 2).to_mixed_string(), "1_1/2");
        assert_eq!(Rational::new(-11, 4).to_mixed_string(), "-2_3/4");
        assert_eq!(Rational::new(1, 3).to_mixed_string(), "1/3");
        assert_eq!(Rational::infinity().to_string(), "inf");
        assert_eq!(Rational::nan().to_string(), "nan");
    }

    #[test]
    fn test_parse() {
        let r = Rational::parse("3/2");
        assert!(r.is_exact());
        assert_eq!(*r.value(), Rational::new(3, 2));

        assert_eq!(Rational::parse("5").into_value(), Rational::from_integer(5));
        assert_eq!(Rational::parse("-6/4").into_value(), Rational::new(-3, 2));

        let r = Rational::parse("abc");
        assert!(!r.is_exact());
        assert_eq!(r.into_value(), Rational::zero());

        let r = Rational::parse("3/0");
        assert!(!r.is_exact());
        assert_eq!(r.into_value(), Rational::from_integer(3));

        let r = Rational::parse("12abc");
        assert!(!r.is_exact());
        assert_eq!(r.into_value(), Rational::from_integer(12));
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&Rational::new(3, 2)).unwrap();
        assert_eq!(json, r#"{"numerator":3,"denominator":2}"#);
        let back: Rational = serde_json::from_str(r#"{"numerator":6,"denominator":4}"#).unwrap();
        assert_eq!(back, Rational::new(3, 2));
    }
}
