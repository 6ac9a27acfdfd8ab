use std::cmp::Ordering;
use std::f64::consts::LN_10;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use super::error::{DomainError, ParseDecimalError};

/// Magnitudes at or above this are stored as their base-10 logarithm.
const LINEAR_MAX: f64 = 1e300;
/// Non-zero magnitudes below this are stored as their base-10 logarithm.
const LINEAR_MIN: f64 = 1e-300;
const LOG_LIMIT: f64 = 300.0;
/// Addends further apart than this many orders of magnitude do not interact.
const ADD_PRECISION_ORDERS: f64 = 17.0;

/// Signed real number with an extreme dynamic range.
///
/// Values in `[1e-300, 1e300)` are held as a plain `f64`, so everyday game
/// arithmetic (`125 / 5`, `sqrt(25)`, `3^2`) stays exact. Outside that window
/// the magnitude is held as its `log10`, which reaches roughly
/// `10^(1.8e308)` in both directions. Results past that saturate at
/// [`Decimal::MAX`] rather than becoming infinite.
///
/// Domain errors (division by zero, log of a non-positive value, ...) are
/// available through the `checked_*` methods. The unchecked operators clamp
/// such results to [`Decimal::ZERO`] and log the error at `debug` level.
#[derive(Clone, Copy)]
pub struct Decimal {
    sign: i8,
    /// 0: `mag` is the absolute value. 1: `mag` is `log10` of the absolute value.
    layer: u8,
    mag: f64,
}

impl Decimal {
    pub const ZERO: Self = Self {
        sign: 0,
        layer: 0,
        mag: 0.0,
    };
    pub const ONE: Self = Self {
        sign: 1,
        layer: 0,
        mag: 1.0,
    };
    pub const MAX: Self = Self {
        sign: 1,
        layer: 1,
        mag: f64::MAX,
    };

    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            debug!(err = %DomainError::NotANumber, "clamped NaN input to zero");
            return Self::ZERO;
        }
        let sign = if value > 0.0 {
            1
        } else if value < 0.0 {
            -1
        } else {
            0
        };
        Self::linear(sign, value.abs())
    }

    /// Builds a value from a mantissa and a (possibly huge) base-10 exponent.
    pub fn from_mantissa_exponent(mantissa: f64, exponent: f64) -> Self {
        if mantissa == 0.0 || mantissa.is_nan() || exponent.is_nan() {
            return Self::ZERO;
        }
        let sign = if mantissa < 0.0 { -1 } else { 1 };
        Self::from_log10(sign, mantissa.abs().log10() + exponent)
    }

    fn linear(sign: i8, mag: f64) -> Self {
        if sign == 0 || mag == 0.0 || mag.is_nan() {
            return Self::ZERO;
        }
        if mag >= LINEAR_MAX {
            return Self::from_log10(sign, mag.log10());
        }
        if mag < LINEAR_MIN {
            return Self {
                sign,
                layer: 1,
                mag: mag.log10(),
            };
        }
        Self { sign, layer: 0, mag }
    }

    fn from_log10(sign: i8, log: f64) -> Self {
        if sign == 0 || log.is_nan() || log == f64::NEG_INFINITY {
            return Self::ZERO;
        }
        if log >= LOG_LIMIT {
            return Self {
                sign,
                layer: 1,
                mag: log.min(f64::MAX),
            };
        }
        if log < -LOG_LIMIT {
            return Self {
                sign,
                layer: 1,
                mag: log,
            };
        }
        Self::linear(sign, 10f64.powf(log))
    }

    pub fn is_zero(&self) -> bool {
        self.sign == 0
    }

    pub fn is_positive(&self) -> bool {
        self.sign > 0
    }

    pub fn is_negative(&self) -> bool {
        self.sign < 0
    }

    /// Lossy conversion; values outside the `f64` range become `±inf` or `0`.
    pub fn to_f64(&self) -> f64 {
        let sign = f64::from(self.sign);
        match self.layer {
            0 => sign * self.mag,
            _ => sign * 10f64.powf(self.mag),
        }
    }

    /// `log10(|self|)`, `-inf` for zero.
    pub fn magnitude_log10(&self) -> f64 {
        match self.layer {
            0 => self.mag.log10(),
            _ => self.mag,
        }
    }

    pub fn abs(self) -> Self {
        Self {
            sign: self.sign.abs(),
            ..self
        }
    }

    fn signed(&self) -> f64 {
        f64::from(self.sign) * self.mag
    }

    fn cmp_abs(&self, other: &Self) -> Ordering {
        match (self.sign == 0, other.sign == 0) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ if self.layer == other.layer => self.mag.total_cmp(&other.mag),
            _ => self.magnitude_log10().total_cmp(&other.magnitude_log10()),
        }
    }

    fn add_impl(self, rhs: Self) -> Self {
        if self.sign == 0 {
            return rhs;
        }
        if rhs.sign == 0 {
            return self;
        }
        if self.layer == 0 && rhs.layer == 0 {
            return Self::from_f64(self.signed() + rhs.signed());
        }

        let (big, small) = if self.cmp_abs(&rhs) == Ordering::Less {
            (rhs, self)
        } else {
            (self, rhs)
        };
        let big_log = big.magnitude_log10();
        let gap = small.magnitude_log10() - big_log;
        if gap < -ADD_PRECISION_ORDERS {
            return big;
        }
        let ratio = 10f64.powf(gap);
        if big.sign == small.sign {
            Self::from_log10(big.sign, big_log + (1.0 + ratio).log10())
        } else if ratio >= 1.0 {
            Self::ZERO
        } else {
            Self::from_log10(big.sign, big_log + (1.0 - ratio).log10())
        }
    }

    fn mul_impl(self, rhs: Self) -> Self {
        if self.sign == 0 || rhs.sign == 0 {
            return Self::ZERO;
        }
        let sign = self.sign * rhs.sign;
        if self.layer == 0 && rhs.layer == 0 {
            let product = self.mag * rhs.mag;
            if product.is_finite() && (LINEAR_MIN..LINEAR_MAX).contains(&product) {
                return Self {
                    sign,
                    layer: 0,
                    mag: product,
                };
            }
        }
        Self::from_log10(sign, self.magnitude_log10() + rhs.magnitude_log10())
    }

    pub fn checked_div(self, rhs: Self) -> Result<Self, DomainError> {
        if rhs.sign == 0 {
            return Err(DomainError::DivisionByZero);
        }
        if self.sign == 0 {
            return Ok(Self::ZERO);
        }
        let sign = self.sign * rhs.sign;
        if self.layer == 0 && rhs.layer == 0 {
            let quotient = self.mag / rhs.mag;
            if quotient.is_finite() && (LINEAR_MIN..LINEAR_MAX).contains(&quotient) {
                return Ok(Self {
                    sign,
                    layer: 0,
                    mag: quotient,
                });
            }
        }
        Ok(Self::from_log10(
            sign,
            self.magnitude_log10() - rhs.magnitude_log10(),
        ))
    }

    pub fn checked_pow(self, exponent: Self) -> Result<Self, DomainError> {
        if exponent.sign == 0 {
            return Ok(Self::ONE);
        }
        if self.sign == 0 {
            return if exponent.sign > 0 {
                Ok(Self::ZERO)
            } else {
                Err(DomainError::ZeroToNegativePower)
            };
        }

        let power = exponent.to_f64();
        let sign = if self.sign > 0 {
            1
        } else if exponent.layer != 0 {
            // |exponent| is past integer precision (or below 1e-300); parity is unknowable.
            1
        } else if power.fract() != 0.0 {
            return Err(DomainError::NegativeBaseFractionalPower);
        } else if power.abs() < 9.007_199_254_740_992e15 && (power % 2.0).abs() == 1.0 {
            -1
        } else {
            1
        };

        if self.layer == 0 && exponent.layer == 0 {
            let result = self.mag.powf(power);
            if result.is_finite() && (LINEAR_MIN..LINEAR_MAX).contains(&result) {
                return Ok(Self {
                    sign,
                    layer: 0,
                    mag: result,
                });
            }
        }

        let base_log = self.magnitude_log10();
        if base_log == 0.0 {
            return Ok(Self {
                sign,
                layer: 0,
                mag: 1.0,
            });
        }
        Ok(Self::from_log10(sign, base_log * power))
    }

    pub fn checked_log10(self) -> Result<Self, DomainError> {
        if self.sign <= 0 {
            return Err(DomainError::NonPositiveLogarithm);
        }
        Ok(Self::from_f64(self.magnitude_log10()))
    }

    pub fn checked_ln(self) -> Result<Self, DomainError> {
        if self.sign <= 0 {
            return Err(DomainError::NonPositiveLogarithm);
        }
        Ok(Self::from_f64(self.magnitude_log10() * LN_10))
    }

    pub fn checked_sqrt(self) -> Result<Self, DomainError> {
        match self.sign {
            0 => Ok(Self::ZERO),
            sign if sign < 0 => Err(DomainError::NegativeSquareRoot),
            _ if self.layer == 0 => Ok(Self::linear(1, self.mag.sqrt())),
            _ => Ok(Self::from_log10(1, self.mag / 2.0)),
        }
    }

    pub fn pow(self, exponent: impl Into<Self>) -> Self {
        clamp_domain(self.checked_pow(exponent.into()), "pow")
    }

    /// `base ^ self`.
    pub fn pow_base(self, base: impl Into<Self>) -> Self {
        base.into().pow(self)
    }

    pub fn log10(self) -> Self {
        clamp_domain(self.checked_log10(), "log10")
    }

    pub fn ln(self) -> Self {
        clamp_domain(self.checked_ln(), "ln")
    }

    pub fn sqrt(self) -> Self {
        clamp_domain(self.checked_sqrt(), "sqrt")
    }

    pub fn floor(self) -> Self {
        if self.layer == 0 {
            return Self::from_f64(self.signed().floor());
        }
        if self.mag > 0.0 {
            self
        } else if self.sign > 0 {
            Self::ZERO
        } else {
            -Self::ONE
        }
    }

    pub fn round(self) -> Self {
        if self.layer == 0 {
            return Self::from_f64(self.signed().round());
        }
        if self.mag > 0.0 { self } else { Self::ZERO }
    }

    /// Human-readable rendering: fixed notation below 1e3, scientific above,
    /// and `e<exponent>` once the exponent itself needs scientific notation.
    pub fn format(&self, precision: usize) -> String {
        if self.sign == 0 {
            return format!("{:.precision$}", 0.0);
        }
        let log = self.magnitude_log10();
        if (-3.0..3.0).contains(&log) {
            return format!("{:.precision$}", self.signed());
        }
        let sign = if self.sign < 0 { "-" } else { "" };
        if log.abs() >= 1e9 {
            return format!("{sign}e{}", Self::from_f64(log).format(precision));
        }

        let mut exponent = log.floor();
        let scale = 10f64.powi(precision as i32);
        let mut mantissa = (10f64.powf(log - exponent) * scale).round() / scale;
        if mantissa >= 10.0 {
            mantissa /= 10.0;
            exponent += 1.0;
        }
        format!("{sign}{mantissa:.precision$}e{exponent}")
    }
}

fn clamp_domain(result: Result<Decimal, DomainError>, op: &'static str) -> Decimal {
    result.unwrap_or_else(|err| {
        debug!(op, %err, "clamped domain error to zero");
        Decimal::ZERO
    })
}

impl Default for Decimal {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<f64> for Decimal {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

impl From<u32> for Decimal {
    fn from(value: u32) -> Self {
        Self::from_f64(f64::from(value))
    }
}

impl From<i32> for Decimal {
    fn from(value: i32) -> Self {
        Self::from_f64(f64::from(value))
    }
}

impl From<u64> for Decimal {
    fn from(value: u64) -> Self {
        Self::from_f64(value as f64)
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.sign.cmp(&other.sign) {
            Ordering::Equal => {}
            ordering => return ordering,
        }
        let magnitude = self.cmp_abs(other);
        if self.sign < 0 {
            magnitude.reverse()
        } else {
            magnitude
        }
    }
}

impl Add for Decimal {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.add_impl(rhs)
    }
}

impl Sub for Decimal {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.add_impl(-rhs)
    }
}

impl Mul for Decimal {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.mul_impl(rhs)
    }
}

impl Div for Decimal {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        clamp_domain(self.checked_div(rhs), "div")
    }
}

impl Neg for Decimal {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            sign: -self.sign,
            ..self
        }
    }
}

impl AddAssign for Decimal {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Decimal {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for Decimal {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Sum for Decimal {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Debug for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decimal({self})")
    }
}

/// Lossless text form: `{:e}` of the `f64` inside the linear window,
/// `1e<log10>` outside it. This is also the serialized form.
impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.layer {
            0 => write!(f, "{:e}", self.signed()),
            _ => {
                let sign = if self.sign < 0 { "-" } else { "" };
                write!(f, "{sign}1e{}", self.mag)
            }
        }
    }
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let invalid = || ParseDecimalError(text.to_string());
        let parse_plain = || {
            text.parse::<f64>()
                .ok()
                .filter(|value| !value.is_nan())
                .map(Self::from_f64)
                .ok_or_else(invalid)
        };

        let Some((mantissa, exponent)) = text.split_once(['e', 'E']) else {
            return parse_plain();
        };
        let mantissa: f64 = mantissa.parse().map_err(|_| invalid())?;
        let exponent: f64 = exponent.parse().map_err(|_| invalid())?;
        if !mantissa.is_finite() || !exponent.is_finite() {
            return Err(invalid());
        }
        if exponent.abs() < LOG_LIMIT && exponent.fract() == 0.0 {
            return parse_plain();
        }
        Ok(Self::from_mantissa_exponent(mantissa, exponent))
    }
}

impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct DecimalVisitor;

impl Visitor<'_> for DecimalVisitor {
    type Value = Decimal;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a decimal string or number")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Decimal, E> {
        value.parse().map_err(E::custom)
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Decimal, E> {
        Ok(Decimal::from_f64(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Decimal, E> {
        Ok(Decimal::from_f64(value as f64))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Decimal, E> {
        Ok(Decimal::from(value))
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DecimalVisitor)
    }
}
