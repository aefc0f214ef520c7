//! Numeric tower: Integer ⊂ Rational ⊂ Real ⊂ Complex.
//!
//! Integer and Rational values are exact (`num-bigint` / `num-rational`).
//! Real values are `f64` bounded by [`Settings::decimal_precision`]; whenever a
//! real has a short continued fraction it is downcast back to a rational (see
//! [`rationalize`]). Complex values hold two real-kind parts and collapse to
//! their real part when the imaginary part is exactly zero.
//!
//! Every constructor returns the canonical form, so structural equality and
//! hashing never see `Rational(4/2)` next to `Integer(2)`.
//!
//! [`Settings::decimal_precision`]: crate::settings::Settings::decimal_precision

use crate::cache;
use crate::error::AstError;
use crate::settings;
use num_bigint::BigInt;
use num_complex::Complex64;
use num_rational::BigRational;
use num_traits::{FromPrimitive, One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Integer exponents above this magnitude are evaluated in floating point.
const MAX_EXACT_EXPONENT: i64 = 4096;
/// Root degrees above this are never attempted exactly.
const MAX_EXACT_ROOT: u32 = 64;

#[derive(Clone, Debug)]
pub enum Number {
    Integer(BigInt),
    Rational(BigRational),
    Real(f64),
    /// Both parts are real-kind and `im` is never exactly zero.
    Complex { re: Box<Number>, im: Box<Number> },
}

// =============================================================================
// Construction
// =============================================================================

impl Number {
    pub fn int(n: i64) -> Self {
        Number::Integer(BigInt::from(n))
    }

    pub fn zero() -> Self {
        Number::Integer(BigInt::zero())
    }

    pub fn one() -> Self {
        Number::Integer(BigInt::one())
    }

    pub fn nan() -> Self {
        Number::Real(f64::NAN)
    }

    pub fn i() -> Self {
        Number::complex(Number::zero(), Number::one())
    }

    pub fn from_bigint(n: BigInt) -> Self {
        Number::Integer(n)
    }

    /// `num / den`, or NaN when `den == 0`.
    pub fn rational(num: i64, den: i64) -> Self {
        if den == 0 {
            return Number::nan();
        }
        Number::from_ratio(BigRational::new(BigInt::from(num), BigInt::from(den)))
    }

    pub fn from_ratio(r: BigRational) -> Self {
        if r.is_integer() {
            Number::Integer(r.to_integer())
        } else {
            Number::Rational(r)
        }
    }

    /// Real number from a float, rounded to the active precision and
    /// downcast to a rational when the active settings allow it.
    pub fn real(x: f64) -> Self {
        if x.is_nan() {
            return Number::nan();
        }
        if x.is_infinite() {
            return Number::Real(x);
        }
        let s = settings::current();
        let x = round_to_precision(x, s.decimal_precision);
        if s.downcasting_enabled {
            if let Some(r) = rationalize(
                x,
                s.float_to_rational_iterations,
                s.max_rational_component,
                s.zero_error_tolerance,
            ) {
                return Number::from_ratio(r);
            }
        }
        // -0.0 and 0.0 must hash alike
        Number::Real(if x == 0.0 { 0.0 } else { x })
    }

    /// Real number rounded to the active precision but never downcast.
    pub fn float(x: f64) -> Self {
        if x.is_nan() {
            return Number::nan();
        }
        let x = round_to_precision(x, settings::current().decimal_precision);
        Number::Real(if x == 0.0 { 0.0 } else { x })
    }

    /// Complex number from two real-kind parts.
    ///
    /// Nested complex parts are flattened (`re` and `im` are combined as
    /// `re + i*im`), and a zero imaginary part yields the real part alone.
    pub fn complex(re: Number, im: Number) -> Self {
        if re.is_complex() || im.is_complex() {
            let i = Number::i();
            return &re + &(&i * &im);
        }
        if re.is_nan() || im.is_nan() {
            return Number::nan();
        }
        if im.is_exact_zero() {
            return re;
        }
        Number::Complex {
            re: Box::new(re),
            im: Box::new(im),
        }
    }

    pub fn from_complex64(z: Complex64) -> Self {
        if z.re.is_nan() || z.im.is_nan() {
            return Number::nan();
        }
        Number::complex(Number::real(z.re), Number::real(z.im))
    }

    /// Re-run the float-to-rational downcast under the active settings.
    pub fn downcast(&self) -> Number {
        match self {
            Number::Real(x) => Number::real(*x),
            Number::Complex { re, im } => Number::complex(re.downcast(), im.downcast()),
            exact => exact.clone(),
        }
    }

    /// The `n` complex n-th roots of unity, `e^(2πik/n)` for `k = 0..n`.
    pub fn roots_of_unity(n: u32) -> Vec<Number> {
        let n = n.max(1);
        (0..n)
            .map(|k| {
                if k == 0 {
                    return Number::one();
                }
                let angle = 2.0 * std::f64::consts::PI * f64::from(k) / f64::from(n);
                Number::complex(Number::real(angle.cos()), Number::real(angle.sin()))
            })
            .collect()
    }
}

// =============================================================================
// Classification
// =============================================================================

impl Number {
    pub fn is_nan(&self) -> bool {
        match self {
            Number::Real(x) => x.is_nan(),
            Number::Complex { re, im } => re.is_nan() || im.is_nan(),
            _ => false,
        }
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, Number::Complex { .. })
    }

    /// Real-kind (Integer, Rational or Real).
    pub fn is_real(&self) -> bool {
        !self.is_complex()
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }

    /// Integer or Rational.
    pub fn is_rational(&self) -> bool {
        matches!(self, Number::Integer(_) | Number::Rational(_))
    }

    /// No floating-point component anywhere.
    pub fn is_exact(&self) -> bool {
        match self {
            Number::Integer(_) | Number::Rational(_) => true,
            Number::Real(_) => false,
            Number::Complex { re, im } => re.is_exact() && im.is_exact(),
        }
    }

    fn is_exact_zero(&self) -> bool {
        match self {
            Number::Integer(n) => n.is_zero(),
            Number::Rational(r) => r.is_zero(),
            Number::Real(x) => *x == 0.0,
            Number::Complex { .. } => false,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.is_exact_zero()
    }

    pub fn is_one(&self) -> bool {
        match self {
            Number::Integer(n) => n.is_one(),
            Number::Real(x) => *x == 1.0,
            _ => false,
        }
    }

    /// Magnitude below `tolerance`.
    pub fn is_zero_within(&self, tolerance: f64) -> bool {
        !self.is_nan() && self.magnitude() <= tolerance
    }

    /// Finite real value (not NaN, not ±∞, not complex).
    pub fn is_finite_real(&self) -> bool {
        match self {
            Number::Integer(_) | Number::Rational(_) => true,
            Number::Real(x) => x.is_finite(),
            Number::Complex { .. } => false,
        }
    }

    /// Sign of a real value; `None` for complex or NaN.
    pub fn signum_real(&self) -> Option<Ordering> {
        match self {
            Number::Integer(n) => Some(n.sign_ordering()),
            Number::Rational(r) => Some(if r.is_negative() {
                Ordering::Less
            } else {
                Ordering::Greater
            }),
            Number::Real(x) => x.partial_cmp(&0.0),
            Number::Complex { .. } => None,
        }
    }

    pub fn is_positive(&self) -> bool {
        self.signum_real() == Some(Ordering::Greater)
    }

    pub fn is_negative(&self) -> bool {
        self.signum_real() == Some(Ordering::Less)
    }
}

trait SignOrdering {
    fn sign_ordering(&self) -> Ordering;
}

impl SignOrdering for BigInt {
    fn sign_ordering(&self) -> Ordering {
        if self.is_negative() {
            Ordering::Less
        } else if self.is_zero() {
            Ordering::Equal
        } else {
            Ordering::Greater
        }
    }
}

// =============================================================================
// Conversion
// =============================================================================

impl Number {
    pub fn re(&self) -> Number {
        match self {
            Number::Complex { re, .. } => (**re).clone(),
            other => other.clone(),
        }
    }

    pub fn im(&self) -> Number {
        match self {
            Number::Complex { im, .. } => (**im).clone(),
            _ => Number::zero(),
        }
    }

    /// Lossy float view of a real-kind number.
    pub fn to_f64(&self) -> Result<f64, AstError> {
        match self {
            Number::Integer(n) => Ok(n.to_f64().unwrap_or(f64::NAN)),
            Number::Rational(r) => Ok(ratio_to_f64(r)),
            Number::Real(x) => Ok(*x),
            Number::Complex { .. } => Err(AstError::InvalidDowncast {
                reason: format!("{self} is not a real number"),
            }),
        }
    }

    pub fn to_complex64(&self) -> Complex64 {
        match self {
            Number::Complex { re, im } => Complex64::new(re.real_f64(), im.real_f64()),
            other => Complex64::new(other.real_f64(), 0.0),
        }
    }

    fn real_f64(&self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }

    pub fn as_bigint(&self) -> Option<&BigInt> {
        match self {
            Number::Integer(n) => Some(n),
            _ => None,
        }
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.as_bigint().and_then(|n| n.to_i64())
    }

    /// Exact rational view of an Integer or Rational.
    pub fn to_ratio(&self) -> Option<BigRational> {
        match self {
            Number::Integer(n) => Some(BigRational::from_integer(n.clone())),
            Number::Rational(r) => Some(r.clone()),
            _ => None,
        }
    }

    /// Euclidean magnitude `|z|` as a float.
    pub fn magnitude(&self) -> f64 {
        match self {
            Number::Complex { .. } => self.to_complex64().norm(),
            other => other.real_f64().abs(),
        }
    }
}

fn ratio_to_f64(r: &BigRational) -> f64 {
    match (r.numer().to_f64(), r.denom().to_f64()) {
        (Some(n), Some(d)) if n.is_finite() && d.is_finite() => n / d,
        _ => r.to_f64().unwrap_or(f64::NAN),
    }
}

fn round_to_precision(x: f64, digits: u32) -> f64 {
    if digits >= 17 || x == 0.0 || !x.is_finite() {
        return x;
    }
    let digits = digits.max(1) as i32;
    let magnitude = x.abs().log10().floor() as i32;
    let scale = 10f64.powi(digits - 1 - magnitude);
    if !scale.is_finite() || scale == 0.0 {
        return x;
    }
    (x * scale).round() / scale
}

/// Continued-fraction approximation of `x`.
///
/// Returns the first convergent `p/q` with `|x - p/q| <= tolerance * max(1, |x|)`,
/// giving up after `iterations` terms or once `|p|` or `q` would exceed
/// `max_component`. Integral floats within ±2^53 are returned exactly.
pub fn rationalize(
    x: f64,
    iterations: u32,
    max_component: f64,
    tolerance: f64,
) -> Option<BigRational> {
    if !x.is_finite() {
        return None;
    }
    if x.fract() == 0.0 && x.abs() < 9_007_199_254_740_992.0 {
        return BigInt::from_f64(x).map(BigRational::from_integer);
    }
    if x.abs() > max_component {
        return None;
    }
    let limit = max_component.min(1e18) as i128;
    let scale = x.abs().max(1.0);

    let (mut h_prev, mut h) = (0i128, 1i128);
    let (mut k_prev, mut k) = (1i128, 0i128);
    let mut v = x;
    for _ in 0..iterations.max(1) {
        let a = v.floor();
        if !a.is_finite() || a.abs() > limit as f64 {
            break;
        }
        let a = a as i128;
        let h_next = a.checked_mul(h)?.checked_add(h_prev)?;
        let k_next = a.checked_mul(k)?.checked_add(k_prev)?;
        if h_next.abs() > limit || k_next > limit {
            break;
        }
        (h_prev, h) = (h, h_next);
        (k_prev, k) = (k, k_next);

        let approx = h as f64 / k as f64;
        if (x - approx).abs() <= tolerance * scale {
            return Some(BigRational::new(BigInt::from(h), BigInt::from(k)));
        }
        let frac = v - a as f64;
        if frac == 0.0 {
            break;
        }
        v = 1.0 / frac;
    }
    None
}

// =============================================================================
// Arithmetic
// =============================================================================

fn real_binop(
    a: &Number,
    b: &Number,
    exact: impl Fn(&BigRational, &BigRational) -> Option<BigRational>,
    float: impl Fn(f64, f64) -> f64,
) -> Number {
    if a.is_nan() || b.is_nan() {
        return Number::nan();
    }
    match (a.to_ratio(), b.to_ratio()) {
        (Some(x), Some(y)) => exact(&x, &y).map(Number::from_ratio).unwrap_or_else(Number::nan),
        _ => Number::real(float(a.real_f64(), b.real_f64())),
    }
}

impl Number {
    fn add_impl(&self, other: &Number) -> Number {
        if self.is_complex() || other.is_complex() {
            return Number::complex(
                self.re().add_impl(&other.re()),
                self.im().add_impl(&other.im()),
            );
        }
        real_binop(self, other, |x, y| Some(x + y), |x, y| x + y)
    }

    fn sub_impl(&self, other: &Number) -> Number {
        self.add_impl(&other.neg_impl())
    }

    fn mul_impl(&self, other: &Number) -> Number {
        if self.is_complex() || other.is_complex() {
            let (a, b) = (self.re(), self.im());
            let (c, d) = (other.re(), other.im());
            let re = a.mul_impl(&c).sub_impl(&b.mul_impl(&d));
            let im = a.mul_impl(&d).add_impl(&b.mul_impl(&c));
            return Number::complex(re, im);
        }
        real_binop(self, other, |x, y| Some(x * y), |x, y| x * y)
    }

    fn div_impl(&self, other: &Number) -> Number {
        if other.is_exact_zero() {
            return Number::nan();
        }
        if self.is_complex() || other.is_complex() {
            let (a, b) = (self.re(), self.im());
            let (c, d) = (other.re(), other.im());
            let denom = c.mul_impl(&c).add_impl(&d.mul_impl(&d));
            if denom.is_exact_zero() {
                return Number::nan();
            }
            let re = a.mul_impl(&c).add_impl(&b.mul_impl(&d)).div_impl(&denom);
            let im = b.mul_impl(&c).sub_impl(&a.mul_impl(&d)).div_impl(&denom);
            return Number::complex(re, im);
        }
        real_binop(
            self,
            other,
            |x, y| if y.is_zero() { None } else { Some(x / y) },
            |x, y| x / y,
        )
    }

    fn neg_impl(&self) -> Number {
        match self {
            Number::Integer(n) => Number::Integer(-n),
            Number::Rational(r) => Number::Rational(-r),
            Number::Real(x) => Number::Real(if *x == 0.0 { 0.0 } else { -x }),
            Number::Complex { re, im } => Number::complex(re.neg_impl(), im.neg_impl()),
        }
    }

    pub fn reciprocal(&self) -> Number {
        Number::one().div_impl(self)
    }

    /// `self ^ exponent`, exact whenever both sides allow it.
    ///
    /// Negative bases with fractional exponents take the principal complex
    /// branch; `0 ^ negative` is NaN.
    pub fn pow(&self, exponent: &Number) -> Number {
        if self.is_nan() || exponent.is_nan() {
            return Number::nan();
        }
        if exponent.is_exact_zero() {
            return Number::one();
        }
        if self.is_exact_zero() {
            return match exponent.signum_real() {
                Some(Ordering::Greater) => Number::zero(),
                _ => Number::nan(),
            };
        }
        if let Some(n) = exponent.to_i64() {
            if n.abs() <= MAX_EXACT_EXPONENT && self.is_exact() {
                return self.pow_int(n);
            }
        }
        if let (Number::Rational(e), Some(base)) = (exponent, self.to_ratio()) {
            if base.is_positive() {
                if let Some(exact) = exact_rational_power(&base, e) {
                    return exact;
                }
            }
        }
        if self.is_real() && exponent.is_real() {
            let (a, b) = (self.real_f64(), exponent.real_f64());
            if a >= 0.0 || b.fract() == 0.0 {
                return Number::real(a.powf(b));
            }
        }
        Number::from_complex64(self.to_complex64().powc(exponent.to_complex64()))
    }

    fn pow_int(&self, n: i64) -> Number {
        let mut result = Number::one();
        let mut base = self.clone();
        let mut e = n.unsigned_abs();
        while e > 0 {
            if e & 1 == 1 {
                result = result.mul_impl(&base);
            }
            e >>= 1;
            if e > 0 {
                base = base.mul_impl(&base);
            }
        }
        if n < 0 {
            result.reciprocal()
        } else {
            result
        }
    }

    pub fn sqrt(&self) -> Number {
        self.pow(&Number::rational(1, 2))
    }

    /// Exact n-th root of a non-negative rational, if it exists.
    pub fn exact_root(&self, n: u32) -> Option<Number> {
        let r = self.to_ratio()?;
        if r.is_negative() || n == 0 {
            return None;
        }
        nth_root_exact(&r, n).map(Number::from_ratio)
    }
}

fn nth_root_exact(r: &BigRational, n: u32) -> Option<BigRational> {
    if n > MAX_EXACT_ROOT {
        return None;
    }
    let num = r.numer().nth_root(n);
    let den = r.denom().nth_root(n);
    if num.pow(n) == *r.numer() && den.pow(n) == *r.denom() {
        Some(BigRational::new(num, den))
    } else {
        None
    }
}

fn exact_rational_power(base: &BigRational, e: &BigRational) -> Option<Number> {
    let q = e.denom().to_u32()?;
    let p = e.numer().to_i64()?;
    if p.abs() > MAX_EXACT_EXPONENT {
        return None;
    }
    let root = nth_root_exact(base, q)?;
    Some(Number::from_ratio(root).pow_int(p))
}

macro_rules! impl_binop {
    ($trait:ident, $method:ident, $impl_fn:ident) => {
        impl $trait<&Number> for &Number {
            type Output = Number;
            fn $method(self, rhs: &Number) -> Number {
                self.$impl_fn(rhs)
            }
        }

        impl $trait<Number> for Number {
            type Output = Number;
            fn $method(self, rhs: Number) -> Number {
                (&self).$impl_fn(&rhs)
            }
        }
    };
}

impl_binop!(Add, add, add_impl);
impl_binop!(Sub, sub, sub_impl);
impl_binop!(Mul, mul, mul_impl);
impl_binop!(Div, div, div_impl);

impl Neg for &Number {
    type Output = Number;
    fn neg(self) -> Number {
        self.neg_impl()
    }
}

impl Neg for Number {
    type Output = Number;
    fn neg(self) -> Number {
        self.neg_impl()
    }
}

// =============================================================================
// Comparison
// =============================================================================

impl Number {
    /// Numeric ordering of two real-kind values; `None` for complex or NaN.
    pub fn cmp_real(&self, other: &Number) -> Option<Ordering> {
        if self.is_complex() || other.is_complex() || self.is_nan() || other.is_nan() {
            return None;
        }
        match (self.to_ratio(), other.to_ratio()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ => self.real_f64().partial_cmp(&other.real_f64()),
        }
    }

    /// Numeric closeness, relative for large magnitudes.
    pub fn approx_eq(&self, other: &Number, tolerance: f64) -> bool {
        if self.is_nan() || other.is_nan() {
            return false;
        }
        let scale = self.magnitude().max(other.magnitude()).max(1.0);
        (self.to_complex64() - other.to_complex64()).norm() <= tolerance * scale
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => a == b,
            (Number::Rational(a), Number::Rational(b)) => a == b,
            (Number::Real(a), Number::Real(b)) => canonical_bits(*a) == canonical_bits(*b),
            (Number::Complex { re: ar, im: ai }, Number::Complex { re: br, im: bi }) => {
                ar == br && ai == bi
            }
            _ => false,
        }
    }
}

impl Eq for Number {}

fn canonical_bits(x: f64) -> u64 {
    if x.is_nan() {
        f64::NAN.to_bits()
    } else if x == 0.0 {
        0
    } else {
        x.to_bits()
    }
}

impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Number::Integer(n) => n.hash(state),
            Number::Rational(r) => r.hash(state),
            Number::Real(x) => canonical_bits(*x).hash(state),
            Number::Complex { re, im } => {
                re.hash(state);
                im.hash(state);
            }
        }
    }
}

// =============================================================================
// Elementary functions
// =============================================================================

impl Number {
    /// Apply `real` when it accepts the (real) input, otherwise fall back to
    /// the complex branch.
    fn map_float(
        &self,
        real: impl Fn(f64) -> Option<f64>,
        complex: impl Fn(Complex64) -> Complex64,
    ) -> Number {
        if self.is_nan() {
            return Number::nan();
        }
        if self.is_real() {
            if let Some(y) = real(self.real_f64()) {
                return Number::real(y);
            }
        }
        Number::from_complex64(complex(self.to_complex64()))
    }

    pub fn sin(&self) -> Number {
        if self.is_exact_zero() {
            return Number::zero();
        }
        self.map_float(|x| Some(x.sin()), |z| z.sin())
    }

    pub fn cos(&self) -> Number {
        if self.is_exact_zero() {
            return Number::one();
        }
        self.map_float(|x| Some(x.cos()), |z| z.cos())
    }

    pub fn tan(&self) -> Number {
        self.map_float(|x| Some(x.tan()), |z| z.tan())
    }

    pub fn cotan(&self) -> Number {
        self.tan().reciprocal()
    }

    pub fn sec(&self) -> Number {
        self.cos().reciprocal()
    }

    pub fn csc(&self) -> Number {
        self.sin().reciprocal()
    }

    pub fn arcsin(&self) -> Number {
        self.map_float(
            |x| (-1.0..=1.0).contains(&x).then(|| x.asin()),
            |z| z.asin(),
        )
    }

    pub fn arccos(&self) -> Number {
        self.map_float(
            |x| (-1.0..=1.0).contains(&x).then(|| x.acos()),
            |z| z.acos(),
        )
    }

    pub fn arctan(&self) -> Number {
        self.map_float(|x| Some(x.atan()), |z| z.atan())
    }

    pub fn arccotan(&self) -> Number {
        if self.is_exact_zero() {
            return Number::real(std::f64::consts::FRAC_PI_2);
        }
        self.reciprocal().arctan()
    }

    pub fn arcsec(&self) -> Number {
        self.reciprocal().arccos()
    }

    pub fn arccsc(&self) -> Number {
        self.reciprocal().arcsin()
    }

    /// Natural logarithm; NaN at zero, principal complex branch for negatives.
    pub fn ln(&self) -> Number {
        if self.is_exact_zero() {
            return Number::nan();
        }
        if self.is_one() {
            return Number::zero();
        }
        self.map_float(|x| (x > 0.0).then(|| x.ln()), |z| z.ln())
    }

    /// `log_base(self)`.
    pub fn log(&self, base: &Number) -> Number {
        if base.is_one() {
            return Number::nan();
        }
        if let (Some(b), Some(x)) = (base.to_ratio(), self.to_ratio()) {
            if let Some(k) = exact_log(&b, &x) {
                return Number::int(k);
            }
        }
        self.ln().div_impl(&base.ln())
    }

    pub fn exp(&self) -> Number {
        self.map_float(|x| Some(x.exp()), |z| z.exp())
    }

    pub fn abs(&self) -> Number {
        match self {
            Number::Integer(n) => Number::Integer(n.abs()),
            Number::Rational(r) => Number::Rational(r.abs()),
            Number::Real(x) => Number::real(x.abs()),
            Number::Complex { re, im } => {
                let sq = re.mul_impl(re).add_impl(&im.mul_impl(im));
                sq.sqrt()
            }
        }
    }

    pub fn signum(&self) -> Number {
        match self.signum_real() {
            Some(Ordering::Less) => Number::int(-1),
            Some(Ordering::Equal) => Number::zero(),
            Some(Ordering::Greater) => Number::one(),
            None if self.is_nan() => Number::nan(),
            None => self.div_impl(&self.abs()),
        }
    }

    /// `n!` for non-negative integers, `Γ(x + 1)` for other reals.
    pub fn factorial(&self) -> Number {
        match self {
            Number::Integer(n) => match n.to_u32() {
                Some(k) if k <= cache::MAX_FACTORIAL => Number::Integer(cache::factorial(k)),
                Some(_) => Number::Real(f64::INFINITY),
                None => Number::nan(),
            },
            Number::Rational(_) | Number::Real(_) => {
                let x = self.real_f64();
                if x < 0.0 && x.fract() == 0.0 {
                    Number::nan()
                } else {
                    Number::real(gamma(x + 1.0))
                }
            }
            Number::Complex { .. } => Number::nan(),
        }
    }
}

fn exact_log(base: &BigRational, x: &BigRational) -> Option<i64> {
    if !base.is_positive() || !x.is_positive() || base.is_one() {
        return None;
    }
    let mut acc = BigRational::one();
    let up = base > &BigRational::one();
    for k in 0..=64i64 {
        if &acc == x {
            return Some(k);
        }
        acc = &acc * base;
        if (up && &acc > x && x >= &BigRational::one()) || (!up && &acc < x && x <= &BigRational::one()) {
            break;
        }
    }
    let inv = base.recip();
    let mut acc = inv.clone();
    for k in 1..=64i64 {
        if &acc == x {
            return Some(-k);
        }
        acc = &acc * &inv;
    }
    None
}

/// Lanczos approximation (g = 7, n = 9).
fn gamma(x: f64) -> f64 {
    const G: f64 = 7.0;
    const COEFFS: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];
    if x < 0.5 {
        let pi = std::f64::consts::PI;
        return pi / ((pi * x).sin() * gamma(1.0 - x));
    }
    let x = x - 1.0;
    let mut a = COEFFS[0];
    let t = x + G + 0.5;
    for (i, c) in COEFFS.iter().enumerate().skip(1) {
        a += c / (x + i as f64);
    }
    (2.0 * std::f64::consts::PI).sqrt() * t.powf(x + 0.5) * (-t).exp() * a
}

// =============================================================================
// Display
// =============================================================================

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(n) => write!(f, "{n}"),
            Number::Rational(r) => write!(f, "{}/{}", r.numer(), r.denom()),
            Number::Real(x) if x.is_nan() => write!(f, "NaN"),
            Number::Real(x) if x.is_infinite() => {
                write!(f, "{}oo", if *x > 0.0 { "+" } else { "-" })
            }
            Number::Real(x) => write!(f, "{x}"),
            Number::Complex { re, im } => {
                let im_part = if im.is_one() {
                    "i".to_string()
                } else if im.is_negative() {
                    let abs = im.neg_impl();
                    if abs.is_one() {
                        "i".to_string()
                    } else {
                        format!("{abs}i")
                    }
                } else {
                    format!("{im}i")
                };
                if re.is_exact_zero() {
                    if im.is_negative() {
                        write!(f, "-{im_part}")
                    } else {
                        write!(f, "{im_part}")
                    }
                } else if im.is_negative() {
                    write!(f, "{re} - {im_part}")
                } else {
                    write!(f, "{re} + {im_part}")
                }
            }
        }
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::int(n)
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Number::int(i64::from(n))
    }
}

impl From<BigInt> for Number {
    fn from(n: BigInt) -> Self {
        Number::Integer(n)
    }
}

impl From<BigRational> for Number {
    fn from(r: BigRational) -> Self {
        Number::from_ratio(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    #[test]
    fn rational_collapses_to_integer() {
        assert_eq!(Number::rational(4, 2), Number::int(2));
        assert!(Number::rational(1, 0).is_nan());
    }

    #[test]
    fn float_noise_downcasts_to_rational() {
        let n = Number::real(0.1 + 0.2);
        assert_eq!(n, Number::rational(3, 10));
    }

    #[test]
    fn pi_stays_real() {
        let pi = Number::real(std::f64::consts::PI);
        assert!(matches!(pi, Number::Real(_)));
    }

    #[test]
    fn downcast_disabled_keeps_float() {
        let _g = Settings::scoped(|s| s.downcasting_enabled = false);
        assert_eq!(Number::real(0.5), Number::Real(0.5));
    }

    #[test]
    fn exact_roots() {
        assert_eq!(Number::int(25).sqrt(), Number::int(5));
        assert_eq!(Number::rational(8, 27).pow(&Number::rational(1, 3)), Number::rational(2, 3));
        assert!(matches!(Number::int(2).sqrt(), Number::Real(_)));
    }

    #[test]
    fn negative_base_fractional_power_is_complex() {
        let r = Number::int(-4).sqrt();
        assert!(r.is_complex());
        assert!(r.approx_eq(&Number::complex(Number::zero(), Number::int(2)), 1e-12));
    }

    #[test]
    fn gaussian_arithmetic_is_exact() {
        let i = Number::i();
        assert_eq!(&i * &i, Number::int(-1));
        let z = Number::complex(Number::int(3), Number::int(4));
        assert_eq!(z.abs(), Number::int(5));
    }

    #[test]
    fn division_by_zero_is_nan() {
        assert!((Number::int(1) / Number::zero()).is_nan());
    }

    #[test]
    fn equality_and_hash_agree_for_zero_signs() {
        use std::collections::hash_map::DefaultHasher;
        let _g = Settings::scoped(|s| s.downcasting_enabled = false);
        let a = Number::Real(0.0);
        let b = -Number::Real(0.0);
        assert_eq!(a, b);
        let hash = |n: &Number| {
            let mut h = DefaultHasher::new();
            n.hash(&mut h);
            h.finish()
        };
        assert_eq!(hash(&a), hash(&b));
    }

    #[test]
    fn roots_of_unity_multiply_back_to_one() {
        for root in Number::roots_of_unity(3) {
            let cube = root.pow(&Number::int(3));
            assert!(cube.approx_eq(&Number::one(), 1e-9), "{root}^3 = {cube}");
        }
        assert_eq!(
            Number::roots_of_unity(4),
            vec![Number::one(), Number::i(), Number::int(-1), -Number::i()]
        );
    }

    #[test]
    fn log_of_exact_power() {
        assert_eq!(Number::int(8).log(&Number::int(2)), Number::int(3));
        assert_eq!(Number::rational(1, 9).log(&Number::int(3)), Number::int(-2));
    }

    #[test]
    fn arcsin_outside_unit_interval_goes_complex() {
        assert!(Number::int(2).arcsin().is_complex());
        assert!(Number::int(1).arcsin().approx_eq(&Number::real(std::f64::consts::FRAC_PI_2), 1e-12));
    }

    #[test]
    fn factorial_small_integers() {
        assert_eq!(Number::int(5).factorial(), Number::int(120));
        assert!(Number::real(0.5).factorial().approx_eq(&Number::real(0.886_226_925_452_758), 1e-9));
    }

    #[test]
    fn to_f64_rejects_complex() {
        assert!(matches!(
            Number::i().to_f64(),
            Err(AstError::InvalidDowncast { .. })
        ));
    }
}
