use crate::types::{vmax, vmin};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Domain flags raised while bounding an expression over a box
///
/// Interval operations whose output can skip values ([`Interval::recip`]
/// across zero) or lose points of the box to an undefined region
/// ([`Interval::sqrt`] of a partly-negative input) report it here.  The
/// evaluator ORs the flags of every operation together, so a raised flag
/// means "somewhere in this expression", not "at the root operation".
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Taint {
    /// The bound spans a discontinuity, so interior values may be skipped
    pub gap: bool,
    /// Some point of the input box may evaluate to NaN
    pub nan: bool,
}

impl Taint {
    /// No flags raised
    pub const NONE: Self = Taint {
        gap: false,
        nan: false,
    };
    /// The discontinuity flag alone
    pub const GAP: Self = Taint {
        gap: true,
        nan: false,
    };
    /// The NaN flag alone
    pub const NAN: Self = Taint {
        gap: false,
        nan: true,
    };
}

impl std::ops::BitOr for Taint {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Taint {
            gap: self.gap || rhs.gap,
            nan: self.nan || rhs.nan,
        }
    }
}

impl std::ops::BitOrAssign for Taint {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = *self | rhs;
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Stores a range, with conservative calculations to guarantee that it always
/// contains the actual value.
///
/// The all-NaN interval `[NaN, NaN]` means "no point of the box evaluates to
/// a real number"; every operation propagates it.  Operations which only
/// lose *part* of their input to an undefined region stay finite and raise
/// [`Taint::nan`] instead.
///
/// # Warning
/// This implementation does not set rounding modes, so it may not be
/// _perfect_.
#[derive(Copy, Clone, PartialEq)]
pub struct Interval {
    lower: f64,
    upper: f64,
}

impl std::fmt::Debug for Interval {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> Result<(), std::fmt::Error> {
        f.debug_tuple("")
            .field(&self.lower)
            .field(&self.upper)
            .finish()
    }
}

impl Interval {
    /// Builds a new interval
    ///
    /// There are two kinds of valid interval:
    /// - `[lower, upper]` where `lower <= upper`
    /// - `[NaN, NaN]`
    ///
    /// # Panics
    /// Panics if the resulting interval would be invalid
    #[inline]
    pub fn new(lower: f64, upper: f64) -> Self {
        assert!(
            upper >= lower || (lower.is_nan() && upper.is_nan()),
            "invalid interval [{lower}, {upper}]"
        );
        Self { lower, upper }
    }
    /// Returns the all-NaN interval
    #[inline]
    pub fn nan() -> Self {
        f64::NAN.into()
    }
    /// Returns the lower bound of the interval
    #[inline]
    pub fn lower(&self) -> f64 {
        self.lower
    }
    /// Returns the upper bound of the interval
    #[inline]
    pub fn upper(&self) -> f64 {
        self.upper
    }
    /// Returns `true` if either bound of the interval is `NaN`
    pub fn has_nan(&self) -> bool {
        self.lower.is_nan() || self.upper.is_nan()
    }
    /// Calculates the width of the interval
    pub fn width(self) -> f64 {
        self.upper - self.lower
    }

    /// Calculates the absolute value of the interval
    pub fn abs(self) -> Self {
        if self.has_nan() {
            Self::nan()
        } else if self.lower < 0.0 {
            if self.upper > 0.0 {
                Interval::new(0.0, self.upper.max(-self.lower))
            } else {
                Interval::new(-self.upper, -self.lower)
            }
        } else {
            self
        }
    }

    /// Squares the interval
    ///
    /// Note that this has tighter bounds than multiplication, because we know
    /// that both sides of the multiplication are the same value.
    pub fn square(self) -> Self {
        if self.upper < 0.0 {
            Interval::new(self.upper.powi(2), self.lower.powi(2))
        } else if self.lower > 0.0 {
            Interval::new(self.lower.powi(2), self.upper.powi(2))
        } else if self.has_nan() {
            Self::nan()
        } else {
            Interval::new(0.0, self.lower.abs().max(self.upper.abs()).powi(2))
        }
    }

    /// Computes the sine of the interval
    ///
    /// Endpoint values are widened to `±1` when the interval interior
    /// contains a maximum or minimum of the sine wave.
    ///
    /// ```
    /// # use levelset::types::Interval;
    /// # use std::f64::consts::PI;
    /// let v = Interval::new(0.0, 3.0 * PI).sin();
    /// assert_eq!((v.lower(), v.upper()), (-1.0, 1.0));
    /// ```
    pub fn sin(self) -> Self {
        if self.has_nan() {
            return Self::nan();
        }
        if self.width() > TAU {
            return Interval::new(-1.0, 1.0);
        }
        let s1 = self.lower.sin();
        let s2 = self.upper.sin();
        let mut lo = vmin(s1, s2);
        let mut hi = vmax(s1, s2);
        if lo.is_nan() || hi.is_nan() {
            // infinite endpoints
            return Self::nan();
        }
        // Peaks sit at pi/2 + 2k*pi, troughs at -pi/2 + 2k*pi; an extremum
        // lies inside the interval iff an index of the right parity falls in
        // (i1, i2]
        let i1 = ((self.lower - FRAC_PI_2) / PI).floor();
        let i2 = ((self.upper - FRAC_PI_2) / PI).floor();
        if i1 < 2.0 * (i2 / 2.0).floor() {
            hi = 1.0;
        }
        if i1 <= 2.0 * ((i2 - 1.0) / 2.0).floor() {
            lo = -1.0;
        }
        Interval::new(lo, hi)
    }

    /// Computes the cosine of the interval
    pub fn cos(self) -> Self {
        if self.has_nan() {
            return Self::nan();
        }
        if self.width() > TAU {
            return Interval::new(-1.0, 1.0);
        }
        let c1 = self.lower.cos();
        let c2 = self.upper.cos();
        let mut lo = vmin(c1, c2);
        let mut hi = vmax(c1, c2);
        if lo.is_nan() || hi.is_nan() {
            return Self::nan();
        }
        // Peaks at even multiples of pi, troughs at odd multiples
        let i1 = (self.lower / PI).floor();
        let i2 = (self.upper / PI).floor();
        if i1 < 2.0 * (i2 / 2.0).floor() {
            hi = 1.0;
        }
        if i1 <= 2.0 * ((i2 - 1.0) / 2.0).floor() {
            lo = -1.0;
        }
        Interval::new(lo, hi)
    }

    /// Computes the tangent of the interval, as `sin / cos`
    ///
    /// The discontinuity flag comes from the division when the cosine bound
    /// straddles zero.
    pub fn tan(self) -> (Self, Taint) {
        let (r, t) = self.cos().recip();
        (self.sin() * r, t)
    }

    /// Computes the arcsine of the interval
    ///
    /// Input outside of `[-1, 1]` is clamped away and raises the NaN flag;
    /// if the entire input is out of domain, returns the all-NaN interval.
    pub fn asin(self) -> (Self, Taint) {
        if self.has_nan() {
            return (Self::nan(), Taint::NONE);
        }
        if self.lower > 1.0 || self.upper < -1.0 {
            return (Self::nan(), Taint::NAN);
        }
        let taint = if self.lower < -1.0 || self.upper > 1.0 {
            Taint::NAN
        } else {
            Taint::NONE
        };
        let out = Interval::new(
            self.lower.max(-1.0).asin(),
            self.upper.min(1.0).asin(),
        );
        (out, taint)
    }

    /// Computes the arccosine of the interval
    pub fn acos(self) -> (Self, Taint) {
        if self.has_nan() {
            return (Self::nan(), Taint::NONE);
        }
        if self.lower > 1.0 || self.upper < -1.0 {
            return (Self::nan(), Taint::NAN);
        }
        let taint = if self.lower < -1.0 || self.upper > 1.0 {
            Taint::NAN
        } else {
            Taint::NONE
        };
        let out = Interval::new(
            self.upper.min(1.0).acos(),
            self.lower.max(-1.0).acos(),
        );
        (out, taint)
    }

    /// Computes the arctangent of the interval
    pub fn atan(self) -> Self {
        if self.has_nan() {
            Self::nan()
        } else {
            Interval::new(self.lower.atan(), self.upper.atan())
        }
    }

    /// Computes the two-argument arctangent, with `self` as `y` and `rhs`
    /// as `x`
    ///
    /// If the box may touch the branch cut along the negative `x` axis, the
    /// result is the full circle `[-pi, pi]` with the discontinuity flag.
    pub fn atan2(self, rhs: Self) -> (Self, Taint) {
        if self.has_nan() || rhs.has_nan() {
            return (Self::nan(), Taint::NONE);
        }
        if self.lower <= 0.0 && self.upper >= 0.0 && rhs.lower <= 0.0 {
            return (Interval::new(-PI, PI), Taint::GAP);
        }
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for y in [self.lower, self.upper] {
            for x in [rhs.lower, rhs.upper] {
                let v = y.atan2(x);
                lo = vmin(lo, v);
                hi = vmax(hi, v);
            }
        }
        (Interval::new(lo, hi), Taint::NONE)
    }

    /// Computes the exponential function applied to the interval
    pub fn exp(self) -> Self {
        if self.has_nan() {
            Self::nan()
        } else {
            Interval::new(self.lower.exp(), self.upper.exp())
        }
    }

    /// Computes the hyperbolic sine of the interval
    pub fn sinh(self) -> Self {
        if self.has_nan() {
            Self::nan()
        } else {
            Interval::new(self.lower.sinh(), self.upper.sinh())
        }
    }

    /// Computes the hyperbolic cosine of the interval
    ///
    /// This is convex, so an interval straddling zero floors at one.
    pub fn cosh(self) -> Self {
        if self.has_nan() {
            Self::nan()
        } else if self.upper < 0.0 {
            Interval::new(self.upper.cosh(), self.lower.cosh())
        } else if self.lower > 0.0 {
            Interval::new(self.lower.cosh(), self.upper.cosh())
        } else {
            Interval::new(1.0, self.lower.cosh().max(self.upper.cosh()))
        }
    }

    /// Computes the hyperbolic tangent of the interval
    pub fn tanh(self) -> Self {
        if self.has_nan() {
            Self::nan()
        } else {
            Interval::new(self.lower.tanh(), self.upper.tanh())
        }
    }

    /// Computes the inverse hyperbolic sine of the interval
    pub fn asinh(self) -> Self {
        if self.has_nan() {
            Self::nan()
        } else {
            Interval::new(self.lower.asinh(), self.upper.asinh())
        }
    }

    /// Computes the inverse hyperbolic cosine of the interval
    ///
    /// Input below one is clamped away and raises the NaN flag.
    pub fn acosh(self) -> (Self, Taint) {
        if self.has_nan() {
            return (Self::nan(), Taint::NONE);
        }
        if self.upper < 1.0 {
            return (Self::nan(), Taint::NAN);
        }
        let taint = if self.lower < 1.0 {
            Taint::NAN
        } else {
            Taint::NONE
        };
        let out =
            Interval::new(self.lower.max(1.0).acosh(), self.upper.acosh());
        (out, taint)
    }

    /// Computes the inverse hyperbolic tangent of the interval
    ///
    /// The domain edges at `±1` map to `±inf`; input strictly outside is
    /// clamped away and raises the NaN flag.
    pub fn atanh(self) -> (Self, Taint) {
        if self.has_nan() {
            return (Self::nan(), Taint::NONE);
        }
        if self.lower > 1.0 || self.upper < -1.0 {
            return (Self::nan(), Taint::NAN);
        }
        let taint = if self.lower < -1.0 || self.upper > 1.0 {
            Taint::NAN
        } else {
            Taint::NONE
        };
        let out = Interval::new(
            self.lower.max(-1.0).atanh(),
            self.upper.min(1.0).atanh(),
        );
        (out, taint)
    }

    /// Computes the natural log of the input interval
    ///
    /// The domain edge at zero maps to `-inf`; negative input is clamped
    /// away and raises the NaN flag, and an entirely-negative interval
    /// returns all-NaN.
    pub fn ln(self) -> (Self, Taint) {
        if self.has_nan() {
            return (Self::nan(), Taint::NONE);
        }
        if self.upper < 0.0 {
            return (Self::nan(), Taint::NAN);
        }
        let taint = if self.lower < 0.0 {
            Taint::NAN
        } else {
            Taint::NONE
        };
        let lo = if self.lower <= 0.0 {
            f64::NEG_INFINITY
        } else {
            self.lower.ln()
        };
        (Interval::new(lo, self.upper.ln()), taint)
    }

    /// Calculates the square root of the interval
    ///
    /// Negative input is clamped away and raises the NaN flag; an
    /// entirely-negative interval returns all-NaN.
    ///
    /// ```
    /// # use levelset::types::Interval;
    /// let (v, t) = Interval::new(-1.0, 4.0).sqrt();
    /// assert_eq!((v.lower(), v.upper()), (0.0, 2.0));
    /// assert!(t.nan);
    /// ```
    pub fn sqrt(self) -> (Self, Taint) {
        if self.has_nan() {
            return (Self::nan(), Taint::NONE);
        }
        if self.upper < 0.0 {
            return (Self::nan(), Taint::NAN);
        }
        let taint = if self.lower < 0.0 {
            Taint::NAN
        } else {
            Taint::NONE
        };
        let out =
            Interval::new(self.lower.max(0.0).sqrt(), self.upper.sqrt());
        (out, taint)
    }

    /// Calculates the reciprocal of the interval
    ///
    /// An interval straddling zero keeps an infinite bound (one-sided when
    /// an endpoint is exactly zero) and raises the discontinuity flag, since
    /// no value between the two branches is ever produced.
    ///
    /// ```
    /// # use levelset::types::Interval;
    /// let (v, t) = Interval::new(0.0, 2.0).recip();
    /// assert_eq!((v.lower(), v.upper()), (0.5, f64::INFINITY));
    /// assert!(t.gap);
    /// ```
    pub fn recip(self) -> (Self, Taint) {
        if self.has_nan() {
            return (Self::nan(), Taint::NONE);
        }
        if self.lower > 0.0 || self.upper < 0.0 {
            let out = Interval::new(1.0 / self.upper, 1.0 / self.lower);
            return (out, Taint::NONE);
        }
        let out = if self.lower == 0.0 && self.upper != 0.0 {
            Interval::new(1.0 / self.upper, f64::INFINITY)
        } else if self.lower != 0.0 && self.upper == 0.0 {
            Interval::new(f64::NEG_INFINITY, 1.0 / self.lower)
        } else {
            Interval::new(f64::NEG_INFINITY, f64::INFINITY)
        };
        (out, Taint::GAP)
    }

    /// Divides two intervals, as multiplication by the reciprocal
    pub fn div(self, rhs: Self) -> (Self, Taint) {
        let (r, t) = rhs.recip();
        (self * r, t)
    }

    /// Raises the interval to a power
    ///
    /// A point exponent uses exact rules (parity for integers, monotone
    /// branches otherwise); negative exponents compose the positive rule
    /// with [`Interval::recip`] and inherit its discontinuity flag.  A
    /// negative base with a non-integer or varying exponent is out of
    /// domain, so it is clamped away with the NaN flag.
    pub fn pow(self, rhs: Self) -> (Self, Taint) {
        if rhs.lower == rhs.upper && !rhs.has_nan() {
            return self.pow_value(rhs.lower);
        }
        if self.has_nan() || rhs.has_nan() {
            return (Self::nan(), Taint::NONE);
        }
        if self.upper < 0.0 {
            return (Self::nan(), Taint::NAN);
        }
        let (base, taint) = if self.lower < 0.0 {
            (Interval::new(0.0, self.upper), Taint::NAN)
        } else {
            (self, Taint::NONE)
        };
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for a in [base.lower, base.upper] {
            for b in [rhs.lower, rhs.upper] {
                let v = a.powf(b);
                lo = vmin(lo, v);
                hi = vmax(hi, v);
            }
        }
        (Interval::new(lo, hi), taint)
    }

    fn pow_value(self, b: f64) -> (Self, Taint) {
        // x^0 == 1 for every x, including NaN
        if b == 0.0 {
            return (1.0.into(), Taint::NONE);
        }
        if self.has_nan() || b.is_nan() {
            return (Self::nan(), Taint::NONE);
        }
        if b == 1.0 {
            return (self, Taint::NONE);
        }
        if b < 0.0 {
            let (p, t1) = self.pow_value(-b);
            let (r, t2) = p.recip();
            return (r, t1 | t2);
        }
        if b.fract() == 0.0 {
            let out = if b % 2.0 == 0.0 {
                if self.lower < 0.0 && self.upper > 0.0 {
                    let m = (-self.lower).max(self.upper);
                    Interval::new(0.0, m.powf(b))
                } else if self.upper <= 0.0 {
                    Interval::new(self.upper.powf(b), self.lower.powf(b))
                } else {
                    Interval::new(self.lower.powf(b), self.upper.powf(b))
                }
            } else {
                Interval::new(self.lower.powf(b), self.upper.powf(b))
            };
            (out, Taint::NONE)
        } else {
            if self.upper < 0.0 {
                return (Self::nan(), Taint::NAN);
            }
            let (base, taint) = if self.lower < 0.0 {
                (Interval::new(0.0, self.upper), Taint::NAN)
            } else {
                (self, Taint::NONE)
            };
            let out = Interval::new(base.lower.powf(b), base.upper.powf(b));
            (out, taint)
        }
    }

    /// Rounds both bounds downwards
    pub fn floor(self) -> Self {
        Interval::new(self.lower.floor(), self.upper.floor())
    }

    /// Rounds both bounds upwards
    pub fn ceil(self) -> Self {
        Interval::new(self.lower.ceil(), self.upper.ceil())
    }

    /// Rounds both bounds half-up
    pub fn round(self) -> Self {
        Interval::new(
            (self.lower + 0.5).floor(),
            (self.upper + 0.5).floor(),
        )
    }

    /// Takes the sign of both bounds
    pub fn sign(self) -> Self {
        if self.has_nan() {
            return Self::nan();
        }
        let s = |v: f64| {
            if v == 0.0 {
                v
            } else if v > 0.0 {
                1.0
            } else {
                -1.0
            }
        };
        Interval::new(s(self.lower), s(self.upper))
    }

    /// Calculates the minimum of two intervals
    ///
    /// If either side is all-NaN, returns the all-NaN interval.
    pub fn min(self, rhs: Self) -> Self {
        if self.has_nan() || rhs.has_nan() {
            Self::nan()
        } else {
            Interval::new(
                self.lower.min(rhs.lower),
                self.upper.min(rhs.upper),
            )
        }
    }

    /// Calculates the maximum of two intervals
    pub fn max(self, rhs: Self) -> Self {
        if self.has_nan() || rhs.has_nan() {
            Self::nan()
        } else {
            Interval::new(
                self.lower.max(rhs.lower),
                self.upper.max(rhs.upper),
            )
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.lower, self.upper)
    }
}

impl From<[f64; 2]> for Interval {
    fn from(i: [f64; 2]) -> Interval {
        Interval::new(i[0], i[1])
    }
}

impl From<f64> for Interval {
    fn from(f: f64) -> Self {
        Interval::new(f, f)
    }
}

impl std::ops::Add<Interval> for Interval {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        // inf + -inf makes a NaN bound, which poisons the whole interval
        let lo = self.lower + rhs.lower;
        let hi = self.upper + rhs.upper;
        if lo.is_nan() || hi.is_nan() {
            Self::nan()
        } else {
            Interval::new(lo, hi)
        }
    }
}

impl std::ops::Sub<Interval> for Interval {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        let lo = self.lower - rhs.upper;
        let hi = self.upper - rhs.lower;
        if lo.is_nan() || hi.is_nan() {
            Self::nan()
        } else {
            Interval::new(lo, hi)
        }
    }
}

impl std::ops::Mul<Interval> for Interval {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        if self.has_nan() || rhs.has_nan() {
            return Self::nan();
        }
        // A NaN corner product (0 * inf) poisons the whole bound
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for i in [self.lower, self.upper] {
            for j in [rhs.lower, rhs.upper] {
                let v = i * j;
                lo = vmin(lo, v);
                hi = vmax(hi, v);
            }
        }
        if lo.is_nan() || hi.is_nan() {
            Self::nan()
        } else {
            Interval::new(lo, hi)
        }
    }
}

impl std::ops::Neg for Interval {
    type Output = Self;
    fn neg(self) -> Self {
        Interval::new(-self.upper, -self.lower)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_add_inf() {
        let a = Interval::new(f64::NEG_INFINITY, 0.0);
        let b = Interval::new(f64::INFINITY, f64::INFINITY);
        // -inf + inf would be a NaN bound; the sum must collapse to all-NaN
        assert!((a + b).has_nan());

        let a = Interval::new(f64::NEG_INFINITY, 1.0);
        let b = Interval::new(1.0, f64::INFINITY);
        let v = a + b;
        assert_eq!(
            (v.lower(), v.upper()),
            (f64::NEG_INFINITY, f64::INFINITY)
        );
    }

    #[test]
    fn test_mul() {
        let a = Interval::new(-1.0, 2.0);
        let b = Interval::new(3.0, 4.0);
        let v = a * b;
        assert_eq!((v.lower(), v.upper()), (-4.0, 8.0));

        // 0 * inf corners poison the bound
        let a = Interval::new(0.0, 1.0);
        let b = Interval::new(f64::INFINITY, f64::INFINITY);
        assert!((a * b).has_nan());
    }

    #[test]
    fn test_square() {
        let v = Interval::new(-3.0, 2.0).square();
        assert_eq!((v.lower(), v.upper()), (0.0, 9.0));
        let v = Interval::new(-3.0, -2.0).square();
        assert_eq!((v.lower(), v.upper()), (4.0, 9.0));
    }

    #[test]
    fn test_recip() {
        let (v, t) = Interval::new(1.0, 2.0).recip();
        assert_eq!((v.lower(), v.upper()), (0.5, 1.0));
        assert_eq!(t, Taint::NONE);

        let (v, t) = Interval::new(-1.0, 2.0).recip();
        assert_eq!((v.lower(), v.upper()), (f64::NEG_INFINITY, f64::INFINITY));
        assert!(t.gap);

        let (v, t) = Interval::new(-2.0, 0.0).recip();
        assert_eq!((v.lower(), v.upper()), (f64::NEG_INFINITY, -0.5));
        assert!(t.gap);
    }

    #[test]
    fn test_sin_extrema() {
        let eps = 1e-3;
        let v = Interval::new(FRAC_PI_2 - eps, FRAC_PI_2 + eps).sin();
        assert_eq!(v.upper(), 1.0);
        assert!(v.lower() < 1.0 && v.lower() > 0.99);

        let v = Interval::new(0.0, PI).sin();
        assert_eq!(v.upper(), 1.0);
        assert!(v.lower() <= 0.0);

        let v = Interval::new(0.0, 3.0 * PI).sin();
        assert_eq!((v.lower(), v.upper()), (-1.0, 1.0));

        // width beyond a full period always spans [-1, 1]
        let v = Interval::new(-10.0, 10.0).sin();
        assert_eq!((v.lower(), v.upper()), (-1.0, 1.0));
    }

    #[test]
    fn test_cos_extrema() {
        let v = Interval::new(0.0, PI).cos();
        assert_eq!((v.lower(), v.upper()), (-1.0, 1.0));

        let eps = 1e-3;
        let v = Interval::new(PI - eps, PI + eps).cos();
        assert_eq!(v.lower(), -1.0);
        assert!(v.upper() < -0.99);

        let v = Interval::new(FRAC_PI_2 - eps, FRAC_PI_2 + eps).cos();
        assert_relative_eq!(v.lower(), -eps, max_relative = 1e-6);
        assert_relative_eq!(v.upper(), eps, max_relative = 1e-6);
    }

    #[test]
    fn test_pow() {
        // even powers of a straddling base floor at zero
        let (v, t) = Interval::new(-2.0, 1.0).pow(2.0.into());
        assert_eq!((v.lower(), v.upper()), (0.0, 4.0));
        assert_eq!(t, Taint::NONE);

        // odd powers are monotone
        let (v, _) = Interval::new(-2.0, 1.0).pow(3.0.into());
        assert_eq!((v.lower(), v.upper()), (-8.0, 1.0));

        // negative exponents go through recip and flag the gap
        let (v, t) = Interval::new(-1.0, 2.0).pow((-2.0).into());
        assert_eq!((v.lower(), v.upper()), (0.25, f64::INFINITY));
        assert!(t.gap);

        // non-integer exponents clamp a partly-negative base
        let (v, t) = Interval::new(-1.0, 4.0).pow(0.5.into());
        assert_eq!((v.lower(), v.upper()), (0.0, 2.0));
        assert!(t.nan);

        // x^0 is 1 even for an all-NaN base
        let (v, t) = Interval::nan().pow(0.0.into());
        assert_eq!((v.lower(), v.upper()), (1.0, 1.0));
        assert_eq!(t, Taint::NONE);

        // a varying exponent over a negative base is out of domain
        let (v, t) =
            Interval::new(-2.0, -1.0).pow(Interval::new(0.5, 1.5));
        assert!(v.has_nan());
        assert!(t.nan);
    }

    #[test]
    fn test_ln() {
        let (v, t) = Interval::new(-1.0, 1.0).ln();
        assert_eq!((v.lower(), v.upper()), (f64::NEG_INFINITY, 0.0));
        assert!(t.nan);

        let (v, t) = Interval::new(0.0, 1.0).ln();
        assert_eq!((v.lower(), v.upper()), (f64::NEG_INFINITY, 0.0));
        assert_eq!(t, Taint::NONE);

        let (v, t) = Interval::new(-2.0, -1.0).ln();
        assert!(v.has_nan());
        assert!(t.nan);
    }

    #[test]
    fn test_sqrt() {
        let (v, t) = Interval::new(1.0, 4.0).sqrt();
        assert_eq!((v.lower(), v.upper()), (1.0, 2.0));
        assert_eq!(t, Taint::NONE);

        let (v, t) = Interval::new(-4.0, -1.0).sqrt();
        assert!(v.has_nan());
        assert!(t.nan);
    }

    #[test]
    fn test_atan2() {
        let (v, t) = Interval::new(1.0, 2.0).atan2(Interval::new(1.0, 2.0));
        assert_relative_eq!(v.lower(), (0.5f64).atan());
        assert_relative_eq!(v.upper(), (2.0f64).atan());
        assert_eq!(t, Taint::NONE);

        // branch cut
        let (v, t) =
            Interval::new(-1.0, 1.0).atan2(Interval::new(-1.0, 1.0));
        assert_eq!((v.lower(), v.upper()), (-PI, PI));
        assert!(t.gap);
    }

    #[test]
    fn test_tan() {
        let (v, t) = Interval::new(-0.5, 0.5).tan();
        assert!(v.lower() <= (-0.5f64).tan() && v.upper() >= (0.5f64).tan());
        assert_eq!(t, Taint::NONE);

        // crossing the asymptote flags the gap
        let (v, t) = Interval::new(1.0, 2.0).tan();
        assert!(v.lower() == f64::NEG_INFINITY || v.upper() == f64::INFINITY);
        assert!(t.gap);
    }

    #[test]
    fn test_domain_clamps() {
        let (v, t) = Interval::new(-2.0, 0.0).asin();
        assert_relative_eq!(v.lower(), -FRAC_PI_2);
        assert_eq!(v.upper(), 0.0);
        assert!(t.nan);

        let (v, t) = Interval::new(0.5, 2.0).acosh();
        assert_eq!(v.lower(), 0.0);
        assert!(t.nan);

        let (v, t) = Interval::new(-1.0, 1.0).atanh();
        assert_eq!(
            (v.lower(), v.upper()),
            (f64::NEG_INFINITY, f64::INFINITY)
        );
        assert_eq!(t, Taint::NONE);
    }

    #[test]
    fn test_step_ops() {
        let v = Interval::new(-1.2, 2.7).floor();
        assert_eq!((v.lower(), v.upper()), (-2.0, 2.0));
        let v = Interval::new(-1.2, 2.7).round();
        assert_eq!((v.lower(), v.upper()), (-1.0, 3.0));
        let v = Interval::new(-1.5, -0.5).round();
        assert_eq!((v.lower(), v.upper()), (-1.0, -0.0));
        let v = Interval::new(-3.0, 2.0).sign();
        assert_eq!((v.lower(), v.upper()), (-1.0, 1.0));
    }

    #[test]
    fn test_min_max_nan() {
        let a = Interval::new(0.0, 1.0);
        assert!(a.min(Interval::nan()).has_nan());
        assert!(a.max(Interval::nan()).has_nan());
        let v = a.min(Interval::new(-1.0, 0.5));
        assert_eq!((v.lower(), v.upper()), (-1.0, 0.5));
    }
}
