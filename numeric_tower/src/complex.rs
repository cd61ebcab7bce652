//! Complex number arithmetic for the top rung of the ladder.

/// Double-precision complex number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Complex64 {
    pub re: f64,
    pub im: f64,
}

impl Complex64 {
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    pub fn from_real(re: f64) -> Self {
        Self { re, im: 0.0 }
    }

    /// Zero test used for division-by-zero detection.
    pub fn is_zero(self) -> bool {
        self.re == 0.0 && self.im == 0.0
    }

    pub fn add(self, other: Self) -> Self {
        Self {
            re: self.re + other.re,
            im: self.im + other.im,
        }
    }

    pub fn sub(self, other: Self) -> Self {
        Self {
            re: self.re - other.re,
            im: self.im - other.im,
        }
    }

    pub fn mul(self, other: Self) -> Self {
        // (a + bi)(c + di) = (ac - bd) + (ad + bc)i
        Self {
            re: self.re * other.re - self.im * other.im,
            im: self.re * other.im + self.im * other.re,
        }
    }

    /// Quotient; the caller zero-tests the divisor first.
    pub fn div(self, other: Self) -> Self {
        // Smith's method keeps the intermediate products in range.
        if other.re.abs() >= other.im.abs() {
            let ratio = other.im / other.re;
            let denom = other.re + other.im * ratio;
            Self {
                re: (self.re + self.im * ratio) / denom,
                im: (self.im - self.re * ratio) / denom,
            }
        } else {
            let ratio = other.re / other.im;
            let denom = other.re * ratio + other.im;
            Self {
                re: (self.re * ratio + self.im) / denom,
                im: (self.im * ratio - self.re) / denom,
            }
        }
    }

    pub fn abs(self) -> f64 {
        self.re.hypot(self.im)
    }

    /// `self ** exp`. Small integral real exponents use repeated squaring
    /// so that `(1+1j) ** 2` is exactly `2j`.
    pub fn pow(self, exp: Self) -> Self {
        if exp.is_zero() {
            return Self::from_real(1.0);
        }
        if self.is_zero() {
            return Self::from_real(0.0);
        }
        if exp.im == 0.0 && exp.re.fract() == 0.0 && exp.re.abs() <= 100.0 {
            return self.powi(exp.re as i32);
        }
        let modulus = self.abs();
        let arg = self.im.atan2(self.re);
        let ln_mod = modulus.ln();
        let len = (exp.re * ln_mod - exp.im * arg).exp();
        let phase = exp.im * ln_mod + exp.re * arg;
        Self {
            re: len * phase.cos(),
            im: len * phase.sin(),
        }
    }

    fn powi(self, n: i32) -> Self {
        let mut result = Self::from_real(1.0);
        let mut base = self;
        let mut e = n.unsigned_abs();
        while e > 0 {
            if e & 1 == 1 {
                result = result.mul(base);
            }
            base = base.mul(base);
            e >>= 1;
        }
        if n < 0 {
            Self::from_real(1.0).div(result)
        } else {
            result
        }
    }
}

impl std::fmt::Display for Complex64 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.re == 0.0 && self.re.is_sign_positive() {
            write!(f, "{}j", self.im)
        } else if self.im.is_sign_negative() {
            write!(f, "({}-{}j)", self.re, -self.im)
        } else {
            write!(f, "({}+{}j)", self.re, self.im)
        }
    }
}
