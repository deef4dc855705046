/// Piecewise-linear membership shapes over the `[0, 100]` universe.
///
/// Equal feet and shoulders are allowed (`trapezoid(0, 0, 25, 50)` is a left
/// shoulder that is fully true at 0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MembershipFunction {
    Triangle { a: f64, b: f64, c: f64 },
    Trapezoid { a: f64, b: f64, c: f64, d: f64 },
}

impl MembershipFunction {
    pub const fn triangle(a: f64, b: f64, c: f64) -> Self {
        Self::Triangle { a, b, c }
    }

    pub const fn trapezoid(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self::Trapezoid { a, b, c, d }
    }

    /// Degree of membership in `[0, 1]`.
    pub fn degree(&self, x: f64) -> f64 {
        match *self {
            Self::Triangle { a, b, c } => plateau(x, a, b, b, c),
            Self::Trapezoid { a, b, c, d } => plateau(x, a, b, c, d),
        }
    }

    /// Points where the shape is fully true.
    pub const fn core(&self) -> (f64, f64) {
        match *self {
            Self::Triangle { b, .. } => (b, b),
            Self::Trapezoid { b, c, .. } => (b, c),
        }
    }

    /// Open interval outside of which the degree is zero.
    pub const fn support(&self) -> (f64, f64) {
        match *self {
            Self::Triangle { a, c, .. } => (a, c),
            Self::Trapezoid { a, d, .. } => (a, d),
        }
    }
}

fn plateau(x: f64, a: f64, b: f64, c: f64, d: f64) -> f64 {
    if x.is_nan() || x < a || x > d {
        return 0.0;
    }
    if (b..=c).contains(&x) {
        return 1.0;
    }
    let degree = if x < b {
        (x - a) / (b - a)
    } else {
        (d - x) / (d - c)
    };
    degree.clamp(0.0, 1.0)
}
