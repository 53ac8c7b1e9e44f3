/// Floating point type used throughout the toolkit
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

/// Divide `num` by a period count, yielding zero when nothing has elapsed.
pub fn average_over(num: Real, periods: u64) -> Real {
    if periods > 0 { num / periods as Real } else { 0.0 }
}

/// `num / den`, or zero when `den` is zero (e.g. a network with no land area).
pub fn divide_or_zero(num: Real, den: Real) -> Real {
    if den != 0.0 { num / den } else { 0.0 }
}

/// Base-10 logarithm that passes non-positive values through unchanged.
pub fn log10_or_keep(x: Real) -> Real {
    if x > 0.0 { x.log10() } else { x }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn average_over_zero_periods_is_zero() {
        assert_eq!(average_over(42.0, 0), 0.0);
        assert_eq!(average_over(42.0, 4), 10.5);
    }

    #[test]
    fn divide_by_zero_area_is_zero() {
        assert_eq!(divide_or_zero(3.0, 0.0), 0.0);
        assert_eq!(divide_or_zero(3.0, 1.5), 2.0);
    }

    #[test]
    fn log10_guard() {
        assert_eq!(log10_or_keep(1000.0), 3.0);
        assert_eq!(log10_or_keep(0.0), 0.0);
        assert_eq!(log10_or_keep(-2.0), -2.0);
    }
}
