//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where
    T: Float
{
    target_range.0
        + ((value - source_range.0)
        * (target_range.1 - target_range.0)
        / (source_range.1 - source_range.0))
}

pub fn clamp<T>(value: &T, min: &T, max: &T) -> T
where
    T: Float
{
    let mut ret = *value;

    if ret > *max {
        ret = *max
    }
    if ret < *min {
        ret = *min
    }

    ret
}

/// Linearly interpolate between `a` and `b`, with `t` clamped to [0, 1].
pub fn lerp<T>(a: T, b: T, t: T) -> T
where
    T: Float
{
    let t = clamp(&t, &T::zero(), &T::one());
    a + (b - a) * t
}

/// Fraction of the way `value` lies through the band `[lower, upper]`,
/// clamped to [0, 1].
///
/// A band with `upper <= lower` has no width to interpolate across, so it
/// behaves as a step at `lower`: 1 above it, 0 at or below it.
pub fn band_fraction<T>(value: T, lower: T, upper: T) -> T
where
    T: Float
{
    if !(upper > lower) {
        return if value > lower { T::one() } else { T::zero() };
    }

    let frac = lin_map((lower, upper), (T::zero(), T::one()), value);
    clamp(&frac, &T::zero(), &T::one())
}

/// Wrap `value` into the range `[min, max)`.
pub fn input_modulus<T>(value: T, min: T, max: T) -> T
where
    T: Float
{
    let span = max - min;
    if !(span > T::zero()) {
        return value;
    }

    min + rem_euclid(value - min, span)
}

/// Wrap an angle into the range (-pi, pi].
pub fn wrap_pi<T>(angle: T) -> T
where
    T: Float
{
    let pi_t: T = T::from(std::f64::consts::PI).unwrap();

    let wrapped = input_modulus(angle, -pi_t, pi_t);
    if wrapped <= -pi_t { wrapped + pi_t + pi_t } else { wrapped }
}

/// Get the signed angular distance from `a` to `b`.
///
/// The result is the shortest signed rotation that takes `a` onto `b`,
/// accounting for wrapping, and lies in (-pi, pi].
pub fn get_ang_dist<T>(a: T, b: T) -> T
where
    T: Float
{
    wrap_pi(b - a)
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()`, violating the mathematical definition, if
/// `self` is much smaller than `rhs.abs()` in magnitude and `self < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float
{
    let r = lhs % rhs;
    if r < T::from(0.0).unwrap() { r + rhs.abs() } else { r }
}

#[cfg(test)]
mod test {
    use super::*;

    const PI: f64 = std::f64::consts::PI;
    const TAU: f64 = std::f64::consts::TAU;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_get_ang_dist() {
        assert!(close(get_ang_dist(1f64, 2f64), 1f64));
        assert!(close(get_ang_dist(2f64, 1f64), -1f64));
        assert!(close(get_ang_dist(0f64, TAU), 0f64));
        assert!(close(get_ang_dist(1f64, TAU), -1f64));

        // 170 deg to -170 deg is a 20 deg turn through the wrap, not 340 deg
        let d = get_ang_dist(170f64.to_radians(), (-170f64).to_radians());
        assert!(close(d, 20f64.to_radians()));
        let d = get_ang_dist((-170f64).to_radians(), 170f64.to_radians());
        assert!(close(d, (-20f64).to_radians()));
    }

    #[test]
    fn test_wrap_pi() {
        assert!(close(wrap_pi(PI), PI));
        assert!(close(wrap_pi(-PI), PI));
        assert!(close(wrap_pi(3.0 * PI / 2.0), -PI / 2.0));
        assert!(close(wrap_pi(-5.0 * PI / 2.0), -PI / 2.0));
        assert!(close(wrap_pi(0.25), 0.25));
    }

    #[test]
    fn test_band_fraction() {
        assert!(close(band_fraction(0.03, 0.01, 0.05), 0.5));
        assert!(close(band_fraction(0.0, 0.01, 0.05), 0.0));
        assert!(close(band_fraction(3.0, 0.01, 0.05), 1.0));

        // Degenerate bands act as a step and never produce NaN
        assert!(close(band_fraction(0.0, 0.0, 0.0), 0.0));
        assert!(close(band_fraction(0.2, 0.0, 0.0), 1.0));
        assert!(close(band_fraction(0.2, 0.5, 0.1), 0.0));
    }

    #[test]
    fn test_lerp() {
        assert!(close(lerp(1.0, 3.0, 0.5), 2.0));
        assert!(close(lerp(1.0, 3.0, 2.0), 3.0));
        assert!(close(lerp(1.0, 3.0, -1.0), 1.0));
    }
}
