//! Upward rounding to a configured step.

/// Tolerance for deciding that `value` already sits on a step boundary.
///
/// `1.05 / 0.05` is not exactly `21.0` in floating point; a naive ceiling
/// would push an exact boundary a whole step up. Anything within this
/// relative distance of a multiple is treated as that multiple.
const BOUNDARY_TOLERANCE: f64 = 1e-9;

/// Round `value` up to the smallest multiple of `step` that is `>= value`.
///
/// A non-positive `step` means "no rounding configured" and returns the value
/// unchanged. Exact multiples round to themselves: `round_up(1.05, 0.05)` is
/// `1.05`, not `1.10`.
pub fn round_up(value: f64, step: f64) -> f64 {
    if step <= 0.0 {
        return value;
    }
    let ratio = value / step;
    let nearest = ratio.round();
    let steps = if (ratio - nearest).abs() <= BOUNDARY_TOLERANCE {
        nearest
    } else {
        ratio.ceil()
    };
    steps * step
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_positive_step_returns_value() {
        assert_eq!(round_up(1.234, 0.0), 1.234);
        assert_eq!(round_up(1.234, -0.05), 1.234);
    }

    #[test]
    fn boundaries_at_step_0_05() {
        assert_eq!(round_up(1.0, 0.05), 1.0);
        assert_eq!(round_up(1.001, 0.05), 1.05);
        assert_eq!(round_up(1.05, 0.05), 1.05);
        assert_eq!(round_up(1.051, 0.05), 1.10);
    }

    #[test]
    fn whole_steps() {
        assert_eq!(round_up(27.3, 0.5), 27.5);
        assert_eq!(round_up(27.5, 0.5), 27.5);
        assert_eq!(round_up(0.01, 1.0), 1.0);
    }

    #[test]
    fn zero_rounds_to_zero() {
        assert_eq!(round_up(0.0, 0.05), 0.0);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Rounding twice is the same as rounding once.
            #[test]
            fn idempotent(value in 0.0f64..10_000.0, step in 0.01f64..10.0) {
                let once = round_up(value, step);
                let twice = round_up(once, step);
                prop_assert_eq!(once, twice);
            }

            /// The result never undercuts the input and overshoots by less
            /// than one step.
            #[test]
            fn bounds(value in 0.0f64..10_000.0, step in 0.01f64..10.0) {
                let rounded = round_up(value, step);
                prop_assert!(rounded + step * 1e-6 >= value);
                prop_assert!(rounded < value + step * (1.0 + 1e-6));
            }
        }
    }
}
