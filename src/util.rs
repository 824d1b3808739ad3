use serde::Serialize;

/// Maps `t` in `0..=1` linearly onto `min..=max`.
pub fn lerp(t: f64, min: f64, max: f64) -> f64 {
    debug_assert!(min <= max);
    min + t * (max - min)
}

/// `value / max * cap`, the scaling every rendered size in a pass network uses.
pub fn scale(value: u32, max: u32, cap: f64) -> f64 {
    debug_assert!(max > 0 && value <= max);
    f64::from(value) / f64::from(max) * cap
}

#[cfg(test)]
#[test]
fn test_scaling() {
    use assert_approx_eq::assert_approx_eq;

    assert_approx_eq!(lerp(0.0, 10.0, 20.0), 10.0);
    assert_approx_eq!(lerp(0.5, 10.0, 20.0), 15.0);
    assert_approx_eq!(lerp(1.0, 10.0, 20.0), 20.0);
    assert_approx_eq!(scale(4, 8, 18.0), 9.0);
    assert_approx_eq!(scale(8, 8, 18.0), 18.0);
}

// =^..^=   =^..^=   =^..^=   =^..^=   =^..^=   =^..^=   =^..^=   =^..^=   =^..^=   =^..^=   =^..^=

/// Something known about both teams in a match, from one team's point of view.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct Sides<T> {
    pub team: T,
    pub opponent: T,
}

impl<T> Sides<T> {
    pub fn map_opt<F, U>(&self, f: F) -> Option<Sides<U>>
    where
        F: Fn(&T) -> Option<U>,
    {
        Some(Sides {
            team: f(&self.team)?,
            opponent: f(&self.opponent)?,
        })
    }
}
