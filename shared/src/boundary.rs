//! Half-canvas territory checks.

use crate::Side;

pub const DEFAULT_DEAD_ZONE: f64 = 2.0;

/// Decides whether a horizontal position belongs to a side's half of the canvas.
///
/// The dead zone keeps strokes from touching the midpoint: LEFT rejects
/// `x > center - dead_zone`, RIGHT rejects `x < center + dead_zone`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Boundary {
    pub dead_zone: f64,
}

impl Default for Boundary {
    fn default() -> Self {
        Self {
            dead_zone: DEFAULT_DEAD_ZONE,
        }
    }
}

impl Boundary {
    pub fn new(dead_zone: f64) -> Self {
        let dead_zone = if dead_zone.is_finite() {
            dead_zone.max(0.0)
        } else {
            DEFAULT_DEAD_ZONE
        };
        Self { dead_zone }
    }

    pub fn center(canvas_width: f64) -> f64 {
        canvas_width / 2.0
    }

    pub fn permits(&self, side: Side, x: f64, canvas_width: f64) -> bool {
        if !x.is_finite() {
            return false;
        }
        let center = Self::center(canvas_width);
        match side {
            Side::Left => x <= center - self.dead_zone,
            Side::Right => x >= center + self.dead_zone,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_side_limits() {
        let boundary = Boundary::default();
        assert!(boundary.permits(Side::Left, 0.0, 800.0));
        assert!(boundary.permits(Side::Left, 397.9, 800.0));
        assert!(boundary.permits(Side::Left, 398.0, 800.0));
        assert!(!boundary.permits(Side::Left, 398.5, 800.0));
        assert!(!boundary.permits(Side::Left, 400.0, 800.0));
        assert!(!boundary.permits(Side::Left, 700.0, 800.0));
    }

    #[test]
    fn test_right_side_limits() {
        let boundary = Boundary::default();
        assert!(boundary.permits(Side::Right, 402.0, 800.0));
        assert!(boundary.permits(Side::Right, 799.0, 800.0));
        assert!(!boundary.permits(Side::Right, 401.5, 800.0));
        assert!(!boundary.permits(Side::Right, 400.0, 800.0));
        assert!(!boundary.permits(Side::Right, 10.0, 800.0));
    }

    #[test]
    fn test_dead_zone_is_configurable() {
        let boundary = Boundary::new(20.0);
        assert!(!boundary.permits(Side::Left, 390.0, 800.0));
        assert!(boundary.permits(Side::Left, 380.0, 800.0));
        assert!(!boundary.permits(Side::Right, 410.0, 800.0));
        assert!(boundary.permits(Side::Right, 420.0, 800.0));

        let zero = Boundary::new(0.0);
        assert!(zero.permits(Side::Left, 400.0, 800.0));
        assert!(zero.permits(Side::Right, 400.0, 800.0));
    }

    #[test]
    fn test_invalid_dead_zone_falls_back() {
        assert_eq!(Boundary::new(f64::NAN).dead_zone, DEFAULT_DEAD_ZONE);
        assert_eq!(Boundary::new(-5.0).dead_zone, 0.0);
    }
}
