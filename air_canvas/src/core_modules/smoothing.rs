// THEORY:
// Raw fingertip positions from a hand tracker jitter by a few pixels from frame
// to frame. The `SmoothingFilter` is an exponential moving average that trades a
// little latency for a steady pen tip.
//
// Key architectural principles:
// 1.  **Seed, Then Blend**: The first sample after a reset is returned untouched.
//     Every later sample moves the state `factor` of the way toward the new point.
// 2.  **Sub-Pixel Memory**: The state is kept as `f64` and only the emitted point is
//     truncated to a pixel. Blending an already-truncated state would stall up to
//     three pixels short of a target approached from below (0.3 of 3 px is less
//     than one pixel), so the pen would never land where the finger rests.
// 3.  **Snap**: Once the blended state is within one pixel of the target it snaps
//     onto it. Feeding a constant point therefore reaches it exactly, in at most
//     `convergence_bound(distance)` samples.
// 4.  **Resettable**: Lifting the pen clears the state so a new stroke does not
//     drift in from where the last one ended.

use crate::core_modules::config::SMOOTHING_FACTOR;
use crate::core_modules::point::Point;

#[derive(Debug, Clone, PartialEq)]
pub struct SmoothingFilter {
    factor: f64,
    state: Option<(f64, f64)>,
}

impl Default for SmoothingFilter {
    fn default() -> Self {
        Self::new(SMOOTHING_FACTOR)
    }
}

impl SmoothingFilter {
    /// `factor` is clamped into `(0, 1]`; 1.0 disables smoothing.
    pub fn new(factor: f64) -> Self {
        let factor = if factor.is_finite() {
            factor.clamp(f64::EPSILON, 1.0)
        } else {
            SMOOTHING_FACTOR
        };
        Self {
            factor,
            state: None,
        }
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn is_seeded(&self) -> bool {
        self.state.is_some()
    }

    /// The last emitted point, if any.
    pub fn current(&self) -> Option<Point> {
        self.state.map(|(x, y)| Point::new(x as i32, y as i32))
    }

    pub fn reset(&mut self) {
        self.state = None;
    }

    pub fn smooth(&mut self, point: Point) -> Point {
        let target = (point.x as f64, point.y as f64);
        let next = match self.state {
            None => target,
            Some((x, y)) => (self.blend(target.0, x), self.blend(target.1, y)),
        };
        self.state = Some(next);
        // `as` truncates toward zero.
        Point::new(next.0 as i32, next.1 as i32)
    }

    fn blend(&self, target: f64, previous: f64) -> f64 {
        let value = self.factor * target + (1.0 - self.factor) * previous;
        if (target - value).abs() < 1.0 { target } else { value }
    }

    /// Upper bound on how many samples of a constant target it takes to land on
    /// it exactly, starting `distance` pixels away (per axis).
    pub fn convergence_bound(&self, distance: f64) -> u32 {
        if distance <= 0.0 {
            return 0;
        }
        if distance < 1.0 || self.factor >= 1.0 {
            return 1;
        }
        let decay = 1.0 - self.factor;
        ((distance.ln() / (1.0 / decay).ln()).ceil() as u32) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_passes_through() {
        let mut filter = SmoothingFilter::default();
        assert_eq!(filter.smooth(Point::new(123, 45)), Point::new(123, 45));
        assert!(filter.is_seeded());
    }

    #[test]
    fn second_sample_moves_a_fraction_of_the_way() {
        let mut filter = SmoothingFilter::default();
        filter.smooth(Point::new(10, 10));
        let p = filter.smooth(Point::new(50, 10));
        assert!((21..=22).contains(&p.x), "{p:?}");
        assert_eq!(p.y, 10);
    }

    #[test]
    fn reset_reseeds_on_next_sample() {
        let mut filter = SmoothingFilter::default();
        filter.smooth(Point::new(0, 0));
        filter.smooth(Point::new(100, 100));
        filter.reset();
        assert!(!filter.is_seeded());
        assert_eq!(filter.smooth(Point::new(300, 7)), Point::new(300, 7));
    }

    #[test]
    fn converges_onto_a_constant_target_from_below() {
        let mut filter = SmoothingFilter::default();
        filter.smooth(Point::new(0, 0));
        let target = Point::new(100, 200);
        let bound = filter.convergence_bound(200.0);

        let mut last = Point::new(0, 0);
        for _ in 0..bound {
            last = filter.smooth(target);
        }
        assert_eq!(last, target, "not converged after {bound} samples");
    }

    #[test]
    fn converges_onto_a_constant_target_from_above() {
        let mut filter = SmoothingFilter::default();
        filter.smooth(Point::new(640, 480));
        let target = Point::new(3, 5);
        let bound = filter.convergence_bound(637.0);

        let mut last = Point::new(640, 480);
        for _ in 0..bound {
            last = filter.smooth(target);
        }
        assert_eq!(last, target);
    }

    #[test]
    fn tiny_offsets_snap_immediately() {
        let mut filter = SmoothingFilter::default();
        filter.smooth(Point::new(49, 49));
        assert_eq!(filter.smooth(Point::new(50, 50)), Point::new(50, 50));
    }

    #[test]
    fn approach_is_monotonic() {
        let mut filter = SmoothingFilter::default();
        filter.smooth(Point::new(0, 0));
        let mut previous = 0;
        for _ in 0..30 {
            let p = filter.smooth(Point::new(500, 0));
            assert!(p.x >= previous && p.x <= 500);
            previous = p.x;
        }
        assert_eq!(previous, 500);
    }

    #[test]
    fn bound_grows_logarithmically() {
        let filter = SmoothingFilter::default();
        assert_eq!(filter.convergence_bound(0.0), 0);
        assert_eq!(filter.convergence_bound(0.5), 1);
        assert!(filter.convergence_bound(10.0) < filter.convergence_bound(1000.0));
        assert!(filter.convergence_bound(1000.0) <= 21);
    }

    #[test]
    fn factor_is_clamped() {
        assert_eq!(SmoothingFilter::new(4.0).factor(), 1.0);
        assert!(SmoothingFilter::new(-1.0).factor() > 0.0);
        assert_eq!(SmoothingFilter::new(f64::NAN).factor(), SMOOTHING_FACTOR);
    }
}
