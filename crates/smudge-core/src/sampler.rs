//! Minimum-spacing point sampler for free-hand strokes.

use kurbo::Point;

/// Minimum distance (in pixels) between any two accepted points of a stroke.
pub const MIN_POINT_SPACING: f64 = 6.0;

/// Filters a raw stream of pointer positions into a sparse vertex sequence.
///
/// A candidate is kept only if it is at least [`MIN_POINT_SPACING`] away from
/// *every* point accepted so far, not just the last one. Strokes that cross
/// back over themselves therefore don't pile up vertices near earlier ones.
#[derive(Debug, Clone, Default)]
pub struct PointSampler {
    /// Accepted points of the in-progress stroke, rounded to whole pixels.
    points: Vec<Point>,
}

impl PointSampler {
    /// Create an empty sampler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a pointer position. Returns whether it was accepted.
    pub fn consider(&mut self, candidate: Point) -> bool {
        let candidate = Point::new(candidate.x.round(), candidate.y.round());

        if self
            .points
            .iter()
            .any(|p| p.distance(candidate) < MIN_POINT_SPACING)
        {
            log::trace!("Rejected sample ({}, {})", candidate.x, candidate.y);
            return false;
        }

        log::trace!("Accepted sample ({}, {})", candidate.x, candidate.y);
        self.points.push(candidate);
        true
    }

    /// Discard the in-progress stroke.
    pub fn reset(&mut self) {
        self.points.clear();
    }

    /// Take the accepted points, leaving the sampler empty.
    pub fn take(&mut self) -> Vec<Point> {
        std::mem::take(&mut self.points)
    }

    /// Accepted points so far.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of accepted points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if no point has been accepted.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_point_always_accepted() {
        let mut sampler = PointSampler::new();
        assert!(sampler.consider(Point::new(3.0, 4.0)));
        assert_eq!(sampler.len(), 1);
    }

    #[test]
    fn test_rejects_close_points() {
        let mut sampler = PointSampler::new();
        assert!(sampler.consider(Point::new(0.0, 0.0)));
        assert!(!sampler.consider(Point::new(3.0, 4.0))); // distance 5
        assert!(sampler.consider(Point::new(6.0, 0.0))); // distance exactly 6
        assert_eq!(sampler.len(), 2);
    }

    #[test]
    fn test_spacing_checked_against_every_point() {
        let mut sampler = PointSampler::new();
        assert!(sampler.consider(Point::new(0.0, 0.0)));
        assert!(sampler.consider(Point::new(20.0, 0.0)));
        assert!(sampler.consider(Point::new(20.0, 20.0)));
        // Far from the last point but right next to the first one.
        assert!(!sampler.consider(Point::new(2.0, 2.0)));
        assert_eq!(sampler.len(), 3);
    }

    #[test]
    fn test_points_are_rounded() {
        let mut sampler = PointSampler::new();
        sampler.consider(Point::new(10.4, 7.6));
        assert_eq!(sampler.points(), &[Point::new(10.0, 8.0)]);
    }

    #[test]
    fn test_pairwise_spacing_holds() {
        let mut sampler = PointSampler::new();
        // A wobbly spiral with lots of near-duplicate samples.
        for i in 0..400 {
            let t = i as f64 * 0.1;
            sampler.consider(Point::new(50.0 + t * 3.0 * t.cos(), 50.0 + t * 3.0 * t.sin()));
        }

        let points = sampler.points();
        assert!(points.len() > 3);
        for (i, a) in points.iter().enumerate() {
            for b in &points[i + 1..] {
                assert!(a.distance(*b) >= MIN_POINT_SPACING);
            }
        }
    }

    #[test]
    fn test_reset_and_take() {
        let mut sampler = PointSampler::new();
        sampler.consider(Point::new(0.0, 0.0));
        sampler.consider(Point::new(10.0, 0.0));

        let taken = sampler.take();
        assert_eq!(taken.len(), 2);
        assert!(sampler.is_empty());

        sampler.consider(Point::new(0.0, 0.0));
        sampler.reset();
        assert!(sampler.is_empty());
    }
}
