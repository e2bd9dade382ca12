/// A closed range `[min, max]` of coordinates or line parameters.
///
/// Rays use `[0, inf]`, line segments use `[0, length]`. A range with
/// `min > max` is empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    pub const EMPTY: Interval = Interval {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    /// Parameter range of a ray: `[0, inf]`.
    pub const RAY: Interval = Interval {
        min: 0.0,
        max: f64::INFINITY,
    };

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// `max - min`; negative for empty ranges.
    pub fn size(&self) -> f64 {
        self.max - self.min
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Inclusive at both ends.
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// Grown by `amount / 2` at each end.
    pub fn padded(&self, amount: f64) -> Interval {
        let half = amount / 2.0;
        Interval::new(self.min - half, self.max + half)
    }

    /// Shifted by `offset`.
    pub fn offset(&self, offset: f64) -> Interval {
        Interval::new(self.min + offset, self.max + offset)
    }

    /// Overlap of two ranges; empty when they are disjoint.
    pub fn intersect(&self, other: &Interval) -> Interval {
        Interval::new(self.min.max(other.min), self.max.min(other.max))
    }

    /// Smallest range covering both.
    pub fn hull(&self, other: &Interval) -> Interval {
        Interval::new(self.min.min(other.min), self.max.max(other.max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_inclusive() {
        let range = Interval::new(-1.5, 4.0);
        assert!(range.contains(-1.5));
        assert!(range.contains(4.0));
        assert!(!range.contains(4.0001));
        assert_eq!(range.size(), 5.5);
    }

    #[test]
    fn test_padded_and_offset() {
        let range = Interval::new(2.0, 2.0).padded(1.0).offset(10.0);
        assert_eq!(range, Interval::new(11.5, 12.5));
    }

    #[test]
    fn test_intersect_and_hull() {
        let a = Interval::new(0.0, 5.0);
        let b = Interval::new(3.0, 8.0);
        assert_eq!(a.intersect(&b), Interval::new(3.0, 5.0));
        assert_eq!(a.hull(&b), Interval::new(0.0, 8.0));

        let far = Interval::new(6.0, 8.0);
        assert!(a.intersect(&far).is_empty());
        assert_eq!(Interval::EMPTY.hull(&a), a);
    }

    #[test]
    fn test_ray_range() {
        assert!(Interval::EMPTY.is_empty());
        assert!(!Interval::EMPTY.contains(0.0));
        assert!(Interval::RAY.contains(0.0));
        assert!(Interval::RAY.contains(1e300));
        assert!(!Interval::RAY.contains(-1e-9));
    }
}
