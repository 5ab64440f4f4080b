//! Geometry primitives shared by panels and layouts.
//!
//! Panels are positioned by their center relative to their parent, so most
//! math works on [`Vec2`] centers and sizes. [`Bounds`] converts between the
//! center/size form and an axis-aligned min/max rectangle.

pub use glam::{Affine2, Vec2};

/// A layout axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Axis {
    /// The x axis.
    #[default]
    Horizontal,
    /// The y axis.
    Vertical,
}

impl Axis {
    /// Index of this axis in a `Vec2` (0 for x, 1 for y).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Self::Horizontal => 0,
            Self::Vertical => 1,
        }
    }

    /// The perpendicular axis.
    #[inline]
    pub fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    /// Component of `v` along this axis.
    #[inline]
    pub fn get(self, v: Vec2) -> f32 {
        match self {
            Self::Horizontal => v.x,
            Self::Vertical => v.y,
        }
    }

    /// Set the component of `v` along this axis.
    #[inline]
    pub fn set(self, v: &mut Vec2, value: f32) {
        match self {
            Self::Horizontal => v.x = value,
            Self::Vertical => v.y = value,
        }
    }

    /// Build a vector from a component along this axis and one across it.
    #[inline]
    pub fn compose(self, along: f32, across: f32) -> Vec2 {
        match self {
            Self::Horizontal => Vec2::new(along, across),
            Self::Vertical => Vec2::new(across, along),
        }
    }
}

/// An axis-aligned rectangle given by its two extreme corners.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    /// Corner with the smallest coordinates.
    pub min: Vec2,
    /// Corner with the largest coordinates.
    pub max: Vec2,
}

impl Bounds {
    /// Create bounds from two arbitrary corners.
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create bounds centered on `center` with the given size.
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Width and height.
    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Whether the point lies inside (edges inclusive).
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Whether `other` lies fully inside these bounds.
    pub fn contains_bounds(&self, other: &Bounds) -> bool {
        other.min.cmpge(self.min).all() && other.max.cmple(self.max).all()
    }

    /// Smallest bounds covering both rectangles.
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Grow by `padding` on every side.
    pub fn expanded(&self, padding: Vec2) -> Bounds {
        Bounds {
            min: self.min - padding,
            max: self.max + padding,
        }
    }

    /// Map both corners through an affine transform, re-normalizing the result.
    pub fn transformed(&self, transform: &Affine2) -> Bounds {
        Bounds::from_corners(
            transform.transform_point2(self.min),
            transform.transform_point2(self.max),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_components() {
        let mut v = Vec2::new(3.0, 4.0);
        assert_eq!(Axis::Horizontal.get(v), 3.0);
        assert_eq!(Axis::Vertical.get(v), 4.0);
        Axis::Vertical.set(&mut v, 7.0);
        assert_eq!(v, Vec2::new(3.0, 7.0));
        assert_eq!(Axis::Horizontal.cross(), Axis::Vertical);
        assert_eq!(Axis::Vertical.compose(1.0, 2.0), Vec2::new(2.0, 1.0));
    }

    #[test]
    fn test_bounds_from_center_size() {
        let b = Bounds::from_center_size(Vec2::new(10.0, 0.0), Vec2::new(4.0, 2.0));
        assert_eq!(b.min, Vec2::new(8.0, -1.0));
        assert_eq!(b.max, Vec2::new(12.0, 1.0));
        assert_eq!(b.center(), Vec2::new(10.0, 0.0));
        assert_eq!(b.size(), Vec2::new(4.0, 2.0));
    }

    #[test]
    fn test_bounds_containment() {
        let outer = Bounds::from_corners(Vec2::new(5.0, 5.0), Vec2::new(-5.0, -5.0));
        let inner = Bounds::from_center_size(Vec2::ZERO, Vec2::splat(2.0));
        assert!(outer.contains_bounds(&inner));
        assert!(!inner.contains_bounds(&outer));
        assert!(outer.contains_point(Vec2::new(5.0, -5.0)));
        assert!(!outer.contains_point(Vec2::new(5.1, 0.0)));
    }

    #[test]
    fn test_bounds_transformed_normalizes() {
        let b = Bounds::from_corners(Vec2::ZERO, Vec2::ONE);
        let flip = Affine2::from_scale(Vec2::new(-2.0, 2.0));
        let t = b.transformed(&flip);
        assert_eq!(t.min, Vec2::new(-2.0, 0.0));
        assert_eq!(t.max, Vec2::new(0.0, 2.0));
    }
}
