use crate::Vec3;

/// Axis-aligned bounds of a set of points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extents {
    pub min: Vec3,
    pub max: Vec3,
}

impl Extents {
    /// Bounds of a flat `[x, y, z, x, y, z, ...]` array.
    /// Returns `None` if it holds no complete point.
    pub fn from_positions(positions: &[f32]) -> Option<Self> {
        let mut points = positions
            .chunks_exact(3)
            .map(|p| Vec3::new(p[0], p[1], p[2]));
        let first = points.next()?;
        Some(points.fold(Self { min: first, max: first }, |acc, p| Self {
            min: acc.min.min(p),
            max: acc.max.max(p),
        }))
    }

    #[inline]
    pub fn union(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        self.min + self.size() * 0.5
    }

    /// Translation that moves the center onto the origin.
    #[inline]
    pub fn centering_offset(&self) -> Vec3 {
        -self.center()
    }

    /// Half the diagonal; radius of the bounding sphere around `center`.
    #[inline]
    pub fn radius(&self) -> f32 {
        self.size().length() * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3;

    #[test]
    fn unit_triangle_extents() {
        let e = Extents::from_positions(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0]).unwrap();
        assert_eq!(e.min, vec3(0.0, 0.0, 0.0));
        assert_eq!(e.max, vec3(1.0, 1.0, 0.0));
        assert_eq!(e.center(), vec3(0.5, 0.5, 0.0));
        assert_eq!(e.centering_offset(), vec3(-0.5, -0.5, 0.0));
    }

    #[test]
    fn empty_positions_have_no_extents() {
        assert!(Extents::from_positions(&[]).is_none());
        assert!(Extents::from_positions(&[1.0, 2.0]).is_none());
    }

    #[test]
    fn union_covers_both() {
        let a = Extents { min: vec3(-1.0, 0.0, 0.0), max: vec3(0.0, 1.0, 1.0) };
        let b = Extents { min: vec3(0.0, -2.0, 0.0), max: vec3(3.0, 0.0, 0.5) };
        let u = a.union(b);
        assert_eq!(u.min, vec3(-1.0, -2.0, 0.0));
        assert_eq!(u.max, vec3(3.0, 1.0, 1.0));
        assert!((u.radius() - u.size().length() / 2.0).abs() < 1e-6);
    }
}
