use crate::vec3::Vec3;

/// Collidable shape owned by a [`crate::body::RigidBody`].
///
/// Shapes are immutable after construction. Constructors assert on
/// degenerate input (non-positive sizes, zero-length plane normal) since
/// these are programmer errors at construction time, not recoverable
/// runtime conditions.
#[derive(Copy, Clone, Debug)]
pub enum Shape {
    Sphere { radius: f32 },
    Aabb { half_extents: Vec3 },
    Plane { normal: Vec3, d: f32 },
}

impl Shape {
    #[must_use]
    pub fn sphere(radius: f32) -> Self {
        assert!(radius > 0.0, "sphere radius must be positive");
        Self::Sphere { radius }
    }

    #[must_use]
    pub fn aabb(half_extents: Vec3) -> Self {
        assert!(
            half_extents.x > 0.0 && half_extents.y > 0.0 && half_extents.z > 0.0,
            "aabb half-extents must be positive"
        );
        Self::Aabb { half_extents }
    }

    /// Constructs a plane from a (possibly unnormalized) normal and offset `d`
    /// such that the plane is the set of points `p` with `normal.dot(p) == d`.
    ///
    /// The normal is normalized; `d` is scaled to match.
    #[must_use]
    pub fn plane(normal: Vec3, d: f32) -> Self {
        let len = normal.length();
        assert!(len > 1e-12, "plane normal must be non-zero");
        Self::Plane {
            normal: normal / len,
            d: d / len,
        }
    }

    #[must_use]
    pub fn is_plane(&self) -> bool {
        matches!(self, Self::Plane { .. })
    }
}
