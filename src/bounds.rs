use crate::body::RigidBody;
use crate::shapes::Shape;
use crate::vec3::Vec3;

/// World-space axis-aligned bounding box, used only for broadphase insertion.
#[derive(Copy, Clone, Debug)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

/// Computes a body's world-space bounds, or `None` if the body is unbounded
/// (planes have no finite AABB and are excluded from the broadphase grid).
#[must_use]
pub fn compute(body: &RigidBody) -> Option<Aabb> {
    match *body.shape() {
        Shape::Sphere { radius } => {
            let r = Vec3::new(radius, radius, radius);
            Some(Aabb {
                min: body.position() - r,
                max: body.position() + r,
            })
        }
        Shape::Aabb { half_extents } => Some(Aabb {
            min: body.position() - half_extents,
            max: body.position() + half_extents,
        }),
        Shape::Plane { .. } => None,
    }
}
