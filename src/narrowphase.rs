use crate::body::RigidBody;
use crate::shapes::Shape;
use crate::vec3::Vec3;

/// Sphere-plane penetrations shallower than this are left to the resting
/// stabilizer in [`crate::soft_contact`] instead of producing a manifold.
const SNAP_SLOP: f32 = 1e-3;

/// A single-point contact between two bodies. `normal` always points from
/// the second body toward the first, matching the order the caller passed
/// to [`detect`].
#[derive(Copy, Clone, Debug)]
pub struct Manifold {
    pub normal: Vec3,
    pub penetration: f32,
}

/// Finds a manifold for `a` and `b` in whatever shape-pair combination they
/// are, trying sphere-sphere, sphere-plane, sphere-aabb, aabb-plane, then
/// aabb-aabb. Plane-plane is never reachable here since planes never appear
/// together in a candidate pair (see [`crate::world::World::step`]).
#[must_use]
pub fn detect(a: &RigidBody, b: &RigidBody) -> Option<Manifold> {
    match (a.shape(), b.shape()) {
        (Shape::Sphere { .. }, Shape::Sphere { .. }) => sphere_sphere(a, b),
        (Shape::Sphere { .. }, Shape::Plane { .. }) | (Shape::Plane { .. }, Shape::Sphere { .. }) => {
            sphere_plane(a, b)
        }
        (Shape::Sphere { .. }, Shape::Aabb { .. }) | (Shape::Aabb { .. }, Shape::Sphere { .. }) => {
            sphere_aabb(a, b)
        }
        (Shape::Aabb { .. }, Shape::Plane { .. }) | (Shape::Plane { .. }, Shape::Aabb { .. }) => {
            aabb_plane(a, b)
        }
        (Shape::Aabb { .. }, Shape::Aabb { .. }) => aabb_aabb(a, b),
        (Shape::Plane { .. }, Shape::Plane { .. }) => None,
    }
}

fn sphere_sphere(a: &RigidBody, b: &RigidBody) -> Option<Manifold> {
    let Shape::Sphere { radius: ra } = *a.shape() else {
        unreachable!()
    };
    let Shape::Sphere { radius: rb } = *b.shape() else {
        unreachable!()
    };
    let delta = a.position() - b.position();
    let dist = delta.length();
    let combined = ra + rb;
    if dist >= combined {
        return None;
    }
    let penetration = combined - dist;
    let normal = delta.normalize().unwrap_or(Vec3::X);
    Some(Manifold { normal, penetration })
}

fn sphere_plane(a: &RigidBody, b: &RigidBody) -> Option<Manifold> {
    let (sphere_pos, radius, normal, d, sphere_is_a) = match (a.shape(), b.shape()) {
        (Shape::Sphere { radius }, Shape::Plane { normal, d }) => {
            (a.position(), *radius, *normal, *d, true)
        }
        (Shape::Plane { normal, d }, Shape::Sphere { radius }) => {
            (b.position(), *radius, *normal, *d, false)
        }
        _ => unreachable!(),
    };
    let dist = normal.dot(sphere_pos) - d;
    let penetration = radius - dist;
    if penetration <= SNAP_SLOP {
        return None;
    }
    let oriented = if sphere_is_a { normal } else { -normal };
    Some(Manifold {
        normal: oriented,
        penetration,
    })
}

fn sphere_aabb(a: &RigidBody, b: &RigidBody) -> Option<Manifold> {
    let (sphere_pos, radius, box_pos, half, sphere_is_a) = match (a.shape(), b.shape()) {
        (Shape::Sphere { radius }, Shape::Aabb { half_extents }) => {
            (a.position(), *radius, b.position(), *half_extents, true)
        }
        (Shape::Aabb { half_extents }, Shape::Sphere { radius }) => {
            (b.position(), *radius, a.position(), *half_extents, false)
        }
        _ => unreachable!(),
    };

    let local = sphere_pos - box_pos;
    let clamped = Vec3::new(
        local.x.clamp(-half.x, half.x),
        local.y.clamp(-half.y, half.y),
        local.z.clamp(-half.z, half.z),
    );
    let offset = local - clamped;
    let dist = offset.length();

    let (raw_normal, penetration) = if dist > 1e-9 {
        if dist >= radius {
            return None;
        }
        (offset / dist, radius - dist)
    } else {
        // Center lies inside the box: pick the nearest face. Ties favor the
        // earlier axis (x, then y, then z).
        let dx = half.x - local.x.abs();
        let dy = half.y - local.y.abs();
        let dz = half.z - local.z.abs();
        let axis = if dx <= dy && dx <= dz {
            0
        } else if dy <= dz {
            1
        } else {
            2
        };
        let face_dist = [dx, dy, dz][axis];
        let sign = if local.component(axis) >= 0.0 { 1.0 } else { -1.0 };
        let n = match axis {
            0 => Vec3::new(sign, 0.0, 0.0),
            1 => Vec3::new(0.0, sign, 0.0),
            _ => Vec3::new(0.0, 0.0, sign),
        };
        (n, radius + face_dist)
    };

    let oriented = if sphere_is_a { raw_normal } else { -raw_normal };
    Some(Manifold {
        normal: oriented,
        penetration,
    })
}

fn aabb_plane(a: &RigidBody, b: &RigidBody) -> Option<Manifold> {
    let (box_pos, half, normal, d, box_is_a) = match (a.shape(), b.shape()) {
        (Shape::Aabb { half_extents }, Shape::Plane { normal, d }) => {
            (a.position(), *half_extents, *normal, *d, true)
        }
        (Shape::Plane { normal, d }, Shape::Aabb { half_extents }) => {
            (b.position(), *half_extents, *normal, *d, false)
        }
        _ => unreachable!(),
    };

    let r = (half.x * normal.x).abs() + (half.y * normal.y).abs() + (half.z * normal.z).abs();
    let dist = normal.dot(box_pos) - d;
    let penetration = r - dist;
    if penetration <= 0.0 {
        return None;
    }
    let oriented = if box_is_a { normal } else { -normal };
    Some(Manifold {
        normal: oriented,
        penetration,
    })
}

fn aabb_aabb(a: &RigidBody, b: &RigidBody) -> Option<Manifold> {
    let Shape::Aabb { half_extents: ha } = *a.shape() else {
        unreachable!()
    };
    let Shape::Aabb { half_extents: hb } = *b.shape() else {
        unreachable!()
    };

    let delta = b.position() - a.position();
    let ox = (ha.x + hb.x) - delta.x.abs();
    let oy = (ha.y + hb.y) - delta.y.abs();
    let oz = (ha.z + hb.z) - delta.z.abs();
    if ox <= 0.0 || oy <= 0.0 || oz <= 0.0 {
        return None;
    }

    let (axis, penetration) = if ox <= oy && ox <= oz {
        (0, ox)
    } else if oy <= oz {
        (1, oy)
    } else {
        (2, oz)
    };

    let delta_c = delta.component(axis);
    // Exact ties pick the positive axis direction for the normal.
    let raw_sign = if delta_c > 0.0 {
        1.0
    } else {
        -1.0
    };
    let n = match axis {
        0 => Vec3::new(-raw_sign, 0.0, 0.0),
        1 => Vec3::new(0.0, -raw_sign, 0.0),
        _ => Vec3::new(0.0, 0.0, -raw_sign),
    };
    Some(Manifold { normal: n, penetration })
}
