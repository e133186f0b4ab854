use crate::body::RigidBody;
use crate::shapes::Shape;
use crate::solver::{apply_impulse, support_impulse, SolverConfig};

/// Resting-contact stabilizer for sphere-plane pairs that are too shallowly
/// penetrating (or separated) to earn a manifold from narrowphase. Run once
/// per pair, before the solver's manifold-driven iterations.
///
/// Unlike [`crate::solver::resolve`] this never applies a normal impulse —
/// only a direct positional snap, normal-velocity zeroing, and friction
/// driven purely by the gravity support term. A no-op if `a`/`b` are not a
/// sphere-plane pair, or if the gap exceeds the stabilizer's capture range.
pub fn apply(config: &SolverConfig, a: &mut RigidBody, b: &mut RigidBody) {
    let (sphere_is_a, radius, normal, d) = match (a.shape(), b.shape()) {
        (Shape::Sphere { radius }, Shape::Plane { normal, d }) => (true, *radius, *normal, *d),
        (Shape::Plane { normal, d }, Shape::Sphere { radius }) => (false, *radius, *normal, *d),
        _ => return,
    };

    let (sphere, plane): (&mut RigidBody, &mut RigidBody) = if sphere_is_a { (a, b) } else { (b, a) };

    let dist = normal.dot(sphere.position()) - d;
    let gap = (radius - dist).abs();
    if gap > 5e-3 {
        return;
    }

    sphere.mark_contact();
    plane.mark_contact();

    let correction = radius - dist;
    sphere.set_position(sphere.position() + normal * correction);
    sphere.accumulate_correction(correction.abs());
    plane.accumulate_correction(correction.abs());

    let v_n = sphere.velocity().dot(normal);
    sphere.set_velocity(sphere.velocity() - normal * v_n);

    let rv = sphere.velocity() - plane.velocity();
    let rv_t = rv - normal * rv.dot(normal);
    let rv_t_len = rv_t.length();
    let sum_inv_mass = sphere.inv_mass() + plane.inv_mass();
    if rv_t_len <= 1e-9 || sum_inv_mass == 0.0 {
        return;
    }

    let t = rv_t / rv_t_len;
    let mu_s = (sphere.material().friction_static() + plane.material().friction_static()) / 2.0;
    let mu_k = (sphere.material().friction_dynamic() + plane.material().friction_dynamic()) / 2.0;
    let j_support = support_impulse(config, normal, sphere, plane);
    let j_ideal = -rv.dot(t) / sum_inv_mass;
    let max_static = mu_s * j_support;

    if j_ideal.abs() <= max_static {
        apply_impulse(sphere, plane, t, j_ideal);
    } else {
        let j_friction = -mu_k * j_support;
        apply_impulse(sphere, plane, t, j_friction);
        let mag = j_friction.abs();
        sphere.accumulate_impulse(mag);
        plane.accumulate_impulse(mag);
        if mag > config.wake_impulse_threshold() {
            sphere.wake_up();
            plane.wake_up();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3::Vec3;

    #[test]
    fn resting_sphere_snaps_and_zeroes_normal_velocity() {
        let config = SolverConfig::default();
        let mut sphere = RigidBody::dynamic(Vec3::new(0.0, 0.501, 0.0), Shape::sphere(0.5), 1.0);
        sphere.set_velocity(Vec3::new(0.0, -0.01, 0.0));
        let mut plane = RigidBody::fixed(Vec3::ZERO, Shape::plane(Vec3::Y, 0.0));
        apply(&config, &mut sphere, &mut plane);
        assert!((sphere.position().y - 0.5).abs() < 1e-5);
        assert!(sphere.velocity().y.abs() < 1e-6);
    }

    #[test]
    fn far_sphere_is_untouched() {
        let config = SolverConfig::default();
        let mut sphere = RigidBody::dynamic(Vec3::new(0.0, 5.0, 0.0), Shape::sphere(0.5), 1.0);
        let mut plane = RigidBody::fixed(Vec3::ZERO, Shape::plane(Vec3::Y, 0.0));
        let before = sphere.position();
        apply(&config, &mut sphere, &mut plane);
        assert_eq!(sphere.position(), before);
    }

    #[test]
    fn non_sphere_plane_pair_is_a_no_op() {
        let config = SolverConfig::default();
        let mut a = RigidBody::dynamic(Vec3::ZERO, Shape::sphere(0.5), 1.0);
        let mut b = RigidBody::dynamic(Vec3::new(2.0, 0.0, 0.0), Shape::sphere(0.5), 1.0);
        let before = (a.position(), b.position());
        apply(&config, &mut a, &mut b);
        assert_eq!((a.position(), b.position()), before);
    }
}
