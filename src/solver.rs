use crate::body::RigidBody;
use crate::narrowphase::Manifold;
use crate::shapes::Shape;
use crate::vec3::Vec3;

/// Tunable contact-resolution parameters, owned by a single [`crate::world::World`]
/// rather than kept as process-wide globals — so independent worlds (e.g. in
/// parallel tests) never cross-talk.
#[derive(Copy, Clone, Debug)]
pub struct SolverConfig {
    position_correction_percent: f32,
    position_correction_slop: f32,
    normal_impulse_vslop: f32,
    wake_impulse_threshold: f32,
    wake_correction_threshold: f32,
    gravity: Vec3,
    current_dt: f32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            position_correction_percent: 0.95,
            position_correction_slop: 5e-4,
            normal_impulse_vslop: 2e-3,
            wake_impulse_threshold: 1e-3,
            wake_correction_threshold: 1e-3,
            gravity: Vec3::new(0.0, -9.81, 0.0),
            current_dt: 1.0 / 120.0,
        }
    }
}

impl SolverConfig {
    pub fn set_position_correction(&mut self, percent: f32, slop: f32) {
        self.position_correction_percent = percent.clamp(0.0, 1.0);
        self.position_correction_slop = slop.max(0.0);
    }

    pub fn set_normal_impulse_vslop(&mut self, vslop: f32) {
        self.normal_impulse_vslop = vslop.max(0.0);
    }

    pub fn set_wake_thresholds(&mut self, impulse: f32, correction: f32) {
        self.wake_impulse_threshold = impulse.max(0.0);
        self.wake_correction_threshold = correction.max(0.0);
    }

    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }

    #[must_use]
    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    pub fn set_current_dt(&mut self, dt: f32) {
        self.current_dt = dt.max(1e-8);
    }

    pub(crate) fn wake_impulse_threshold(&self) -> f32 {
        self.wake_impulse_threshold
    }
}

/// Resolves a single contact manifold between `a` and `b` in place: normal
/// impulse, Coulomb friction, and positional correction, in that order.
/// `manifold.normal` points from `b` toward `a`.
pub fn resolve(config: &SolverConfig, manifold: &Manifold, a: &mut RigidBody, b: &mut RigidBody) {
    let sum_inv_mass = a.inv_mass() + b.inv_mass();
    if sum_inv_mass == 0.0 {
        return;
    }

    a.mark_contact();
    b.mark_contact();

    let n = manifold.normal;

    // (1) Normal impulse, gated by a velocity deadband to avoid jitter at rest.
    let rv = a.velocity() - b.velocity();
    let v_n = rv.dot(n);
    let mut j = 0.0;
    if v_n < -config.normal_impulse_vslop {
        let e = a.material().restitution().min(b.material().restitution());
        j = -(1.0 + e) * v_n / sum_inv_mass;
        apply_impulse(a, b, n, j);
        let mag = j.abs();
        a.accumulate_impulse(mag);
        b.accumulate_impulse(mag);
        if mag > config.wake_impulse_threshold {
            a.wake_up();
            b.wake_up();
        }
    }

    // (2) Coulomb friction, recomputed against the post-impulse relative velocity.
    let rv = a.velocity() - b.velocity();
    let rv_t = rv - n * rv.dot(n);
    let rv_t_len = rv_t.length();
    if rv_t_len > 1e-9 {
        let t = rv_t / rv_t_len;
        let mu_s = (a.material().friction_static() + b.material().friction_static()) / 2.0;
        let mu_k = (a.material().friction_dynamic() + b.material().friction_dynamic()) / 2.0;

        let j_ideal = -rv.dot(t) / sum_inv_mass;
        let support = support_impulse(config, n, a, b);
        let j_n_eff = j.abs() + support;
        let max_static = mu_s * j_n_eff;

        if j_ideal.abs() <= max_static {
            apply_impulse(a, b, t, j_ideal);
        } else {
            // Matches reference behavior: no extra clamp against j_ideal, so
            // this can overshoot zero relative tangential velocity.
            let j_friction = -mu_k * j_n_eff;
            apply_impulse(a, b, t, j_friction);
            let mag = j_friction.abs();
            a.accumulate_impulse(mag);
            b.accumulate_impulse(mag);
            if mag > config.wake_impulse_threshold {
                a.wake_up();
                b.wake_up();
            }
        }
    }

    // (3) Positional correction, independent of whether a normal impulse fired.
    let corr_mag = (manifold.penetration - config.position_correction_slop).max(0.0)
        / sum_inv_mass
        * config.position_correction_percent;
    a.accumulate_correction(corr_mag);
    b.accumulate_correction(corr_mag);
    if corr_mag > config.wake_correction_threshold {
        a.wake_up();
        b.wake_up();
    }
    a.set_position(a.position() + n * (corr_mag * a.inv_mass()));
    b.set_position(b.position() - n * (corr_mag * b.inv_mass()));

    // (4) Sphere-plane post-stabilization: a manifold already earned a full
    // impulse+correction pass above, but a tiny residual gap or creeping
    // normal velocity is still settled directly rather than left to the next
    // iteration.
    sphere_plane_post_stabilize(a, b);
}

/// Settles residual penetration/velocity on a resolved sphere-plane manifold.
/// A no-op for any other shape pairing. Never wakes either body.
fn sphere_plane_post_stabilize(a: &mut RigidBody, b: &mut RigidBody) {
    let (sphere_is_a, radius, normal, d) = match (a.shape(), b.shape()) {
        (Shape::Sphere { radius }, Shape::Plane { normal, d }) => (true, *radius, *normal, *d),
        (Shape::Plane { normal, d }, Shape::Sphere { radius }) => (false, *radius, *normal, *d),
        _ => return,
    };
    let (sphere, plane): (&mut RigidBody, &mut RigidBody) = if sphere_is_a { (a, b) } else { (b, a) };

    sphere.mark_contact();
    plane.mark_contact();

    let dist = normal.dot(sphere.position()) - d;
    let error = radius - dist;
    if error.abs() < 1e-3 {
        sphere.set_position(sphere.position() + normal * error);
        sphere.accumulate_correction(error.abs());
        plane.accumulate_correction(error.abs());
    }

    let rv_n = (sphere.velocity() - plane.velocity()).dot(normal);
    if rv_n.abs() < 2e-3 {
        sphere.set_velocity(sphere.velocity() - normal * rv_n);
    }
}

/// `(massA + massB) * |gravity . normal| * dt`: gives Coulomb friction some
/// headroom from gravity loading even on contacts with no fresh normal
/// impulse (e.g. a body resting quietly between solver iterations).
pub(crate) fn support_impulse(config: &SolverConfig, normal: Vec3, a: &RigidBody, b: &RigidBody) -> f32 {
    (a.mass() + b.mass()) * config.gravity.dot(normal).abs() * config.current_dt
}

pub(crate) fn apply_impulse(a: &mut RigidBody, b: &mut RigidBody, dir: Vec3, magnitude: f32) {
    a.set_velocity(a.velocity() + dir * (magnitude * a.inv_mass()));
    b.set_velocity(b.velocity() - dir * (magnitude * b.inv_mass()));
}
