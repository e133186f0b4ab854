use crate::body::RigidBody;
use crate::bounds;
use crate::broad_phase::UniformGrid;
use crate::narrowphase;
use crate::shapes::Shape;
use crate::sleep::{self, SleepConfig};
use crate::soft_contact;
use crate::solver::{self, SolverConfig};
use crate::vec3::Vec3;

const MAX_ACCUMULATED_DT: f64 = 0.25;
const MAX_FIXED_STEPS_PER_UPDATE: u32 = 8;
const MIN_FIXED_TIME_STEP: f32 = 1e-6;

/// Owns every body in the simulation and drives the fixed-step loop:
/// integration, broadphase, narrowphase + solver iterations, and sleep
/// bookkeeping. Single-threaded and synchronous — a call to [`World::update`]
/// fully advances the simulation before returning.
pub struct World {
    bodies: Vec<RigidBody>,
    gravity: Vec3,
    fixed_time_step: f32,
    substeps: u32,
    solver_iterations: u32,
    broadphase: Option<UniformGrid>,
    accumulator: f64,
    solver_config: SolverConfig,
    sleep_config: SleepConfig,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    #[must_use]
    pub fn new() -> Self {
        Self {
            bodies: Vec::new(),
            gravity: Vec3::new(0.0, -9.81, 0.0),
            fixed_time_step: 1.0 / 120.0,
            substeps: 1,
            solver_iterations: 4,
            broadphase: None,
            accumulator: 0.0,
            solver_config: SolverConfig::default(),
            sleep_config: SleepConfig::default(),
        }
    }

    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
        self.solver_config.set_gravity(gravity);
    }

    #[must_use]
    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    pub fn set_fixed_time_step(&mut self, seconds: f32) {
        self.fixed_time_step = seconds.max(MIN_FIXED_TIME_STEP);
    }

    pub fn set_substeps(&mut self, n: u32) {
        self.substeps = n.max(1);
    }

    pub fn set_solver_iterations(&mut self, n: u32) {
        self.solver_iterations = n.max(1);
    }

    pub fn set_broadphase(&mut self, broadphase: Option<UniformGrid>) {
        self.broadphase = broadphase;
    }

    pub fn set_sleep_vel_threshold(&mut self, v: f32) {
        self.sleep_config.set_vel_threshold(v);
    }

    pub fn set_sleep_time(&mut self, seconds: f32) {
        self.sleep_config.set_time_to_sleep(seconds);
    }

    pub fn set_sleep_quiet_thresholds(&mut self, impulse: f32, correction: f32) {
        self.sleep_config.set_quiet_thresholds(impulse, correction);
    }

    pub fn set_position_correction(&mut self, percent: f32, slop: f32) {
        self.solver_config.set_position_correction(percent, slop);
    }

    pub fn set_normal_impulse_vslop(&mut self, vslop: f32) {
        self.solver_config.set_normal_impulse_vslop(vslop);
    }

    pub fn set_wake_thresholds(&mut self, impulse: f32, correction: f32) {
        self.solver_config.set_wake_thresholds(impulse, correction);
    }

    /// Adds a body, assigning it a stable insertion-order id, and returns
    /// that id.
    pub fn add_body(&mut self, mut body: RigidBody) -> u64 {
        let id = self.bodies.len() as u64;
        body.set_id(id);
        self.bodies.push(body);
        id
    }

    #[must_use]
    pub fn dynamic_sphere(&mut self, position: Vec3, radius: f32, mass: f32) -> u64 {
        self.add_body(RigidBody::dynamic(position, Shape::sphere(radius), mass))
    }

    #[must_use]
    pub fn dynamic_box(&mut self, position: Vec3, half_extents: Vec3, mass: f32) -> u64 {
        self.add_body(RigidBody::dynamic(position, Shape::aabb(half_extents), mass))
    }

    #[must_use]
    pub fn static_plane(&mut self, normal: Vec3, d: f32) -> u64 {
        self.add_body(RigidBody::fixed(Vec3::ZERO, Shape::plane(normal, d)))
    }

    #[must_use]
    pub fn bodies(&self) -> &[RigidBody] {
        &self.bodies
    }

    pub fn bodies_mut(&mut self) -> &mut [RigidBody] {
        &mut self.bodies
    }

    #[must_use]
    pub fn body(&self, id: u64) -> Option<&RigidBody> {
        self.bodies.get(id as usize)
    }

    pub fn body_mut(&mut self, id: u64) -> Option<&mut RigidBody> {
        self.bodies.get_mut(id as usize)
    }

    pub fn reset_accumulator(&mut self) {
        self.accumulator = 0.0;
    }

    /// Fraction of the next fixed step already accumulated, for render-side
    /// interpolation between the previous and current physics state.
    #[must_use]
    pub fn get_interpolation_alpha(&self) -> f32 {
        (self.accumulator / f64::from(self.fixed_time_step)).clamp(0.0, 1.0) as f32
    }

    /// Advances the simulation by `delta_time` seconds of wall-clock time,
    /// in as many fixed steps of `fixedTimeStep` as the accumulator allows
    /// (clamped against the spiral of death).
    pub fn update(&mut self, delta_time: f32) {
        let delta_time = f64::from(delta_time.max(0.0)).min(MAX_ACCUMULATED_DT);
        self.accumulator += delta_time;

        let mut steps_done = 0;
        while self.accumulator >= f64::from(self.fixed_time_step)
            && steps_done < MAX_FIXED_STEPS_PER_UPDATE
        {
            let sub_dt = self.fixed_time_step / self.substeps as f32;
            for _ in 0..self.substeps {
                self.step(sub_dt);
            }
            self.accumulator -= f64::from(self.fixed_time_step);
            steps_done += 1;
        }

        if steps_done == MAX_FIXED_STEPS_PER_UPDATE {
            self.accumulator = 0.0;
        }
    }

    /// Advances the simulation by exactly one substep of length `dt`.
    pub fn step(&mut self, dt: f32) {
        self.solver_config.set_current_dt(dt);

        for body in &mut self.bodies {
            body.reset_step_activity();
        }

        self.integrate(dt);

        let pairs = self.candidate_pairs();

        for &(i, j) in &pairs {
            if self.bodies[i].is_sleeping() && self.bodies[j].is_sleeping() {
                continue;
            }
            if is_sphere_plane(&self.bodies[i], &self.bodies[j]) {
                let (a, b) = two_mut(&mut self.bodies, i, j);
                soft_contact::apply(&self.solver_config, a, b);
            }
        }

        let mut manifold_count = 0u32;
        for _ in 0..self.solver_iterations {
            for &(i, j) in &pairs {
                if self.bodies[i].is_sleeping() && self.bodies[j].is_sleeping() {
                    continue;
                }
                if let Some(manifold) = narrowphase::detect(&self.bodies[i], &self.bodies[j]) {
                    manifold_count += 1;
                    let (a, b) = two_mut(&mut self.bodies, i, j);
                    solver::resolve(&self.solver_config, &manifold, a, b);
                }
            }
        }

        for body in &mut self.bodies {
            sleep::update(&self.sleep_config, body, dt);
        }

        tracing::trace!(
            pairs = pairs.len(),
            manifolds = manifold_count,
            "physics step resolved"
        );
    }

    fn integrate(&mut self, dt: f32) {
        for body in &mut self.bodies {
            if body.is_static() || body.is_sleeping() {
                body.clear_forces();
                continue;
            }
            let acc = body.force_accum() * body.inv_mass() + self.gravity;
            let v = body.velocity() + acc * dt;
            let damping = (-body.material().linear_damping() * dt).exp();
            let v = v * damping;
            body.set_velocity(v);
            body.set_position(body.position() + v * dt);
            body.clear_forces();
        }
    }

    fn candidate_pairs(&mut self) -> Vec<(usize, usize)> {
        if let Some(grid) = &mut self.broadphase {
            grid.clear();
            for (i, body) in self.bodies.iter().enumerate() {
                if let Some(aabb) = bounds::compute(body) {
                    grid.insert(i, aabb);
                }
            }
            let mut pairs = grid.compute_pairs();

            let plane_indices: Vec<usize> = self
                .bodies
                .iter()
                .enumerate()
                .filter(|(_, b)| b.shape().is_plane())
                .map(|(i, _)| i)
                .collect();
            for (i, body) in self.bodies.iter().enumerate() {
                if body.shape().is_plane() {
                    continue;
                }
                for &p in &plane_indices {
                    pairs.push((i, p));
                }
            }
            pairs
        } else {
            // Planes have no finite AABB, but the brute-force enumeration
            // already covers every pair including (other, plane); augmenting
            // here would duplicate those contacts.
            let n = self.bodies.len();
            let mut all = Vec::with_capacity(n * n.saturating_sub(1) / 2);
            for i in 0..n {
                for j in (i + 1)..n {
                    all.push((i, j));
                }
            }
            all
        }
    }
}

fn is_sphere_plane(a: &RigidBody, b: &RigidBody) -> bool {
    matches!(
        (a.shape(), b.shape()),
        (Shape::Sphere { .. }, Shape::Plane { .. }) | (Shape::Plane { .. }, Shape::Sphere { .. })
    )
}

fn two_mut(bodies: &mut [RigidBody], i: usize, j: usize) -> (&mut RigidBody, &mut RigidBody) {
    assert!(i != j, "cannot borrow the same body twice");
    if i < j {
        let (left, right) = bodies.split_at_mut(j);
        (&mut left[i], &mut right[0])
    } else {
        let (left, right) = bodies.split_at_mut(i);
        (&mut right[0], &mut left[j])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ball_bounces_above_floor() {
        let mut world = World::new();
        world.static_plane(Vec3::Y, 0.0);
        let ball = world.dynamic_sphere(Vec3::new(0.0, 2.0, 0.0), 0.25, 1.0);
        world.body_mut(ball).unwrap().material_mut().set_restitution(0.5);

        let mut min_y = f32::MAX;
        for _ in 0..600 {
            world.step(1.0 / 120.0);
            min_y = min_y.min(world.body(ball).unwrap().position().y);
        }
        assert!(min_y >= 0.24, "min_y={min_y}");
    }

    #[test]
    fn static_body_is_unaffected_by_step() {
        let mut world = World::new();
        let plane = world.static_plane(Vec3::Y, 0.0);
        let before = world.body(plane).unwrap().position();
        world.step(1.0 / 120.0);
        assert_eq!(world.body(plane).unwrap().position(), before);
    }

    #[test]
    fn update_zero_after_reset_is_a_no_op() {
        let mut world = World::new();
        let id = world.dynamic_sphere(Vec3::new(0.0, 5.0, 0.0), 0.5, 1.0);
        world.reset_accumulator();
        let before = world.body(id).unwrap().position();
        world.update(0.0);
        assert_eq!(world.body(id).unwrap().position(), before);
    }

    #[test]
    fn interpolation_alpha_stays_in_unit_range() {
        let mut world = World::new();
        world.update(1.0 / 60.0);
        let alpha = world.get_interpolation_alpha();
        assert!((0.0..=1.0).contains(&alpha));
    }
}
