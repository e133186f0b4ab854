use crate::material::Material;
use crate::shapes::Shape;
use crate::vec3::Vec3;

/// A single rigid body: position, velocity, mass, shape, material, and the
/// bookkeeping the sleep controller and solver need between steps.
///
/// Angular state (orientation, angular velocity, torque) is intentionally
/// absent: this engine only integrates linear motion.
#[derive(Clone, Debug)]
pub struct RigidBody {
    id: u64,
    position: Vec3,
    velocity: Vec3,
    force_accum: Vec3,
    inv_mass: f32,
    shape: Shape,
    material: Material,

    can_sleep: bool,
    sleeping: bool,
    sleep_timer: f32,
    vel_avg: Option<f32>,

    had_contact_this_step: bool,
    max_impulse_this_step: f32,
    max_correction_this_step: f32,
}

impl RigidBody {
    /// Builds a dynamic body. `mass` must be strictly positive.
    #[must_use]
    pub fn dynamic(position: Vec3, shape: Shape, mass: f32) -> Self {
        assert!(mass > 0.0, "dynamic body mass must be positive");
        Self::new(position, shape, 1.0 / mass)
    }

    /// Builds an immovable body (`invMass == 0`): planes and fixed geometry.
    #[must_use]
    pub fn fixed(position: Vec3, shape: Shape) -> Self {
        Self::new(position, shape, 0.0)
    }

    fn new(position: Vec3, shape: Shape, inv_mass: f32) -> Self {
        Self {
            id: 0,
            position,
            velocity: Vec3::ZERO,
            force_accum: Vec3::ZERO,
            inv_mass,
            shape,
            material: Material::default(),
            can_sleep: inv_mass > 0.0,
            sleeping: false,
            sleep_timer: 0.0,
            vel_avg: None,
            had_contact_this_step: false,
            max_impulse_this_step: 0.0,
            max_correction_this_step: 0.0,
        }
    }

    pub(crate) fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    #[must_use]
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    pub fn add_force(&mut self, force: Vec3) {
        self.force_accum = self.force_accum + force;
    }

    pub fn clear_forces(&mut self) {
        self.force_accum = Vec3::ZERO;
    }

    #[must_use]
    pub fn force_accum(&self) -> Vec3 {
        self.force_accum
    }

    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[must_use]
    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn material_mut(&mut self) -> &mut Material {
        &mut self.material
    }

    #[must_use]
    pub fn inv_mass(&self) -> f32 {
        self.inv_mass
    }

    #[must_use]
    pub fn mass(&self) -> f32 {
        if self.inv_mass > 0.0 {
            1.0 / self.inv_mass
        } else {
            0.0
        }
    }

    #[must_use]
    pub fn is_static(&self) -> bool {
        self.inv_mass == 0.0
    }

    #[must_use]
    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    pub fn set_can_sleep(&mut self, can_sleep: bool) {
        self.can_sleep = can_sleep;
        if !can_sleep {
            self.wake_up();
        }
    }

    #[must_use]
    pub fn can_sleep(&self) -> bool {
        self.can_sleep
    }

    /// Clears the sleeping flag and timer. Idempotent: calling it on an
    /// already-awake body is a no-op beyond resetting the timer.
    pub fn wake_up(&mut self) {
        self.sleeping = false;
        self.sleep_timer = 0.0;
    }

    #[must_use]
    pub fn had_contact_this_step(&self) -> bool {
        self.had_contact_this_step
    }

    #[must_use]
    pub fn max_impulse_this_step(&self) -> f32 {
        self.max_impulse_this_step
    }

    #[must_use]
    pub fn max_correction_this_step(&self) -> f32 {
        self.max_correction_this_step
    }

    pub(crate) fn reset_step_activity(&mut self) {
        self.had_contact_this_step = false;
        self.max_impulse_this_step = 0.0;
        self.max_correction_this_step = 0.0;
    }

    pub(crate) fn mark_contact(&mut self) {
        self.had_contact_this_step = true;
    }

    pub(crate) fn accumulate_impulse(&mut self, magnitude: f32) {
        if magnitude > self.max_impulse_this_step {
            self.max_impulse_this_step = magnitude;
        }
    }

    pub(crate) fn accumulate_correction(&mut self, magnitude: f32) {
        if magnitude > self.max_correction_this_step {
            self.max_correction_this_step = magnitude;
        }
    }

    pub(crate) fn sleep_timer(&self) -> f32 {
        self.sleep_timer
    }

    pub(crate) fn set_sleep_timer(&mut self, value: f32) {
        self.sleep_timer = value;
    }

    pub(crate) fn set_sleeping(&mut self, sleeping: bool) {
        self.sleeping = sleeping;
    }

    pub(crate) fn vel_avg(&self) -> Option<f32> {
        self.vel_avg
    }

    pub(crate) fn set_vel_avg(&mut self, value: f32) {
        self.vel_avg = Some(value);
    }
}
