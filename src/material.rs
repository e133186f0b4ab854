/// Surface properties governing contact response for a single body.
///
/// Combined pairwise in the solver: restitution takes the minimum of the two
/// bodies, friction coefficients are averaged.
#[derive(Copy, Clone, Debug)]
pub struct Material {
    restitution: f32,
    friction_static: f32,
    friction_dynamic: f32,
    linear_damping: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            restitution: 0.4,
            friction_static: 0.6,
            friction_dynamic: 0.4,
            linear_damping: 0.05,
        }
    }
}

impl Material {
    #[must_use]
    pub fn restitution(&self) -> f32 {
        self.restitution
    }

    pub fn set_restitution(&mut self, value: f32) {
        self.restitution = value.clamp(0.0, 1.0);
    }

    #[must_use]
    pub fn friction_static(&self) -> f32 {
        self.friction_static
    }

    pub fn set_friction_static(&mut self, value: f32) {
        self.friction_static = value.max(0.0);
    }

    #[must_use]
    pub fn friction_dynamic(&self) -> f32 {
        self.friction_dynamic
    }

    pub fn set_friction_dynamic(&mut self, value: f32) {
        self.friction_dynamic = value.max(0.0);
    }

    #[must_use]
    pub fn linear_damping(&self) -> f32 {
        self.linear_damping
    }

    pub fn set_linear_damping(&mut self, value: f32) {
        self.linear_damping = value.max(0.0);
    }
}
