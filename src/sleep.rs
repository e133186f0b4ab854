use crate::body::RigidBody;
use crate::vec3::Vec3;

/// Hysteresis parameters for the sleep controller, owned by
/// [`crate::world::World`].
#[derive(Copy, Clone, Debug)]
pub struct SleepConfig {
    vel_threshold: f32,
    time_to_sleep: f32,
    impulse_quiet: f32,
    correction_quiet: f32,
}

impl Default for SleepConfig {
    fn default() -> Self {
        Self {
            vel_threshold: 0.05,
            time_to_sleep: 0.5,
            impulse_quiet: 1e-2,
            correction_quiet: 2e-3,
        }
    }
}

impl SleepConfig {
    pub fn set_vel_threshold(&mut self, value: f32) {
        self.vel_threshold = value.max(0.0);
    }

    pub fn set_time_to_sleep(&mut self, value: f32) {
        self.time_to_sleep = value.max(0.0);
    }

    pub fn set_quiet_thresholds(&mut self, impulse: f32, correction: f32) {
        self.impulse_quiet = impulse.max(0.0);
        self.correction_quiet = correction.max(0.0);
    }
}

const VEL_AVG_ALPHA: f32 = 0.2;

/// Updates one body's sleep bookkeeping for a substep of length `dt`, using
/// that body's per-step activity accumulated by integration and the solver.
/// Call once per body per substep, after the solver has run.
pub fn update(config: &SleepConfig, body: &mut RigidBody, dt: f32) {
    if body.is_static() || !body.can_sleep() {
        body.set_sleep_timer(0.0);
        body.set_sleeping(false);
        body.set_vel_avg(0.0);
        return;
    }

    let was_sleeping = body.is_sleeping();

    let speed = body.velocity().length();
    let avg = match body.vel_avg() {
        None => speed,
        Some(prev) => VEL_AVG_ALPHA * speed + (1.0 - VEL_AVG_ALPHA) * prev,
    };
    body.set_vel_avg(avg);

    let quiet_velocity = avg < config.vel_threshold;
    let quiet_contacts = body.max_impulse_this_step() <= config.impulse_quiet
        && body.max_correction_this_step() <= config.correction_quiet;

    if body.had_contact_this_step() && quiet_velocity && quiet_contacts {
        body.set_sleep_timer(body.sleep_timer() + dt);
        if body.sleep_timer() >= config.time_to_sleep {
            body.set_sleeping(true);
            body.set_velocity(Vec3::ZERO);
        }
    } else {
        body.set_sleep_timer(0.0);
        body.set_sleeping(false);
    }

    if body.is_sleeping() != was_sleeping {
        tracing::debug!(
            body_id = body.id(),
            sleeping = body.is_sleeping(),
            "sleep state changed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Shape;

    #[test]
    fn quiet_contact_eventually_sleeps() {
        let config = SleepConfig::default();
        let mut body = RigidBody::dynamic(Vec3::ZERO, Shape::sphere(0.5), 1.0);
        body.set_velocity(Vec3::ZERO);
        let dt = 1.0 / 120.0;
        let mut steps = 0;
        while !body.is_sleeping() && steps < 10_000 {
            body.reset_step_activity();
            body.mark_contact();
            update(&config, &mut body, dt);
            steps += 1;
        }
        assert!(body.is_sleeping());
    }

    #[test]
    fn no_contact_never_sleeps() {
        let config = SleepConfig::default();
        let mut body = RigidBody::dynamic(Vec3::ZERO, Shape::sphere(0.5), 1.0);
        body.set_velocity(Vec3::ZERO);
        for _ in 0..1000 {
            body.reset_step_activity();
            update(&config, &mut body, 1.0 / 120.0);
        }
        assert!(!body.is_sleeping());
    }

    #[test]
    fn static_body_never_sleeps() {
        let config = SleepConfig::default();
        let mut body = RigidBody::fixed(Vec3::ZERO, Shape::plane(Vec3::Y, 0.0));
        for _ in 0..1000 {
            update(&config, &mut body, 1.0 / 120.0);
        }
        assert!(!body.is_sleeping());
    }
}
