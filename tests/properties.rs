use physics::{narrowphase, RigidBody, Shape, Vec3, World};

#[test]
fn manifold_normals_are_unit_length() {
    let sphere = RigidBody::dynamic(Vec3::new(0.0, 0.2, 0.0), Shape::sphere(0.5), 1.0);
    let plane = RigidBody::fixed(Vec3::ZERO, Shape::plane(Vec3::Y, 0.0));
    let manifold = narrowphase::detect(&sphere, &plane).expect("should overlap");
    assert!((manifold.normal.length() - 1.0).abs() < 1e-6);
}

#[test]
fn static_body_position_and_velocity_never_change() {
    let mut world = World::new();
    let plane = world.static_plane(Vec3::Y, 0.0);
    world.dynamic_sphere(Vec3::new(0.0, 0.3, 0.0), 0.25, 1.0);

    let before_pos = world.body(plane).unwrap().position();
    let before_vel = world.body(plane).unwrap().velocity();
    for _ in 0..120 {
        world.step(1.0 / 120.0);
    }
    assert_eq!(world.body(plane).unwrap().position(), before_pos);
    assert_eq!(world.body(plane).unwrap().velocity(), before_vel);
}

#[test]
fn sleeping_body_holds_still_until_woken() {
    let mut world = World::new();
    world.set_sleep_time(0.1);
    world.set_sleep_vel_threshold(0.2);
    world.static_plane(Vec3::Y, 0.0);
    let ball = world.dynamic_sphere(Vec3::new(0.0, 0.3, 0.0), 0.25, 1.0);
    world.body_mut(ball).unwrap().set_velocity(Vec3::ZERO);

    for _ in 0..600 {
        world.step(1.0 / 120.0);
        if world.body(ball).unwrap().is_sleeping() {
            break;
        }
    }
    assert!(world.body(ball).unwrap().is_sleeping());

    let pos = world.body(ball).unwrap().position();
    let vel = world.body(ball).unwrap().velocity();
    for _ in 0..60 {
        world.step(1.0 / 120.0);
    }
    assert_eq!(world.body(ball).unwrap().position(), pos);
    assert_eq!(world.body(ball).unwrap().velocity(), vel);
}

#[test]
fn wake_up_is_idempotent() {
    let mut body = RigidBody::dynamic(Vec3::ZERO, Shape::sphere(0.5), 1.0);
    body.wake_up();
    body.wake_up();
    assert!(!body.is_sleeping());
}

#[test]
fn plane_constructor_normalizes_arbitrary_vectors() {
    for v in [
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(0.0, -5.0, 0.0),
    ] {
        let Shape::Plane { normal, .. } = Shape::plane(v, 1.0) else {
            panic!("expected plane");
        };
        assert!((normal.length() - 1.0).abs() < 1e-6, "v={v:?}");
    }
}

#[test]
fn broadphase_pairs_have_no_duplicates_or_self_pairs() {
    use physics::UniformGrid;
    let mut grid = UniformGrid::new(1.0);
    let half = Vec3::new(0.3, 0.3, 0.3);
    for i in 0..20 {
        let x = (i as f32) * 0.2;
        grid.insert(
            i,
            physics::Aabb {
                min: Vec3::new(x, 0.0, 0.0) - half,
                max: Vec3::new(x, 0.0, 0.0) + half,
            },
        );
    }
    let pairs = grid.compute_pairs();
    let mut seen = std::collections::HashSet::new();
    for (a, b) in pairs {
        assert_ne!(a, b);
        assert!(seen.insert((a, b)), "duplicate pair ({a}, {b})");
    }
}
