// Seed scenario 2 (spec.md §8): a Verlet-integrated particle falling past a
// sphere must intersect it and rebound with a velocity whose normal
// component has flipped sign (friction bleeds off the tangential part).
use physim_core::math::Vec3;
use physim_core::{Free, Geometry, Simulator, SimulatorConfig, Sphere, SolverKind};

#[test]
fn verlet_particle_bounces_off_sphere_target() {
    let mut sim = Simulator::new(SimulatorConfig {
        time_step: 0.01,
        solver: SolverKind::Verlet,
        viscous_drag: 0.0,
        gravity: Vec3::new(0.0, -9.81, 0.0),
        particle_particle_collisions: false,
        strict_missing_emitter: false,
    });
    sim.add_geometry(Geometry::Sphere(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 1.0).unwrap()));

    let mut p = Free::new(Vec3::new(-2.0, 4.5, 0.0), Vec3::ZERO, 1.0);
    p.bouncing = 0.8;
    p.friction = 0.2;
    p.lifetime = f32::INFINITY;
    sim.add_free_particle(p).unwrap();

    let sphere_center = Vec3::new(0.0, 2.0, 0.0);
    let radius = 1.0;
    let mut saw_contact = false;
    let mut vel_before_contact = Vec3::ZERO;
    let mut pos_before_contact = Vec3::ZERO;
    let mut vel_after_contact = None;

    for _ in 0..200 {
        let prev_pos = sim.free_particles()[0].base.cur_pos;
        let prev_vel = sim.free_particles()[0].base.cur_vel;
        sim.apply_time_step().unwrap();
        let pos = sim.free_particles()[0].base.cur_pos;
        let vel = sim.free_particles()[0].base.cur_vel;

        let dist_before = (prev_pos - sphere_center).length();
        if !saw_contact && dist_before <= radius + 1e-3 {
            saw_contact = true;
            vel_before_contact = prev_vel;
            pos_before_contact = prev_pos;
            vel_after_contact = Some(vel);
            break;
        }
    }

    assert!(saw_contact, "particle never reached the sphere within 2s");
    let normal = (pos_before_contact - sphere_center).normalize();
    let vel_after = vel_after_contact.unwrap();
    let vn_before = vel_before_contact.dot(normal);
    let vn_after = vel_after.dot(normal);
    // Incoming along -normal, outgoing along +normal (up to bounce scaling).
    assert!(vn_before <= 0.0);
    assert!(vn_after >= 0.0, "post-contact velocity should point away from the sphere, got {vn_after}");
}
