//! Orbital motion: uniform circular motion on the XZ plane.
//!
//! Position is a pure function of elapsed time; spin accumulates per frame.

use glam::Vec3;

use crate::core::scene::SceneGraph;

/// Phase factor applied to each body's angular speed.
pub const PHASE_FACTOR: f32 = 2.0;

/// Orbit position at `elapsed` seconds for a body at `distance` moving at `speed`.
pub fn orbital_position(distance: f32, speed: f32, elapsed: f32) -> Vec3 {
    // f64 keeps long sessions from losing phase precision.
    let phase = elapsed as f64 * speed as f64 * PHASE_FACTOR as f64;
    let d = distance as f64;
    Vec3::new((phase.cos() * d) as f32, 0.0, (phase.sin() * d) as f32)
}

/// Advance every node to `elapsed` seconds and add `spin_steps` frames of
/// self-rotation to every node and to the central body.
pub fn advance(scene: &mut SceneGraph, elapsed: f32, spin_steps: f32) {
    for node in scene.nodes_mut() {
        node.position = orbital_position(node.distance, node.speed, elapsed);
        node.spin = wrap_angle(node.spin + node.spin_rate * spin_steps);
    }
    let central = &mut scene.central;
    central.spin = wrap_angle(central.spin + central.spin_rate * spin_steps);
}

/// Keep accumulated angles in [-τ, τ] so f32 precision holds over long sessions.
fn wrap_angle(angle: f32) -> f32 {
    angle % std::f32::consts::TAU
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::SceneConfig;
    use crate::api::types::{BodyId, Rgb};
    use crate::catalog::{BodyDefinition, Catalog};
    use crate::systems::scene_builder::build;

    const EPS: f32 = 1e-3;

    fn single_body_scene() -> SceneGraph {
        let catalog = Catalog::new(vec![BodyDefinition {
            id: BodyId::new("probe"),
            name: "Probe".into(),
            radius: 1.0,
            distance: 10.0,
            color: Rgb::WHITE,
            speed: 0.01,
            rotation: 0.03,
            rings: false,
        }])
        .unwrap();
        build(&catalog, &SceneConfig { star_count: 0, ..SceneConfig::default() })
    }

    fn assert_vec_close(a: Vec3, b: Vec3) {
        assert!(a.distance(b) < EPS, "{a:?} != {b:?}");
    }

    #[test]
    fn scenario_positions() {
        let mut scene = single_body_scene();
        for t in [0.0_f32, 50.0, 3141.59] {
            advance(&mut scene, t, 1.0);
            let expected = Vec3::new(10.0 * (0.02 * t).cos(), 0.0, 10.0 * (0.02 * t).sin());
            assert_vec_close(scene.nodes()[0].position, expected);
        }
    }

    #[test]
    fn quarter_phase_lands_on_z_axis() {
        // phase = t * 0.01 * 2 = π/2
        let t = std::f32::consts::FRAC_PI_2 / 0.02;
        assert_vec_close(orbital_position(10.0, 0.01, t), Vec3::new(0.0, 0.0, 10.0));
    }

    #[test]
    fn position_is_pure_function_of_time() {
        let mut incremental = single_body_scene();
        for i in 0..=200 {
            advance(&mut incremental, i as f32 * 0.75, 1.0);
        }
        let mut direct = single_body_scene();
        advance(&mut direct, 150.0, 1.0);
        assert_vec_close(incremental.nodes()[0].position, direct.nodes()[0].position);
        assert_vec_close(direct.nodes()[0].position, orbital_position(10.0, 0.01, 150.0));
    }

    #[test]
    fn motion_stays_on_plane_at_constant_distance() {
        for t in [1.0_f32, 17.5, 999.0, 12345.0] {
            let p = orbital_position(23.0, 0.002, t);
            assert_eq!(p.y, 0.0);
            assert!((p.length() - 23.0).abs() < EPS);
        }
    }

    #[test]
    fn spin_accumulates_per_step() {
        let mut scene = single_body_scene();
        for _ in 0..10 {
            advance(&mut scene, 0.0, 1.0);
        }
        assert!((scene.nodes()[0].spin - 0.3).abs() < 1e-5);
        assert!((scene.central.spin - 0.015).abs() < 1e-6);

        advance(&mut scene, 0.0, 0.5);
        assert!((scene.nodes()[0].spin - 0.315).abs() < 1e-5);
    }
}
