//! Bevy 3D viewer: one sphere per particle, gizmo lines for springs.
//!
//! Physics runs in `Update`, one fixed step per rendered frame.

use bevy::math::primitives::{Cuboid, Sphere};
use bevy::prelude::*;

use crate::simulation::scenario::Scenario;
use crate::simulation::states::NVec3;

/// Component tagging each sphere with its particle index
#[derive(Component)]
struct ParticleIndex(pub usize);

/// World-space -> scene scaling factor for positions and radii
const SCALE3D: f32 = 100.0;

/// Distance of the camera from the origin along +Z
const CAMERA_DISTANCE: f32 = 600.0;

const PARTICLE_RADIUS: f32 = 0.04;
const PINNED_COLOR: Color = Color::srgb(0.9, 0.2, 0.2);
const PARTICLE_COLOR: Color = Color::srgb(0.73, 0.0, 0.83);
const SPRING_COLOR: Color = Color::srgb(0.9, 0.9, 0.9);

/// Set once a step fails so the viewer freezes on the last good state
#[derive(Default)]
struct Halted(bool);

/// Open a window and run `scenario` until it is closed
pub fn run_3d(scenario: Scenario) {
    ftlog::info!("run_3d: starting Bevy 3D viewer with {} particles", scenario.model().particle_count());

    App::new()
        .insert_resource(scenario)
        .add_plugins(DefaultPlugins)
        .add_systems(Startup, setup_3d)
        .add_systems(Update, (physics_step_3d, sync_transforms_3d, draw_springs_3d).chain())
        .run();
}

fn to_scene(x: &NVec3) -> Vec3 {
    Vec3::new(x.x as f32, x.y as f32, x.z as f32) * SCALE3D
}

/// Startup system: camera, light, axes, and one sphere per particle
fn setup_3d(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    scenario: Res<Scenario>,
) {
    commands.spawn(Camera3dBundle {
        camera: Camera {
            clear_color: ClearColorConfig::Custom(Color::srgb(0.0, 0.0, 0.0)),
            ..Default::default()
        },
        transform: Transform::from_xyz(150.0, 0.0, CAMERA_DISTANCE).looking_at(Vec3::new(0.0, -50.0, 0.0), Vec3::Y),
        ..Default::default()
    });

    commands.spawn(PointLightBundle {
        point_light: PointLight {
            intensity: 1.0e7,
            range: 2000.0,
            ..Default::default()
        },
        transform: Transform::from_xyz(100.0, 300.0, CAMERA_DISTANCE),
        ..Default::default()
    });

    spawn_axes(&mut commands, &mut meshes, &mut materials);

    let model = scenario.model();
    let fixed = model.fixed_particles();
    let sphere = meshes.add(Sphere::new(PARTICLE_RADIUS * SCALE3D).mesh());
    let free_material = materials.add(StandardMaterial { base_color: PARTICLE_COLOR, ..Default::default() });
    let pinned_material = materials.add(StandardMaterial { base_color: PINNED_COLOR, ..Default::default() });

    for (i, x) in model.positions().iter().enumerate() {
        let material = if fixed.contains(&i) { pinned_material.clone() } else { free_material.clone() };
        commands.spawn((
            PbrBundle {
                mesh: sphere.clone(),
                material,
                transform: Transform::from_translation(to_scene(x)),
                ..Default::default()
            },
            ParticleIndex(i),
        ));
    }
}

/// Per-frame integration step
fn physics_step_3d(mut scenario: ResMut<Scenario>, mut halted: Local<Halted>) {
    if halted.0 {
        return;
    }
    if let Err(e) = scenario.step() {
        ftlog::error!("physics_step_3d: {e}, halting");
        halted.0 = true;
    }
}

fn sync_transforms_3d(scenario: Res<Scenario>, mut query: Query<(&ParticleIndex, &mut Transform)>) {
    let positions = scenario.model().positions();
    for (ParticleIndex(i), mut transform) in &mut query {
        if let Some(x) = positions.get(*i) {
            transform.translation = to_scene(x);
        }
    }
}

fn draw_springs_3d(scenario: Res<Scenario>, mut gizmos: Gizmos) {
    let model = scenario.model();
    let positions = model.positions();
    for (a, b) in model.springs() {
        gizmos.line(to_scene(&positions[a]), to_scene(&positions[b]), SPRING_COLOR);
    }
}

// =========================================================================================
// Draw 3D axes for visual reference
// =========================================================================================

fn spawn_axes(commands: &mut Commands, meshes: &mut Assets<Mesh>, materials: &mut Assets<StandardMaterial>) {
    // Axis length and thickness, in *world* units
    let axis_len = 4.0 * SCALE3D;
    let axis_thickness = 0.005 * SCALE3D;

    let axes = [
        (Cuboid::new(axis_len, axis_thickness, axis_thickness), Color::srgb(1.0, 0.0, 0.0)), // x: red
        (Cuboid::new(axis_thickness, axis_len, axis_thickness), Color::srgb(0.0, 1.0, 0.0)), // y: green
        (Cuboid::new(axis_thickness, axis_thickness, axis_len), Color::srgb(0.0, 0.0, 1.0)), // z: blue
    ];

    for (shape, color) in axes {
        commands.spawn(PbrBundle {
            mesh: meshes.add(shape.mesh()),
            material: materials.add(StandardMaterial {
                base_color: color,
                unlit: true,
                ..Default::default()
            }),
            // Cuboid is centered at its transform origin, so this crosses the world origin
            transform: Transform::from_xyz(0.0, 0.0, 0.0),
            ..Default::default()
        });
    }
}
