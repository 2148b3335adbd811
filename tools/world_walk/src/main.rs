use std::env;
use std::path::{Path, PathBuf};
use std::time::Instant;

use glam::Vec3;
use tessera_shared::physics::Ray;
use tessera_world::collision::{resolve_ground_collision, Body};
use tessera_world::raycast::HitPayload;
use tessera_world::settings::{WorldSettings, SETTINGS_FILE};
use tessera_world::world::World;
use tracing::info;

const STEP_LENGTH: f32 = 4.0;
const FRAME_TIME: f32 = 1.0 / 20.0;

#[derive(Debug, Clone, Copy)]
enum Axis {
    X,
    Z,
}

impl Axis {
    fn direction(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Z => Vec3::Z,
        }
    }
}

struct WalkConfig {
    settings_path: PathBuf,
    steps: u32,
    axis: Axis,
}

fn main() {
    let _ = tracing_subscriber::fmt().with_target(false).try_init();

    let mut config = WalkConfig {
        settings_path: PathBuf::from(SETTINGS_FILE),
        steps: 32,
        axis: Axis::X,
    };

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let Some(value) = args.next() else {
                    eprintln!("--config expects a path argument");
                    std::process::exit(2);
                };
                config.settings_path = PathBuf::from(value);
            }
            "--steps" => {
                let Some(value) = args.next() else {
                    eprintln!("--steps expects a numeric argument");
                    std::process::exit(2);
                };
                match value.parse::<u32>() {
                    Ok(parsed) => config.steps = parsed,
                    Err(err) => {
                        eprintln!("invalid step count '{value}': {err}");
                        std::process::exit(2);
                    }
                }
            }
            "--axis" => match args.next().as_deref() {
                Some("x") => config.axis = Axis::X,
                Some("z") => config.axis = Axis::Z,
                _ => {
                    eprintln!("--axis expects x or z");
                    std::process::exit(2);
                }
            },
            "--help" | "-h" => {
                println!("Usage: world_walk [--config <path>] [--steps <n>] [--axis x|z]");
                return;
            }
            other => {
                eprintln!("unknown argument: {other}");
                std::process::exit(2);
            }
        }
    }

    if let Err(err) = run(&config) {
        eprintln!("world_walk failed: {err}");
        std::process::exit(1);
    }
}

fn run(config: &WalkConfig) -> Result<(), String> {
    let settings = WorldSettings::load_or_create(Path::new(&config.settings_path));
    info!(
        "Opening world at {} with render distance {}",
        settings.world_dir.display(),
        settings.render_distance
    );

    let started = Instant::now();
    let mut world = World::from_settings(&settings)
        .map_err(|err| format!("failed to open world: {err}"))?;
    info!(
        "Initial regenerate of {} chunks took {:.1} ms",
        world.chunk_count(),
        started.elapsed().as_secs_f64() * 1000.0
    );

    let mut body = spawn_body(&settings);
    walk(&mut world, &mut body, config.axis.direction(), config.steps, settings.gravity);

    match look_down(&world, &body, settings.reach) {
        Some(hit) => {
            let block = world
                .chunk(hit.chunk)
                .data
                .get(hit.block)
                .and_then(|block| block.name())
                .unwrap_or("unknown");
            info!(
                "Looking down at {block} at {:?} (face {})",
                world.block_world_position(hit.chunk, hit.block),
                hit.normal
            );
        }
        None => info!("Nothing within reach below the observer"),
    }

    let total_quads: usize = world.chunks().iter().map(|chunk| chunk.mesh.quads.len()).sum();
    info!("Finished with {} quads across {} chunks", total_quads, world.chunk_count());
    Ok(())
}

/// Observer with its eye at the configured center, raised so its feet stand
/// no lower than the generated surface.
fn spawn_body(settings: &WorldSettings) -> Body {
    let mut body = Body::from_eye(settings.world_center);
    let surface = settings.strata.surface_height() as f32;
    body.position.y = body.position.y.max(surface);
    body
}

fn walk(world: &mut World, body: &mut Body, direction: Vec3, steps: u32, gravity: f32) {
    for step in 0..steps {
        body.position += direction * STEP_LENGTH;
        body.integrate(gravity, FRAME_TIME);
        resolve_ground_collision(&*world, body);

        let started = Instant::now();
        world.set_world_center(body.eye());
        info!(
            "Step {step}: eye {:.1?}, recentering took {:.2} ms",
            body.eye(),
            started.elapsed().as_secs_f64() * 1000.0
        );
    }
}

fn look_down(world: &World, body: &Body, reach: f32) -> Option<HitPayload> {
    world.cast_ray(&Ray::new(body.eye(), Vec3::NEG_Y), reach)
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use tessera_core::jobs::JobSystem;
    use tessera_shared::block::BlockId;
    use tessera_shared::worldgen::StrataGenerator;
    use tessera_world::persistence::ChunkSource;
    use tessera_world::settings::WorldSettings;
    use tessera_world::world::World;

    use super::{look_down, spawn_body, walk};

    #[test]
    fn observer_spawned_at_ground_level_walks_on_the_surface() {
        let settings = WorldSettings {
            render_distance: 1,
            world_center: Vec3::new(0.5, 0.0, 0.5),
            ..WorldSettings::default()
        };
        let mut world = World::new(
            ChunkSource::in_memory(StrataGenerator::new(settings.strata)),
            JobSystem::new(Some(2)).expect("build job system"),
            settings.render_distance,
            settings.world_center,
        );

        let mut body = spawn_body(&settings);
        assert_eq!(body.position.y, 3.0);

        walk(&mut world, &mut body, Vec3::X, 32, settings.gravity);
        assert_eq!(body.position.y, 3.0);
        assert_eq!(body.position.x, 128.5);

        let hit = look_down(&world, &body, settings.reach).expect("ground below the observer");
        assert_eq!(world.chunk(hit.chunk).data.get(hit.block), Some(BlockId::GRASS));
        assert_eq!(hit.normal, Vec3::Y);
    }

    #[test]
    fn spawning_above_the_surface_keeps_the_configured_eye() {
        let settings = WorldSettings {
            world_center: Vec3::new(0.0, 20.0, 0.0),
            ..WorldSettings::default()
        };
        let body = spawn_body(&settings);
        assert!((body.eye().y - 20.0).abs() < 1e-5);
    }
}
