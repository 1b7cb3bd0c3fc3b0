//! Shape gallery demo
//!
//! Builds every supported shape, places them on a ring around the origin and
//! animates them for a fixed number of frames against the in-memory backend,
//! logging what a renderer would receive each frame.

use serde::{Deserialize, Serialize};
use shape_engine::config::{Config, ConfigError, GeometryConfig};
use shape_engine::foundation::math::constants::TAU;
use shape_engine::foundation::math::{Point3, Vec3};
use shape_engine::geometry::{GeometryError, ShapeFactory};
use shape_engine::render::{HeadlessBackend, Mesh, RenderBackend};
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_CONFIG: &str = "shapes.toml";

#[derive(Error, Debug)]
enum AppError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("geometry: {0}")]
    Geometry(#[from] GeometryError),
    #[error("{0} mesh(es) still own backend buffers after shutdown")]
    Leak(usize),
}

/// Demo settings, read from `shapes.toml` when present
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct DemoConfig {
    /// Frames to simulate
    frames: u32,
    /// Distance of each shape from the origin
    ring_radius: f32,
    /// Rotation and revolution angle added per frame, in radians
    angle_step: f32,
    /// Indices of meshes drawn as wireframe
    wireframe: Vec<usize>,
    geometry: GeometryConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            ring_radius: 6.0,
            angle_step: 0.003,
            wireframe: vec![1],
            geometry: GeometryConfig::default(),
        }
    }
}

impl Config for DemoConfig {}

struct Shape {
    name: &'static str,
    mesh: Mesh,
}

fn build_scene<B: RenderBackend>(factory: &mut ShapeFactory<B>) -> Result<Vec<Shape>, GeometryError> {
    type Build<T> = fn(&mut ShapeFactory<T>) -> Result<Mesh, GeometryError>;
    let recipes: [(&'static str, Build<B>); 9] = [
        ("icosahedron", |f| f.make_sphere(1.0, 0)),
        ("sphere 80", |f| f.make_sphere(1.0, 1)),
        ("sphere 320", |f| f.make_sphere(1.0, 2)),
        ("ellipsoid", |f| f.make_ellipse(1.0, 2.0, 1.5, 3)),
        ("cylinder", |f| f.make_cylinder(1.0, 4.0)),
        ("cube", |f| f.make_cube(1.0)),
        ("tetrahedron", |f| f.make_tetrahedron(1.0)),
        ("cone", |f| f.make_cone(1.0, 4.0)),
        ("torus", ShapeFactory::make_torus),
    ];

    let mut shapes = Vec::with_capacity(recipes.len());
    for (name, build) in recipes {
        match build(factory) {
            Ok(mesh) => {
                log::info!("Built {}: {} vertices, {} triangles", name, mesh.vertex_count(), mesh.triangle_count());
                shapes.push(Shape { name, mesh });
            }
            Err(e) => {
                log::error!("Failed to build {}: {}", name, e);
                release_all(factory, &mut shapes);
                return Err(e);
            }
        }
    }
    Ok(shapes)
}

fn place_on_ring(shapes: &mut [Shape], config: &DemoConfig) {
    let step = TAU / shapes.len() as f32;
    for (i, shape) in shapes.iter_mut().enumerate() {
        let angle = i as f32 * step;
        shape.mesh.translate(Vec3::new(angle.cos() * config.ring_radius, 0.0, angle.sin() * config.ring_radius));
        if config.wireframe.contains(&i) {
            shape.mesh.set_solid(false);
        }
    }
}

/// Advance the scene by `frames`, returning the final angle
fn animate(shapes: &mut [Shape], config: &DemoConfig) -> f32 {
    let spin_axis = Vec3::y();
    let orbit_axis = Vec3::new(0.0, 1.0, 1.0);
    let mut t = 0.0;

    for frame in 0..config.frames {
        for shape in shapes.iter_mut() {
            let model = shape.mesh.transform();
            if frame % 100 == 0 {
                let center = model.transform_point(&Point3::origin());
                log::debug!(
                    "frame {} {}: center ({:.2}, {:.2}, {:.2}) solid={}",
                    frame,
                    shape.name,
                    center.x,
                    center.y,
                    center.z,
                    shape.mesh.is_solid()
                );
            }
            shape.mesh.rotate(t, spin_axis);
            shape.mesh.revolve(t, orbit_axis);
        }
        t += config.angle_step;
    }
    t
}

fn release_all<B: RenderBackend>(factory: &mut ShapeFactory<B>, shapes: &mut Vec<Shape>) {
    for shape in shapes.iter_mut() {
        factory.release(&mut shape.mesh);
    }
    shapes.clear();
}

fn run(config: &DemoConfig) -> Result<(), AppError> {
    let mut factory = ShapeFactory::new(HeadlessBackend::new(), config.geometry.clone());

    let mut shapes = build_scene(&mut factory)?;
    let backend = factory.backend();
    log::info!(
        "Uploaded {} meshes: {} vertex bytes, {} index bytes",
        backend.live_mesh_count(),
        backend.vertex_bytes_in_use(),
        backend.index_bytes_in_use()
    );

    place_on_ring(&mut shapes, config);
    let t = animate(&mut shapes, config);
    log::info!("Simulated {} frames, final angle {:.3} rad", config.frames, t);

    release_all(&mut factory, &mut shapes);
    match factory.backend().live_mesh_count() {
        0 => Ok(()),
        leaked => Err(AppError::Leak(leaked)),
    }
}

fn main() {
    shape_engine::foundation::logging::init();

    let config_path = std::env::args().nth(1).map_or_else(|| PathBuf::from(DEFAULT_CONFIG), PathBuf::from);
    let config = match DemoConfig::load_or_default(&config_path) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to read {}: {}", config_path.display(), e);
            std::process::exit(1);
        }
    };
    if let Err(e) = config.geometry.validate() {
        log::warn!("Geometry configuration: {}", e);
    }

    log::info!("Starting shape demo");
    match run(&config) {
        Ok(()) => log::info!("Shape demo finished successfully"),
        Err(e) => {
            log::error!("Shape demo failed: {}", e);
            std::process::exit(1);
        }
    }
}
