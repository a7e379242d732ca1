#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Mesher
//!
//! Turns voxel chunks into renderable triangle meshes on background threads.
//!
//! Every solid voxel face that borders empty space or the chunk boundary becomes
//! one quad. Each finished mesh carries a lookup table from triangles back to
//! voxels for hit testing. Drawing and collision are left to the caller.
//!
//! ## Key Modules
//!
//! * `core` - Shared-resource and single-slot handoff primitives
//! * `engine_state` - Voxel data, mesh generation, scheduling and the worker pool
//! * `config` - JSON configuration
//! * `error` - The crate's error type
//!
//! ## Architecture
//!
//! * A single consuming thread owns the chunks and one scheduler per chunk
//! * Mesh passes run on a worker pool and read chunks through shared read guards
//! * Each finished pass is handed back through a capacity-one exchange slot
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::{Point3, Vector3};
//! use voxel_mesher::{BlockRegistry, Chunk, MeshBuilder, TextureAtlas};
//!
//! let registry = BlockRegistry::with_default_blocks(TextureAtlas::new(4));
//! let chunk = Chunk::solid(Point3::new(0, 0, 0), Vector3::new(3, 3, 3));
//! let mesh = MeshBuilder::new(&registry).build(&chunk).unwrap();
//!
//! // 6 sides of 3x3 faces, the center voxel contributes nothing
//! assert_eq!(mesh.face_count(), 54);
//! ```
//!
//! The native demo binary calls [`run`].

pub mod config;
pub mod core;
pub mod engine_state;
pub mod error;

pub use config::{ChunkGenerationMethod, MesherConfig};
pub use engine_state::{
    rendering::{
        meshing::{
            face_is_exposed, ChunkMeshScheduler, DirtyFlag, DrainThrottle, GeneratedMesh,
            MeshBuilder, MeshStats, MeshingState, PassOutcome, TriangleLookup, FACE_TABLE,
        },
        Vertex,
    },
    task_management::{
        task::{Task, TaskResult},
        TaskManager,
    },
    voxels::{
        appearance::{AppearanceProvider, BlockAppearance, BlockRegistry, TextureAtlas},
        block::{block_side::BlockSide, block_type::BlockType, BlockId, AIR_BLOCK_ID},
        chunk::Chunk,
        grid::VoxelGrid,
        world::World,
    },
    MeshingEngine,
};
pub use error::{MeshingError, Result};

/// Initializes the global logger.
///
/// Native builds log to stdout filtered by `RUST_LOG`; web builds log to the
/// browser console and install a panic hook. Calling this more than once is a no-op.
pub fn init_logging() {
    cfg_if::cfg_if! {
        if #[cfg(target_family = "wasm")] {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            let _ = console_log::init_with_level(log::Level::Info);
        } else {
            let _ = env_logger::Builder::new()
                .target(env_logger::Target::Stdout)
                .parse_env("RUST_LOG")
                .try_init();
        }
    }
}

/// Meshes a small demo world and logs the results.
///
/// Loads every chunk within the configured load radius, pumps frames until each
/// chunk has been drained once, then resolves one triangle as a sample pick.
///
/// # Errors
/// Configuration errors from `VOXEL_MESHER_CONFIG`.
#[cfg(not(target_family = "wasm"))]
pub fn run() -> Result<()> {
    use cgmath::Point3;
    use log::info;
    use std::collections::HashSet;
    use std::time::Duration;
    use web_time::Instant;

    init_logging();
    info!("Logger initialized");

    let config = MesherConfig::from_env()?;
    let atlas = TextureAtlas::new(config.atlas_tiles_per_row);
    let registry = BlockRegistry::with_default_blocks(atlas);
    let radius = config.load_radius;
    let mut engine = MeshingEngine::new(config, registry)?;

    for x in -radius..=radius {
        for y in -radius..=radius {
            for z in -radius..=radius {
                engine.load_chunk(Point3::new(x, y, z));
            }
        }
    }

    let start = Instant::now();
    let mut waiting: HashSet<Point3<i32>> = engine.chunk_positions().collect();
    let mut sample_pick = None;
    let mut total_faces = 0;
    let mut frames = 0u64;

    while !waiting.is_empty() && engine.has_pending_work() {
        for (position, mesh) in engine.update() {
            let stats = mesh.stats();
            info!(
                "Chunk {:?}: {} faces, {} vertices, {} indices",
                position, stats.faces, stats.vertices, stats.indices
            );
            total_faces += stats.faces;
            if sample_pick.is_none() && !mesh.is_empty() {
                sample_pick = Some(position);
            }
            waiting.remove(&position);
        }
        frames += 1;
        std::thread::sleep(Duration::from_millis(1));
    }

    info!(
        "Meshed {} chunks ({} faces) in {} frames, {:?}",
        engine.chunk_positions().count() - waiting.len(),
        total_faces,
        frames,
        start.elapsed()
    );
    if !waiting.is_empty() {
        info!("{} chunks are waiting for missing block appearances", waiting.len());
    }

    if let Some(position) = sample_pick {
        let voxel = engine.resolve_voxel_for_triangle(position, 0)?;
        info!("Triangle 0 of chunk {:?} belongs to voxel {:?}", position, voxel);
    }

    Ok(())
}
