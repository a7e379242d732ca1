//! # Engine State Module
//!
//! Ties the voxel world, the per-chunk schedulers and the worker pool together.
//!
//! ## Key Components
//!
//! * `MeshingEngine` - Owns every subsystem and runs one frame per `update()`
//! * `rendering` - Mesh data, the face-culling builder and the per-chunk scheduler
//! * `task_management` - Worker pool running mesh passes off the calling thread
//! * `voxels` - Voxel data, chunks, world generation and block appearance
//!
//! ## Frame Structure
//!
//! Each call to [`MeshingEngine::update`]:
//! 1. Handles finished task results
//! 2. Drains every chunk whose throttle window allows it
//! 3. Launches a pass for every dirty, idle chunk
//! 4. Hands queued passes to free workers

use std::collections::HashMap;
use std::sync::Arc;

use cgmath::{Point3, Vector3};
use log::{debug, info};

use rendering::{ChunkMeshScheduler, GeneratedMesh, MeshingState};
use task_management::TaskManager;
use voxels::{appearance::BlockRegistry, block::BlockId, chunk::Chunk, world::World};

use crate::{
    config::MesherConfig,
    core::MtResource,
    error::{MeshingError, Result},
};

pub mod rendering;
pub mod task_management;
pub mod voxels;

/// The mesher's top-level state container.
///
/// Runs on a single consuming thread. Mesh passes run on the worker pool and
/// come back through each chunk's scheduler.
///
/// # Examples
///
/// ```no_run
/// use cgmath::Point3;
/// use voxel_mesher::{BlockRegistry, MesherConfig, MeshingEngine, TextureAtlas};
///
/// let config = MesherConfig::default();
/// let atlas = TextureAtlas::new(config.atlas_tiles_per_row);
/// let registry = BlockRegistry::with_default_blocks(atlas);
/// let mut engine = MeshingEngine::new(config, registry)?;
/// engine.load_chunk(Point3::new(0, 0, 0));
///
/// // Main loop
/// loop {
///     for (position, mesh) in engine.update() {
///         println!("{position:?}: {} faces", mesh.face_count());
///     }
/// }
/// # Ok::<(), voxel_mesher::MeshingError>(())
/// ```
pub struct MeshingEngine {
    /// Worker pool for mesh passes
    task_manager: TaskManager,
    /// The voxel world containing all chunk data
    world: World,
    /// One scheduler per loaded chunk
    schedulers: HashMap<Point3<i32>, ChunkMeshScheduler<Chunk>>,
    /// Appearance source shared with every pass
    registry: Arc<BlockRegistry>,
    /// Settings the engine was created with
    config: MesherConfig,
}

impl MeshingEngine {
    /// Creates an engine with no chunks loaded.
    ///
    /// # Arguments
    /// * `config` - Worker count, throttle and world generation settings
    /// * `registry` - Block appearances used by every pass
    ///
    /// # Errors
    /// `MeshingError::InvalidConfig` if `config` fails validation.
    pub fn new(config: MesherConfig, registry: BlockRegistry) -> Result<Self> {
        config.validate()?;

        let task_manager = TaskManager::new(config.worker_threads);
        let world = World::new(
            Vector3::from(config.chunk_dimensions),
            config.generation_method,
            config.seed,
        );
        info!(
            "Meshing engine ready: {} workers, {} registered blocks, drain every {} frames",
            config.worker_threads,
            registry.len(),
            config.drain_interval_frames
        );

        Ok(MeshingEngine {
            task_manager,
            world,
            schedulers: HashMap::new(),
            registry: Arc::new(registry),
            config,
        })
    }

    /// Generates the chunk at `position` if needed and schedules it for meshing.
    ///
    /// Loading an already loaded chunk returns the existing handle.
    pub fn load_chunk(&mut self, position: Point3<i32>) -> MtResource<Chunk> {
        let chunk = self.world.add_chunk_at(position);
        if !self.schedulers.contains_key(&position) {
            self.add_scheduler(position, chunk.clone());
        }
        chunk
    }

    /// Adds a prepared chunk, replacing any chunk at the same position.
    ///
    /// A pass still running for the replaced chunk finishes on its own and its
    /// result is discarded.
    pub fn insert_chunk(&mut self, chunk: Chunk) -> MtResource<Chunk> {
        let position = chunk.position;
        let chunk = self.world.insert_chunk(chunk);
        self.add_scheduler(position, chunk.clone());
        chunk
    }

    fn add_scheduler(&mut self, position: Point3<i32>, chunk: MtResource<Chunk>) {
        let scheduler = ChunkMeshScheduler::new(
            position,
            chunk,
            self.registry.clone(),
            self.config.drain_interval_frames,
        );
        self.schedulers.insert(position, scheduler);
    }

    /// Requests a new mesh for the chunk at `position`.
    ///
    /// # Errors
    /// `MeshingError::UnknownChunk` if no chunk is loaded there.
    pub fn mark_dirty(&self, position: Point3<i32>) -> Result<()> {
        self.scheduler(position)?.mark_dirty();
        Ok(())
    }

    /// Edits one voxel of a loaded chunk.
    ///
    /// Blocks while a pass is reading the chunk.
    ///
    /// # Returns
    /// `false` if the voxel coordinate is outside the chunk.
    ///
    /// # Errors
    /// `MeshingError::UnknownChunk` if no chunk is loaded at `position`.
    pub fn set_block(
        &self,
        position: Point3<i32>,
        x: usize,
        y: usize,
        z: usize,
        block_id: BlockId,
    ) -> Result<bool> {
        let chunk = self
            .world
            .get_chunk_at(position)
            .ok_or(MeshingError::UnknownChunk(position))?;
        let changed = chunk.get_mut().set_block(x, y, z, block_id);
        Ok(changed)
    }

    /// Runs one frame of scheduling.
    ///
    /// # Returns
    /// Every mesh drained this frame with the position of its chunk. Chunks whose
    /// pass failed are skipped; they regenerate once the registry changes.
    pub fn update(&mut self) -> Vec<(Point3<i32>, GeneratedMesh)> {
        self.task_manager.process_completed_tasks();

        let mut drained = Vec::new();
        for (position, scheduler) in &mut self.schedulers {
            match scheduler.try_drain() {
                Ok(Some(mesh)) => drained.push((*position, mesh)),
                Ok(None) => {}
                Err(err) => debug!("Skipping failed mesh for chunk {:?}: {}", position, err),
            }
        }

        for scheduler in self.schedulers.values_mut() {
            scheduler.try_launch_generation(&mut self.task_manager);
        }
        self.task_manager.process_queued_tasks();

        drained
    }

    /// Resolves triangle `triangle` of a chunk's last drained mesh to its voxel.
    ///
    /// # Errors
    /// - `MeshingError::UnknownChunk` if no chunk is loaded at `position`
    /// - `MeshingError::NoSuchTriangle` if the triangle is out of range
    pub fn resolve_voxel_for_triangle(
        &self,
        position: Point3<i32>,
        triangle: usize,
    ) -> Result<Point3<usize>> {
        self.scheduler(position)?
            .resolve_voxel_for_triangle(triangle)
    }

    /// Meshing state of the chunk at `position`, if loaded.
    pub fn state(&self, position: Point3<i32>) -> Option<MeshingState> {
        self.schedulers.get(&position).map(ChunkMeshScheduler::state)
    }

    /// Whether any chunk has a pass in flight, pending, or about to launch.
    pub fn has_pending_work(&self) -> bool {
        self.schedulers
            .values()
            .any(ChunkMeshScheduler::has_pending_work)
    }

    /// The shared block registry. Registering a block retries failed chunks.
    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }

    /// Handle to the chunk at `position`, if loaded.
    pub fn chunk(&self, position: Point3<i32>) -> Option<MtResource<Chunk>> {
        self.world.get_chunk_at(position)
    }

    /// Positions of every loaded chunk.
    pub fn chunk_positions(&self) -> impl Iterator<Item = Point3<i32>> + '_ {
        self.schedulers.keys().copied()
    }

    /// Settings the engine was created with.
    pub fn config(&self) -> &MesherConfig {
        &self.config
    }

    fn scheduler(&self, position: Point3<i32>) -> Result<&ChunkMeshScheduler<Chunk>> {
        self.schedulers
            .get(&position)
            .ok_or(MeshingError::UnknownChunk(position))
    }
}
