//! Task for generating mesh data for chunks in a background thread.
//!
//! This module contains the `ChunkMeshGenerationTask` which runs one complete
//! mesh pass over a chunk's voxel grid. The mesh itself travels back through the
//! chunk's exchange slot; the task result only carries a summary for logging.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use cgmath::Point3;
use log::{debug, warn};
use web_time::Instant;

use crate::{
    core::{MtResource, SlotPublisher},
    engine_state::{
        rendering::meshing::{
            MeshBuilder, MeshStats, MeshingState, PassOutcome, PassState,
        },
        task_management::{
            panic_message,
            task::{Task, TaskResult},
        },
        voxels::{appearance::AppearanceProvider, grid::VoxelGrid},
    },
    error::MeshingError,
};

/// A task that meshes one chunk in a background thread.
///
/// This task is responsible for:
/// 1. Holding the grid's read guard for exactly one scan
/// 2. Moving the chunk's state to `PendingConsumption`
/// 3. Publishing the finished pass into the chunk's exchange slot
pub struct ChunkMeshGenerationTask<G: VoxelGrid + 'static> {
    /// Position of the chunk being meshed
    position: Point3<i32>,
    /// The voxel storage to scan
    grid: MtResource<G>,
    /// Texture coordinate source
    appearance: Arc<dyn AppearanceProvider>,
    /// State shared with the chunk's scheduler
    pass_state: PassState,
    /// Producer side of the chunk's exchange slot
    publisher: SlotPublisher<PassOutcome>,
}

impl<G: VoxelGrid + 'static> ChunkMeshGenerationTask<G> {
    /// Creates a new chunk mesh generation task.
    ///
    /// # Arguments
    /// * `position` - Position of the chunk being meshed
    /// * `grid` - The voxel storage to scan
    /// * `appearance` - Texture coordinate source
    /// * `pass_state` - State shared with the chunk's scheduler
    /// * `publisher` - Where the finished pass is handed over
    pub(crate) fn new(
        position: Point3<i32>,
        grid: MtResource<G>,
        appearance: Arc<dyn AppearanceProvider>,
        pass_state: PassState,
        publisher: SlotPublisher<PassOutcome>,
    ) -> Self {
        ChunkMeshGenerationTask {
            position,
            grid,
            appearance,
            pass_state,
            publisher,
        }
    }
}

impl<G: VoxelGrid + 'static> Task for ChunkMeshGenerationTask<G> {
    /// Runs the pass to completion and publishes it.
    ///
    /// The read guard is dropped before publishing, so the consumer can edit the
    /// grid as soon as it sees the pending mesh. A panic in the grid or the
    /// appearance provider is published as `MeshingError::PassPanicked`.
    fn process(&self) -> Box<dyn TaskResult + Send> {
        let start = Instant::now();
        let registry_revision = self.appearance.revision();

        // A panicking collaborator still ends the pass, so the chunk leaves
        // Generating.
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let grid = self.grid.get();
            MeshBuilder::new(self.appearance.as_ref()).build(&*grid)
        }))
        .unwrap_or_else(|payload| {
            Err(MeshingError::PassPanicked(panic_message(payload.as_ref())))
        });
        let summary = result.as_ref().map(|mesh| mesh.stats()).map_err(|err| err.to_string());

        // Pending must be visible before the value can be drained, or a drain
        // could reset to Idle and be overwritten here.
        self.pass_state.store(MeshingState::PendingConsumption);
        let published = self
            .publisher
            .publish(PassOutcome {
                result,
                registry_revision,
            })
            .is_ok();

        Box::new(ChunkMeshGenerationTaskResult {
            position: self.position,
            summary,
            published,
            elapsed: start.elapsed(),
        })
    }
}

/// Summary of one finished mesh pass, handled on the consuming thread.
pub struct ChunkMeshGenerationTaskResult {
    /// Position of the meshed chunk
    position: Point3<i32>,
    /// Element counts of the mesh, or the message of the error that aborted it
    summary: Result<MeshStats, String>,
    /// Whether the exchange slot accepted the pass
    published: bool,
    /// Time spent in the pass
    elapsed: Duration,
}

impl TaskResult for ChunkMeshGenerationTaskResult {
    /// Logs the pass. Mesh passes never schedule follow-up tasks.
    fn handle_result(self: Box<Self>) -> Vec<Box<dyn Task + Send>> {
        if !self.published {
            debug!(
                "Mesh pass for chunk {:?} was not published; its scheduler is gone",
                self.position
            );
            return Vec::new();
        }
        match &self.summary {
            Ok(stats) => debug!(
                "Meshed chunk {:?} in {:?}: {} faces, {} vertices",
                self.position, self.elapsed, stats.faces, stats.vertices
            ),
            Err(message) => warn!(
                "Mesh pass for chunk {:?} aborted after {:?}: {}",
                self.position, self.elapsed, message
            ),
        }
        Vec::new()
    }
}
