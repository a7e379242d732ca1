//! Mesh generation scheduling for voxel chunks.
//!
//! Each chunk gets a [`ChunkMeshScheduler`] that decides when a background pass
//! runs and hands the finished [`GeneratedMesh`] back to the consuming thread.
//!
//! # Architecture
//! - `mesh/`: Face table, face emitter and mesh builder
//! - [`ChunkMeshScheduler`]: Per-chunk state machine and exchange slot
//! - [`DirtyFlag`]: Shared "needs regeneration" bit
//! - [`DrainThrottle`]: Per-chunk rate limit on draining finished meshes
//!
//! # State Machine
//! ```text
//!   Idle --(dirty, launch)--> Generating --(pass done)--> PendingConsumption
//!    ^                                                          |
//!    +------------------------(try_drain)-----------------------+
//! ```
//! At most one pass per chunk is in flight. A mark arriving while `Generating`
//! leaves the flag set and the next launch picks it up once the state is back
//! at `Idle`. The in-flight pass is never aborted.

use std::sync::{
    atomic::{AtomicBool, AtomicU8, Ordering},
    Arc,
};

use cgmath::Point3;
use log::{debug, warn};

use crate::{
    core::{exchange_slot, MtResource, SlotPublisher, SlotReceiver},
    engine_state::{
        rendering::tasks::chunk_mesh_generation_task::ChunkMeshGenerationTask,
        task_management::TaskManager,
        voxels::{appearance::AppearanceProvider, grid::VoxelGrid},
    },
    error::{MeshingError, Result},
};

/// Face table, face emitter and mesh builder.
pub mod mesh;

pub use mesh::*;

/// Lifecycle of one chunk's mesh generation.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshingState {
    /// No pass running and no mesh waiting
    Idle = 0,
    /// A background pass has been launched and has not published yet
    Generating = 1,
    /// A finished pass result waits in the exchange slot
    PendingConsumption = 2,
}

impl MeshingState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => MeshingState::Generating,
            2 => MeshingState::PendingConsumption,
            _ => MeshingState::Idle,
        }
    }
}

/// Atomic `MeshingState` shared between a scheduler and its in-flight pass.
#[derive(Debug, Clone, Default)]
pub(crate) struct PassState {
    state: Arc<AtomicU8>,
}

impl PassState {
    pub(crate) fn load(&self) -> MeshingState {
        MeshingState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub(crate) fn store(&self, state: MeshingState) {
        self.state.store(state as u8, Ordering::Release);
    }

    /// Moves `Idle` to `Generating`. Fails for any other current state.
    fn begin(&self) -> bool {
        self.state
            .compare_exchange(
                MeshingState::Idle as u8,
                MeshingState::Generating as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }
}

/// Shared "needs regeneration" bit. Clones refer to the same flag.
///
/// Setting is idempotent. Races between mark and take at worst cost one
/// redundant pass or delay an edit by one launch.
#[derive(Debug, Clone, Default)]
pub struct DirtyFlag {
    flag: Arc<AtomicBool>,
}

impl DirtyFlag {
    /// Creates a flag in the given state.
    pub fn new(dirty: bool) -> Self {
        DirtyFlag {
            flag: Arc::new(AtomicBool::new(dirty)),
        }
    }

    /// Sets the flag.
    pub fn mark(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Whether the flag is set.
    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Clears the flag, returning its previous value.
    pub fn take(&self) -> bool {
        self.flag.swap(false, Ordering::AcqRel)
    }
}

/// Limits how often a chunk's finished mesh is drained.
///
/// Every call to [`DrainThrottle::tick`] is one frame. A drain is allowed once
/// `interval_frames` frames have passed since the last successful drain; the
/// first drain is never delayed. An interval of 0 or 1 allows a drain every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrainThrottle {
    interval_frames: u32,
    frames_since_drain: u32,
}

impl DrainThrottle {
    /// Creates a throttle that allows one drain every `interval_frames` frames.
    pub fn new(interval_frames: u32) -> Self {
        DrainThrottle {
            interval_frames,
            frames_since_drain: interval_frames,
        }
    }

    /// Advances one frame and reports whether a drain may be attempted.
    pub fn tick(&mut self) -> bool {
        self.frames_since_drain = self.frames_since_drain.saturating_add(1);
        self.frames_since_drain >= self.interval_frames
    }

    /// Restarts the window after a successful drain.
    pub fn reset(&mut self) {
        self.frames_since_drain = 0;
    }

    /// Frames between drains.
    pub fn interval_frames(&self) -> u32 {
        self.interval_frames
    }
}

/// What a background pass hands back through the exchange slot.
#[derive(Debug)]
pub struct PassOutcome {
    /// The finished mesh, or the configuration error that aborted the pass
    pub result: Result<GeneratedMesh>,
    /// Appearance provider revision observed when the pass started
    pub registry_revision: u64,
}

/// Per-chunk generation scheduler and consumer-side handoff.
///
/// The scheduler lives on the consuming thread. It launches passes on a
/// [`TaskManager`] and receives their results through a single-slot exchange.
///
/// # Dirty Tracking
/// Two independent sources request regeneration: the scheduler's own
/// [`DirtyFlag`] and the grid's modified bit. Either one alone is enough, and
/// both are cleared when a pass is launched. The scheduler's flag starts set.
///
/// # Failed Passes
/// A pass aborted by an unregistered block id, an oversized mesh, or a
/// panicking collaborator is reported by [`try_drain`]. The chunk stays dirty,
/// but no new pass is launched until the appearance provider's revision changes.
///
/// [`try_drain`]: ChunkMeshScheduler::try_drain
pub struct ChunkMeshScheduler<G: VoxelGrid + 'static> {
    position: Point3<i32>,
    grid: MtResource<G>,
    appearance: Arc<dyn AppearanceProvider>,
    dirty: DirtyFlag,
    pass_state: PassState,
    publisher: SlotPublisher<PassOutcome>,
    receiver: SlotReceiver<PassOutcome>,
    throttle: DrainThrottle,
    last_lookup: Option<Arc<TriangleLookup>>,
    failed_revision: Option<u64>,
}

impl<G: VoxelGrid + 'static> ChunkMeshScheduler<G> {
    /// Creates an idle scheduler for the chunk at `position`.
    ///
    /// # Arguments
    /// * `position` - Chunk position, used for logging and task results
    /// * `grid` - Voxel storage read by every pass
    /// * `appearance` - Texture coordinate source for every pass
    /// * `drain_interval_frames` - Throttle window, see [`DrainThrottle`]
    ///
    /// The scheduler starts dirty, so the first launch meshes the grid whether
    /// or not the grid tracks its own modified bit.
    pub fn new(
        position: Point3<i32>,
        grid: MtResource<G>,
        appearance: Arc<dyn AppearanceProvider>,
        drain_interval_frames: u32,
    ) -> Self {
        let (publisher, receiver) = exchange_slot();
        ChunkMeshScheduler {
            position,
            grid,
            appearance,
            dirty: DirtyFlag::new(true),
            pass_state: PassState::default(),
            publisher,
            receiver,
            throttle: DrainThrottle::new(drain_interval_frames),
            last_lookup: None,
            failed_revision: None,
        }
    }

    /// Position of the chunk this scheduler meshes.
    pub fn position(&self) -> Point3<i32> {
        self.position
    }

    /// Requests a regeneration. Idempotent.
    pub fn mark_dirty(&self) {
        self.dirty.mark();
    }

    /// A handle to the scheduler's dirty flag, for marking from other threads.
    pub fn dirty_flag(&self) -> DirtyFlag {
        self.dirty.clone()
    }

    /// Whether either dirty source requests a regeneration.
    pub fn is_dirty(&self) -> bool {
        self.dirty.is_set() || self.grid.get().is_modified()
    }

    /// Current state of the chunk's generation.
    pub fn state(&self) -> MeshingState {
        self.pass_state.load()
    }

    /// Whether the last pass failed and the appearance provider has not changed since.
    pub fn is_waiting_for_registry(&self) -> bool {
        self.failed_revision == Some(self.appearance.revision())
    }

    /// Whether a pass is in flight, pending, or would be launched next frame.
    pub fn has_pending_work(&self) -> bool {
        self.state() != MeshingState::Idle || (self.is_dirty() && !self.is_waiting_for_registry())
    }

    /// Launches a background pass if the chunk is dirty and idle.
    ///
    /// Clears both dirty sources at launch time, so an edit made while the pass
    /// runs marks the chunk dirty again for the following pass.
    ///
    /// # Returns
    /// `true` if a pass was handed to `task_manager`. `false` if the chunk is
    /// clean, a pass is already in flight or pending, or the last pass failed
    /// against the current appearance revision. None of these is an error.
    pub fn try_launch_generation(&mut self, task_manager: &mut TaskManager) -> bool {
        if self.is_waiting_for_registry() {
            return false;
        }
        if !self.is_dirty() {
            return false;
        }
        if !self.pass_state.begin() {
            return false;
        }

        self.dirty.take();
        self.grid.get().take_modified();
        self.failed_revision = None;

        let task = ChunkMeshGenerationTask::new(
            self.position,
            self.grid.clone(),
            self.appearance.clone(),
            self.pass_state.clone(),
            self.publisher.clone(),
        );
        let scheduled = task_manager.publish_task(Box::new(task));
        debug!(
            "Launched mesh pass for chunk {:?} ({})",
            self.position,
            if scheduled { "running" } else { "queued" }
        );
        true
    }

    /// Takes the finished mesh if one is pending and the throttle allows it.
    ///
    /// Never blocks. Each call counts as one frame for the throttle.
    ///
    /// # Returns
    /// - `Ok(Some(mesh))` when a pass result was drained; its triangle lookup
    ///   becomes the one used by [`resolve_voxel_for_triangle`]
    /// - `Ok(None)` when nothing is pending or the throttle window is still open
    ///
    /// # Errors
    /// The configuration error of a failed pass. The state returns to `Idle`,
    /// the chunk is marked dirty, and the previous lookup stays in use.
    ///
    /// [`resolve_voxel_for_triangle`]: ChunkMeshScheduler::resolve_voxel_for_triangle
    pub fn try_drain(&mut self) -> Result<Option<GeneratedMesh>> {
        if !self.throttle.tick() {
            return Ok(None);
        }
        let Some(outcome) = self.receiver.try_take() else {
            return Ok(None);
        };
        self.throttle.reset();
        self.pass_state.store(MeshingState::Idle);

        match outcome.result {
            Ok(mesh) => {
                self.last_lookup = Some(mesh.triangle_lookup.clone());
                Ok(Some(mesh))
            }
            Err(err) => {
                warn!(
                    "Mesh pass for chunk {:?} failed at registry revision {}: {}",
                    self.position, outcome.registry_revision, err
                );
                self.failed_revision = Some(outcome.registry_revision);
                self.dirty.mark();
                Err(err)
            }
        }
    }

    /// Resolves triangle `triangle` of the last drained mesh to its voxel.
    ///
    /// # Errors
    /// `MeshingError::NoSuchTriangle` if no mesh has been drained yet or the
    /// triangle is outside the last drained mesh.
    pub fn resolve_voxel_for_triangle(&self, triangle: usize) -> Result<Point3<usize>> {
        match &self.last_lookup {
            Some(lookup) => lookup.resolve_triangle(triangle),
            None => Err(MeshingError::NoSuchTriangle {
                triangle,
                triangle_count: 0,
            }),
        }
    }

    /// Triangle lookup of the last drained mesh.
    pub fn last_lookup(&self) -> Option<&Arc<TriangleLookup>> {
        self.last_lookup.as_ref()
    }

    /// The voxel storage this scheduler reads.
    pub fn grid(&self) -> &MtResource<G> {
        &self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_drain_is_not_delayed() {
        let mut throttle = DrainThrottle::new(3);
        assert!(throttle.tick());
    }

    #[test]
    fn throttle_opens_every_interval_after_a_drain() {
        let mut throttle = DrainThrottle::new(3);
        throttle.reset();
        assert!(!throttle.tick());
        assert!(!throttle.tick());
        assert!(throttle.tick());
        assert!(throttle.tick());
    }

    #[test]
    fn zero_interval_never_throttles() {
        let mut throttle = DrainThrottle::new(0);
        throttle.reset();
        assert!(throttle.tick());
    }

    #[test]
    fn dirty_flag_clones_share_state() {
        let flag = DirtyFlag::default();
        let other = flag.clone();
        other.mark();
        other.mark();
        assert!(flag.is_set());
        assert!(flag.take());
        assert!(!other.is_set());
    }

    #[test]
    fn pass_state_only_begins_from_idle() {
        let state = PassState::default();
        assert!(state.begin());
        assert_eq!(state.load(), MeshingState::Generating);
        assert!(!state.begin());
        state.store(MeshingState::PendingConsumption);
        assert!(!state.begin());
        state.store(MeshingState::Idle);
        assert!(state.begin());
    }
}
