//! Background tasks for the rendering system.
//!
//! # Available Tasks
//! - `ChunkMeshGenerationTask`: Runs one mesh pass for a chunk and publishes it

pub mod chunk_mesh_generation_task;
