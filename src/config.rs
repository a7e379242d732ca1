//! # Mesher Configuration
//!
//! Runtime settings for the mesher, loaded once at startup from a JSON file.
//! Every field has a default, so a partial file (or no file at all) is valid.
//!
//! ```json
//! {
//!     "worker_threads": 4,
//!     "drain_interval_frames": 2,
//!     "chunk_dimensions": [16, 16, 16],
//!     "generation_method": "perlin"
//! }
//! ```

use std::{fs, path::Path};

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{MeshingError, Result};

/// Environment variable holding the path of the configuration file.
pub const CONFIG_PATH_ENV: &str = "VOXEL_MESHER_CONFIG";

/// The method used to fill newly loaded chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkGenerationMethod {
    /// Perlin noise terrain with caves and overhangs
    #[default]
    Perlin,
    /// Alternating solid and air blocks
    Checkerboard,
    /// Every block solid
    Solid,
    /// Every block air
    Empty,
    /// Sparse random dirt blocks
    Random,
}

/// Settings for the mesher and its demo world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MesherConfig {
    /// Number of background worker threads running mesh passes.
    pub worker_threads: usize,
    /// Minimum number of frames between two drains of the same chunk's slot.
    pub drain_interval_frames: u32,
    /// Width, height and depth of every chunk in voxels.
    pub chunk_dimensions: [usize; 3],
    /// Number of tiles on each row of the square texture atlas.
    pub atlas_tiles_per_row: u32,
    /// How new chunks are filled.
    pub generation_method: ChunkGenerationMethod,
    /// Seed for noise based generation.
    pub seed: u32,
    /// Chunks are loaded in `-load_radius..=load_radius` on every axis.
    pub load_radius: i32,
}

impl Default for MesherConfig {
    fn default() -> Self {
        MesherConfig {
            worker_threads: 4,
            drain_interval_frames: 2,
            chunk_dimensions: [16, 16, 16],
            atlas_tiles_per_row: 4,
            generation_method: ChunkGenerationMethod::default(),
            seed: 0,
            load_radius: 1,
        }
    }
}

impl MesherConfig {
    /// Reads and validates a configuration from a JSON file.
    ///
    /// # Errors
    /// Returns `ConfigIo` if the file cannot be read, `ConfigParse` if it is not
    /// valid JSON, and `InvalidConfig` if validation fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&contents)?;
        info!("Loaded mesher configuration from {}", path.as_ref().display());
        Ok(config)
    }

    /// Parses and validates a configuration from a JSON string.
    pub fn from_json(contents: &str) -> Result<Self> {
        let config: MesherConfig = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the file named by `VOXEL_MESHER_CONFIG`, or the defaults when the
    /// variable is unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::load(path),
            None => {
                info!("{} not set, using default mesher configuration", CONFIG_PATH_ENV);
                Ok(Self::default())
            }
        }
    }

    /// Rejects settings the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.worker_threads == 0 {
            return Err(MeshingError::InvalidConfig(
                "worker_threads must be at least 1".to_string(),
            ));
        }
        if self.atlas_tiles_per_row == 0 {
            return Err(MeshingError::InvalidConfig(
                "atlas_tiles_per_row must be at least 1".to_string(),
            ));
        }
        if self.load_radius < 0 {
            return Err(MeshingError::InvalidConfig(format!(
                "load_radius must not be negative, got {}",
                self.load_radius
            )));
        }
        Ok(())
    }
}
