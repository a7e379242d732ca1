//! # Voxel Mesher Demo Entry Point
//!
//! Meshes a small generated world and logs per-chunk statistics. Set
//! `VOXEL_MESHER_CONFIG` to a JSON file to override the defaults.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release
//! ```

#[cfg(not(target_family = "wasm"))]
fn main() {
    if let Err(err) = voxel_mesher::run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

#[cfg(target_family = "wasm")]
fn main() {}
