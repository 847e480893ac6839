//! # Voxel World Entry Point
//!
//! Runs the headless streaming demo from the library's `run()` function.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info VOXEL_WORLD_CONFIG=world.json cargo run --release
//! ```

fn main() {
    if let Err(e) = voxel_world::run() {
        log::error!("{e}");
        eprintln!("voxel-world: {e}");
        std::process::exit(1);
    }
}
