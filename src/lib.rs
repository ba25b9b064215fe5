//! Core icon preloading
//!
//! Resolves the RPG core icon folders (health, stamina, meters, status
//! textures) at startup and loads every matched PNG so the icons are
//! resident before the first frame that draws them.
//!
//! - Native builds scan the asset directory with glob patterns.
//! - WASM builds can't enumerate directories, so they read the
//!   `manifest.txt` written by `build.rs` and filter it with the same patterns.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod preload;
