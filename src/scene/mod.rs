//! Scene descriptions: named base and patch requests supplied by the caller.
//!
//! The generation core only sees tile codes. This module owns the
//! name-to-code mapping and the JSON scene files that drive the generator.

pub mod config;
pub mod palette;

pub use config::{SceneBase, SceneBatch, SceneConfig, ScenePatch};
pub use palette::TilePalette;
