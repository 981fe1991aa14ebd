//! Layer compositing: merges a base mask and ordered patch layers into one
//! output grid plus the derived views used downstream.

pub mod compositor;

pub use compositor::{composite, CompositeLayers, LayerCompositor, PatchPrecedence};
