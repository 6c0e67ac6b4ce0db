//! Core math shared across crates: glam re-exports and bounding extents.

pub use glam::{Vec3, vec3};

pub mod extents;

pub use extents::Extents;
