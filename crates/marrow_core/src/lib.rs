//! Core utilities and foundational types shared by every Marrow crate.

pub mod errors;

pub use errors::{MarrowError, Result};

/// Upper bound on the number of joints a skeleton may declare.
///
/// Per-model bone buffers and shader-side joint arrays are sized from this value,
/// so skeletons above the ceiling are rejected at load time.
pub const MAX_BONES: usize = 64;
