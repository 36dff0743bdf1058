//! Core scene types shared by every crate in the workspace.
//!
//! This crate provides the foundational types used across the scene:
//! - Clamped RGB color arithmetic
//! - The particle data model and the per-frame particle field
//! - Frame timing for the fixed-rate loop

pub mod color;
pub mod field;
pub mod particle;
pub mod time;

pub use color::*;
pub use field::*;
pub use particle::*;
pub use time::*;

// Re-export commonly used types
pub use glam::{Vec2, Vec3};
