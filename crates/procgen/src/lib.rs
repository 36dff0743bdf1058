//! Procedural generation of the scene's particle clouds.
//!
//! Every generator is a pure function of a count, a configuration and a caller-supplied
//! random source, so a fixed seed reproduces the scene exactly.

pub mod ground;
pub mod heart;
pub mod sampling;
pub mod snow;
pub mod tree;

pub use ground::*;
pub use heart::*;
pub use snow::*;
pub use tree::*;
