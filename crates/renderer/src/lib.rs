//! Software particle rendering onto a virtual canvas, presented through wgpu.
//!
//! Particles are drawn on the CPU into a fixed-size [`Canvas`]; the [`Presenter`] uploads
//! that canvas as a texture each frame and scales it into the window.

pub mod canvas;
pub mod particles;
pub mod presenter;
pub mod projection;
pub mod text;

pub use canvas::*;
pub use particles::*;
pub use presenter::*;
pub use projection::*;
pub use text::{draw_text, line_height, text_width};
