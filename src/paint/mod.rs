//! Paint subsystem: compositing and blur.
//!
//! [`compositor`] turns a positioned layout into pixels; [`blur`] is the
//! Gaussian blur backing the shadow pass.

mod blur;
pub mod compositor;

pub use compositor::{Compositor, OpacityScope, MAX_CANVAS_DIMENSION};
