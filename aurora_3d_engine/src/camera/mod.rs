//! Camera module
//!
//! Passive view/projection container. The engine does not store or manage
//! cameras; the caller owns them and passes one to each render call.

mod camera;

pub use camera::Camera;
