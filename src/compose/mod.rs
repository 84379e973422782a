//! Frame and clip composition: raster frames, timed clips, typing sequences and steps.

pub mod clip;
pub mod frame;
pub mod step;
pub mod typing;
