//! Caption layout and rasterization.

pub mod layout;
pub mod render;
