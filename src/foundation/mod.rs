//! Value types, the crate error and small numeric helpers shared by every stage.

pub mod core;
pub mod error;
pub(crate) mod math;
