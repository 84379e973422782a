//! Frame sinks: the encoder contract, an in-memory sink and the `ffmpeg` file encoder.

pub mod ffmpeg;
pub mod sink;
