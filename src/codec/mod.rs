//! Collaborator seams around the GIF container codec.
//!
//! The transcoder only ever talks to a [`FrameSource`](source::FrameSource) and a
//! [`FrameSink`](sink::FrameSink); the `gif` crate backs the file implementations.

/// GIF file source and sink backed by the `gif` crate.
pub mod gif_file;
/// In-memory source and sink for tests and debugging.
pub mod memory;
/// Output side: frames handed to the encoder.
pub mod sink;
/// Input side: decoded frames with their palettes.
pub mod source;
