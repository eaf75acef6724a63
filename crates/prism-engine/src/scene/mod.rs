//! Scene geometry.
//!
//! Responsibilities:
//! - define the vertex format shared by the color program and the models
//! - own model data and the GPU buffers it is uploaded to
//! - issue each model's draw through the graphics context

mod triangle;
mod vertex;

pub use triangle::{TriangleModel, TRIANGLE_INDICES, TRIANGLE_VERTICES};
pub use vertex::Vertex;
