//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain) and the depth buffer
//! - recording one scene per frame and presenting it

mod depth;
mod error;
mod frame;
mod gpu;
mod init;
mod scope;
mod surface;

pub use depth::DEPTH_FORMAT;
pub use error::SurfaceErrorAction;
pub use frame::BoundProgram;
pub use gpu::Gpu;
pub use init::GpuInit;
pub(crate) use scope::ErrorScope;
