//! GPU orchestration for the quad viewer.
//!
//! The public surface is `GpuState`; the submodules keep the path from
//! interaction state to pixels short:
//! - `context` owns wgpu instance/device/surface wiring and knows how to
//!   rebuild swapchain state when the window resizes.
//! - `mesh` holds the immutable quad vertices, indices, and their buffers.
//! - `uniforms` mirrors the shader's std140 block and is written through the
//!   queue every frame, changed or not.
//! - `textures` decodes the two image files, builds CPU mip chains, and
//!   degrades to placeholders when a file is missing or broken.
//! - `pipeline` compiles the embedded GLSL into one render pipeline per
//!   raster mode, with fill as the guaranteed baseline.
//! - `state` glues everything together and exposes the `GpuState` API used
//!   by `window`.

mod context;
mod mesh;
mod pipeline;
mod state;
mod textures;
mod uniforms;

pub use textures::TextureReport;

pub(crate) use state::GpuState;
