//! WebGPU rendering module
//!
//! Uses SDF (Signed Distance Fields) for all rendering in the fragment shader.

pub mod scene;
pub mod sdf_pipeline;

pub use scene::SceneFrame;
pub use sdf_pipeline::SdfRenderState;
