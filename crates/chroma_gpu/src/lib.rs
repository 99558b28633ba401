//! GPU side of the color demos: wgpu context, textures, the shader
//! compile/link boundary and the single-quad effect pipeline.

pub mod bindings;
pub mod config;
pub mod context;
pub mod error;
pub mod pipeline;
pub mod shader;
pub mod texture;
pub mod uniform;
pub mod vertex;

pub use config::{ClearColor, GpuConfig, TextureConfig};
pub use context::GpuContext;
pub use error::{GpuError, Result};
pub use pipeline::{EffectPipeline, FragmentShader};
pub use shader::{CompiledShader, ShaderStage};
pub use texture::Texture;
pub use uniform::EffectUniform;
pub use vertex::Vertex;
