//! Render pipeline abstractions.

pub mod builder;
pub mod effect;

pub use builder::{BindGroupLayoutBuilder, PipelineBuilder};
pub use effect::{EffectPipeline, FragmentShader};
