//! Shader binding constants.
//!
//! These numbers must match the `@group`/`@binding` attributes in the WGSL
//! sources under `shaders/`.
//!
//! ```wgsl
//! @group(0) @binding(0)  // UNIFORM_GROUP, UNIFORM_EFFECT_BINDING
//! var<uniform> params: EffectUniform;
//! ```

/// Group 0: Uniforms
pub const UNIFORM_GROUP: u32 = 0;
/// Binding 0 in group 0: effect parameters
pub const UNIFORM_EFFECT_BINDING: u32 = 0;

/// Group 1: Texture resources
pub const TEXTURE_GROUP: u32 = 1;
/// Binding 0 in group 1: Texture 2D
pub const TEXTURE_BINDING: u32 = 0;
/// Binding 1 in group 1: Sampler
pub const SAMPLER_BINDING: u32 = 1;
