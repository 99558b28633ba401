//! Uniform block shared by every effect fragment shader.

use bytemuck::{Pod, Zeroable};

/// Effect parameters in the layout of the WGSL `EffectUniform` struct.
///
/// `matrix` is column-major (`matrix[c]` is column `c`), matching
/// `mat4x4<f32>`. Shaders read only the fields they declare: the color
/// matrix shader uses `matrix` and `offset`, the brightness shader `factor`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct EffectUniform {
    pub matrix: [[f32; 4]; 4],
    pub offset: [f32; 4],
    pub factor: f32,
    /// WGSL rounds the struct size up to its 16-byte alignment.
    pub _padding: [f32; 3],
}

impl EffectUniform {
    pub const IDENTITY_MATRIX: [[f32; 4]; 4] = [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ];

    /// Identity transform with a unit scale factor.
    pub fn new() -> Self {
        Self {
            matrix: Self::IDENTITY_MATRIX,
            offset: [0.0; 4],
            factor: 1.0,
            _padding: [0.0; 3],
        }
    }

    /// Affine color transform (`matrix * color + offset`).
    pub fn affine(matrix: [[f32; 4]; 4], offset: [f32; 4]) -> Self {
        Self {
            matrix,
            offset,
            ..Self::new()
        }
    }

    /// Scalar RGB scale.
    pub fn scale(factor: f32) -> Self {
        Self {
            factor,
            ..Self::new()
        }
    }
}

impl Default for EffectUniform {
    fn default() -> Self {
        Self::new()
    }
}
