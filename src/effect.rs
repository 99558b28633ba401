//! Catalogue of the demos and how a control value turns into an adjustment.

use chroma_gpu::{EffectUniform, FragmentShader};
use serde::{Deserialize, Serialize};

use crate::color_transform::ColorTransform;
use crate::config::ControlRange;
use crate::pixel_filter::{self, PixelBuffer};

/// One demo per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// Image drawn unmodified
    #[default]
    Passthrough,
    /// RGB scaled in the fragment shader
    Brightness,
    /// RGB scaled on the CPU, then uploaded
    CpuBrightness,
    Contrast,
    Saturation,
    Hue,
}

impl EffectKind {
    pub const ALL: [EffectKind; 6] = [
        EffectKind::Passthrough,
        EffectKind::Brightness,
        EffectKind::CpuBrightness,
        EffectKind::Contrast,
        EffectKind::Saturation,
        EffectKind::Hue,
    ];

    /// Short name, also used for output file names.
    pub fn name(self) -> &'static str {
        match self {
            EffectKind::Passthrough => "passthrough",
            EffectKind::Brightness => "brightness",
            EffectKind::CpuBrightness => "cpu_brightness",
            EffectKind::Contrast => "contrast",
            EffectKind::Saturation => "saturation",
            EffectKind::Hue => "hue",
        }
    }

    /// Control bounds used when the configuration does not override them.
    pub fn default_range(self) -> ControlRange {
        match self {
            EffectKind::Passthrough => ControlRange::fixed(),
            EffectKind::Brightness | EffectKind::CpuBrightness => {
                ControlRange::new(-1.0, 1.0, 0.01, 0.0)
            }
            EffectKind::Contrast => ControlRange::new(-1.0, 1.0, 0.01, 0.0),
            EffectKind::Saturation => ControlRange::new(-1.5, 1.0, 0.01, 0.0),
            EffectKind::Hue => ControlRange::new(0.0, 1.0, 0.01, 0.0),
        }
    }

    /// Fragment stage that draws this effect.
    ///
    /// The CPU path draws its finished pixels, so it uses the passthrough stage.
    pub fn fragment_shader(self) -> FragmentShader {
        match self {
            EffectKind::Passthrough | EffectKind::CpuBrightness => FragmentShader::Passthrough,
            EffectKind::Brightness => FragmentShader::Brightness,
            EffectKind::Contrast | EffectKind::Saturation | EffectKind::Hue => {
                FragmentShader::ColorMatrix
            }
        }
    }

    pub fn is_cpu(self) -> bool {
        matches!(self, EffectKind::CpuBrightness)
    }

    /// Evaluate a control value.
    pub fn adjustment(self, value: f32) -> Adjustment {
        match self {
            EffectKind::Passthrough => Adjustment::Passthrough,
            EffectKind::Brightness => Adjustment::Scale(value + 1.0),
            EffectKind::CpuBrightness => Adjustment::CpuScale(value + 1.0),
            EffectKind::Contrast => Adjustment::Affine(ColorTransform::contrast(value)),
            EffectKind::Saturation => Adjustment::Affine(ColorTransform::saturation(value)),
            EffectKind::Hue => Adjustment::Affine(ColorTransform::hue(value)),
        }
    }

    /// The effect after this one, wrapping around.
    pub fn next(self) -> EffectKind {
        let idx = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl std::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A control value resolved into what the pipeline or the CPU filter needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Adjustment {
    Passthrough,
    /// GPU brightness factor
    Scale(f32),
    /// GPU color matrix and offset
    Affine(ColorTransform),
    /// CPU brightness factor
    CpuScale(f32),
}

impl Adjustment {
    /// Uniform contents for the fragment stage.
    ///
    /// CPU adjustments upload identity values; their result is already in
    /// the texture.
    pub fn to_uniform(&self) -> EffectUniform {
        match self {
            Adjustment::Passthrough | Adjustment::CpuScale(_) => EffectUniform::new(),
            Adjustment::Scale(factor) => EffectUniform::scale(*factor),
            Adjustment::Affine(transform) => EffectUniform::affine(
                transform.matrix.to_cols_array_2d(),
                transform.offset.to_array(),
            ),
        }
    }

    /// Compute the same result on the CPU, writing `dest` from `source`.
    pub fn apply_cpu(&self, source: &PixelBuffer, dest: &mut PixelBuffer) -> pixel_filter::Result<()> {
        match self {
            Adjustment::Passthrough => dest.transform_from(source, &ColorTransform::IDENTITY),
            Adjustment::Scale(factor) | Adjustment::CpuScale(factor) => {
                dest.brighten_from(source, *factor)
            }
            Adjustment::Affine(transform) => dest.transform_from(source, transform),
        }
    }
}
