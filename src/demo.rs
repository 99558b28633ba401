//! A running demo: one effect applied to one image.
//!
//! [`DemoState`] holds the control value and the pixels and has no GPU
//! dependency. [`Demo`] owns the pipeline, texture and uniform buffer built
//! for it. Every control change recomputes the adjustment from scratch, so
//! the last event always wins.

use std::path::Path;

use chroma_gpu::{ClearColor, EffectPipeline, GpuContext, Texture};
use web_time::Instant;

use crate::config::{ControlRange, DemoConfig};
use crate::effect::{Adjustment, EffectKind};
use crate::error::Result;
use crate::image_io;
use crate::pixel_filter::PixelBuffer;

pub struct DemoState {
    effect: EffectKind,
    range: ControlRange,
    value: f32,
    source: PixelBuffer,
    /// Destination of the CPU path, rewritten on every change.
    output: Option<PixelBuffer>,
}

impl DemoState {
    pub fn new(effect: EffectKind, range: ControlRange, source: PixelBuffer) -> Result<Self> {
        let output = if effect.is_cpu() {
            Some(PixelBuffer::blank(source.width(), source.height())?)
        } else {
            None
        };
        let mut state = Self {
            effect,
            range,
            value: range.initial,
            source,
            output,
        };
        state.set_control(range.initial)?;
        Ok(state)
    }

    pub fn effect(&self) -> EffectKind {
        self.effect
    }

    pub fn range(&self) -> ControlRange {
        self.range
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn source(&self) -> &PixelBuffer {
        &self.source
    }

    pub fn adjustment(&self) -> Adjustment {
        self.effect.adjustment(self.value)
    }

    /// Pixels that belong in the texture: the CPU result, or the source
    /// for shader-driven effects.
    pub fn texture_pixels(&self) -> &PixelBuffer {
        self.output.as_ref().unwrap_or(&self.source)
    }

    /// Set the control (clamped to the range) and recompute.
    pub fn set_control(&mut self, value: f32) -> Result<Adjustment> {
        let start = Instant::now();
        self.value = self.range.clamp(value);
        let adjustment = self.adjustment();

        if let Some(output) = &mut self.output {
            adjustment.apply_cpu(&self.source, output)?;
        }

        log::debug!(
            "{} = {:.3} ({:.2?})",
            self.effect,
            self.value,
            start.elapsed()
        );
        Ok(adjustment)
    }

    /// The current result computed on the CPU.
    pub fn render_cpu(&self) -> Result<PixelBuffer> {
        if let Some(output) = &self.output {
            return Ok(output.clone());
        }
        let mut dest = PixelBuffer::blank(self.source.width(), self.source.height())?;
        self.adjustment().apply_cpu(&self.source, &mut dest)?;
        Ok(dest)
    }
}

pub struct Demo {
    state: DemoState,
    pipeline: EffectPipeline,
    texture: Texture,
    texture_bind_group: wgpu::BindGroup,
    clear_color: ClearColor,
}

impl Demo {
    /// Build the program, texture and uniforms for `effect` over `source`.
    ///
    /// Nothing is kept if compiling or linking fails.
    pub async fn setup(
        ctx: &GpuContext,
        config: &DemoConfig,
        effect: EffectKind,
        source: PixelBuffer,
    ) -> Result<Self> {
        let start = Instant::now();
        let pipeline = EffectPipeline::new(ctx, effect.fragment_shader()).await?;
        let state = DemoState::new(effect, config.control_range_for(effect), source)?;

        let pixels = state.texture_pixels();
        let texture = Texture::from_rgba8_with_config(
            ctx,
            pixels.as_bytes(),
            pixels.width(),
            pixels.height(),
            config.texture_filter.to_texture_config(),
        )?;
        let texture_bind_group = pipeline.create_texture_bind_group(ctx, &texture);
        pipeline.update_uniform(ctx, state.adjustment().to_uniform());

        log::info!(
            "Set up {} demo for {}x{} image in {:.2?}",
            effect,
            texture.width,
            texture.height,
            start.elapsed()
        );

        Ok(Self {
            state,
            pipeline,
            texture,
            texture_bind_group,
            clear_color: ClearColor::BLACK,
        })
    }

    pub fn state(&self) -> &DemoState {
        &self.state
    }

    pub fn effect(&self) -> EffectKind {
        self.state.effect()
    }

    /// Image dimensions, which are also the intended viewport size.
    pub fn image_size(&self) -> (u32, u32) {
        (self.texture.width, self.texture.height)
    }

    /// Recompute for `value` and upload the result: the CPU pixels into the
    /// texture, the uniform for shader effects.
    pub fn set_control(&mut self, ctx: &GpuContext, value: f32) -> Result<()> {
        let adjustment = self.state.set_control(value)?;
        if self.state.effect().is_cpu() {
            self.texture
                .write_rgba8(ctx, self.state.texture_pixels().as_bytes())?;
        }
        self.pipeline.update_uniform(ctx, adjustment.to_uniform());
        Ok(())
    }

    /// Move the control by `steps` increments of the range's step.
    pub fn step(&mut self, ctx: &GpuContext, steps: i32) -> Result<()> {
        let value = self.state.range().step_by(self.state.value(), steps);
        self.set_control(ctx, value)
    }

    pub fn reset(&mut self, ctx: &GpuContext) -> Result<()> {
        self.set_control(ctx, self.state.range().initial)
    }

    pub fn render(&self, ctx: &GpuContext) -> std::result::Result<(), wgpu::SurfaceError> {
        let output = ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.pipeline
            .render(&mut encoder, &view, &self.texture_bind_group, self.clear_color);

        ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Save the CPU-computed result as `<stem>_<effect>.png` next to `input`.
    pub fn save_next_to(&self, input: &Path) -> Result<std::path::PathBuf> {
        let path = image_io::output_path(input, self.effect());
        image_io::save_png(&path, &self.state.render_cpu()?)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> PixelBuffer {
        PixelBuffer::new(2, 1, vec![10, 20, 30, 255, 128, 100, 255, 77]).unwrap()
    }

    #[test]
    fn test_initial_value_is_range_initial() {
        let range = ControlRange::new(-1.0, 1.0, 0.1, 0.5);
        let state = DemoState::new(EffectKind::Brightness, range, source()).unwrap();
        assert_eq!(state.value(), 0.5);
        assert_eq!(state.adjustment(), Adjustment::Scale(1.5));
    }

    #[test]
    fn test_control_is_clamped() {
        let mut state = DemoState::new(
            EffectKind::Saturation,
            EffectKind::Saturation.default_range(),
            source(),
        )
        .unwrap();
        state.set_control(-5.0).unwrap();
        assert_eq!(state.value(), -1.5);
        state.set_control(5.0).unwrap();
        assert_eq!(state.value(), 1.0);
    }

    #[test]
    fn test_cpu_output_follows_last_value() {
        let mut state = DemoState::new(
            EffectKind::CpuBrightness,
            EffectKind::CpuBrightness.default_range(),
            source(),
        )
        .unwrap();
        assert_eq!(state.texture_pixels(), &source());

        state.set_control(1.0).unwrap();
        state.set_control(-1.0).unwrap();
        assert_eq!(state.texture_pixels().as_bytes(), &[0, 0, 0, 255, 0, 0, 0, 77]);

        state.set_control(state.range().initial).unwrap();
        assert_eq!(state.texture_pixels(), &source());
        assert_eq!(state.source(), &source());
    }

    #[test]
    fn test_gpu_effects_keep_source_in_texture() {
        let mut state =
            DemoState::new(EffectKind::Hue, EffectKind::Hue.default_range(), source()).unwrap();
        state.set_control(0.3).unwrap();
        assert_eq!(state.texture_pixels(), &source());
    }

    #[test]
    fn test_step_moves_by_range_step() {
        let range = ControlRange::new(0.0, 1.0, 0.25, 0.0);
        let mut state = DemoState::new(EffectKind::Hue, range, source()).unwrap();
        for (steps, expected) in [(1, 0.25), (10, 1.0), (-2, 0.5)] {
            let value = state.range().step_by(state.value(), steps);
            state.set_control(value).unwrap();
            assert_eq!(state.value(), expected);
        }
    }

    #[test]
    fn test_render_cpu_matches_affine_filter() {
        let mut state = DemoState::new(
            EffectKind::Contrast,
            EffectKind::Contrast.default_range(),
            source(),
        )
        .unwrap();
        state.set_control(0.5).unwrap();
        let out = state.render_cpu().unwrap();
        assert_eq!(out.pixel(1, 0), Some([128, 86, 255, 77]));
        assert_eq!(out.pixel(0, 0).map(|px| px[3]), Some(255));
    }
}
