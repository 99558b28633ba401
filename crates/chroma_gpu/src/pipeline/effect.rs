//! Single-quad pipeline shared by every demo.
//!
//! The vertex stage is always `quad.wgsl`; the fragment stage is picked per
//! demo. All fragment shaders see the same bind group layout so switching
//! effects never changes the Rust side.

use wgpu::util::DeviceExt;

use super::{BindGroupLayoutBuilder, PipelineBuilder};
use crate::bindings::*;
use crate::config::ClearColor;
use crate::context::GpuContext;
use crate::error::Result;
use crate::shader::{ShaderStage, compile_shader, link_program};
use crate::texture::Texture;
use crate::uniform::EffectUniform;
use crate::vertex::{Vertex, quad_vertices};

pub const VERTEX_SHADER_SOURCE: &str = include_str!("../shaders/quad.wgsl");

/// Fragment stage variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentShader {
    /// Texture drawn as-is.
    Passthrough,
    /// RGB scaled by `EffectUniform::factor`.
    Brightness,
    /// `EffectUniform::matrix * color + EffectUniform::offset`.
    ColorMatrix,
}

impl FragmentShader {
    pub fn label(self) -> &'static str {
        match self {
            FragmentShader::Passthrough => "Passthrough Fragment Shader",
            FragmentShader::Brightness => "Brightness Fragment Shader",
            FragmentShader::ColorMatrix => "Color Matrix Fragment Shader",
        }
    }

    pub fn source(self) -> &'static str {
        match self {
            FragmentShader::Passthrough => include_str!("../shaders/passthrough.wgsl"),
            FragmentShader::Brightness => include_str!("../shaders/brightness.wgsl"),
            FragmentShader::ColorMatrix => include_str!("../shaders/color_matrix.wgsl"),
        }
    }
}

/// Compiled program plus the static quad and the effect uniform buffer.
pub struct EffectPipeline {
    pub render_pipeline: wgpu::RenderPipeline,
    pub vertex_buffer: wgpu::Buffer,
    pub num_vertices: u32,
    pub uniform_buffer: wgpu::Buffer,
    pub uniform_bind_group: wgpu::BindGroup,
    pub texture_bind_group_layout: wgpu::BindGroupLayout,
}

impl EffectPipeline {
    /// Compile both stages, link them and upload the quad.
    ///
    /// Any compile or link failure is returned; nothing half-built escapes.
    pub async fn new(ctx: &GpuContext, fragment: FragmentShader) -> Result<Self> {
        let vertex_shader = compile_shader(
            &ctx.device,
            "Quad Vertex Shader",
            VERTEX_SHADER_SOURCE,
            ShaderStage::Vertex,
        )
        .await?;
        let fragment_shader = compile_shader(
            &ctx.device,
            fragment.label(),
            fragment.source(),
            ShaderStage::Fragment,
        )
        .await?;

        let uniform_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Effect Uniform Buffer"),
            contents: bytemuck::cast_slice(&[EffectUniform::new()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout = BindGroupLayoutBuilder::new(&ctx.device)
            .with_label("Effect Uniform Bind Group Layout")
            .add_uniform_buffer(UNIFORM_EFFECT_BINDING, wgpu::ShaderStages::FRAGMENT)
            .build();

        let texture_bind_group_layout = BindGroupLayoutBuilder::new(&ctx.device)
            .with_label("Texture Bind Group Layout")
            .add_texture_2d(TEXTURE_BINDING, wgpu::ShaderStages::FRAGMENT)
            .add_sampler(SAMPLER_BINDING, wgpu::ShaderStages::FRAGMENT)
            .build();

        let uniform_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Effect Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: UNIFORM_EFFECT_BINDING,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let builder = PipelineBuilder::new(&ctx.device, ctx.format())
            .with_label("Effect Render Pipeline")
            .with_vertex_buffer(Vertex::desc())
            .with_bind_group_layouts(&[&uniform_bind_group_layout, &texture_bind_group_layout]);
        let render_pipeline = link_program(builder, &vertex_shader, &fragment_shader).await?;

        let vertices = quad_vertices();
        let vertex_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Quad Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        log::info!("Created effect pipeline ({:?})", fragment);

        Ok(Self {
            render_pipeline,
            vertex_buffer,
            num_vertices: vertices.len() as u32,
            uniform_buffer,
            uniform_bind_group,
            texture_bind_group_layout,
        })
    }

    /// Create bind group for a texture
    pub fn create_texture_bind_group(&self, ctx: &GpuContext, texture: &Texture) -> wgpu::BindGroup {
        ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Texture Bind Group"),
            layout: &self.texture_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: TEXTURE_BINDING,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: SAMPLER_BINDING,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        })
    }

    /// Overwrite the effect uniform.
    pub fn update_uniform(&self, ctx: &GpuContext, uniform: EffectUniform) {
        ctx.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    /// Clear the target and draw the textured quad.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        texture_bind_group: &wgpu::BindGroup,
        clear_color: ClearColor,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Effect Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color.into()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        render_pass.set_pipeline(&self.render_pipeline);
        render_pass.set_bind_group(UNIFORM_GROUP, &self.uniform_bind_group, &[]);
        render_pass.set_bind_group(TEXTURE_GROUP, texture_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.draw(0..self.num_vertices, 0..1);
    }
}
