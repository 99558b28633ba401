//! Shader compile/link boundary.
//!
//! Every demo builds exactly two stages from WGSL text and links them into a
//! render pipeline. Both steps run inside a wgpu validation error scope so a
//! broken shader surfaces as a [`GpuError`] instead of a handle that fails
//! later at draw time.

use std::fmt;

use crate::error::{GpuError, Result};
use crate::pipeline::PipelineBuilder;

/// Programmable stage a shader module is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }

    /// Entry point every shader of this stage must declare.
    pub fn entry_point(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vs_main",
            ShaderStage::Fragment => "fs_main",
        }
    }

    fn attribute(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "@vertex",
            ShaderStage::Fragment => "@fragment",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A shader module that passed validation for one stage.
#[derive(Debug)]
pub struct CompiledShader {
    pub module: wgpu::ShaderModule,
    pub stage: ShaderStage,
}

impl CompiledShader {
    pub fn entry_point(&self) -> &'static str {
        self.stage.entry_point()
    }
}

/// Check that `source` declares `@<stage> fn <entry_point>`.
///
/// Line comments are ignored. Returns the diagnostic text on failure.
pub fn check_entry_point(source: &str, stage: ShaderStage) -> std::result::Result<(), String> {
    let code = strip_line_comments(source);
    let attribute = stage.attribute();
    let entry = stage.entry_point();

    for (pos, _) in code.match_indices(attribute) {
        let rest = &code[pos + attribute.len()..];
        if rest.starts_with(is_ident_char) {
            // e.g. `@vertexfoo`
            continue;
        }
        let Some(after_fn) = rest.trim_start().strip_prefix("fn") else {
            continue;
        };
        if !after_fn.starts_with(char::is_whitespace) {
            continue;
        }
        let Some(after_name) = after_fn.trim_start().strip_prefix(entry) else {
            continue;
        };
        if !after_name.starts_with(is_ident_char) {
            return Ok(());
        }
    }

    Err(format!(
        "missing entry point: expected `{} fn {}(...)`",
        attribute, entry
    ))
}

/// Check that a vertex and a fragment stage are being paired.
pub fn check_stages(vertex: ShaderStage, fragment: ShaderStage) -> Result<()> {
    if vertex != ShaderStage::Vertex {
        return Err(GpuError::ProgramLink(format!(
            "expected a vertex shader in the vertex slot, got a {} shader",
            vertex
        )));
    }
    if fragment != ShaderStage::Fragment {
        return Err(GpuError::ProgramLink(format!(
            "expected a fragment shader in the fragment slot, got a {} shader",
            fragment
        )));
    }
    Ok(())
}

/// Compile WGSL `source` for `stage`.
pub async fn compile_shader(
    device: &wgpu::Device,
    label: &str,
    source: &str,
    stage: ShaderStage,
) -> Result<CompiledShader> {
    if let Err(log) = check_entry_point(source, stage) {
        log::error!("{} shader '{}' rejected: {}", stage, label, log);
        return Err(GpuError::ShaderCompile { stage, log });
    }

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    if let Some(error) = device.pop_error_scope().await {
        let log = error.to_string();
        log::error!("{} shader '{}' failed to compile: {}", stage, label, log);
        return Err(GpuError::ShaderCompile { stage, log });
    }

    log::info!("Compiled {} shader '{}'", stage, label);
    Ok(CompiledShader { module, stage })
}

/// Link a vertex and a fragment shader into a render pipeline.
///
/// `builder` carries everything else the pipeline needs (vertex layout,
/// bind group layouts, target format).
pub async fn link_program<'a>(
    builder: PipelineBuilder<'a>,
    vertex: &'a CompiledShader,
    fragment: &'a CompiledShader,
) -> Result<wgpu::RenderPipeline> {
    check_stages(vertex.stage, fragment.stage)?;

    let device = builder.device();
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let pipeline = builder.with_shaders(vertex, fragment).build()?;
    if let Some(error) = device.pop_error_scope().await {
        let log = error.to_string();
        log::error!("Program link failed: {}", log);
        return Err(GpuError::ProgramLink(log));
    }

    log::info!("Linked program");
    Ok(pipeline)
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn strip_line_comments(source: &str) -> String {
    source
        .lines()
        .map(|line| match line.find("//") {
            Some(idx) => &line[..idx],
            None => line,
        })
        .collect::<Vec<_>>()
        .join("\n")
}
