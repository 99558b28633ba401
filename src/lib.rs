//! Chroma Demos - GPU color adjustment demos
//!
//! Brightness, contrast, saturation and hue adjustments on a textured quad,
//! plus a CPU brightness filter that produces the same pixels without a
//! shader. The color math and the pixel filter are plain Rust and usable
//! without a window; `app` drives them from a winit event loop.

pub mod app;
pub mod color_transform;
pub mod config;
pub mod demo;
pub mod effect;
pub mod error;
pub mod image_io;
pub mod pixel_filter;

pub use color_transform::{ColorMatrix, ColorOffset, ColorTransform};
pub use config::{ControlRange, DemoConfig, LogLevel};
pub use effect::{Adjustment, EffectKind};
pub use error::{DemoError, Result};
pub use pixel_filter::{FilterError, PixelBuffer};
