//! Chroma demos entry point.
//!
//! Usage: `chroma-demos [config.json] [image]`. A `.json` argument is read as
//! the configuration; any other argument is the image to open.

use std::path::PathBuf;

use chroma_demos::{DemoConfig, app};

fn main() {
    let mut config_path: Option<PathBuf> = None;
    let mut image_path: Option<PathBuf> = None;
    for arg in std::env::args_os().skip(1) {
        let path = PathBuf::from(arg);
        if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
            config_path = Some(path);
        } else {
            image_path = Some(path);
        }
    }

    let config = DemoConfig::load_or_default(config_path.as_deref());

    // RUST_LOG overrides the configured level.
    let level = config
        .as_ref()
        .map(|c| c.log_level.to_level_filter())
        .unwrap_or(log::LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let mut config = match config {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Using default configuration: {}", e);
            DemoConfig::default()
        }
    };
    if image_path.is_some() {
        config.image_path = image_path;
    }

    if let Err(e) = app::run(config) {
        log::error!("Application error: {}", e);
        std::process::exit(1);
    }
}
