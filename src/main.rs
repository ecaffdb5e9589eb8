use std::path::PathBuf;

use anyhow::{Context, Result};
use bgmkit::audio::device::CpalBackend;
use bgmkit::audio::{BackendError, EngineHandle};
use bgmkit::commands::CommandContext;
use bgmkit::{repl, AudioParams};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let params = match &config_path {
        Some(path) => AudioParams::load_or_default(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => AudioParams::default(),
    };

    let engine = EngineHandle::spawn(params.clone(), || {
        CpalBackend::new().map_err(|e| BackendError::Unavailable(format!("{e:#}")))
    });

    repl::start(CommandContext::new(engine, params, config_path))
}
