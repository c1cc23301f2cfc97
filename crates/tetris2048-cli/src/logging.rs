use std::{env, fs::File, path::Path};

use anyhow::Context as _;
use env_logger::{Builder, Target};
use log::LevelFilter;

/// Sets up `env_logger`.
///
/// The terminal is owned by the game while it runs, so log records only make
/// it somewhere readable when they are piped into `log_file`. In that case
/// the level defaults to `info` unless `RUST_LOG` says otherwise.
pub(crate) fn init(log_file: Option<&Path>) -> anyhow::Result<()> {
    let mut builder = Builder::from_default_env();
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file: {}", path.display()))?;
        builder.target(Target::Pipe(Box::new(file)));
        if env::var_os("RUST_LOG").is_none() {
            builder.filter_level(LevelFilter::Info);
        }
    }
    builder
        .try_init()
        .context("Failed to initialize the logger")?;
    Ok(())
}
