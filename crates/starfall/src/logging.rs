//! Log setup. The terminal belongs to the UI, so logs only go to a file.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use color_eyre::eyre::WrapErr;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Install a file logger when `log_file` is given.
pub fn init(log_file: Option<&Path>, verbose: bool) -> color_eyre::Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
