// Copyright (c) 2026 rezky_nightky

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Names the file diagnostics are appended to. stdout and stderr belong to
/// the animation, so nothing is logged unless this is set.
pub const LOG_PATH_ENV: &str = "DIGITAL_RAIN_LOG";

const DEFAULT_FILTER: &str = "info";

pub fn init() {
    let Some(path) = std::env::var_os(LOG_PATH_ENV) else {
        return;
    };
    if let Err(e) = init_file(Path::new(&path)) {
        eprintln!("failed to open log file {}: {}", path.to_string_lossy(), e);
    }
}

fn init_file(path: &Path) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    // A subscriber may already be installed (tests); keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init();
    Ok(())
}
